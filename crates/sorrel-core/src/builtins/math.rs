use crate::ast::{FnArity, Value};
use crate::builtins::{as_num, def_builtin, err, Num};
use crate::env::Env;
use crate::error::SorrelError;

pub(crate) fn install(env: &mut Env) {
    def_builtin!(env, "+", FnArity::at_least(0), |args| {
        if args.is_empty() {
            return Ok(Value::Int(0));
        }
        arith("+", args, i64::checked_add, |a, b| a + b)
    });
    def_builtin!(env, "-", FnArity::at_least(1), |args| {
        if args.len() == 1 {
            return match as_num(&args[0])? {
                Num::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| overflow("-")),
                Num::Float(f) => Ok(Value::Float(-f)),
            };
        }
        arith("-", args, i64::checked_sub, |a, b| a - b)
    });
    def_builtin!(env, "*", FnArity::at_least(0), |args| {
        if args.is_empty() {
            return Ok(Value::Int(1));
        }
        arith("*", args, i64::checked_mul, |a, b| a * b)
    });
    def_builtin!(env, "/", FnArity::at_least(1), |args| divide(args));
}

/// Folds left-to-right. All-Int input stays Int with checked arithmetic;
/// one Float promotes the whole fold to Float.
fn arith(
    name: &str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, SorrelError> {
    let nums = args.iter().map(as_num).collect::<Result<Vec<_>, _>>()?;
    if nums.iter().any(|n| matches!(n, Num::Float(_))) {
        let mut acc = to_f64(nums[0]);
        for n in &nums[1..] {
            acc = float_op(acc, to_f64(*n));
        }
        return Ok(Value::Float(acc));
    }
    let mut acc = to_i64(nums[0]);
    for n in &nums[1..] {
        acc = match int_op(acc, to_i64(*n)) {
            Some(next) => next,
            None => return Err(overflow(name)),
        };
    }
    Ok(Value::Int(acc))
}

fn divide(args: &[Value]) -> Result<Value, SorrelError> {
    let nums = args.iter().map(as_num).collect::<Result<Vec<_>, _>>()?;
    if nums.len() == 1 {
        let n = to_f64(nums[0]);
        if n == 0.0 {
            return err("division by zero");
        }
        return Ok(Value::Float(1.0 / n));
    }
    if nums.iter().any(|n| matches!(n, Num::Float(_))) {
        let mut acc = to_f64(nums[0]);
        for n in &nums[1..] {
            let divisor = to_f64(*n);
            if divisor == 0.0 {
                return err("division by zero");
            }
            acc /= divisor;
        }
        return Ok(Value::Float(acc));
    }
    let mut acc = to_i64(nums[0]);
    for n in &nums[1..] {
        let divisor = to_i64(*n);
        if divisor == 0 {
            return err("division by zero");
        }
        acc = match acc.checked_div(divisor) {
            Some(next) => next,
            None => return Err(overflow("/")),
        };
    }
    Ok(Value::Int(acc))
}

fn to_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn to_i64(n: Num) -> i64 {
    match n {
        Num::Int(i) => i,
        Num::Float(f) => f as i64,
    }
}

fn overflow(name: &str) -> SorrelError {
    SorrelError::host(format!("integer overflow in {}", name))
}
