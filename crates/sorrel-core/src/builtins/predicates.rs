use std::cmp::Ordering;

use crate::ast::{FnArity, Value};
use crate::builtins::{as_f64, def_builtin};
use crate::env::Env;
use crate::error::SorrelError;

pub(crate) fn install(env: &mut Env) {
    def_builtin!(env, "=", FnArity::at_least(1), |args| {
        Ok(Value::Bool(args.windows(2).all(|w| w[0] == w[1])))
    });
    def_builtin!(env, "!=", FnArity::at_least(1), |args| {
        Ok(Value::Bool(!args.windows(2).all(|w| w[0] == w[1])))
    });
    def_builtin!(env, "<", FnArity::at_least(1), |args| {
        num_chain(args, |ord| ord == Ordering::Less)
    });
    def_builtin!(env, ">", FnArity::at_least(1), |args| {
        num_chain(args, |ord| ord == Ordering::Greater)
    });
    def_builtin!(env, "<=", FnArity::at_least(1), |args| {
        num_chain(args, |ord| ord != Ordering::Greater)
    });
    def_builtin!(env, ">=", FnArity::at_least(1), |args| {
        num_chain(args, |ord| ord != Ordering::Less)
    });
    def_builtin!(env, "odd?", FnArity::exact(1), |args| {
        Ok(Value::Bool(args[0].expect_int()? % 2 != 0))
    });
    def_builtin!(env, "even?", FnArity::exact(1), |args| {
        Ok(Value::Bool(args[0].expect_int()? % 2 == 0))
    });
    def_builtin!(env, "type", FnArity::exact(1), |args| {
        Ok(Value::keyword(args[0].type_name()))
    });
}

/// Numeric comparison chain with Int/Float promotion; an incomparable
/// pair (NaN) breaks the chain.
fn num_chain(args: &[Value], pred: fn(Ordering) -> bool) -> Result<Value, SorrelError> {
    for w in args.windows(2) {
        let a = as_f64(&w[0])?;
        let b = as_f64(&w[1])?;
        let holds = a.partial_cmp(&b).map(pred).unwrap_or(false);
        if !holds {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}
