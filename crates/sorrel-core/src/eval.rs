use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use im::Vector;
use once_cell::sync::Lazy;

use crate::ast::{format_fn_arity, LambdaClause, Value, ValueType};
use crate::builtins;
use crate::env::{new_ref, Env, EnvRef};
use crate::error::SorrelError;
use crate::value_format::{format_value, FormatMode};

static SPECIAL_FORMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["quote", "do", "def", "let", "if", "cond", "fn", "defn"]
        .into_iter()
        .collect()
});

pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(name)
}

pub struct Evaluator {
    global: EnvRef,
}

impl Evaluator {
    /// Builds an evaluator whose global scope layers `base` over the
    /// default host callables.
    pub fn new(base: Env) -> Self {
        let mut env = base;
        for (key, value) in builtins::default_env().read().unwrap().clone_data() {
            if !env.contains_local(&key) {
                env.set(&key, value);
            }
        }
        Self {
            global: new_ref(env),
        }
    }

    /// Wraps an existing scope chain without installing anything.
    pub fn with_env_ref(env: EnvRef) -> Self {
        Self { global: env }
    }

    pub fn global_env(&self) -> EnvRef {
        self.global.clone()
    }

    pub fn eval_in_global(&self, value: &Value) -> Result<Value, SorrelError> {
        self.eval(value, self.global.clone())
    }

    /// Reduces one value in the given scope. Failures come back wrapped
    /// with the form under evaluation, so nested failures read as a
    /// breadcrumb from the outermost form down to the one that failed.
    pub fn eval(&self, value: &Value, env: EnvRef) -> Result<Value, SorrelError> {
        self.eval_inner(value, env)
            .map_err(|err| SorrelError::wrap(format_value(value, FormatMode::Readable), err))
    }

    fn eval_inner(&self, value: &Value, env: EnvRef) -> Result<Value, SorrelError> {
        match value {
            Value::Nil
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Char(_)
            | Value::Str(_)
            | Value::Keyword(_)
            | Value::Tagged { .. }
            | Value::Func(_)
            | Value::Lambda { .. } => Ok(value.clone()),
            Value::Quoted(inner) => Ok((**inner).clone()),
            Value::Symbol(name) => env
                .read()
                .unwrap()
                .get(name)
                .ok_or_else(|| SorrelError::unbound_symbol(name)),
            Value::Vector(items) => {
                let mut out = Vector::new();
                for item in items {
                    out.push_back(self.eval(item, env.clone())?);
                }
                Ok(Value::Vector(out))
            }
            Value::Set(items) => {
                let mut out = BTreeSet::new();
                for item in items {
                    out.insert(self.eval(item, env.clone())?);
                }
                Ok(Value::Set(out))
            }
            Value::Map(entries) => {
                let mut out = BTreeMap::new();
                for (key, val) in entries {
                    let key = self.eval(key, env.clone())?;
                    let val = self.eval(val, env.clone())?;
                    out.insert(key, val);
                }
                Ok(Value::Map(out))
            }
            Value::List(items) => self.eval_list(items, env),
        }
    }

    fn eval_list(&self, items: &Vector<Value>, env: EnvRef) -> Result<Value, SorrelError> {
        if items.is_empty() {
            return Ok(Value::List(items.clone()));
        }
        let head = &items[0];
        let tail: Vec<Value> = items.iter().skip(1).cloned().collect();

        // Special forms dispatch on the head symbol textually, before
        // any evaluation happens.
        if let Value::Symbol(sym) = head {
            if let Some(result) = self.try_eval_special_form(sym, &tail, env.clone())? {
                return Ok(result);
            }
        }

        let callable = self.eval(head, env.clone())?;
        if !callable.is_callable() {
            return Err(SorrelError::type_mismatch(
                ValueType::Callable.name(),
                callable.type_name(),
                format_value(&callable, FormatMode::Readable),
            ));
        }
        let mut args = Vec::with_capacity(tail.len());
        for item in &tail {
            args.push(self.eval(item, env.clone())?);
        }
        call_callable(&callable, &args)
    }

    fn try_eval_special_form(
        &self,
        sym: &str,
        args: &[Value],
        env: EnvRef,
    ) -> Result<Option<Value>, SorrelError> {
        if !is_special_form(sym) {
            return Ok(None);
        }
        match sym {
            "quote" => self.eval_quote(args).map(Some),
            "do" => self.eval_do(args, env).map(Some),
            "def" => self.eval_def(args, env).map(Some),
            "let" => self.eval_let(args, env).map(Some),
            "if" => self.eval_if(args, env).map(Some),
            "cond" => self.eval_cond(args, env).map(Some),
            "fn" => self.eval_fn(args, env).map(Some),
            "defn" => self.eval_defn(args, env).map(Some),
            _ => Ok(None),
        }
    }

    fn eval_quote(&self, args: &[Value]) -> Result<Value, SorrelError> {
        match args {
            [form] => Ok(form.clone()),
            _ => Err(SorrelError::runtime("quote expects one argument")),
        }
    }

    pub(crate) fn eval_do(&self, forms: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let mut last = Value::Nil;
        for form in forms {
            last = self.eval(form, env.clone())?;
        }
        Ok(last)
    }

    fn eval_def(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let [name_form, value_form] = args else {
            return Err(SorrelError::runtime("def expects a symbol and a value"));
        };
        let name = name_form.expect_symbol()?.to_string();
        let value = name_lambda(self.eval(value_form, env.clone())?, &name);
        env.write().unwrap().set(&name, value.clone());
        Ok(value)
    }

    fn eval_let(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let Some((bindings_form, body)) = args.split_first() else {
            return Err(SorrelError::runtime(
                "let expects a binding vector and a body",
            ));
        };
        let bindings = bindings_form.expect_vector()?;
        if bindings.len() % 2 != 0 {
            return Err(SorrelError::runtime(
                "let expects an even number of binding forms",
            ));
        }
        let child = new_ref(Env::new_child(env));
        let mut iter = bindings.iter();
        // Each binding is evaluated in the child scope, so it sees the
        // bindings before it.
        while let (Some(name_form), Some(value_form)) = (iter.next(), iter.next()) {
            let name = name_form.expect_symbol()?.to_string();
            let value = self.eval(value_form, child.clone())?;
            child.write().unwrap().set(&name, value);
        }
        self.eval_do(body, child)
    }

    fn eval_if(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let [test, then_form, else_form] = args else {
            return Err(SorrelError::runtime(
                "if expects a condition, a then form and an else form",
            ));
        };
        let test_value = self.eval(test, env.clone())?;
        if test_value.expect_bool()? {
            self.eval(then_form, env)
        } else {
            self.eval(else_form, env)
        }
    }

    fn eval_cond(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        if args.len() % 2 != 0 {
            return Err(SorrelError::runtime(
                "cond expects an even number of test/expr forms",
            ));
        }
        for pair in args.chunks_exact(2) {
            let (test, expr) = (&pair[0], &pair[1]);
            let is_else = matches!(test, Value::Keyword(k) if k == "else");
            if is_else || self.eval(test, env.clone())?.expect_bool()? {
                return self.eval(expr, env);
            }
        }
        Ok(Value::Nil)
    }

    fn eval_fn(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let clauses = parse_fn_clauses(args)?;
        Ok(Value::Lambda {
            clauses: Arc::new(clauses),
            env,
            name: None,
        })
    }

    fn eval_defn(&self, args: &[Value], env: EnvRef) -> Result<Value, SorrelError> {
        let Some((name_form, fn_args)) = args.split_first() else {
            return Err(SorrelError::runtime(
                "defn expects a name and a function body",
            ));
        };
        let name = name_form.expect_symbol()?.to_string();
        let value = name_lambda(self.eval_fn(fn_args, env.clone())?, &name);
        env.write().unwrap().set(&name, value.clone());
        Ok(value)
    }
}

fn name_lambda(value: Value, name: &str) -> Value {
    match value {
        Value::Lambda {
            clauses,
            env,
            name: None,
        } => Value::Lambda {
            clauses,
            env,
            name: Some(name.to_string()),
        },
        other => other,
    }
}

/// Validates the whole overload shape eagerly, so calls only have to
/// pick a clause.
fn parse_fn_clauses(forms: &[Value]) -> Result<Vec<LambdaClause>, SorrelError> {
    if forms.is_empty() {
        return Err(SorrelError::runtime(
            "fn expects a parameter vector or overload clauses",
        ));
    }
    if forms.iter().all(|form| form.if_list().is_some()) {
        let mut clauses = Vec::with_capacity(forms.len());
        for form in forms {
            let items = form.expect_list()?;
            let Some(params) = items.front() else {
                return Err(SorrelError::runtime(
                    "fn overload expects a parameter vector and a body",
                ));
            };
            let body: Vec<Value> = items.iter().skip(1).cloned().collect();
            clauses.push(parse_clause(params, body)?);
        }
        return Ok(clauses);
    }
    let body: Vec<Value> = forms[1..].to_vec();
    Ok(vec![parse_clause(&forms[0], body)?])
}

fn parse_clause(params_form: &Value, body: Vec<Value>) -> Result<LambdaClause, SorrelError> {
    let bad = || {
        SorrelError::bad_parameters(format_value(params_form, FormatMode::Readable))
    };
    let Some(items) = params_form.if_vector() else {
        return Err(bad());
    };
    let mut params = Vec::new();
    let mut rest = None;
    let mut after_amp = false;
    for item in items {
        let Some(sym) = item.if_symbol() else {
            return Err(bad());
        };
        if sym == "&" {
            if after_amp {
                return Err(bad());
            }
            after_amp = true;
            continue;
        }
        if after_amp {
            if rest.is_some() {
                return Err(bad());
            }
            rest = Some(sym.to_string());
        } else {
            params.push(sym.to_string());
        }
    }
    if after_amp && rest.is_none() {
        return Err(bad());
    }
    Ok(LambdaClause { params, rest, body })
}

/// Applies any callable to already-evaluated arguments. Host callables
/// may re-enter the evaluator through this function.
pub fn call_callable(callable: &Value, args: &[Value]) -> Result<Value, SorrelError> {
    match callable {
        Value::Func(func) => {
            if !func.arity().accepts(args.len()) {
                let name = func.debug_name().unwrap_or("native fn");
                return Err(SorrelError::runtime(format!(
                    "{} expects {} argument(s), got {}",
                    name,
                    format_fn_arity(func.arity()),
                    args.len()
                )));
            }
            func.call(args)
        }
        Value::Lambda { clauses, env, name } => {
            invoke_lambda(callable, clauses, env, name.as_deref(), args)
        }
        other => Err(SorrelError::type_mismatch(
            ValueType::Callable.name(),
            other.type_name(),
            format_value(other, FormatMode::Readable),
        )),
    }
}

fn invoke_lambda(
    lambda_value: &Value,
    clauses: &[LambdaClause],
    captured: &EnvRef,
    name: Option<&str>,
    args: &[Value],
) -> Result<Value, SorrelError> {
    for clause in clauses {
        if !clause.matches(args.len()) {
            continue;
        }
        let child = new_ref(Env::new_child(captured.clone()));
        {
            let mut writer = child.write().unwrap();
            if let Some(fn_name) = name {
                writer.set(fn_name, lambda_value.clone());
            }
            for (param, arg) in clause.params.iter().zip(args) {
                writer.set(param, arg.clone());
            }
            if let Some(rest_name) = &clause.rest {
                let surplus: Vector<Value> =
                    args[clause.params.len()..].iter().cloned().collect();
                writer.set(rest_name, Value::List(surplus));
            }
        }
        let evaluator = Evaluator::with_env_ref(captured.clone());
        return evaluator.eval_do(&clause.body, child);
    }
    Err(SorrelError::no_overload(args.len()))
}

#[cfg(test)]
mod tests {
    use super::{call_callable, Evaluator};
    use crate::ast::Value;
    use crate::env::Env;
    use crate::error::SorrelError;
    use crate::reader::parse;

    fn eval_str(source: &str) -> Result<Value, SorrelError> {
        let form = parse(source)?;
        Evaluator::new(Env::default()).eval_in_global(&form)
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        assert_eq!(eval_str("nil").unwrap(), Value::Nil);
        assert_eq!(eval_str("42").unwrap(), Value::Int(42));
        assert_eq!(eval_str(":kw").unwrap(), Value::keyword("kw"));
        assert_eq!(
            eval_str("#inst \"2024\"").unwrap(),
            Value::tagged("inst", Value::string("2024"))
        );
    }

    #[test]
    fn empty_list_is_itself() {
        assert_eq!(eval_str("()").unwrap(), Value::list([]));
    }

    #[test]
    fn quoted_value_strips_one_layer() {
        assert_eq!(
            eval_str("'(a b)").unwrap(),
            Value::list([Value::symbol("a"), Value::symbol("b")])
        );
    }

    #[test]
    fn breadcrumb_runs_outermost_to_innermost() {
        let err = eval_str("(do (+ unknown 1))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error on evaluating `(do (+ unknown 1))`: \
             Error on evaluating `(+ unknown 1)`: \
             Error on evaluating `unknown`: Unbound symbol: 'unknown'"
        );
    }

    #[test]
    fn calling_a_non_callable_is_a_type_mismatch() {
        let err = eval_str("(1 2 3)").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SorrelError::TypeMismatch { expected, .. } if expected == "function"
        ));
    }

    #[test]
    fn native_arity_is_checked_before_the_call() {
        let f = Value::native_fn_with_name("one", crate::ast::FnArity::exact(1), |args| {
            Ok(args[0].clone())
        });
        let err = call_callable(&f, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Runtime error: one expects 1 argument(s), got 0"
        );
    }
}
