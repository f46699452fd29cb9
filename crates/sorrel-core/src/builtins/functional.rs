use im::Vector;

use crate::ast::{FnArity, Value};
use crate::builtins::{def_builtin, seq_items};
use crate::env::Env;
use crate::eval::call_callable;

pub(crate) fn install(env: &mut Env) {
    def_builtin!(env, "map", FnArity::exact(2), |args| {
        let f = &args[0];
        let mut out = Vector::new();
        for item in seq_items(&args[1])? {
            out.push_back(call_callable(f, &[item.clone()])?);
        }
        Ok(Value::List(out))
    });
    def_builtin!(env, "filter", FnArity::exact(2), |args| {
        let pred = &args[0];
        let mut out = Vector::new();
        for item in seq_items(&args[1])? {
            if call_callable(pred, &[item.clone()])?.expect_bool()? {
                out.push_back(item.clone());
            }
        }
        Ok(Value::List(out))
    });
}
