use crate::ast::{FnArity, Value};
use crate::builtins::def_builtin;
use crate::env::Env;
use crate::value_format::{format_value, FormatMode};

pub(crate) fn install(env: &mut Env) {
    def_builtin!(env, "print", FnArity::at_least(0), |args| {
        print!("{}", join_display(args));
        Ok(Value::Nil)
    });
    def_builtin!(env, "println", FnArity::at_least(0), |args| {
        println!("{}", join_display(args));
        Ok(Value::Nil)
    });
}

fn join_display(args: &[Value]) -> String {
    args.iter()
        .map(|v| format_value(v, FormatMode::Display))
        .collect::<Vec<_>>()
        .join(" ")
}
