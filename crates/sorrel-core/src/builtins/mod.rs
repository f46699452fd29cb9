use crate::env::{new_ref, Env, EnvRef};
use crate::error::SorrelError;

pub(crate) use shared::*;

#[macro_export]
macro_rules! def_builtin {
    ($env:expr, $name:expr, $arity:expr, |$args:ident| $body:block) => {
        $env.define_builtin(
            $name,
            $crate::ast::Value::native_fn_with_name($name, $arity, move |$args: &[$crate::ast::Value]| -> Result<$crate::ast::Value, $crate::error::SorrelError> {
                $body
            }),
        );
    };
    ($env:expr, $name:expr, $arity:expr, |$args:ident| $body:expr) => {
        $env.define_builtin(
            $name,
            $crate::ast::Value::native_fn_with_name($name, $arity, move |$args: &[$crate::ast::Value]| -> Result<$crate::ast::Value, $crate::error::SorrelError> {
                $body
            }),
        );
    };
}

pub use def_builtin;

/// The scope the CLI starts from: arithmetic, comparisons, predicates,
/// the sequence functions and the print family.
pub fn default_env() -> EnvRef {
    let mut env = Env::default();
    math::install(&mut env);
    predicates::install(&mut env);
    functional::install(&mut env);
    io::install(&mut env);
    new_ref(env)
}

pub fn err<T>(msg: impl Into<String>) -> Result<T, SorrelError> {
    Err(SorrelError::host(msg))
}

mod functional;
mod io;
mod math;
mod predicates;
mod shared;
