//! sorrel-core: an EDN-family data notation plus a small Lisp-style
//! expression language evaluated over the same value tree.
//!
//! Text flows through [`reader::parse`] into a [`ast::Value`], which
//! [`eval::Evaluator`] reduces against a scope chain; [`value_format`]
//! turns any value back into text that re-reads to an equal value.

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod pretty_print;
pub mod reader;
pub mod string_escape;
pub mod value_format;

use ast::Value;
use env::Env;
use error::SorrelError;
use eval::Evaluator;

/// Parses a source text into one value, with top-level `do`-wrapping.
pub fn parse_source(source: &str) -> Result<Value, SorrelError> {
    reader::parse(source)
}

/// Parses and evaluates a source text in a fresh root scope over the
/// default host callables.
pub fn eval_source(source: &str) -> Result<Value, SorrelError> {
    let form = reader::parse(source)?;
    let evaluator = Evaluator::new(Env::default());
    evaluator.eval_in_global(&form)
}
