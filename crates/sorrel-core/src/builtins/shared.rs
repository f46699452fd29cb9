use im::Vector;

use crate::ast::Value;
use crate::error::SorrelError;
use crate::value_format::{format_value, FormatMode};

#[derive(Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

pub(crate) fn as_num(v: &Value) -> Result<Num, SorrelError> {
    match v {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Float(f) => Ok(Num::Float(*f)),
        other => Err(SorrelError::type_mismatch(
            "number",
            other.type_name(),
            format_value(other, FormatMode::Readable),
        )),
    }
}

pub(crate) fn as_f64(v: &Value) -> Result<f64, SorrelError> {
    match as_num(v)? {
        Num::Int(n) => Ok(n as f64),
        Num::Float(f) => Ok(f),
    }
}

/// Borrows the items of a List or Vector; anything else is a type error.
pub(crate) fn seq_items(v: &Value) -> Result<&Vector<Value>, SorrelError> {
    v.if_list().or_else(|| v.if_vector()).ok_or_else(|| {
        SorrelError::type_mismatch(
            "list or vector",
            v.type_name(),
            format_value(v, FormatMode::Readable),
        )
    })
}
