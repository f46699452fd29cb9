use std::fmt;

use thiserror::Error;

use crate::reader::Span;

#[derive(Clone, Debug)]
pub struct ParseErrorData {
    pub message: String,
    pub span: Span,
}

impl ParseErrorData {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Spans are tracked zero-based; diagnostics print one-based.
        write!(
            f,
            "{}:{}: {}",
            self.span.line + 1,
            self.span.col + 1,
            self.message
        )
    }
}

#[derive(Error, Debug, Clone)]
pub enum SorrelError {
    #[error("Parse error: {0}")]
    Parse(ParseErrorData),

    #[error("Unbound symbol: '{0}'")]
    UnboundSymbol(String),

    #[error("Type mismatch: expected {expected}, got {actual} ({value})")]
    TypeMismatch {
        expected: String,
        actual: String,
        value: String,
    },

    #[error("could not resolve function overload for {arity} arg(s)")]
    NoOverload { arity: usize },

    #[error("bad parameter list: {params}")]
    BadParameters { params: String },

    #[error("{0}")]
    Host(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Error on evaluating `{form}`: {source}")]
    Eval {
        form: String,
        #[source]
        source: Box<SorrelError>,
    },
}

impl SorrelError {
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        SorrelError::Parse(ParseErrorData::new(message, span))
    }

    pub fn unbound_symbol(symbol: impl Into<String>) -> Self {
        SorrelError::UnboundSymbol(symbol.into())
    }

    pub fn type_mismatch(
        expected: impl Into<String>,
        actual: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        SorrelError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
            value: value.into(),
        }
    }

    pub fn no_overload(arity: usize) -> Self {
        SorrelError::NoOverload { arity }
    }

    pub fn bad_parameters(params: impl Into<String>) -> Self {
        SorrelError::BadParameters {
            params: params.into(),
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        SorrelError::Host(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        SorrelError::Runtime(message.into())
    }

    pub fn wrap(form: impl Into<String>, inner: SorrelError) -> Self {
        SorrelError::Eval {
            form: form.into(),
            source: Box::new(inner),
        }
    }

    /// Digs through the evaluation breadcrumb to the error that started it.
    pub fn root_cause(&self) -> &SorrelError {
        let mut current = self;
        while let SorrelError::Eval { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn span(&self) -> Option<Span> {
        match self.root_cause() {
            SorrelError::Parse(data) => Some(data.span),
            _ => None,
        }
    }
}

impl From<String> for SorrelError {
    fn from(s: String) -> Self {
        SorrelError::runtime(s)
    }
}

impl From<&str> for SorrelError {
    fn from(s: &str) -> Self {
        SorrelError::runtime(s.to_string())
    }
}
