//! Error types for matching and node construction.
//!
//! Everything fallible in this crate reports through [`Error`]. Matching
//! failures carry enough context to show what was expected against what
//! was found; the default matcher wraps inner failures with the enclosing
//! template before re-raising.

/// Unified error type for the crate.
#[derive(Debug, Clone)]
pub enum Error {
    /// The input text does not conform to the template at some placeholder.
    TemplateMismatch(String),
    /// The template itself is ill-formed (two adjacent text placeholders,
    /// or a field placeholder applied to the wrong field shape).
    TemplateSpec(String),
    /// Ill-formed caller input: a statement without indent context, a node
    /// that is not part of the given module, an invalid builder argument.
    Value(String),
    /// A textual ctx tag did not name one of load/store/del/param.
    InvalidCtx(String),
}

impl Error {
    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Error::TemplateMismatch(msg.into())
    }

    pub(crate) fn spec(msg: impl Into<String>) -> Self {
        Error::TemplateSpec(msg.into())
    }

    pub(crate) fn value(msg: impl Into<String>) -> Self {
        Error::Value(msg.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TemplateMismatch(msg) => write!(f, "template mismatch: {}", msg),
            Error::TemplateSpec(msg) => write!(f, "badly specified template: {}", msg),
            Error::Value(msg) => write!(f, "invalid value: {}", msg),
            Error::InvalidCtx(msg) => write!(f, "invalid ctx: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
