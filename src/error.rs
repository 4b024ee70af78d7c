use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The sequence was already drained, or handed off to a combinator.
    #[error("Sequence has already been consumed.")]
    Consumed,

    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: Cow<'static, str>,
    },

    /// An element could not be adapted into a nested sequence.
    #[error("Value of type {type_name} is not iterable.")]
    NotIterable { type_name: Cow<'static, str> },

    #[error("Value of type {type_name} cannot be coerced to a number.")]
    NotNumeric { type_name: Cow<'static, str> },

    #[error("Expected a value of type {expected}, found {found}.")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Parse(#[from] lexpr::parse::Error),

    #[error("Unsupported expression: {kind}")]
    UnsupportedExpr { kind: &'static str },
}

impl Error {
    pub fn new_invalid_argument(name: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn new_not_iterable(type_name: impl Into<Cow<'static, str>>) -> Self {
        Error::NotIterable {
            type_name: type_name.into(),
        }
    }

    pub fn new_type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    pub fn new_not_numeric(type_name: impl Into<Cow<'static, str>>) -> Self {
        Error::NotNumeric {
            type_name: type_name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
