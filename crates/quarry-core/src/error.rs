use crate::{exec::ExecError, value::ValueError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure surfaced by the dispatch pipeline.
/// Executor failures pass through `Execution` untouched.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Execution(ExecError),

    #[error("cannot map value into '{target}': {source}")]
    Mapping {
        target: String,
        #[source]
        source: ValueError,
    },

    #[error("expected at least one row, found 0 ({result_type})")]
    NotFound { result_type: &'static str },

    #[error("expected exactly one row, found {count} ({result_type})")]
    NotUnique {
        result_type: &'static str,
        count: usize,
    },

    #[error("grid reader has no remaining result sets")]
    ResultSetsExhausted,
}

impl Error {
    /// Construct a configuration error.
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Construct a mapping error for a bound target.
    pub(crate) fn mapping(target: impl Into<String>, source: ValueError) -> Self {
        Self::Mapping {
            target: target.into(),
            source,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled => ErrorClass::Cancelled,
            Self::Configuration(_) => ErrorClass::Configuration,
            Self::Execution(_) => ErrorClass::Execution,
            Self::Mapping { .. } => ErrorClass::Mapping,
            Self::NotFound { .. } | Self::ResultSetsExhausted => ErrorClass::NotFound,
            Self::NotUnique { .. } => ErrorClass::Conflict,
        }
    }

    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Recover the executor's original error, if this is one.
    #[must_use]
    pub fn into_execution(self) -> Option<ExecError> {
        match self {
            Self::Execution(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Coarse error taxonomy used for logging and caller branching.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    Cancelled,
    Configuration,
    Conflict,
    Execution,
    Mapping,
    NotFound,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cancelled => "cancelled",
            Self::Configuration => "configuration",
            Self::Conflict => "conflict",
            Self::Execution => "execution",
            Self::Mapping => "mapping",
            Self::NotFound => "not_found",
        };
        write!(f, "{label}")
    }
}
