use crate::error::Error;
use std::any::type_name;

///
/// Cardinality
/// Row-count expectation of a single-result read.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cardinality {
    First,
    FirstOrDefault,
    Single,
    SingleOrDefault,
}

impl Cardinality {
    /// Check a result's row count before any row is mapped.
    ///
    /// Only the leading row is ever materialized, so this runs first.
    pub(crate) fn check<T>(self, count: usize) -> Result<(), Error> {
        match self {
            Self::First | Self::Single if count == 0 => Err(Error::NotFound {
                result_type: type_name::<T>(),
            }),
            Self::Single | Self::SingleOrDefault if count > 1 => Err(Error::NotUnique {
                result_type: type_name::<T>(),
                count,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::FirstOrDefault => "first_or_default",
            Self::Single => "single",
            Self::SingleOrDefault => "single_or_default",
        }
    }
}
