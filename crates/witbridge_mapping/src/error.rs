//! Hard-failure error type for mapper entry points.

use std::num::ParseFloatError;
use thiserror::Error;

/// Caller-contract violations.
///
/// Only two things fail a mapping call outright: a required input that was
/// never provided, and remaining-work text that is not a number. Data-quality
/// problems (missing substitution entries, undecodable ranks, a missing
/// stylesheet) are logged as warnings instead and the mapping degrades to a
/// defined output.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required input was not provided.
    #[error("required argument `{0}` was not provided")]
    MissingArgument(&'static str),

    /// Remaining-work text could not be parsed as a number of seconds.
    #[error("`{input}` is not a valid number of seconds")]
    InvalidNumber {
        input: String,
        #[source]
        source: ParseFloatError,
    },
}
