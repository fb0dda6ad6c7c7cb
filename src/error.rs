use std::io::Error as IoError;

use serde_json::Error as JsonError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the decision core and the tooling around it.
///
/// Malformed election records fail loudly here instead of feeding nonsense
/// into the date arithmetic; access checks never error at all, they deny.
#[derive(Debug, Error)]
pub enum Error {
    /// A civil date/time string failed to parse. `field` is the wire name
    /// (`startDate`, `endTime`, ...) so the operator can find the culprit.
    #[error("invalid {field} value {value:?}: {source}")]
    InvalidField {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
    /// Neither the side-specific date nor the shared `date` field is present.
    #[error("election record is missing a usable {0} date")]
    MissingDate(&'static str),
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: IoError },
    #[error(transparent)]
    Json(#[from] JsonError),
}
