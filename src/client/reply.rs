//! Application-level outcome of a tracker exchange.

use crate::protocol::StatusCode;

/// What a tracker answered: a value, or a non-zero status code
///
/// Transport failures are not represented here; they come back as
/// [`TrackerError`](crate::TrackerError) on the outer `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum TrackerReply<T> {
    Ok(T),
    Status(StatusCode),
}

impl<T> TrackerReply<T> {
    /// `StatusCode::OK` for a value, the tracker's code otherwise
    pub fn status(&self) -> StatusCode {
        match self {
            TrackerReply::Ok(_) => StatusCode::OK,
            TrackerReply::Status(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, TrackerReply::Ok(_))
    }

    /// The value, discarding the status
    pub fn ok(self) -> Option<T> {
        match self {
            TrackerReply::Ok(value) => Some(value),
            TrackerReply::Status(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, StatusCode> {
        match self {
            TrackerReply::Ok(value) => Ok(value),
            TrackerReply::Status(code) => Err(code),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TrackerReply<U> {
        match self {
            TrackerReply::Ok(value) => TrackerReply::Ok(f(value)),
            TrackerReply::Status(code) => TrackerReply::Status(code),
        }
    }
}

impl<T> From<StatusCode> for TrackerReply<T> {
    fn from(code: StatusCode) -> Self {
        TrackerReply::Status(code)
    }
}
