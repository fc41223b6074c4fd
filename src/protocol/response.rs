//! Response frame as read off the wire.

use bytes::Bytes;

use super::StatusCode;

/// One response frame
#[derive(Debug, Clone)]
pub struct FramedResponse {
    /// Status byte assigned by the tracker
    pub status: StatusCode,

    /// Body bytes. Always empty when `status` is non-zero.
    pub body: Bytes,
}

impl FramedResponse {
    pub fn ok(body: Bytes) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: Bytes::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}
