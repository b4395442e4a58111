use std::fmt;

use thiserror::Error;

/// The primitive a failed drive call was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOperation {
    List,
    Upload,
    Delete,
    Download,
    CreateDirectory,
    Copy,
    Move,
}

impl fmt::Display for DriveOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list files",
            Self::Upload => "upload file",
            Self::Delete => "delete file",
            Self::Download => "download file",
            Self::CreateDirectory => "create directory",
            Self::Copy => "copy file",
            Self::Move => "move file",
        })
    }
}

/// How a drive call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The server answered with a non-2xx status.
    Status(u16),
    /// No response was received.
    Network,
    /// The request body could not be encoded.
    Encode,
    /// A success response carried a body that could not be decoded.
    Decode,
}

/// Failure of a single drive call. Never retried by the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to {operation}: {message}")]
pub struct TransportError {
    pub operation: DriveOperation,
    pub kind: TransportErrorKind,
    /// Status text for [`TransportErrorKind::Status`], otherwise a description.
    pub message: String,
}

impl TransportError {
    pub fn new(
        operation: DriveOperation,
        kind: TransportErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    pub fn status(operation: DriveOperation, status: u16, status_text: impl Into<String>) -> Self {
        Self::new(operation, TransportErrorKind::Status(status), status_text)
    }

    /// HTTP status of the failed response, if there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::Status(status) => Some(status),
            _ => None,
        }
    }
}

pub type DriveResult<T> = Result<T, TransportError>;
