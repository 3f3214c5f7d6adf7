//! Error types shared by the selector, transport and session layers.

use std::io;
use thiserror::Error;

/// Why a typed port ordinal was rejected.
///
/// The `Display` text is what the operator sees before being re-prompted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please enter a valid number!")]
    NotANumber(String),

    #[error("Invalid selection!")]
    OutOfRange { ordinal: i64, count: usize },
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("No serial ports found!")]
    NoPorts,

    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(String),

    #[error("failed to open serial port {port}: {reason}")]
    Open { port: String, reason: String },

    /// A single read failed. The session reports it and keeps draining.
    #[error("{0}")]
    Read(String),

    #[error("failed to query serial input buffer: {0}")]
    BufferQuery(String),

    #[error("failed to write to serial port: {0}")]
    Write(String),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("unknown character encoding: {0}")]
    UnknownEncoding(String),
}

impl BridgeError {
    /// Whether the session may carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::Read(_))
    }
}
