//! Error types shared between client and server.
//!
//! The `QuoteError` enum unifies the failure cases of every pipeline stage:
//! transport, deadline, decoding, storage, and local file I/O. Each variant
//! maps onto a closed [`ErrorKind`] so callers can branch on the origin of a
//! failure without matching on message text.
use std::io;
use std::sync::PoisonError;
use std::time::Duration;

use strum_macros::Display;
use thiserror::Error;

use crate::deadline::Stage;

/// Closed set of failure origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// Connection refused, DNS failure, broken stream.
    Transport,
    /// A stage ran past its deadline and was abandoned.
    Timeout,
    /// Malformed JSON or a missing required field.
    Decode,
    /// Storage open/write failure other than a deadline.
    Storage,
    /// Local file I/O failure.
    Io,
}

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Network-level failure talking to a remote HTTP peer.
    #[error("transport error: {0}")]
    Transport(String),

    /// A stage did not finish within its deadline.
    #[error("{stage} deadline exceeded (budget {budget:?})")]
    Timeout {
        /// Stage whose deadline expired.
        stage: Stage,
        /// Local budget the stage was granted.
        budget: Duration,
    },

    /// Failure while decoding a JSON body.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failure reported by the storage engine.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error originating from the standard library (files, sockets).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl QuoteError {
    /// Returns the origin of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::Transport(_) => ErrorKind::Transport,
            QuoteError::Timeout { .. } => ErrorKind::Timeout,
            QuoteError::Decode(_) => ErrorKind::Decode,
            QuoteError::Storage(_) => ErrorKind::Storage,
            QuoteError::Io(_) => ErrorKind::Io,
        }
    }

    /// `true` when the failure was a deadline, whatever the stage.
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }

    /// Wraps any displayable error as a transport failure.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        QuoteError::Transport(err.to_string())
    }

    /// Wraps any displayable error as a storage failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        QuoteError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Decode(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::Storage(format!("connection lock poisoned: {}", err))
    }
}
