//! Error types for payload decoding and encoding.

use thiserror::Error;

use crate::NodeKind;

/// Errors that can occur when decoding or encoding node payloads.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while writing a payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] drs_common::Error),

    /// No codec is registered for this node name or magic.
    #[error("unknown node type: {name}")]
    UnknownNodeType { name: String },

    /// The byte window does not hold a valid payload for the node kind.
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: NodeKind, reason: String },

    /// The in-memory payload variant does not match the node's codec.
    #[error("{kind} expects a {expected} payload, found {found}")]
    PayloadMismatch {
        kind: NodeKind,
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Wrap any decode failure as a malformed payload of `kind`.
    pub(crate) fn malformed(kind: NodeKind, source: impl std::fmt::Display) -> Self {
        Self::MalformedPayload {
            kind,
            reason: source.to_string(),
        }
    }
}

/// Result type for payload operations.
pub type Result<T> = std::result::Result<T, Error>;
