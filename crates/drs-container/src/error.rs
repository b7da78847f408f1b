//! Error types for DRS container decoding and encoding.

use drs_payload::NodeKind;
use thiserror::Error;

use crate::{ModelType, PayloadId};

/// Errors that can occur when reading, editing or writing DRS containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] drs_common::Error),

    /// Payload codec error (unknown node type, malformed payload, variant mismatch).
    #[error("{0}")]
    Payload(#[from] drs_payload::Error),

    /// Invalid header magic (not a DRS file).
    #[error("invalid DRS magic: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic { expected: i32, actual: i32 },

    /// Header node count below 1 (there is always a root).
    #[error("invalid node count {0}")]
    InvalidNodeCount(i32),

    /// A declared offset/size window lies outside the stream.
    #[error("truncated stream: {section} window at offset {offset} with length {len} exceeds stream length {stream_len}")]
    TruncatedStream {
        section: String,
        offset: i64,
        len: i64,
        stream_len: usize,
    },

    /// A hierarchy node links to an index record that does not exist.
    #[error("hierarchy node {name} links to index record {info_index}, but there are only {record_count} records")]
    DanglingHierarchyLink {
        name: String,
        info_index: i32,
        record_count: usize,
    },

    /// A hierarchy node's name disagrees with the magic of the record it links to.
    #[error("hierarchy node {name} links to index record {index} whose magic is {magic:#010x}")]
    HierarchyMismatch { index: usize, name: String, magic: i32 },

    /// A node name appears more than once.
    #[error("duplicate node {0}")]
    DuplicateNode(String),

    /// No model type could be inferred, so there is no write order.
    #[error("model type is unknown; cannot determine write order")]
    UnclassifiedModelType,

    /// The model type's write order names a node the container lacks.
    #[error("{model_type} write order requires {node}, which is missing")]
    InconsistentSchema { model_type: ModelType, node: NodeKind },

    /// The container holds a node its model type never writes.
    #[error("{node} is not part of the {model_type} write order and would be lost")]
    OrphanNode { model_type: ModelType, node: NodeKind },

    /// A computed offset or size does not fit the file's i32 fields.
    #[error("{what} value {value} does not fit in an i32 field")]
    LayoutOverflow { what: String, value: u64 },

    /// A payload encoded to a different length than its recorded size.
    #[error("{node} encoded to {actual} bytes, expected {expected}")]
    SizeMismatch {
        node: NodeKind,
        expected: u32,
        actual: usize,
    },

    /// No record owns this payload handle.
    #[error("no node owns {0}")]
    UnknownPayload(PayloadId),

    /// No node with this name.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
