//! `CGeoPrimitiveContainer` payload.
//!
//! The index table always records this node with size 0 and the data section
//! holds no bytes for it, whatever the editor keeps in memory. The registry's
//! [`SizeRule::AlwaysZero`](crate::SizeRule::AlwaysZero) enforces that on
//! write; this type only carries the in-memory content.

/// In-memory content of a primitive container node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveContainer {
    content: Vec<u8>,
}

impl PrimitiveContainer {
    /// Create a primitive container holding `content` in memory.
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Parse from a byte window (normally empty).
    pub fn parse(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    /// The in-memory content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Mutable access to the in-memory content.
    pub fn content_mut(&mut self) -> &mut Vec<u8> {
        &mut self.content
    }

    /// True in-memory size, which is never what gets written.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}
