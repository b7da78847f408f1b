//! Byte-for-byte payloads.

/// A payload carried verbatim.
///
/// Used for every node kind whose internal layout the editor does not
/// restructure (meshes, skeletons, animation data, collision shapes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload {
    bytes: Vec<u8>,
}

impl RawPayload {
    /// Wrap raw payload bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the payload bytes.
    pub fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Encoded length, which is simply the byte count.
    pub fn encoded_len(&self) -> usize {
        self.bytes.len()
    }
}

impl From<Vec<u8>> for RawPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
