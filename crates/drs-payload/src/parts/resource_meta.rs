//! `DrwResourceMeta` payload.

use std::io::{self, Write};

use drs_common::{BinaryReader, WriteDrsExt};

use super::expect_consumed;
use crate::{Error, NodeKind, Result};

/// Resource metadata: two opaque words and a hash string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    /// Unknown leading words, preserved as read.
    pub unknown: [i32; 2],
    /// Resource hash.
    pub hash: String,
}

impl ResourceMeta {
    /// Parse resource metadata from its byte window.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let kind = NodeKind::DrwResourceMeta;
        let mut reader = BinaryReader::new(data);

        let unknown = [reader.read_i32()?, reader.read_i32()?];
        let hash = reader
            .read_prefixed_string()
            .map_err(|e| Error::malformed(kind, e))?
            .to_string();

        expect_consumed(&reader, kind)?;
        Ok(Self { unknown, hash })
    }

    /// Number of bytes [`write_to`](Self::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        12 + self.hash.len()
    }

    /// Write the resource metadata.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32_le(self.unknown[0])?;
        writer.write_i32_le(self.unknown[1])?;
        writer.write_prefixed_bytes(self.hash.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_meta_roundtrip() {
        let meta = ResourceMeta {
            unknown: [0, 1],
            hash: "3b1e0cfa".to_string(),
        };
        let mut bytes = Vec::new();
        meta.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), meta.encoded_len());
        assert_eq!(ResourceMeta::parse(&bytes).unwrap(), meta);
    }

    #[test]
    fn test_hash_length_past_window() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&16i32.to_le_bytes());
        bytes.extend_from_slice(b"short");

        let err = ResourceMeta::parse(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload { .. }));
    }
}
