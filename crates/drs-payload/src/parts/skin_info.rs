//! `CSkSkinInfo` payload.

use std::io::{self, Write};

use drs_common::{BinaryReader, WriteDrsExt};

use super::{check_count, expect_consumed};
use crate::{NodeKind, Result};

/// Size of one vertex weight entry in bytes.
pub const VERTEX_WEIGHT_SIZE: usize = 32;

/// Up to four bone influences for one vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexWeight {
    /// Influence weights.
    pub weights: [f32; 4],
    /// Skeleton bone indices matching `weights`.
    pub bone_indices: [i32; 4],
}

/// Skin weights for every vertex of the skinned mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinInfo {
    /// Format version.
    pub version: i32,
    /// One entry per vertex.
    pub vertices: Vec<VertexWeight>,
}

impl Default for SkinInfo {
    fn default() -> Self {
        Self {
            version: 1,
            vertices: Vec::new(),
        }
    }
}

impl SkinInfo {
    /// Parse skin info from its byte window.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let kind = NodeKind::CSkSkinInfo;
        let mut reader = BinaryReader::new(data);

        let version = reader.read_i32()?;
        let vertex_count = reader.read_len()?;
        check_count(&reader, kind, vertex_count, VERTEX_WEIGHT_SIZE)?;

        let mut vertices = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            let mut weight = VertexWeight::default();
            for w in &mut weight.weights {
                *w = reader.read_f32()?;
            }
            for b in &mut weight.bone_indices {
                *b = reader.read_i32()?;
            }
            vertices.push(weight);
        }

        expect_consumed(&reader, kind)?;
        Ok(Self { version, vertices })
    }

    /// Number of bytes [`write_to`](Self::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        8 + VERTEX_WEIGHT_SIZE * self.vertices.len()
    }

    /// Write the skin info.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32_le(self.version)?;
        writer.write_len(self.vertices.len())?;
        for vertex in &self.vertices {
            for &w in &vertex.weights {
                writer.write_f32_le(w)?;
            }
            for &b in &vertex.bone_indices {
                writer.write_i32_le(b)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_info_layout() {
        let skin = SkinInfo {
            version: 1,
            vertices: vec![VertexWeight {
                weights: [0.5, 0.25, 0.25, 0.0],
                bone_indices: [3, 4, 5, 0],
            }],
        };
        let mut bytes = Vec::new();
        skin.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 40);
        assert_eq!(bytes.len(), skin.encoded_len());
        assert_eq!(&bytes[8..12], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[24..28], &3i32.to_le_bytes());
        assert_eq!(SkinInfo::parse(&bytes).unwrap(), skin);
    }

    #[test]
    fn test_vertex_count_larger_than_window() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&2i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; VERTEX_WEIGHT_SIZE]);

        assert!(SkinInfo::parse(&bytes).is_err());
    }
}
