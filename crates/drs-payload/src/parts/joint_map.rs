//! `CDspJointMap` payload.
//!
//! Submeshes reference at most a few dozen bones each, so the skeleton's bone
//! indices are regrouped per submesh:
//!
//! - 4 bytes: version
//! - 4 bytes: group count
//! - per group: 4 bytes joint count, then `joint count` × i16 bone indices

use std::io::{self, Write};

use drs_common::{BinaryReader, WriteDrsExt};

use super::{check_count, expect_consumed};
use crate::{NodeKind, Result};

/// One group of bone indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JointGroup {
    /// Skeleton bone indices.
    pub joints: Vec<i16>,
}

/// Per-submesh bone index groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointMap {
    /// Format version, 1 in every known file.
    pub version: i32,
    /// Joint groups in submesh order.
    pub groups: Vec<JointGroup>,
}

impl Default for JointMap {
    fn default() -> Self {
        Self {
            version: 1,
            groups: Vec::new(),
        }
    }
}

impl JointMap {
    /// Parse a joint map from its byte window.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let kind = NodeKind::CDspJointMap;
        let mut reader = BinaryReader::new(data);

        let version = reader.read_i32()?;
        let group_count = reader.read_len()?;
        check_count(&reader, kind, group_count, 4)?;

        let mut groups = Vec::with_capacity(group_count);
        for _ in 0..group_count {
            let joint_count = reader.read_len()?;
            check_count(&reader, kind, joint_count, 2)?;

            let mut joints = Vec::with_capacity(joint_count);
            for _ in 0..joint_count {
                joints.push(reader.read_i16()?);
            }
            groups.push(JointGroup { joints });
        }

        expect_consumed(&reader, kind)?;
        Ok(Self { version, groups })
    }

    /// Number of bytes [`write_to`](Self::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        8 + self
            .groups
            .iter()
            .map(|g| 4 + 2 * g.joints.len())
            .sum::<usize>()
    }

    /// Write the joint map.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32_le(self.version)?;
        writer.write_len(self.groups.len())?;
        for group in &self.groups {
            writer.write_len(group.joints.len())?;
            for &joint in &group.joints {
                writer.write_i16_le(joint)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> JointMap {
        JointMap {
            version: 1,
            groups: vec![
                JointGroup {
                    joints: vec![0, 1, 2],
                },
                JointGroup { joints: vec![7] },
            ],
        }
    }

    #[test]
    fn test_joint_map_size_matches_encoding() {
        let map = sample();
        let mut bytes = Vec::new();
        map.write_to(&mut bytes).unwrap();

        assert_eq!(map.encoded_len(), 8 + (4 + 6) + (4 + 2));
        assert_eq!(bytes.len(), map.encoded_len());
        assert_eq!(JointMap::parse(&bytes).unwrap(), map);
    }

    #[test]
    fn test_joint_count_overrunning_window() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&100i32.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);

        let err = JointMap::parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPayload {
                kind: NodeKind::CDspJointMap,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = Vec::new();
        JointMap::default().write_to(&mut bytes).unwrap();
        bytes.push(0);

        assert!(JointMap::parse(&bytes).is_err());
    }
}
