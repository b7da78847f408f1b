//! Index-table records.
//!
//! The index table is a flat array of fixed-width records: one root record
//! followed by one record per payload-bearing node. Records carry the size
//! and absolute offset of their node's payload.

use drs_payload::NodeKind;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::PayloadId;

/// The root record at the start of the index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RootRecord {
    /// Always zero.
    pub zeroes: [u8; 16],
    /// Always -1.
    pub neg_one: i32,
    /// Always 1.
    pub one: i32,
    /// Number of non-root records; rewritten on every encode.
    pub node_information_count: i32,
    /// Always zero.
    pub zero: i32,
}

impl RootRecord {
    /// Size of the root record in bytes.
    pub const SIZE: usize = std::mem::size_of::<RootRecord>();
}

impl Default for RootRecord {
    fn default() -> Self {
        Self {
            zeroes: [0; 16],
            neg_one: -1,
            one: 1,
            node_information_count: 0,
            zero: 0,
        }
    }
}

/// On-disk form of a non-root index record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawNodeRecord {
    /// Magic of the node kind.
    pub magic: i32,
    /// Record identifier, preserved as read.
    pub identifier: i32,
    /// Absolute offset of the payload.
    pub offset: i32,
    /// Payload size in bytes.
    pub node_size: i32,
    /// Always zero.
    pub spacer: [u8; 16],
}

impl RawNodeRecord {
    /// Size of a non-root record in bytes.
    pub const SIZE: usize = std::mem::size_of::<RawNodeRecord>();
}

/// Width of an index table holding `records` non-root records.
pub fn index_table_width(records: usize) -> u64 {
    RootRecord::SIZE as u64 + RawNodeRecord::SIZE as u64 * records as u64
}

/// A decoded non-root index record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfoRecord {
    kind: NodeKind,
    identifier: i32,
    offset: Option<u32>,
    node_size: u32,
    spacer: [u8; 16],
    payload: PayloadId,
}

impl NodeInfoRecord {
    /// A record for a freshly authored node; its offset is unset until the
    /// next layout recompute.
    pub(crate) fn new(kind: NodeKind, payload: PayloadId) -> Self {
        Self {
            kind,
            identifier: -1,
            offset: None,
            node_size: 0,
            spacer: [0; 16],
            payload,
        }
    }

    /// A record as read from a file.
    pub(crate) fn from_raw(kind: NodeKind, raw: &RawNodeRecord, payload: PayloadId) -> Self {
        Self {
            kind,
            identifier: raw.identifier,
            offset: Some(raw.offset as u32),
            node_size: raw.node_size as u32,
            spacer: raw.spacer,
            payload,
        }
    }

    /// On-disk form with the given placement.
    pub(crate) fn to_raw(&self, offset: u32, node_size: u32) -> RawNodeRecord {
        RawNodeRecord {
            magic: self.kind.magic(),
            identifier: self.identifier,
            offset: offset as i32,
            node_size: node_size as i32,
            spacer: self.spacer,
        }
    }

    /// Node kind.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Node name.
    #[inline]
    pub fn node_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Record identifier.
    #[inline]
    pub fn identifier(&self) -> i32 {
        self.identifier
    }

    /// Absolute payload offset, or `None` before the first layout.
    #[inline]
    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// Recorded payload size.
    #[inline]
    pub fn node_size(&self) -> u32 {
        self.node_size
    }

    /// Handle of the payload this record describes.
    #[inline]
    pub fn payload(&self) -> PayloadId {
        self.payload
    }

    pub(crate) fn set_offset(&mut self, offset: u32) {
        self.offset = Some(offset);
    }

    pub(crate) fn set_node_size(&mut self, node_size: u32) {
        self.node_size = node_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_widths() {
        assert_eq!(RootRecord::SIZE, 32);
        assert_eq!(RawNodeRecord::SIZE, 32);
        assert_eq!(index_table_width(0), 32);
        assert_eq!(index_table_width(7), 32 * 8);
    }

    #[test]
    fn test_root_record_defaults() {
        let root = RootRecord::default();
        let bytes = root.as_bytes();
        assert_eq!(&bytes[..16], &[0u8; 16]);
        assert_eq!(&bytes[16..20], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[20..24], &1i32.to_le_bytes());
    }

    #[test]
    fn test_to_raw_carries_kind_magic() {
        let record = NodeInfoRecord::new(NodeKind::AnimationSet, PayloadId::from_index(0));
        let raw = record.to_raw(114, 40);

        let magic = raw.magic;
        let offset = raw.offset;
        let size = raw.node_size;
        assert_eq!(magic, NodeKind::AnimationSet.magic());
        assert_eq!(offset, 114);
        assert_eq!(size, 40);
        assert_eq!(record.offset(), None);
    }
}
