//! DRS file header.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// DRS file header.
///
/// The header is the first 20 bytes of every file. Both table offsets are
/// absolute; readers must seek to them rather than assume the tables follow
/// the header in a particular order.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DrsHeader {
    /// File magic, always [`DrsHeader::MAGIC`].
    pub magic: i32,
    /// Number of models in the file (1 in every known file).
    pub number_of_models: i32,
    /// Absolute offset of the index table.
    pub node_information_offset: i32,
    /// Absolute offset of the hierarchy table.
    pub node_hierarchy_offset: i32,
    /// Number of nodes, root included.
    pub node_count: i32,
}

impl DrsHeader {
    /// The magic value at the start of a DRS file.
    pub const MAGIC: i32 = -981667554;

    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<DrsHeader>();
}
