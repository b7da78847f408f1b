//! Hierarchy table.
//!
//! The hierarchy is a tree rooted at a synthetic root node. Every other node
//! is a child of the root and links to its index-table record through
//! `info_index`. Entries are variable width because they embed their name.

use std::io::{self, Write};

use drs_common::{BinaryReader, WriteDrsExt};

/// The synthetic root of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootNode {
    pub identifier: i32,
    pub unknown: i32,
    pub name: String,
}

impl RootNode {
    /// Default root name for authored containers.
    pub const DEFAULT_NAME: &'static str = "root";

    /// Encoded width: identifier, unknown, name length, name.
    pub fn width(&self) -> usize {
        12 + self.name.len()
    }

    fn read(reader: &mut BinaryReader<'_>) -> drs_common::Result<Self> {
        let identifier = reader.read_i32()?;
        let unknown = reader.read_i32()?;
        let name = reader.read_prefixed_string()?.to_string();
        Ok(Self {
            identifier,
            unknown,
            name,
        })
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32_le(self.identifier)?;
        writer.write_i32_le(self.unknown)?;
        writer.write_prefixed_bytes(self.name.as_bytes())
    }
}

impl Default for RootNode {
    fn default() -> Self {
        Self {
            identifier: 0,
            unknown: 0,
            name: Self::DEFAULT_NAME.to_string(),
        }
    }
}

/// A payload-bearing node in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Position of the linked record in the index table (root is 0).
    pub info_index: i32,
    pub name: String,
    /// Trailing word, zero in every known file.
    pub zero: i32,
}

impl HierarchyNode {
    pub fn new(info_index: i32, name: impl Into<String>) -> Self {
        Self {
            info_index,
            name: name.into(),
            zero: 0,
        }
    }

    /// Encoded width: info index, name length, name, trailing zero.
    pub fn width(&self) -> usize {
        12 + self.name.len()
    }

    fn read(reader: &mut BinaryReader<'_>) -> drs_common::Result<Self> {
        let info_index = reader.read_i32()?;
        let name = reader.read_prefixed_string()?.to_string();
        let zero = reader.read_i32()?;
        Ok(Self {
            info_index,
            name,
            zero,
        })
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32_le(self.info_index)?;
        writer.write_prefixed_bytes(self.name.as_bytes())?;
        writer.write_i32_le(self.zero)
    }
}

/// The whole hierarchy table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    root: RootNode,
    children: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// A hierarchy with the given root and no children.
    pub fn new(root: RootNode) -> Self {
        Self {
            root,
            children: Vec::new(),
        }
    }

    /// Read a hierarchy of `node_count` entries (root included).
    pub fn read(reader: &mut BinaryReader<'_>, node_count: usize) -> drs_common::Result<Self> {
        let root = RootNode::read(reader)?;
        let mut children = Vec::with_capacity(node_count.saturating_sub(1).min(reader.remaining() / 12));
        for _ in 1..node_count {
            children.push(HierarchyNode::read(reader)?);
        }
        Ok(Self { root, children })
    }

    /// Write the table in tree order: root, then its children.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        self.root.write_to(writer)?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        Ok(())
    }

    /// Total encoded width of the table.
    pub fn width(&self) -> u64 {
        self.root.width() as u64 + self.children.iter().map(|c| c.width() as u64).sum::<u64>()
    }

    /// The root node.
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// Children of the root, in table order.
    pub fn children(&self) -> &[HierarchyNode] {
        &self.children
    }

    /// Number of entries, root included.
    pub fn len(&self) -> usize {
        self.children.len() + 1
    }

    /// Always false: the root is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The child linked to index record `info_index`.
    pub fn find_linked(&self, info_index: usize) -> Option<&HierarchyNode> {
        self.children
            .iter()
            .find(|c| usize::try_from(c.info_index).ok() == Some(info_index))
    }

    pub(crate) fn push(&mut self, node: HierarchyNode) {
        self.children.push(node);
    }

    /// Drop the child linked to `info_index` and shift later links down by one,
    /// mirroring the removal of that record from the index table.
    pub(crate) fn unlink(&mut self, info_index: usize) {
        let removed = info_index as i32;
        self.children.retain(|c| c.info_index != removed);
        for child in &mut self.children {
            if child.info_index > removed {
                child.info_index -= 1;
            }
        }
    }
}
