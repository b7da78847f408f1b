//! Section and payload offset planning.
//!
//! The planner is pure: it takes section widths and per-record payload sizes
//! and returns where everything goes, without touching a container. Encoding
//! commits a plan only after the bytes have been produced.

use std::fmt;

use drs_payload::NodeKind;

use crate::error::Error;
use crate::header::DrsHeader;
use crate::ModelType;

/// Widths of the sections preceding the data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionWidths {
    pub header: u64,
    pub index_table: u64,
    pub hierarchy_table: u64,
}

impl SectionWidths {
    /// Widths for a DRS header followed by tables of the given widths.
    pub fn new(index_table: u64, hierarchy_table: u64) -> Self {
        Self {
            header: DrsHeader::SIZE as u64,
            index_table,
            hierarchy_table,
        }
    }
}

/// A planned file layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub index_table_offset: u32,
    pub hierarchy_table_offset: u32,
    /// First byte of the data section.
    pub data_offset: u32,
    /// Payload offset per record, in record order.
    pub offsets: Vec<u32>,
    /// Payload size per record, in record order.
    pub sizes: Vec<u32>,
    /// Record indices in data-section order.
    pub order: Vec<usize>,
    /// One past the last payload byte; the total file length.
    pub end: u32,
}

/// Why a plan could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The write order names a node no record holds.
    MissingNode(NodeKind),
    /// A record holds a node the write order never places.
    OrphanNode(NodeKind),
    /// An offset would not fit the file's i32 fields.
    Overflow { what: String, value: u64 },
}

impl LayoutError {
    /// Attach the model type whose write order was being planned.
    pub fn for_model_type(self, model_type: ModelType) -> Error {
        match self {
            LayoutError::MissingNode(node) => Error::InconsistentSchema { model_type, node },
            LayoutError::OrphanNode(node) => Error::OrphanNode { model_type, node },
            LayoutError::Overflow { what, value } => Error::LayoutOverflow { what, value },
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::MissingNode(node) => write!(f, "write order requires missing node {node}"),
            LayoutError::OrphanNode(node) => write!(f, "{node} is not in the write order"),
            LayoutError::Overflow { what, value } => write!(f, "{what} value {value} overflows i32"),
        }
    }
}

impl std::error::Error for LayoutError {}

fn checked(what: &str, value: u64) -> Result<u32, LayoutError> {
    if value > i32::MAX as u64 {
        return Err(LayoutError::Overflow {
            what: what.to_string(),
            value,
        });
    }
    Ok(value as u32)
}

/// Plan offsets for `nodes` (kind and payload size, in record order),
/// placing payloads back to back in `write_order`.
pub fn plan_layout(
    widths: SectionWidths,
    write_order: &[NodeKind],
    nodes: &[(NodeKind, u32)],
) -> Result<Layout, LayoutError> {
    let index_table_offset = checked("index table offset", widths.header)?;
    let hierarchy_table_offset = checked("hierarchy table offset", widths.header + widths.index_table)?;
    let data_offset = checked(
        "data offset",
        widths.header + widths.index_table + widths.hierarchy_table,
    )?;

    let mut offsets = vec![0u32; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut cursor = data_offset as u64;

    for &kind in write_order {
        let index = nodes
            .iter()
            .position(|(k, _)| *k == kind)
            .ok_or(LayoutError::MissingNode(kind))?;
        offsets[index] = checked(kind.name(), cursor)?;
        cursor += nodes[index].1 as u64;
        order.push(index);
    }

    if let Some((kind, _)) = nodes.iter().find(|(k, _)| !write_order.contains(k)) {
        return Err(LayoutError::OrphanNode(*kind));
    }

    let end = checked("file length", cursor)?;
    log::debug!(
        "planned layout: index at {index_table_offset}, hierarchy at {hierarchy_table_offset}, data {data_offset}..{end}"
    );

    Ok(Layout {
        index_table_offset,
        hierarchy_table_offset,
        data_offset,
        offsets,
        sizes: nodes.iter().map(|(_, size)| *size).collect(),
        order,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths() -> SectionWidths {
        SectionWidths {
            header: 20,
            index_table: 64,
            hierarchy_table: 30,
        }
    }

    const ORDER: &[NodeKind] = &[NodeKind::CDspMeshFile, NodeKind::AnimationSet];

    #[test]
    fn test_mesh_then_animation_offsets() {
        let nodes = [(NodeKind::AnimationSet, 40), (NodeKind::CDspMeshFile, 120)];
        let layout = plan_layout(widths(), ORDER, &nodes).unwrap();

        assert_eq!(layout.index_table_offset, 20);
        assert_eq!(layout.hierarchy_table_offset, 84);
        assert_eq!(layout.data_offset, 114);
        assert_eq!(layout.offsets, vec![234, 114]);
        assert_eq!(layout.order, vec![1, 0]);
        assert_eq!(layout.end, 274);

        let grown = [(NodeKind::AnimationSet, 40), (NodeKind::CDspMeshFile, 200)];
        let layout = plan_layout(widths(), ORDER, &grown).unwrap();
        assert_eq!(layout.offsets, vec![314, 114]);
    }

    #[test]
    fn test_offsets_are_contiguous_in_write_order() {
        let model_type = ModelType::AnimatedUnit;
        let nodes: Vec<_> = model_type
            .index_order()
            .iter()
            .enumerate()
            .map(|(i, kind)| (*kind, (i as u32 * 7) % 5 * 16))
            .collect();
        let layout = plan_layout(widths(), model_type.write_order(), &nodes).unwrap();

        let mut expected = layout.data_offset;
        for &index in &layout.order {
            assert_eq!(layout.offsets[index], expected);
            expected += layout.sizes[index];
        }
        assert_eq!(expected, layout.end);
    }

    #[test]
    fn test_missing_node() {
        let nodes = [(NodeKind::CDspMeshFile, 120)];
        let err = plan_layout(widths(), ORDER, &nodes).unwrap_err();
        assert_eq!(err, LayoutError::MissingNode(NodeKind::AnimationSet));
        assert!(matches!(
            err.for_model_type(ModelType::AnimatedUnit),
            Error::InconsistentSchema {
                node: NodeKind::AnimationSet,
                ..
            }
        ));
    }

    #[test]
    fn test_orphan_node() {
        let nodes = [
            (NodeKind::CDspMeshFile, 120),
            (NodeKind::AnimationSet, 40),
            (NodeKind::CDrwLocatorList, 8),
        ];
        let err = plan_layout(widths(), ORDER, &nodes).unwrap_err();
        assert_eq!(err, LayoutError::OrphanNode(NodeKind::CDrwLocatorList));
    }

    #[test]
    fn test_overflow() {
        let nodes = [(NodeKind::CDspMeshFile, u32::MAX), (NodeKind::AnimationSet, 1)];
        let err = plan_layout(widths(), ORDER, &nodes).unwrap_err();
        assert!(matches!(err, LayoutError::Overflow { .. }));
    }
}
