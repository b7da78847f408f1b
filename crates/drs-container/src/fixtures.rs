//! Hand-assembled DRS files for tests.

use drs_payload::NodeKind;

use crate::header::DrsHeader;
use crate::record::index_table_width;

/// Payload bytes of a decodable static object, in its index order.
pub(crate) fn static_object() -> Vec<(NodeKind, Vec<u8>)> {
    let mut meta = vec![0u8; 8];
    meta.extend_from_slice(&4i32.to_le_bytes());
    meta.extend_from_slice(b"9f3a");

    vec![
        (NodeKind::DrwResourceMeta, meta),
        (NodeKind::CGeoMesh, vec![0x11; 48]),
        (NodeKind::CDspMeshFile, vec![0x22; 120]),
        (NodeKind::CGeoOBBTree, vec![0x33; 36]),
        (NodeKind::CDspJointMap, vec![1, 0, 0, 0, 0, 0, 0, 0]),
    ]
}

fn put(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Assemble a file holding `nodes` in record order, with payloads stored in
/// the same order. `CGeoPrimitiveContainer` nodes get a zero-size window.
pub(crate) fn assemble(nodes: &[(NodeKind, Vec<u8>)], hierarchy_first: bool) -> Vec<u8> {
    let data_order: Vec<usize> = (0..nodes.len()).collect();
    build(nodes, hierarchy_first, &data_order)
}

/// Assemble a file the way the encoder lays it out: index table first, then
/// payloads in `write_order`.
pub(crate) fn assemble_canonical(nodes: &[(NodeKind, Vec<u8>)], write_order: &[NodeKind]) -> Vec<u8> {
    let data_order: Vec<usize> = write_order
        .iter()
        .filter_map(|kind| nodes.iter().position(|(k, _)| k == kind))
        .collect();
    build(nodes, false, &data_order)
}

fn stored_len(kind: NodeKind, bytes: &[u8]) -> usize {
    if kind == NodeKind::CGeoPrimitiveContainer {
        0
    } else {
        bytes.len()
    }
}

fn build(nodes: &[(NodeKind, Vec<u8>)], hierarchy_first: bool, data_order: &[usize]) -> Vec<u8> {
    let index_width = index_table_width(nodes.len()) as usize;
    let hierarchy_width = 16 + nodes.iter().map(|(k, _)| 12 + k.name().len()).sum::<usize>();

    let (index_offset, hierarchy_offset) = if hierarchy_first {
        (DrsHeader::SIZE + hierarchy_width, DrsHeader::SIZE)
    } else {
        (DrsHeader::SIZE, DrsHeader::SIZE + index_width)
    };

    let mut out = Vec::new();
    put(&mut out, DrsHeader::MAGIC);
    put(&mut out, 1);
    put(&mut out, index_offset as i32);
    put(&mut out, hierarchy_offset as i32);
    put(&mut out, nodes.len() as i32 + 1);

    let mut index = Vec::new();
    index.extend_from_slice(&[0; 16]);
    put(&mut index, -1);
    put(&mut index, 1);
    put(&mut index, nodes.len() as i32);
    put(&mut index, 0);

    let mut offsets = vec![0usize; nodes.len()];
    let mut offset = DrsHeader::SIZE + index_width + hierarchy_width;
    for &i in data_order {
        offsets[i] = offset;
        offset += stored_len(nodes[i].0, &nodes[i].1);
    }
    for (i, (kind, bytes)) in nodes.iter().enumerate() {
        put(&mut index, kind.magic());
        put(&mut index, i as i32);
        put(&mut index, offsets[i] as i32);
        put(&mut index, stored_len(*kind, bytes) as i32);
        index.extend_from_slice(&[0; 16]);
    }

    let mut hierarchy = Vec::new();
    put(&mut hierarchy, 0);
    put(&mut hierarchy, 0);
    put(&mut hierarchy, 4);
    hierarchy.extend_from_slice(b"root");
    for (i, (kind, _)) in nodes.iter().enumerate() {
        put(&mut hierarchy, i as i32 + 1);
        put(&mut hierarchy, kind.name().len() as i32);
        hierarchy.extend_from_slice(kind.name().as_bytes());
        put(&mut hierarchy, 0);
    }

    if hierarchy_first {
        out.extend_from_slice(&hierarchy);
        out.extend_from_slice(&index);
    } else {
        out.extend_from_slice(&index);
        out.extend_from_slice(&hierarchy);
    }
    for &i in data_order {
        let (kind, bytes) = &nodes[i];
        out.extend_from_slice(&bytes[..stored_len(*kind, bytes)]);
    }
    out
}
