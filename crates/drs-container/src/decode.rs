//! DRS container decoding.

use std::ops::Range;

use drs_common::BinaryReader;
use drs_payload::{NodeKind, PayloadRegistry};

use crate::arena::PayloadArena;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::header::DrsHeader;
use crate::hierarchy::Hierarchy;
use crate::record::{index_table_width, NodeInfoRecord, RawNodeRecord, RootRecord};

/// Byte range of a declared window, or [`Error::TruncatedStream`] if any
/// part of it lies outside the stream.
fn window(section: &str, offset: i64, len: i64, stream_len: usize) -> Result<Range<usize>> {
    let end = offset.checked_add(len);
    match end {
        Some(end) if offset >= 0 && len >= 0 && end <= stream_len as i64 => Ok(offset as usize..end as usize),
        _ => Err(Error::TruncatedStream {
            section: section.to_string(),
            offset,
            len,
            stream_len,
        }),
    }
}

fn read_hierarchy(data: &[u8], offset: i32, node_count: usize) -> Result<Hierarchy> {
    let start = window("hierarchy table", offset as i64, 0, data.len())?.start;
    let mut reader = BinaryReader::new_at(data, start);
    Hierarchy::read(&mut reader, node_count).map_err(|err| match err {
        drs_common::Error::UnexpectedEof { offset, needed, .. } => Error::TruncatedStream {
            section: "hierarchy table".to_string(),
            offset: offset as i64,
            len: needed as i64,
            stream_len: data.len(),
        },
        other => Error::Common(other),
    })
}

/// Resolve the node kind of each index record from its hierarchy link,
/// falling back to the kind registered for its magic.
fn resolve_kinds(
    raw_records: &[RawNodeRecord],
    hierarchy: &Hierarchy,
    registry: &PayloadRegistry,
) -> Result<Vec<NodeKind>> {
    let mut linked: Vec<Option<&str>> = vec![None; raw_records.len()];

    for child in hierarchy.children() {
        let slot = usize::try_from(child.info_index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| linked.get_mut(i))
            .ok_or_else(|| Error::DanglingHierarchyLink {
                name: child.name.clone(),
                info_index: child.info_index,
                record_count: raw_records.len(),
            })?;
        if slot.is_some() {
            return Err(Error::DuplicateNode(child.name.clone()));
        }
        *slot = Some(child.name.as_str());
    }

    let mut kinds: Vec<NodeKind> = Vec::with_capacity(raw_records.len());
    for (i, (raw, name)) in raw_records.iter().zip(&linked).enumerate() {
        let magic = raw.magic;
        let kind = match name {
            Some(name) => {
                let codec = registry.codec(name).ok_or_else(|| drs_payload::Error::UnknownNodeType {
                    name: name.to_string(),
                })?;
                if codec.kind.magic() != magic {
                    return Err(Error::HierarchyMismatch {
                        index: i + 1,
                        name: name.to_string(),
                        magic,
                    });
                }
                codec.kind
            }
            None => registry.kind_for_magic(magic)?,
        };
        if kinds.contains(&kind) {
            return Err(Error::DuplicateNode(kind.name().to_string()));
        }
        kinds.push(kind);
    }
    Ok(kinds)
}

impl Container {
    /// Decode a DRS file.
    ///
    /// Table positions are taken from the header, so files that store the
    /// hierarchy before the index table decode the same as files that do
    /// not. Payload windows come from the records as given. An unknown model
    /// type is recorded rather than reported; it only blocks encoding.
    pub fn decode(data: &[u8], registry: &PayloadRegistry) -> Result<Self> {
        window("header", 0, DrsHeader::SIZE as i64, data.len())?;
        let mut reader = BinaryReader::new(data);
        let header: DrsHeader = reader.read_struct()?;

        let magic = header.magic;
        if magic != DrsHeader::MAGIC {
            return Err(Error::InvalidMagic {
                expected: DrsHeader::MAGIC,
                actual: magic,
            });
        }
        let node_count = header.node_count;
        if node_count < 1 {
            return Err(Error::InvalidNodeCount(node_count));
        }
        let record_count = node_count as usize - 1;
        let index_offset = header.node_information_offset;
        let hierarchy_offset = header.node_hierarchy_offset;
        log::debug!(
            "DRS header: {} model(s), {node_count} nodes, index at {index_offset}, hierarchy at {hierarchy_offset}",
            { header.number_of_models }
        );

        let index = window(
            "index table",
            index_offset as i64,
            index_table_width(record_count) as i64,
            data.len(),
        )?;
        let mut reader = BinaryReader::new_at(data, index.start);
        let root: RootRecord = reader.read_struct()?;
        let raw_records = (0..record_count)
            .map(|_| reader.read_struct::<RawNodeRecord>())
            .collect::<drs_common::Result<Vec<_>>>()?;

        let hierarchy = read_hierarchy(data, hierarchy_offset, node_count as usize)?;
        let kinds = resolve_kinds(&raw_records, &hierarchy, registry)?;

        let mut payloads = PayloadArena::default();
        let mut records = Vec::with_capacity(record_count);
        for (raw, kind) in raw_records.iter().zip(kinds) {
            let (offset, size) = (raw.offset, raw.node_size);
            log::debug!("record {kind}: offset {offset}, size {size}");

            let range = window(kind.name(), offset as i64, size as i64, data.len())?;
            let payload = registry.decode(kind.name(), &data[range])?;
            records.push(NodeInfoRecord::from_raw(kind, raw, payloads.insert(payload)));
        }

        Ok(Container::from_parts(
            header.number_of_models,
            index_offset as u32,
            hierarchy_offset as u32,
            root,
            records,
            hierarchy,
            payloads,
        ))
    }
}
