//! Layout recomputation and DRS encoding.
//!
//! Encoding plans sizes and offsets on a scratch [`Layout`], produces the
//! whole byte stream, and only then writes the plan back into the container.
//! A failed encode leaves the container exactly as it was.

use drs_payload::PayloadRegistry;
use zerocopy::IntoBytes;

use crate::classify::Classification;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::header::DrsHeader;
use crate::layout::{plan_layout, Layout, SectionWidths};
use crate::record::index_table_width;

impl Container {
    /// Plan the layout the next encode would produce, without changing the
    /// container.
    pub fn plan(&self, registry: &PayloadRegistry) -> Result<(Classification, Layout)> {
        let mut nodes = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let id = record.payload();
            let payload = self.payloads.get(id).ok_or(Error::UnknownPayload(id))?;
            let size = registry.byte_size(record.kind(), payload)?;
            let size = u32::try_from(size).map_err(|_| Error::LayoutOverflow {
                what: format!("{} size", record.kind()),
                value: size as u64,
            })?;
            nodes.push((record.kind(), size));
        }

        let widths = SectionWidths::new(index_table_width(self.records.len()), self.hierarchy.width());
        let classification = self.classification();
        let model_type = classification.require()?;
        let layout =
            plan_layout(widths, model_type.write_order(), &nodes).map_err(|err| err.for_model_type(model_type))?;
        Ok((classification, layout))
    }

    /// Recompute sizes and offsets and store them in the records.
    pub fn recompute(&mut self, registry: &PayloadRegistry) -> Result<Layout> {
        let (classification, layout) = self.plan(registry)?;
        self.commit(classification, &layout);
        Ok(layout)
    }

    /// Encode the container to DRS bytes, recomputing its layout first.
    ///
    /// Sections are written in the order header, index table, hierarchy
    /// table, data. On success the container's records hold the offsets and
    /// sizes that were written.
    pub fn encode(&mut self, registry: &PayloadRegistry) -> Result<Vec<u8>> {
        let (classification, layout) = self.plan(registry)?;

        let mut out = Vec::with_capacity(layout.end as usize);
        let header = DrsHeader {
            magic: DrsHeader::MAGIC,
            number_of_models: self.number_of_models,
            node_information_offset: layout.index_table_offset as i32,
            node_hierarchy_offset: layout.hierarchy_table_offset as i32,
            node_count: self.record_count() as i32,
        };
        out.extend_from_slice(header.as_bytes());

        let mut root = self.root;
        root.node_information_count = self.records.len() as i32;
        out.extend_from_slice(root.as_bytes());
        for (i, record) in self.records.iter().enumerate() {
            out.extend_from_slice(record.to_raw(layout.offsets[i], layout.sizes[i]).as_bytes());
        }

        self.hierarchy.write_to(&mut out)?;

        for &i in &layout.order {
            let record = &self.records[i];
            let id = record.payload();
            let payload = self.payloads.get(id).ok_or(Error::UnknownPayload(id))?;

            let start = out.len();
            registry.encode_into(record.kind(), payload, &mut out)?;
            if out.len() - start != layout.sizes[i] as usize {
                return Err(Error::SizeMismatch {
                    node: record.kind(),
                    expected: layout.sizes[i],
                    actual: out.len() - start,
                });
            }
        }

        self.commit(classification, &layout);
        log::debug!("encoded {} records into {} bytes", self.records.len(), out.len());
        Ok(out)
    }

    fn commit(&mut self, classification: Classification, layout: &Layout) {
        for (i, record) in self.records.iter_mut().enumerate() {
            record.set_offset(layout.offsets[i]);
            record.set_node_size(layout.sizes[i]);
        }
        self.node_information_offset = layout.index_table_offset;
        self.node_hierarchy_offset = layout.hierarchy_table_offset;
        self.root.node_information_count = self.records.len() as i32;
        self.classification = classification;
        self.classification_stale = false;
        self.layout_stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assemble, assemble_canonical, static_object};
    use crate::ModelType;
    use drs_common::crc::hash_bytes;
    use drs_payload::{NodeKind, Payload, RawPayload};

    fn fingerprint(container: &Container) -> Vec<(&'static str, Option<u32>, u32)> {
        container
            .records()
            .iter()
            .map(|r| (r.node_name(), r.offset(), r.node_size()))
            .collect()
    }

    #[test]
    fn test_canonical_file_reencodes_identically() {
        let registry = PayloadRegistry::standard();
        let model_type = ModelType::StaticObjectNoCollision;
        let original = assemble_canonical(&static_object(), model_type.write_order());

        let mut container = Container::decode(&original, &registry).unwrap();
        let decoded = fingerprint(&container);
        let bytes = container.encode(&registry).unwrap();

        assert_eq!(hash_bytes(&bytes), hash_bytes(&original));
        assert_eq!(bytes, original);
        assert_eq!(fingerprint(&container), decoded);
    }

    #[test]
    fn test_reencode_moves_payloads_into_write_order() {
        let registry = PayloadRegistry::standard();
        let original = assemble(&static_object(), false);
        let mut container = Container::decode(&original, &registry).unwrap();
        let decoded = fingerprint(&container);

        let bytes = container.encode(&registry).unwrap();
        assert_eq!(bytes.len(), original.len());
        assert_ne!(bytes, original);
        assert_ne!(fingerprint(&container), decoded);

        let mut second = Container::decode(&bytes, &registry).unwrap();
        assert_eq!(fingerprint(&second), fingerprint(&container));
        for record in container.records() {
            let (_, payload) = second.payload_by_name(record.node_name()).unwrap();
            assert_eq!(container.payload(record.payload()), Some(payload));
        }
        assert_eq!(second.encode(&registry).unwrap(), bytes);
    }

    #[test]
    fn test_payloads_follow_write_order() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::decode(&assemble(&static_object(), false), &registry).unwrap();
        let layout = container.recompute(&registry).unwrap();

        // index 5 * 32 + 32, hierarchy 16 + 27 + 20 + 24 + 23 + 24
        assert_eq!(layout.hierarchy_table_offset, 20 + 192);
        assert_eq!(layout.data_offset, 20 + 192 + 134);

        let mut expected = layout.data_offset;
        for kind in ModelType::StaticObjectNoCollision.write_order() {
            let record = container.record(kind.name()).unwrap();
            assert_eq!(record.offset(), Some(expected));
            expected += record.node_size();
        }
        assert_eq!(expected, layout.end);
    }

    #[test]
    fn test_primitive_container_is_always_zero_sized() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::for_model_type(ModelType::StaticObjectCollision, &registry).unwrap();
        let (id, _) = container.payload_by_name("CGeoPrimitiveContainer").unwrap();
        if let Some(Payload::PrimitiveContainer(primitive)) = container.payload_mut(id) {
            primitive.content_mut().extend_from_slice(&[9; 64]);
        }

        let first = container.encode(&registry).unwrap();
        let record = container.record("CGeoPrimitiveContainer").unwrap();
        assert_eq!(record.node_size(), 0);

        let mut decoded = Container::decode(&first, &registry).unwrap();
        let second = decoded.encode(&registry).unwrap();
        assert_eq!(decoded.record("CGeoPrimitiveContainer").unwrap().node_size(), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_counts_follow_live_records() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::for_model_type(ModelType::StaticObjectNoCollision, &registry).unwrap();
        let primitive = registry.empty_payload(NodeKind::CGeoPrimitiveContainer).unwrap();
        container.insert_node(NodeKind::CGeoPrimitiveContainer, primitive, &registry).unwrap();
        container
            .insert_node(NodeKind::CollisionShape, Payload::Raw(RawPayload::new(vec![1; 8])), &registry)
            .unwrap();

        let bytes = container.encode(&registry).unwrap();
        assert_eq!(container.model_type(), Some(ModelType::StaticObjectCollision));
        assert_eq!(&bytes[16..20], &8i32.to_le_bytes());
        assert_eq!(&bytes[20 + 24..20 + 28], &7i32.to_le_bytes());
    }

    #[test]
    fn test_orphan_node_blocks_encode() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::for_model_type(ModelType::StaticObjectNoCollision, &registry).unwrap();
        container
            .insert_node(NodeKind::CDrwLocatorList, Payload::Raw(RawPayload::new(vec![1; 8])), &registry)
            .unwrap();

        assert!(matches!(
            container.encode(&registry),
            Err(Error::OrphanNode {
                model_type: ModelType::StaticObjectNoCollision,
                node: NodeKind::CDrwLocatorList,
            })
        ));
    }

    #[test]
    fn test_failed_encode_leaves_container_untouched() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::decode(&assemble(&static_object(), false), &registry).unwrap();
        let before = fingerprint(&container);

        let (id, _) = container.payload_by_name("CDspMeshFile").unwrap();
        container.replace_payload(id, Payload::Raw(RawPayload::new(vec![0; 300]))).unwrap();
        container.remove_node("CGeoOBBTree").unwrap();
        container.insert_node(NodeKind::CSkSkeleton, Payload::Raw(RawPayload::new(Vec::new())), &registry).unwrap();

        assert_eq!(container.model_type(), Some(ModelType::AnimatedObjectNoCollision));
        let snapshot = fingerprint(&container);
        assert!(matches!(
            container.encode(&registry),
            Err(Error::InconsistentSchema {
                model_type: ModelType::AnimatedObjectNoCollision,
                node: NodeKind::CGeoOBBTree,
            })
        ));
        assert_eq!(fingerprint(&container), snapshot);
        assert_ne!(snapshot, before);
        assert!(container.is_layout_stale());
    }

    #[test]
    fn test_payload_mismatch_blocks_encode() {
        let registry = PayloadRegistry::standard();
        let mut container = Container::for_model_type(ModelType::StaticObjectNoCollision, &registry).unwrap();
        let (id, _) = container.payload_by_name("CDspJointMap").unwrap();
        container.replace_payload(id, Payload::Raw(RawPayload::new(vec![0; 8]))).unwrap();

        assert!(matches!(
            container.encode(&registry),
            Err(Error::Payload(drs_payload::Error::PayloadMismatch { .. }))
        ));
    }

    #[test]
    fn test_unclassified_encode_fails() {
        let registry = PayloadRegistry::standard();
        let nodes = vec![
            (NodeKind::CGeoMesh, vec![0; 16]),
            (NodeKind::CGeoPrimitiveContainer, Vec::new()),
        ];
        let mut container = Container::decode(&assemble(&nodes, false), &registry).unwrap();
        assert!(matches!(container.encode(&registry), Err(Error::UnclassifiedModelType)));
    }
}
