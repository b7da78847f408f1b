//! In-memory DRS container.

use std::collections::BTreeSet;

use drs_payload::{NodeKind, Payload, PayloadRegistry};

use crate::arena::{PayloadArena, PayloadId};
use crate::classify::{self, Classification};
use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, HierarchyNode, RootNode};
use crate::record::{NodeInfoRecord, RootRecord};
use crate::ModelType;

/// A decoded (or freshly authored) DRS container.
///
/// The container owns every record and payload. Records refer to payloads
/// through [`PayloadId`] handles that stay valid across payload replacement.
/// The model type is derived from the node set and never stored in the file.
#[derive(Debug, Clone)]
pub struct Container {
    pub(crate) number_of_models: i32,
    pub(crate) node_information_offset: u32,
    pub(crate) node_hierarchy_offset: u32,
    pub(crate) root: RootRecord,
    pub(crate) records: Vec<NodeInfoRecord>,
    pub(crate) hierarchy: Hierarchy,
    pub(crate) payloads: PayloadArena,
    pub(crate) classification: Classification,
    pub(crate) classification_stale: bool,
    pub(crate) layout_stale: bool,
}

impl Container {
    pub(crate) fn from_parts(
        number_of_models: i32,
        node_information_offset: u32,
        node_hierarchy_offset: u32,
        root: RootRecord,
        records: Vec<NodeInfoRecord>,
        hierarchy: Hierarchy,
        payloads: PayloadArena,
    ) -> Self {
        let mut container = Self {
            number_of_models,
            node_information_offset,
            node_hierarchy_offset,
            root,
            records,
            hierarchy,
            payloads,
            classification: Classification::default(),
            classification_stale: true,
            layout_stale: false,
        };
        container.reclassify();
        container
    }

    /// Author an empty container holding every node of `model_type`, in the
    /// type's index order, each with an empty payload.
    ///
    /// Offsets stay unset until the first recompute or encode.
    pub fn for_model_type(model_type: ModelType, registry: &PayloadRegistry) -> Result<Self> {
        let mut payloads = PayloadArena::default();
        let mut records = Vec::with_capacity(model_type.index_order().len());
        let mut hierarchy = Hierarchy::new(RootNode::default());

        for (i, &kind) in model_type.index_order().iter().enumerate() {
            let payload = registry.empty_payload(kind)?;
            let size = registry.byte_size(kind, &payload)?;
            let mut record = NodeInfoRecord::new(kind, payloads.insert(payload));
            record.set_node_size(size as u32);
            records.push(record);
            hierarchy.push(HierarchyNode::new(i as i32 + 1, kind.name()));
        }

        let mut container = Self::from_parts(1, 0, 0, RootRecord::default(), records, hierarchy, payloads);
        container.layout_stale = true;
        Ok(container)
    }

    /// Number of models declared by the header.
    pub fn number_of_models(&self) -> i32 {
        self.number_of_models
    }

    /// Index-table offset as last read or written.
    pub fn node_information_offset(&self) -> u32 {
        self.node_information_offset
    }

    /// Hierarchy-table offset as last read or written.
    pub fn node_hierarchy_offset(&self) -> u32 {
        self.node_hierarchy_offset
    }

    pub fn root_record(&self) -> &RootRecord {
        &self.root
    }

    /// Non-root index records, in table order.
    pub fn records(&self) -> &[NodeInfoRecord] {
        &self.records
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Number of index records, root included.
    pub fn record_count(&self) -> usize {
        self.records.len() + 1
    }

    /// Names of the payload-bearing nodes, in record order.
    pub fn node_names(&self) -> Vec<&'static str> {
        self.records.iter().map(NodeInfoRecord::node_name).collect()
    }

    /// Node kinds present in the container.
    pub fn present_kinds(&self) -> BTreeSet<NodeKind> {
        self.records.iter().map(NodeInfoRecord::kind).collect()
    }

    /// The record for a node name.
    pub fn record(&self, node_name: &str) -> Option<&NodeInfoRecord> {
        self.records.iter().find(|r| r.node_name() == node_name)
    }

    pub(crate) fn record_index_for_payload(&self, id: PayloadId) -> Option<usize> {
        self.records.iter().position(|r| r.payload() == id)
    }

    /// Borrow a payload by handle.
    pub fn payload(&self, id: PayloadId) -> Option<&Payload> {
        self.payloads.get(id)
    }

    /// Mutably borrow a payload by handle. Size changes must be reported
    /// with [`Container::refresh_node_size`] before the next encode.
    pub fn payload_mut(&mut self, id: PayloadId) -> Option<&mut Payload> {
        self.payloads.get_mut(id)
    }

    /// Handle and payload of a named node.
    pub fn payload_by_name(&self, node_name: &str) -> Option<(PayloadId, &Payload)> {
        let id = self.record(node_name)?.payload();
        self.payloads.get(id).map(|payload| (id, payload))
    }

    /// Classification as of the current node set.
    pub fn classification(&self) -> Classification {
        if self.classification_stale {
            classify::classify(&self.present_kinds(), self.record_count())
        } else {
            self.classification
        }
    }

    /// Inferred model type, if any.
    pub fn model_type(&self) -> Option<ModelType> {
        self.classification().model_type
    }

    /// Re-run the classifier and store the result.
    pub fn reclassify(&mut self) -> Classification {
        let classification = classify::classify(&self.present_kinds(), self.record_count());
        match classification {
            Classification {
                model_type: Some(model_type),
                rule: Some(rule),
                conflict,
            } => {
                log::debug!("classified as {model_type} ({rule})");
                if let Some(other) = conflict {
                    log::warn!("node set matches {model_type} exactly, but the fallback chain says {other}; keeping {model_type}");
                }
            }
            _ => log::warn!("could not infer model type from {} records", self.record_count()),
        }
        self.classification = classification;
        self.classification_stale = false;
        classification
    }

    /// Whether stored offsets or sizes may be out of date.
    pub fn is_layout_stale(&self) -> bool {
        self.layout_stale
    }

    /// Re-measure the payload behind `id` and store its size in the owning
    /// record. Offsets become stale until the next recompute.
    pub fn refresh_node_size(&mut self, id: PayloadId, registry: &PayloadRegistry) -> Result<u32> {
        let index = self.record_index_for_payload(id).ok_or(Error::UnknownPayload(id))?;
        let payload = self.payloads.get(id).ok_or(Error::UnknownPayload(id))?;
        let kind = self.records[index].kind();
        let size = registry.byte_size(kind, payload)?;
        let size = u32::try_from(size)
            .ok()
            .filter(|s| *s <= i32::MAX as u32)
            .ok_or_else(|| Error::LayoutOverflow {
                what: format!("{kind} size"),
                value: size as u64,
            })?;

        self.records[index].set_node_size(size);
        self.layout_stale = true;
        Ok(size)
    }

    /// Swap in a new payload under an existing handle, returning the old one.
    pub fn replace_payload(&mut self, id: PayloadId, payload: Payload) -> Result<Payload> {
        if self.record_index_for_payload(id).is_none() {
            return Err(Error::UnknownPayload(id));
        }
        self.payloads.replace(id, payload).ok_or(Error::UnknownPayload(id))
    }

    /// Add a node with `payload`, appending an index record and a hierarchy
    /// link. The model type is re-derived on next use.
    pub fn insert_node(&mut self, kind: NodeKind, payload: Payload, registry: &PayloadRegistry) -> Result<PayloadId> {
        if self.record(kind.name()).is_some() {
            return Err(Error::DuplicateNode(kind.name().to_string()));
        }
        let size = registry.byte_size(kind, &payload)?;

        let id = self.payloads.insert(payload);
        let mut record = NodeInfoRecord::new(kind, id);
        record.set_node_size(size as u32);
        self.records.push(record);
        self.hierarchy
            .push(HierarchyNode::new(self.records.len() as i32, kind.name()));

        self.classification_stale = true;
        self.layout_stale = true;
        log::debug!("inserted node {kind} ({size} bytes)");
        Ok(id)
    }

    /// Remove a node by name, returning its payload. Later hierarchy links
    /// are shifted so they keep pointing at the same records.
    pub fn remove_node(&mut self, node_name: &str) -> Result<Payload> {
        let index = self
            .records
            .iter()
            .position(|r| r.node_name() == node_name)
            .ok_or_else(|| Error::NodeNotFound(node_name.to_string()))?;

        let record = self.records.remove(index);
        self.hierarchy.unlink(index + 1);
        let payload = self
            .payloads
            .remove(record.payload())
            .ok_or(Error::UnknownPayload(record.payload()))?;

        self.classification_stale = true;
        self.layout_stale = true;
        log::debug!("removed node {node_name}");
        Ok(payload)
    }
}
