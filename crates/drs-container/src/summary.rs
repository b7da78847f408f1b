//! Serializable container summaries for reporting.

use drs_common::crc::hash_bytes;
use drs_payload::PayloadRegistry;

use crate::classify::MatchRule;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::ModelType;

/// One index record, as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeSummary {
    pub name: &'static str,
    pub identifier: i32,
    pub offset: Option<u32>,
    pub size: u32,
    /// CRC32C of the bytes the payload encodes to.
    pub crc32c: u32,
}

/// Header, classification and records of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContainerSummary {
    pub number_of_models: i32,
    pub node_information_offset: u32,
    pub node_hierarchy_offset: u32,
    pub node_count: usize,
    pub model_type: Option<ModelType>,
    pub rule: Option<MatchRule>,
    pub conflict: Option<ModelType>,
    pub nodes: Vec<NodeSummary>,
}

impl ContainerSummary {
    /// Describe every way `other` differs from `self` in its records, record
    /// count or model type. Empty when the two agree.
    pub fn differences(&self, other: &ContainerSummary) -> Vec<String> {
        let mut differences: Vec<String> = self
            .nodes
            .iter()
            .zip(&other.nodes)
            .filter(|(a, b)| a != b)
            .map(|(a, b)| format!("{a:?} != {b:?}"))
            .collect();
        if self.node_count != other.node_count {
            differences.push(format!("node count changed: {} -> {}", self.node_count, other.node_count));
        }
        if self.model_type != other.model_type {
            differences.push(format!("model type changed: {:?} -> {:?}", self.model_type, other.model_type));
        }
        differences
    }
}

impl Container {
    /// Summarize the container as it currently stands.
    pub fn summary(&self, registry: &PayloadRegistry) -> Result<ContainerSummary> {
        let classification = self.classification();
        let nodes = self
            .records()
            .iter()
            .map(|record| {
                let id = record.payload();
                let payload = self.payload(id).ok_or(Error::UnknownPayload(id))?;
                let bytes = registry.encode(record.kind(), payload)?;
                Ok(NodeSummary {
                    name: record.node_name(),
                    identifier: record.identifier(),
                    offset: record.offset(),
                    size: record.node_size(),
                    crc32c: hash_bytes(&bytes),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ContainerSummary {
            number_of_models: self.number_of_models(),
            node_information_offset: self.node_information_offset(),
            node_hierarchy_offset: self.node_hierarchy_offset(),
            node_count: self.record_count(),
            model_type: classification.model_type,
            rule: classification.rule,
            conflict: classification.conflict,
            nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{assemble, assemble_canonical, static_object};

    #[test]
    fn test_summary_reports_records() {
        let registry = PayloadRegistry::standard();
        let nodes = static_object();
        let container = Container::decode(&assemble(&nodes, false), &registry).unwrap();
        let summary = container.summary(&registry).unwrap();

        assert_eq!(summary.node_count, 6);
        assert_eq!(summary.model_type, Some(ModelType::StaticObjectNoCollision));
        assert_eq!(summary.rule, Some(MatchRule::Exact));
        for (node, (kind, bytes)) in summary.nodes.iter().zip(&nodes) {
            assert_eq!(node.name, kind.name());
            assert_eq!(node.size as usize, bytes.len());
            assert_eq!(node.crc32c, hash_bytes(bytes));
        }
    }

    #[test]
    fn test_differences_after_reencode() {
        let registry = PayloadRegistry::standard();
        let model_type = ModelType::StaticObjectNoCollision;

        let canonical = Container::decode(&assemble_canonical(&static_object(), model_type.write_order()), &registry)
            .unwrap()
            .summary(&registry)
            .unwrap();
        let mut container = Container::decode(&assemble(&static_object(), false), &registry).unwrap();
        let before = container.summary(&registry).unwrap();
        container.encode(&registry).unwrap();
        let after = container.summary(&registry).unwrap();

        assert!(after.differences(&canonical).is_empty());
        let differences = before.differences(&after);
        assert!(!differences.is_empty());
        assert!(differences.iter().all(|d| d.contains("offset")));

        let mut shorter = after.clone();
        shorter.nodes.pop();
        shorter.node_count -= 1;
        shorter.model_type = None;
        assert_eq!(after.differences(&shorter).len(), 2);
    }
}
