//! Model-type inference from the set of nodes a container holds.
//!
//! Classification runs in two stages. The exact rule picks the first model
//! type (in table order) whose expected nodes are all present with no extra
//! records. Failing that, an ordered fallback chain tests for marker nodes.

use std::collections::BTreeSet;
use std::fmt;

use drs_payload::NodeKind;

use crate::error::{Error, Result};
use crate::ModelType;

/// One step of the fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    /// Nodes that must be present.
    pub requires: &'static [NodeKind],
    /// Nodes that must be absent.
    pub forbids: &'static [NodeKind],
    pub model_type: ModelType,
}

impl FallbackRule {
    fn matches(&self, present: &BTreeSet<NodeKind>) -> bool {
        self.requires.iter().all(|k| present.contains(k)) && !self.forbids.iter().any(|k| present.contains(k))
    }
}

/// Fallback rules, first match wins.
pub const FALLBACK_CHAIN: [FallbackRule; 5] = [
    FallbackRule {
        requires: &[NodeKind::EffectSet, NodeKind::AnimationSet],
        forbids: &[],
        model_type: ModelType::AnimatedUnit,
    },
    FallbackRule {
        requires: &[NodeKind::CollisionShape],
        forbids: &[NodeKind::AnimationSet],
        model_type: ModelType::StaticObjectCollision,
    },
    FallbackRule {
        requires: &[NodeKind::CSkSkeleton, NodeKind::CollisionShape],
        forbids: &[],
        model_type: ModelType::AnimatedObjectCollision,
    },
    FallbackRule {
        requires: &[NodeKind::CSkSkeleton],
        forbids: &[NodeKind::CollisionShape],
        model_type: ModelType::AnimatedObjectNoCollision,
    },
    FallbackRule {
        requires: &[],
        forbids: &[NodeKind::CGeoPrimitiveContainer, NodeKind::CSkSkeleton],
        model_type: ModelType::StaticObjectNoCollision,
    },
];

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Node set matched a model type's schema exactly.
    Exact,
    /// Fallback chain step (1-based).
    Fallback(usize),
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::Exact => f.write_str("exact"),
            MatchRule::Fallback(step) => write!(f, "fallback #{step}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MatchRule {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Outcome of classifying a node set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// Inferred model type, `None` when unknown.
    pub model_type: Option<ModelType>,
    /// Rule that matched.
    pub rule: Option<MatchRule>,
    /// Fallback verdict that disagreed with an exact match.
    pub conflict: Option<ModelType>,
}

impl Classification {
    /// The model type, or [`Error::UnclassifiedModelType`].
    pub fn require(&self) -> Result<ModelType> {
        self.model_type.ok_or(Error::UnclassifiedModelType)
    }
}

/// Model type whose schema is exactly `present` with `record_count`
/// records (root included).
pub fn exact_match(present: &BTreeSet<NodeKind>, record_count: usize) -> Option<ModelType> {
    ModelType::ALL.into_iter().find(|model_type| {
        let expected = model_type.expected_nodes();
        record_count == expected.len() + 1 && expected.is_subset(present)
    })
}

/// First fallback rule matching `present`, with its 1-based step.
pub fn fallback_match(present: &BTreeSet<NodeKind>) -> Option<(usize, ModelType)> {
    FALLBACK_CHAIN
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(present))
        .map(|(i, rule)| (i + 1, rule.model_type))
}

/// Classify a container holding `present` nodes in `record_count` records
/// (root included).
pub fn classify(present: &BTreeSet<NodeKind>, record_count: usize) -> Classification {
    let fallback = fallback_match(present);

    if let Some(model_type) = exact_match(present, record_count) {
        return Classification {
            model_type: Some(model_type),
            rule: Some(MatchRule::Exact),
            conflict: fallback.map(|(_, t)| t).filter(|t| *t != model_type),
        };
    }

    match fallback {
        Some((step, model_type)) => Classification {
            model_type: Some(model_type),
            rule: Some(MatchRule::Fallback(step)),
            conflict: None,
        },
        None => Classification::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(kinds: &[NodeKind]) -> BTreeSet<NodeKind> {
        kinds.iter().copied().collect()
    }

    #[test]
    fn test_every_schema_matches_itself_exactly() {
        for model_type in ModelType::ALL {
            let present = model_type.expected_nodes();
            let result = classify(&present, present.len() + 1);
            assert_eq!(result.model_type, Some(model_type));
            assert_eq!(result.rule, Some(MatchRule::Exact));
        }
    }

    #[test]
    fn test_exact_match_beats_conflicting_fallback() {
        let present = ModelType::AnimatedObjectCollision.expected_nodes();
        assert_eq!(fallback_match(&present), Some((1, ModelType::AnimatedUnit)));

        let result = classify(&present, present.len() + 1);
        assert_eq!(result.model_type, Some(ModelType::AnimatedObjectCollision));
        assert_eq!(result.rule, Some(MatchRule::Exact));
        assert_eq!(result.conflict, Some(ModelType::AnimatedUnit));
    }

    #[test]
    fn test_extra_record_falls_through_to_fallback() {
        let mut present = ModelType::StaticObjectNoCollision.expected_nodes();
        present.insert(NodeKind::CDrwLocatorList);

        let result = classify(&present, present.len() + 1);
        assert_eq!(result.model_type, Some(ModelType::StaticObjectNoCollision));
        assert_eq!(result.rule, Some(MatchRule::Fallback(5)));
        assert_eq!(result.conflict, None);
    }

    #[test]
    fn test_fallback_order() {
        let cases = [
            (&[NodeKind::EffectSet, NodeKind::AnimationSet, NodeKind::CollisionShape][..], 1, ModelType::AnimatedUnit),
            (&[NodeKind::CollisionShape, NodeKind::CSkSkeleton][..], 2, ModelType::StaticObjectCollision),
            (
                &[NodeKind::CollisionShape, NodeKind::CSkSkeleton, NodeKind::AnimationSet][..],
                3,
                ModelType::AnimatedObjectCollision,
            ),
            (&[NodeKind::CSkSkeleton][..], 4, ModelType::AnimatedObjectNoCollision),
            (&[NodeKind::CGeoMesh][..], 5, ModelType::StaticObjectNoCollision),
        ];
        for (kinds, step, model_type) in cases {
            assert_eq!(fallback_match(&set(kinds)), Some((step, model_type)), "{kinds:?}");
        }
    }

    #[test]
    fn test_unclassifiable_node_set() {
        let present = set(&[NodeKind::CGeoMesh, NodeKind::CGeoPrimitiveContainer]);
        let result = classify(&present, 3);
        assert_eq!(result, Classification::default());
        assert!(matches!(result.require(), Err(Error::UnclassifiedModelType)));
    }
}
