//! Model types and their node schemas.
//!
//! A model type fixes which nodes a container holds and the order their
//! payloads appear in the data section. The tables here are format data.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use drs_payload::NodeKind;
use NodeKind::*;

/// Classification tag of a DRS container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelType {
    StaticObjectNoCollision,
    StaticObjectCollision,
    AnimatedObjectNoCollision,
    AnimatedObjectCollision,
    AnimatedUnit,
}

const STATIC_NO_COLLISION_WRITE: &[NodeKind] = &[CGeoMesh, CGeoOBBTree, CDspJointMap, CDspMeshFile, DrwResourceMeta];

const STATIC_COLLISION_WRITE: &[NodeKind] = &[
    CGeoMesh,
    CGeoOBBTree,
    CDspJointMap,
    CDspMeshFile,
    DrwResourceMeta,
    CGeoPrimitiveContainer,
    CollisionShape,
];

const ANIMATED_NO_COLLISION_WRITE: &[NodeKind] = &[
    CGeoMesh,
    CGeoOBBTree,
    CDspJointMap,
    CSkSkinInfo,
    CSkSkeleton,
    CDspMeshFile,
    DrwResourceMeta,
    AnimationSet,
];

const ANIMATED_COLLISION_WRITE: &[NodeKind] = &[
    CGeoMesh,
    CGeoOBBTree,
    CDspJointMap,
    CSkSkinInfo,
    CSkSkeleton,
    CDspMeshFile,
    DrwResourceMeta,
    AnimationSet,
    EffectSet,
    CGeoPrimitiveContainer,
    CollisionShape,
];

const ANIMATED_UNIT_WRITE: &[NodeKind] = &[
    CGeoMesh,
    CGeoOBBTree,
    CDspJointMap,
    CSkSkinInfo,
    CSkSkeleton,
    CDspMeshFile,
    DrwResourceMeta,
    AnimationSet,
    AnimationTimings,
    EffectSet,
];

const STATIC_NO_COLLISION_INDEX: &[NodeKind] = &[DrwResourceMeta, CGeoMesh, CDspMeshFile, CGeoOBBTree, CDspJointMap];

const STATIC_COLLISION_INDEX: &[NodeKind] = &[
    DrwResourceMeta,
    CGeoMesh,
    CDspMeshFile,
    CGeoOBBTree,
    CDspJointMap,
    CGeoPrimitiveContainer,
    CollisionShape,
];

const ANIMATED_NO_COLLISION_INDEX: &[NodeKind] = &[
    DrwResourceMeta,
    CGeoMesh,
    CDspMeshFile,
    CSkSkeleton,
    AnimationSet,
    CGeoOBBTree,
    CSkSkinInfo,
    CDspJointMap,
];

const ANIMATED_COLLISION_INDEX: &[NodeKind] = &[
    DrwResourceMeta,
    CGeoMesh,
    CDspMeshFile,
    CSkSkeleton,
    AnimationSet,
    CGeoOBBTree,
    CSkSkinInfo,
    CDspJointMap,
    EffectSet,
    CGeoPrimitiveContainer,
    CollisionShape,
];

const ANIMATED_UNIT_INDEX: &[NodeKind] = &[
    DrwResourceMeta,
    CGeoMesh,
    CDspMeshFile,
    EffectSet,
    AnimationSet,
    AnimationTimings,
    CSkSkeleton,
    CGeoOBBTree,
    CSkSkinInfo,
    CDspJointMap,
];

impl ModelType {
    /// Every model type, in classification order.
    pub const ALL: [ModelType; 5] = [
        ModelType::StaticObjectNoCollision,
        ModelType::StaticObjectCollision,
        ModelType::AnimatedObjectNoCollision,
        ModelType::AnimatedObjectCollision,
        ModelType::AnimatedUnit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ModelType::StaticObjectNoCollision => "StaticObjectNoCollision",
            ModelType::StaticObjectCollision => "StaticObjectCollision",
            ModelType::AnimatedObjectNoCollision => "AnimatedObjectNoCollision",
            ModelType::AnimatedObjectCollision => "AnimatedObjectCollision",
            ModelType::AnimatedUnit => "AnimatedUnit",
        }
    }

    /// Order in which payloads are laid out in the data section.
    pub const fn write_order(self) -> &'static [NodeKind] {
        match self {
            ModelType::StaticObjectNoCollision => STATIC_NO_COLLISION_WRITE,
            ModelType::StaticObjectCollision => STATIC_COLLISION_WRITE,
            ModelType::AnimatedObjectNoCollision => ANIMATED_NO_COLLISION_WRITE,
            ModelType::AnimatedObjectCollision => ANIMATED_COLLISION_WRITE,
            ModelType::AnimatedUnit => ANIMATED_UNIT_WRITE,
        }
    }

    /// Record order of a freshly authored container.
    pub const fn index_order(self) -> &'static [NodeKind] {
        match self {
            ModelType::StaticObjectNoCollision => STATIC_NO_COLLISION_INDEX,
            ModelType::StaticObjectCollision => STATIC_COLLISION_INDEX,
            ModelType::AnimatedObjectNoCollision => ANIMATED_NO_COLLISION_INDEX,
            ModelType::AnimatedObjectCollision => ANIMATED_COLLISION_INDEX,
            ModelType::AnimatedUnit => ANIMATED_UNIT_INDEX,
        }
    }

    /// Nodes a container of this type holds.
    pub fn expected_nodes(self) -> BTreeSet<NodeKind> {
        self.index_order().iter().copied().collect()
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|t| t.name()).collect();
                format!("unknown model type '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ModelType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_order_covers_expected_nodes() {
        for model_type in ModelType::ALL {
            let written: BTreeSet<_> = model_type.write_order().iter().copied().collect();
            assert_eq!(written, model_type.expected_nodes(), "{model_type}");
            assert_eq!(written.len(), model_type.write_order().len(), "{model_type} repeats a node");
        }
    }

    #[test]
    fn test_index_order_leads_with_meta_mesh_and_mesh_file() {
        for model_type in ModelType::ALL {
            assert_eq!(&model_type.index_order()[..3], &[DrwResourceMeta, CGeoMesh, CDspMeshFile]);
        }
    }

    #[test]
    fn test_expected_node_counts() {
        let counts: Vec<_> = ModelType::ALL.iter().map(|t| t.expected_nodes().len()).collect();
        assert_eq!(counts, vec![5, 7, 8, 11, 10]);
    }

    #[test]
    fn test_parse_names() {
        for model_type in ModelType::ALL {
            assert_eq!(model_type.name().parse::<ModelType>(), Ok(model_type));
        }
        assert_eq!("animatedunit".parse::<ModelType>(), Ok(ModelType::AnimatedUnit));
        assert!("Building".parse::<ModelType>().is_err());
    }
}
