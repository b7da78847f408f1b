//! Node kinds known to the DRS format.

use std::fmt;

/// A named node type.
///
/// The node name is what the hierarchy table stores and what model-type
/// schemas are written in terms of; the magic is the value the index table
/// stores for the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Collision/picking geometry.
    CGeoMesh,
    /// Oriented bounding box tree over the mesh.
    CGeoOBBTree,
    /// Bone index groups used by submeshes.
    CDspJointMap,
    /// Per-vertex skin weights.
    CSkSkinInfo,
    /// Bone hierarchy.
    CSkSkeleton,
    /// Renderable meshes, materials and textures.
    CDspMeshFile,
    /// Resource hash metadata.
    DrwResourceMeta,
    /// Animation set, modes and marker data.
    AnimationSet,
    /// Per-animation timing tables.
    AnimationTimings,
    /// Attached visual/sound effects.
    EffectSet,
    /// Zero-length placeholder paired with `collisionShape`.
    CGeoPrimitiveContainer,
    /// Collision boxes, spheres and cylinders.
    CollisionShape,
    /// Named attachment locators.
    CDrwLocatorList,
}

impl NodeKind {
    /// Every known node kind.
    pub const ALL: [NodeKind; 13] = [
        NodeKind::CGeoMesh,
        NodeKind::CGeoOBBTree,
        NodeKind::CDspJointMap,
        NodeKind::CSkSkinInfo,
        NodeKind::CSkSkeleton,
        NodeKind::CDspMeshFile,
        NodeKind::DrwResourceMeta,
        NodeKind::AnimationSet,
        NodeKind::AnimationTimings,
        NodeKind::EffectSet,
        NodeKind::CGeoPrimitiveContainer,
        NodeKind::CollisionShape,
        NodeKind::CDrwLocatorList,
    ];

    /// The node name as stored in the hierarchy table.
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::CGeoMesh => "CGeoMesh",
            NodeKind::CGeoOBBTree => "CGeoOBBTree",
            NodeKind::CDspJointMap => "CDspJointMap",
            NodeKind::CSkSkinInfo => "CSkSkinInfo",
            NodeKind::CSkSkeleton => "CSkSkeleton",
            NodeKind::CDspMeshFile => "CDspMeshFile",
            NodeKind::DrwResourceMeta => "DrwResourceMeta",
            NodeKind::AnimationSet => "AnimationSet",
            NodeKind::AnimationTimings => "AnimationTimings",
            NodeKind::EffectSet => "EffectSet",
            NodeKind::CGeoPrimitiveContainer => "CGeoPrimitiveContainer",
            NodeKind::CollisionShape => "collisionShape",
            NodeKind::CDrwLocatorList => "CDrwLocatorList",
        }
    }

    /// The magic value stored in this node's index-table record.
    pub const fn magic(self) -> i32 {
        match self {
            NodeKind::CGeoMesh => 100449016,
            NodeKind::CGeoOBBTree => -933519637,
            NodeKind::CDspJointMap => -1340635850,
            NodeKind::CSkSkinInfo => -761174227,
            NodeKind::CSkSkeleton => -2110567991,
            NodeKind::CDspMeshFile => -1900395636,
            NodeKind::DrwResourceMeta => -183033339,
            NodeKind::AnimationSet => -475734043,
            NodeKind::AnimationTimings => -1403092629,
            NodeKind::EffectSet => 688490554,
            NodeKind::CGeoPrimitiveContainer => 1396683476,
            NodeKind::CollisionShape => 268607026,
            NodeKind::CDrwLocatorList => 735146985,
        }
    }

    /// Look up a kind by node name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Look up a kind by index-table magic.
    pub fn from_magic(magic: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.magic() == magic)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}
