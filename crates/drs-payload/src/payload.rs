//! The closed set of in-memory payload variants.

use std::io::{self, Write};

use crate::parts::{JointMap, PrimitiveContainer, RawPayload, ResourceMeta, SkinInfo};
use crate::PayloadLayout;

/// A decoded node payload.
///
/// Which variant a node holds is decided by the node's registered
/// [`PayloadLayout`], never by inspecting the data.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `CDspJointMap` bone groups.
    JointMap(JointMap),
    /// `CSkSkinInfo` vertex weights.
    SkinInfo(SkinInfo),
    /// `DrwResourceMeta` hash.
    ResourceMeta(ResourceMeta),
    /// `CGeoPrimitiveContainer` in-memory content.
    PrimitiveContainer(PrimitiveContainer),
    /// Any other node, byte for byte.
    Raw(RawPayload),
}

impl Payload {
    /// The layout this variant belongs to.
    pub fn layout(&self) -> PayloadLayout {
        match self {
            Payload::JointMap(_) => PayloadLayout::JointMap,
            Payload::SkinInfo(_) => PayloadLayout::SkinInfo,
            Payload::ResourceMeta(_) => PayloadLayout::ResourceMeta,
            Payload::PrimitiveContainer(_) => PayloadLayout::PrimitiveContainer,
            Payload::Raw(_) => PayloadLayout::Raw,
        }
    }

    /// Length of this payload's own encoding.
    ///
    /// For a primitive container this is its in-memory size; what actually
    /// lands in a file is decided by the registry's size rule.
    pub fn encoded_len(&self) -> usize {
        match self {
            Payload::JointMap(map) => map.encoded_len(),
            Payload::SkinInfo(skin) => skin.encoded_len(),
            Payload::ResourceMeta(meta) => meta.encoded_len(),
            Payload::PrimitiveContainer(prim) => prim.content_len(),
            Payload::Raw(raw) => raw.encoded_len(),
        }
    }

    /// Write this payload's own encoding.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Payload::JointMap(map) => map.write_to(writer),
            Payload::SkinInfo(skin) => skin.write_to(writer),
            Payload::ResourceMeta(meta) => meta.write_to(writer),
            Payload::PrimitiveContainer(prim) => writer.write_all(prim.content()),
            Payload::Raw(raw) => writer.write_all(raw.bytes()),
        }
    }

    /// The raw bytes, if this is a [`Payload::Raw`].
    pub fn as_raw(&self) -> Option<&RawPayload> {
        match self {
            Payload::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    /// The joint map, if this is a [`Payload::JointMap`].
    pub fn as_joint_map(&self) -> Option<&JointMap> {
        match self {
            Payload::JointMap(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable joint map, if this is a [`Payload::JointMap`].
    pub fn as_joint_map_mut(&mut self) -> Option<&mut JointMap> {
        match self {
            Payload::JointMap(map) => Some(map),
            _ => None,
        }
    }

    /// The resource metadata, if this is a [`Payload::ResourceMeta`].
    pub fn as_resource_meta(&self) -> Option<&ResourceMeta> {
        match self {
            Payload::ResourceMeta(meta) => Some(meta),
            _ => None,
        }
    }

    /// Mutable raw bytes, if this is a [`Payload::Raw`].
    pub fn as_raw_mut(&mut self) -> Option<&mut RawPayload> {
        match self {
            Payload::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

impl From<RawPayload> for Payload {
    fn from(raw: RawPayload) -> Self {
        Payload::Raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_encoding_length() {
        let payloads = [
            Payload::JointMap(JointMap::default()),
            Payload::SkinInfo(SkinInfo::default()),
            Payload::ResourceMeta(ResourceMeta {
                unknown: [0, 0],
                hash: "abc".into(),
            }),
            Payload::PrimitiveContainer(PrimitiveContainer::new(vec![1, 2, 3])),
            Payload::Raw(RawPayload::new(vec![9; 17])),
        ];

        for payload in &payloads {
            let mut bytes = Vec::new();
            payload.write_to(&mut bytes).unwrap();
            assert_eq!(bytes.len(), payload.encoded_len(), "{:?}", payload.layout());
        }
    }
}
