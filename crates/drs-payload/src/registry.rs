//! Node name → payload codec lookup.

use std::fmt;

use crate::parts::{JointMap, PrimitiveContainer, RawPayload, ResourceMeta, SkinInfo};
use crate::{Error, NodeKind, Payload, Result};

/// How a node's bytes map to a [`Payload`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLayout {
    JointMap,
    SkinInfo,
    ResourceMeta,
    PrimitiveContainer,
    Raw,
}

impl PayloadLayout {
    /// Short name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            PayloadLayout::JointMap => "joint map",
            PayloadLayout::SkinInfo => "skin info",
            PayloadLayout::ResourceMeta => "resource meta",
            PayloadLayout::PrimitiveContainer => "primitive container",
            PayloadLayout::Raw => "raw",
        }
    }

    fn decode(self, kind: NodeKind, data: &[u8]) -> Result<Payload> {
        let parsed = match self {
            PayloadLayout::JointMap => JointMap::parse(data).map(Payload::JointMap),
            PayloadLayout::SkinInfo => SkinInfo::parse(data).map(Payload::SkinInfo),
            PayloadLayout::ResourceMeta => ResourceMeta::parse(data).map(Payload::ResourceMeta),
            PayloadLayout::PrimitiveContainer => {
                Ok(Payload::PrimitiveContainer(PrimitiveContainer::parse(data)))
            }
            PayloadLayout::Raw => Ok(Payload::Raw(RawPayload::new(data.to_vec()))),
        };

        // Running off the end of the window is a malformed payload, not a
        // truncated file: the window itself was bounds-checked by the caller.
        parsed.map_err(|e| match e {
            Error::Common(inner) => Error::malformed(kind, inner),
            other => other,
        })
    }

    fn empty(self) -> Payload {
        match self {
            PayloadLayout::JointMap => Payload::JointMap(JointMap::default()),
            PayloadLayout::SkinInfo => Payload::SkinInfo(SkinInfo::default()),
            PayloadLayout::ResourceMeta => Payload::ResourceMeta(ResourceMeta::default()),
            PayloadLayout::PrimitiveContainer => {
                Payload::PrimitiveContainer(PrimitiveContainer::default())
            }
            PayloadLayout::Raw => Payload::Raw(RawPayload::default()),
        }
    }
}

impl fmt::Display for PayloadLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a node's recorded size relates to its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Recorded size is the encoded length and the bytes are written.
    Encoded,
    /// Recorded size is 0 and nothing is written, whatever the payload holds.
    AlwaysZero,
}

/// Codec registered for one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    pub kind: NodeKind,
    pub layout: PayloadLayout,
    pub size_rule: SizeRule,
}

impl Codec {
    pub const fn new(kind: NodeKind, layout: PayloadLayout, size_rule: SizeRule) -> Self {
        Self {
            kind,
            layout,
            size_rule,
        }
    }

    const fn encoded(kind: NodeKind, layout: PayloadLayout) -> Self {
        Self::new(kind, layout, SizeRule::Encoded)
    }
}

/// Codecs for every node kind the format defines.
const STANDARD_CODECS: [Codec; 13] = [
    Codec::encoded(NodeKind::CGeoMesh, PayloadLayout::Raw),
    Codec::encoded(NodeKind::CGeoOBBTree, PayloadLayout::Raw),
    Codec::encoded(NodeKind::CDspJointMap, PayloadLayout::JointMap),
    Codec::encoded(NodeKind::CSkSkinInfo, PayloadLayout::SkinInfo),
    Codec::encoded(NodeKind::CSkSkeleton, PayloadLayout::Raw),
    Codec::encoded(NodeKind::CDspMeshFile, PayloadLayout::Raw),
    Codec::encoded(NodeKind::DrwResourceMeta, PayloadLayout::ResourceMeta),
    Codec::encoded(NodeKind::AnimationSet, PayloadLayout::Raw),
    Codec::encoded(NodeKind::AnimationTimings, PayloadLayout::Raw),
    Codec::encoded(NodeKind::EffectSet, PayloadLayout::Raw),
    Codec::new(
        NodeKind::CGeoPrimitiveContainer,
        PayloadLayout::PrimitiveContainer,
        SizeRule::AlwaysZero,
    ),
    Codec::encoded(NodeKind::CollisionShape, PayloadLayout::Raw),
    Codec::encoded(NodeKind::CDrwLocatorList, PayloadLayout::Raw),
];

/// Maps node names to payload codecs.
///
/// The container engine goes through the registry for every payload size,
/// encode and decode, so format quirks such as the primitive container's
/// zero size live here and nowhere else.
#[derive(Debug, Clone)]
pub struct PayloadRegistry {
    codecs: Vec<Codec>,
}

impl Default for PayloadRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PayloadRegistry {
    /// A registry with no codecs.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// A registry with a codec for every known node kind.
    pub fn standard() -> Self {
        Self {
            codecs: STANDARD_CODECS.to_vec(),
        }
    }

    /// Register a codec, replacing any existing codec for the same kind.
    pub fn register(mut self, codec: Codec) -> Self {
        self.codecs.retain(|c| c.kind != codec.kind);
        self.codecs.push(codec);
        self
    }

    /// Drop the codec for `kind`.
    pub fn without(mut self, kind: NodeKind) -> Self {
        self.codecs.retain(|c| c.kind != kind);
        self
    }

    /// Look up the codec for a node name.
    pub fn codec(&self, node_name: &str) -> Option<&Codec> {
        self.codecs.iter().find(|c| c.kind.name() == node_name)
    }

    /// Look up the codec for a node kind.
    pub fn codec_for(&self, kind: NodeKind) -> Result<&Codec> {
        self.codecs
            .iter()
            .find(|c| c.kind == kind)
            .ok_or_else(|| Error::UnknownNodeType {
                name: kind.name().to_string(),
            })
    }

    /// Resolve an index-table magic to a registered node kind.
    pub fn kind_for_magic(&self, magic: i32) -> Result<NodeKind> {
        self.codecs
            .iter()
            .find(|c| c.kind.magic() == magic)
            .map(|c| c.kind)
            .ok_or_else(|| Error::UnknownNodeType {
                name: format!("magic {magic:#010x}"),
            })
    }

    /// Decode a payload for `node_name` from its byte window.
    pub fn decode(&self, node_name: &str, data: &[u8]) -> Result<Payload> {
        let codec = self.codec(node_name).ok_or_else(|| Error::UnknownNodeType {
            name: node_name.to_string(),
        })?;
        codec.layout.decode(codec.kind, data)
    }

    /// Size recorded in the index table for a `kind` node holding `payload`.
    pub fn byte_size(&self, kind: NodeKind, payload: &Payload) -> Result<usize> {
        let codec = self.checked_codec(kind, payload)?;
        Ok(match codec.size_rule {
            SizeRule::Encoded => payload.encoded_len(),
            SizeRule::AlwaysZero => 0,
        })
    }

    /// Append the bytes written to the data section for a `kind` node.
    pub fn encode_into(&self, kind: NodeKind, payload: &Payload, out: &mut Vec<u8>) -> Result<()> {
        let codec = self.checked_codec(kind, payload)?;
        if codec.size_rule == SizeRule::Encoded {
            payload.write_to(out)?;
        }
        Ok(())
    }

    /// Encode the bytes written to the data section for a `kind` node.
    pub fn encode(&self, kind: NodeKind, payload: &Payload) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(payload.encoded_len());
        self.encode_into(kind, payload, &mut out)?;
        Ok(out)
    }

    /// A fresh, empty payload for a newly authored `kind` node.
    pub fn empty_payload(&self, kind: NodeKind) -> Result<Payload> {
        Ok(self.codec_for(kind)?.layout.empty())
    }

    fn checked_codec(&self, kind: NodeKind, payload: &Payload) -> Result<&Codec> {
        let codec = self.codec_for(kind)?;
        if payload.layout() != codec.layout {
            return Err(Error::PayloadMismatch {
                kind,
                expected: codec.layout.name(),
                found: payload.layout().name(),
            });
        }
        Ok(codec)
    }
}
