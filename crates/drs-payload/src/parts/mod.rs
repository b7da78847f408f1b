//! Payload structures.
//!
//! Nodes with a small, fully known structure get a typed layout:
//!
//! - [`JointMap`] (`CDspJointMap`): bone index groups
//! - [`SkinInfo`] (`CSkSkinInfo`): four bone weights per vertex
//! - [`ResourceMeta`] (`DrwResourceMeta`): resource hash string
//! - [`PrimitiveContainer`] (`CGeoPrimitiveContainer`): never written
//!
//! Mesh, skeleton and animation nodes (`CDspMeshFile`, `CSkSkeleton`,
//! `AnimationSet` and the rest) are carried as a [`RawPayload`], byte for byte.

mod joint_map;
mod primitive;
mod raw;
mod resource_meta;
mod skin_info;

pub use joint_map::{JointGroup, JointMap};
pub use primitive::PrimitiveContainer;
pub use raw::RawPayload;
pub use resource_meta::ResourceMeta;
pub use skin_info::{SkinInfo, VertexWeight};

use drs_common::BinaryReader;

use crate::{Error, NodeKind, Result};

/// Fail if a payload parser left bytes of its window unread.
pub(crate) fn expect_consumed(reader: &BinaryReader<'_>, kind: NodeKind) -> Result<()> {
    if reader.remaining() != 0 {
        return Err(Error::MalformedPayload {
            kind,
            reason: format!(
                "{} trailing bytes after offset {}",
                reader.remaining(),
                reader.position()
            ),
        });
    }
    Ok(())
}

/// Reject a count whose minimum footprint cannot fit in the rest of the window.
pub(crate) fn check_count(
    reader: &BinaryReader<'_>,
    kind: NodeKind,
    count: usize,
    min_item_size: usize,
) -> Result<()> {
    let needed = count.saturating_mul(min_item_size);
    if needed > reader.remaining() {
        return Err(Error::MalformedPayload {
            kind,
            reason: format!(
                "count {count} needs at least {needed} bytes, {} left",
                reader.remaining()
            ),
        });
    }
    Ok(())
}
