//! Payloads of DRS container nodes.
//!
//! Every non-root node of a DRS file carries one payload: mesh geometry, a
//! joint map, skin weights, animation data and so on. The container engine
//! does not care what is inside them. It only needs, per node name, a codec
//! that can decode a byte window, report an encoded size and encode back.
//!
//! - [`NodeKind`] - The closed set of node names and their index-table magics
//! - [`Payload`] - The closed set of in-memory payload variants
//! - [`PayloadRegistry`] - Node name → codec lookup, including the
//!   `CGeoPrimitiveContainer` zero-size rule
//!
//! # Example
//!
//! ```
//! use drs_payload::{NodeKind, PayloadRegistry};
//!
//! let registry = PayloadRegistry::standard();
//!
//! let bytes = [1u8, 0, 0, 0, 0, 0, 0, 0]; // joint map: version 1, no groups
//! let payload = registry.decode("CDspJointMap", &bytes)?;
//!
//! assert_eq!(registry.byte_size(NodeKind::CDspJointMap, &payload)?, 8);
//! assert_eq!(registry.encode(NodeKind::CDspJointMap, &payload)?, bytes);
//! # Ok::<(), drs_payload::Error>(())
//! ```

mod error;
mod kind;
mod payload;
mod registry;

pub mod parts;

pub use error::{Error, Result};
pub use kind::NodeKind;
pub use parts::{JointGroup, JointMap, PrimitiveContainer, RawPayload, ResourceMeta, SkinInfo, VertexWeight};
pub use payload::Payload;
pub use registry::{Codec, PayloadLayout, PayloadRegistry, SizeRule};
