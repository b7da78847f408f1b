//! DRS model container reading and writing.
//!
//! A DRS file is a header, an index table of fixed-width records, a
//! hierarchy table naming each record, and a data section of payloads laid
//! out back to back in an order fixed by the file's model type.
//!
//! - [`Container`] - Decoded container: records, hierarchy, payload arena
//! - [`ContainerHandle`] - Editing handle that tracks payload size changes
//! - [`ModelType`] - Model types and their write orders
//! - [`classify`] - Model-type inference from the node set
//!
//! Offsets are never trusted across edits: encoding recomputes every size
//! and offset from the payloads and commits them only once the whole file
//! has been produced.
//!
//! # Example
//!
//! ```no_run
//! use drs_container::ContainerHandle;
//!
//! let mut handle = ContainerHandle::open("unit.drs")?;
//! println!("{}", handle.classify_model_type()?);
//!
//! if let Some(id) = handle.payload_id("CDspMeshFile") {
//!     handle.edit_payload(id, |payload| {
//!         if let Some(raw) = payload.as_raw_mut() {
//!             raw.bytes_mut().clear();
//!         }
//!     })?;
//! }
//! handle.save_to("unit.out.drs")?;
//! # Ok::<(), drs_container::Error>(())
//! ```

mod arena;
mod container;
mod decode;
mod encode;
mod error;
mod handle;
mod header;
mod hierarchy;
mod layout;
mod record;
mod schema;
mod summary;

pub mod classify;

#[cfg(feature = "sync")]
mod sync;

#[cfg(test)]
mod fixtures;

pub use arena::{PayloadArena, PayloadId};
pub use classify::{Classification, MatchRule};
pub use container::Container;
pub use error::{Error, Result};
pub use handle::ContainerHandle;
pub use header::DrsHeader;
pub use hierarchy::{Hierarchy, HierarchyNode, RootNode};
pub use layout::{plan_layout, Layout, LayoutError, SectionWidths};
pub use record::{index_table_width, NodeInfoRecord, RawNodeRecord, RootRecord};
pub use schema::ModelType;
pub use summary::{ContainerSummary, NodeSummary};

#[cfg(feature = "sync")]
pub use sync::SharedContainer;
