//! DRS - game-asset container library.
//!
//! This crate provides a unified interface to the DRS crates for reading,
//! classifying, editing and writing `.drs` model containers.
//!
//! # Crates
//!
//! - [`drs_common`] - Common utilities (binary reading/writing, CRC32C)
//! - [`drs_payload`] - Node kinds, payload variants and the codec registry
//! - [`drs_container`] - Container decode/encode, model types, editing handle
//!
//! # Example
//!
//! ```no_run
//! use drs::prelude::*;
//!
//! let mut handle = ContainerHandle::open("building.drs")?;
//! match handle.classify_model_type() {
//!     Ok(model_type) => println!("{model_type}: {:?}", handle.list_payload_node_names()),
//!     Err(err) => println!("{err}"),
//! }
//!
//! let bytes = handle.save()?;
//! println!("re-encoded to {} bytes", bytes.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use drs_common as common;
pub use drs_container as container;
pub use drs_payload as payload;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use drs_common::{crc, BinaryReader};
    pub use drs_container::{Container, ContainerHandle, ContainerSummary, ModelType, PayloadId};
    pub use drs_payload::{NodeKind, Payload, PayloadRegistry};

    #[cfg(feature = "sync")]
    pub use drs_container::SharedContainer;
}

// Re-export commonly used types at the crate root
pub use drs_container::{Container, ContainerHandle, ModelType};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
