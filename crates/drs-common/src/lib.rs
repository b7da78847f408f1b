//! Common utilities for DRS tooling.
//!
//! This crate provides the low-level pieces shared by the payload and
//! container crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`WriteDrsExt`] - Little-endian writing helpers on top of `byteorder`
//! - [`crc`] - CRC32C fingerprints used to compare payloads

mod error;
mod reader;
mod writer;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::WriteDrsExt;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
