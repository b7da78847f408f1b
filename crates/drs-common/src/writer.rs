//! Little-endian writing helpers.
//!
//! Encoders write into any [`std::io::Write`] sink, usually a `Vec<u8>`.
//! The helpers here cover the two shapes DRS uses everywhere: plain
//! little-endian scalars and i32-length-prefixed byte strings.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

/// Extension trait for writing DRS primitives.
pub trait WriteDrsExt: Write {
    /// Write a little-endian i32.
    #[inline]
    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_i32::<LittleEndian>(value)
    }

    /// Write a little-endian i16.
    #[inline]
    fn write_i16_le(&mut self, value: i16) -> io::Result<()> {
        self.write_i16::<LittleEndian>(value)
    }

    /// Write a little-endian f32.
    #[inline]
    fn write_f32_le(&mut self, value: f32) -> io::Result<()> {
        self.write_f32::<LittleEndian>(value)
    }

    /// Write a length or count as an i32 prefix.
    fn write_len(&mut self, len: usize) -> io::Result<()> {
        let value = i32::try_from(len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("length {len} does not fit in an i32 prefix"),
            )
        })?;
        self.write_i32_le(value)
    }

    /// Write bytes preceded by their i32 length.
    fn write_prefixed_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_len(bytes.len())?;
        self.write_all(bytes)
    }
}

impl<W: Write + ?Sized> WriteDrsExt for W {}
