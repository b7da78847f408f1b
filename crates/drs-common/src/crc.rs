//! CRC32C fingerprints.
//!
//! DRS files carry no checksums of their own. Tools use CRC32C over encoded
//! payload bytes to tell whether a payload survived a load/save cycle
//! unchanged without keeping both copies around.

/// Compute the CRC32C of a byte slice.
///
/// Uses hardware acceleration when available (SSE4.2 on x86).
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}
