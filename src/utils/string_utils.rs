//! String utility functions
//!
//! Utilities for working with NUL-separated text fields.

/// Splits a buffer at its first NUL byte
///
/// # Returns
/// The bytes before the NUL and the bytes after it, or `None` when the
/// buffer has no NUL
pub fn split_at_nul(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let nul = data.iter().position(|&b| b == 0)?;
    Some((&data[..nul], &data[nul + 1..]))
}

/// Decodes ISO 8859-1 bytes into a string
///
/// Every byte maps to the code point of the same value, so this never fails.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
