//! The raw codec primitives.
//!
//! These work on plain byte slices and know nothing about the container header: a 16-bit
//! additive checksum, the LFSR stream cipher and the dictionary run-length decompressor.
//! None of them can fail. Running out of output space just means fewer bytes written,
//! and every function that writes reports exactly how many.

mod checksum;
mod decompress;
pub mod lfsr;
pub mod sink;

pub use checksum::*;
pub use decompress::*;
pub use lfsr::{decrypt, decrypt_in_place, Lfsr};

/// Marks a run instruction (or an escaped literal `0x07`) in a compressed payload.
pub const ESCAPE: u8 = 0x07;
/// A run instruction stores its repeat count in a nibble.
pub const MAX_RUN_LENGTH: usize = 15;
/// Number of entries in a dictionary.
pub const DICTIONARY_LEN: usize = 16;

/// The 16-entry byte table that run instructions index into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dictionary([u8; DICTIONARY_LEN]);

impl Dictionary {
    pub const fn new(entries: [u8; DICTIONARY_LEN]) -> Self {
        Dictionary(entries)
    }

    /// Look up an entry. Only the low nibble of `index` is used.
    #[inline]
    pub fn get(&self, index: u8) -> u8 {
        self.0[usize::from(index & 0x0F)]
    }

    pub fn as_bytes(&self) -> &[u8; DICTIONARY_LEN] { &self.0 }
}

impl From<[u8; DICTIONARY_LEN]> for Dictionary {
    fn from(entries: [u8; DICTIONARY_LEN]) -> Self {
        Dictionary(entries)
    }
}

/// Upper bound on the decompressed size of `compressed_len` bytes of payload.
///
/// Every two input bytes can turn into at most [`MAX_RUN_LENGTH`] output bytes.
pub fn max_decompressed_len(compressed_len: usize) -> usize {
    compressed_len.saturating_add(1) / 2 * MAX_RUN_LENGTH
}
