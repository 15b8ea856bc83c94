//! The container format: a small header followed by the payload.
//!
//! ```text
//! offset  size  field
//! 0       2     magic 0x0213 (big endian)
//! 2       1     version, always 0x01
//! 3       1     flags: bit 7 compressed, bit 6 encrypted, bit 5 checksummed
//! 4       16    dictionary (only if compressed)
//! 4/20    2     checksum of the payload, big endian (only if checksummed)
//! ```
//!
//! Encryption adds nothing to the header. The key comes from a password supplied at
//! unpack time.

mod header;
mod pipeline;

/// The two magic bytes at the start of every container.
const MAGIC: u16 = 0x0213;
const VERSION: u8 = 0x01;
/// Magic, version and flags.
const FIXED_HEADER_LEN: usize = 4;
const CHECKSUM_LEN: usize = 2;

pub use header::{Flags, Header, ParseError};
pub use pipeline::*;

/// A container split into its parsed header and the payload that follows it.
#[derive(Clone, Copy, Debug)]
pub struct Container<'a> {
    header: Header,
    payload: &'a [u8],
}

impl<'a> Container<'a> {
    pub fn parse(input: &'a [u8]) -> Result<Self, ParseError> {
        let header = Header::parse(input)?;
        Ok(Container { header, payload: &input[header.header_len()..] })
    }

    pub fn header(&self) -> &Header { &self.header }
    pub fn payload(&self) -> &'a [u8] { self.payload }
}
