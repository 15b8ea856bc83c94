#![allow(non_upper_case_globals)]

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;
use fehler::{throw, throws};
use bitflags::bitflags;
use tracing::trace;

use super::{MAGIC, VERSION, FIXED_HEADER_LEN, CHECKSUM_LEN};
use crate::raw::{Dictionary, DICTIONARY_LEN};

bitflags! {
    pub struct Flags: u8 {
        const Compressed  = 0b10000000;
        const Encrypted   = 0b01000000;
        const Checksummed = 0b00100000;
    }
}

impl Flags {
    /// Decode the flags byte. The low five bits carry nothing and are dropped.
    pub fn parse(i: u8) -> Self {
        Flags::from_bits_truncate(i)
    }

    pub fn compressed(&self)  -> bool { self.contains(Flags::Compressed) }
    pub fn encrypted(&self)   -> bool { self.contains(Flags::Encrypted) }
    pub fn checksummed(&self) -> bool { self.contains(Flags::Checksummed) }

    /// Length of the header these flags describe.
    pub fn header_len(&self) -> usize {
        let mut len = FIXED_HEADER_LEN;
        if self.compressed() { len += DICTIONARY_LEN; }
        if self.checksummed() { len += CHECKSUM_LEN; }
        len
    }
}

/// Reasons a header can be rejected, one per structural check.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is only {0} bytes long, too short for the fixed header")]
    TooShort(usize),
    #[error("wrong magic number in file header: {0:04x}")]
    WrongMagic(u16),
    #[error("file version {0} not supported")]
    UnsupportedVersion(u8),
    #[error("header announces a dictionary but only {available} bytes are left for it")]
    TruncatedDictionary { available: usize },
    #[error("header announces a checksum but only {available} bytes are left for it")]
    TruncatedChecksum { available: usize },
}

/// A successfully parsed container header.
///
/// The dictionary is present iff the payload is compressed, the checksum iff it is
/// checksummed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    flags: Flags,
    dictionary: Option<Dictionary>,
    checksum: Option<u16>,
    header_len: usize,
}

impl Header {
    /// Parse and validate the header at the start of `input`.
    ///
    /// Never looks at bytes beyond the header itself, so `input` may (and usually will)
    /// contain the payload as well.
    #[throws(ParseError)]
    pub fn parse(input: &[u8]) -> Self {
        if input.len() < FIXED_HEADER_LEN {
            throw!(ParseError::TooShort(input.len()));
        }

        let magic = BigEndian::read_u16(&input[0..2]);
        if magic != MAGIC {
            throw!(ParseError::WrongMagic(magic));
        }

        let version = input[2];
        if version != VERSION {
            throw!(ParseError::UnsupportedVersion(version));
        }

        let flags = Flags::parse(input[3]);
        let mut rest = &input[FIXED_HEADER_LEN..];

        let dictionary = if flags.compressed() {
            if rest.len() < DICTIONARY_LEN {
                throw!(ParseError::TruncatedDictionary { available: rest.len() });
            }
            let mut entries = [0u8; DICTIONARY_LEN];
            entries.copy_from_slice(&rest[..DICTIONARY_LEN]);
            rest = &rest[DICTIONARY_LEN..];
            Some(Dictionary::new(entries))
        } else {
            None
        };

        let checksum = if flags.checksummed() {
            if rest.len() < CHECKSUM_LEN {
                throw!(ParseError::TruncatedChecksum { available: rest.len() });
            }
            Some(BigEndian::read_u16(&rest[..CHECKSUM_LEN]))
        } else {
            None
        };

        let header_len = flags.header_len();
        trace!("parsed header: {:?}, {} bytes", flags, header_len);

        Header { flags, dictionary, checksum, header_len }
    }

    pub fn flags(&self) -> Flags { self.flags }
    pub fn is_compressed(&self) -> bool { self.flags.compressed() }
    pub fn is_encrypted(&self) -> bool { self.flags.encrypted() }
    pub fn is_checksummed(&self) -> bool { self.flags.checksummed() }
    pub fn dictionary(&self) -> Option<&Dictionary> { self.dictionary.as_ref() }
    pub fn checksum(&self) -> Option<u16> { self.checksum }
    /// Offset of the first payload byte.
    pub fn header_len(&self) -> usize { self.header_len }
}
