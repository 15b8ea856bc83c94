use std::io::{self, Read, ErrorKind};
use thiserror::Error;
use fehler::{throw, throws};
use tracing::{debug, trace, warn};

use super::{Container, header::ParseError};
use crate::raw::{self, max_decompressed_len};

/// Errors when unpacking a container.
#[derive(Error, Debug)]
pub enum UnpackError {
    #[error("error reading from the input you gave me")]
    InputError(#[from] io::Error),
    #[error("invalid header")]
    HeaderParseError(#[from] ParseError),
    #[error("the payload checksum was invalid: header says {expected:04x}, payload sums to {actual:04x}")]
    ChecksumMismatch { expected: u16, actual: u16 },
    #[error("the payload is encrypted but no password was given")]
    PasswordRequired,
    #[error("the password derives the key 0, which does not encrypt anything")]
    DegenerateKey,
}
type Error = UnpackError; // do it this way for better docs

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        io::Error::new(ErrorKind::Other, e)
    }
}

impl<'a> Container<'a> {
    /// Compare the payload against the checksum stored in the header. Containers
    /// without a checksum always pass.
    #[throws]
    pub fn verify_checksum(&self) {
        if let Some(expected) = self.header().checksum() {
            let actual = raw::checksum(self.payload());
            if actual != expected {
                throw!(Error::ChecksumMismatch { expected, actual });
            }
            trace!("payload checksum {:04x}", actual);
        }
    }
}

/// Knobs for unpacking a container.
///
/// The stages always run in the same order: checksum, decryption, decompression. Each
/// one is skipped if the header says so.
#[derive(Clone, Debug)]
pub struct UnpackSettings<'a> {
    password: Option<&'a [u8]>,
    verify_checksum: bool,
    output_capacity: Option<usize>,
}
impl<'a> Default for UnpackSettings<'a> {
    fn default() -> Self {
        Self {
            password: None,
            verify_checksum: true,
            output_capacity: None,
        }
    }
}
impl<'a> UnpackSettings<'a> {
    /// The password for encrypted payloads. It's only consulted if the header has the
    /// encrypted flag set.
    pub fn password(&mut self, password: &'a [u8]) -> &mut Self {
        self.password = Some(password);
        self
    }
    /// Check the payload against the header checksum (on by default).
    pub fn verify_checksum(&mut self, v: bool) -> &mut Self {
        self.verify_checksum = v;
        self
    }
    /// Size of the decompression buffer. Defaults to the worst case for the payload
    /// size, which can never be exceeded. A smaller value silently truncates the output.
    pub fn output_capacity(&mut self, v: usize) -> &mut Self {
        self.output_capacity = Some(v);
        self
    }

    /// Decode a complete container held in memory.
    #[throws]
    pub fn unpack(&self, input: &[u8]) -> Vec<u8> {
        let container = Container::parse(input)?;
        let header = container.header();
        let payload = container.payload();
        debug!(
            "unpacking {} payload bytes (compressed: {}, encrypted: {}, checksummed: {})",
            payload.len(),
            header.is_compressed(),
            header.is_encrypted(),
            header.is_checksummed(),
        );

        if self.verify_checksum {
            container.verify_checksum()?;
        }

        let mut data = payload.to_vec();

        if header.is_encrypted() {
            let password = self.password.ok_or(Error::PasswordRequired)?;
            let key = raw::derive_key(password);
            if key == 0 {
                throw!(Error::DegenerateKey);
            }
            raw::decrypt_in_place(&mut data, key);
        }

        if let Some(dictionary) = header.dictionary() {
            let capacity = self.output_capacity.unwrap_or_else(|| max_decompressed_len(data.len()));
            let mut output = vec![0u8; capacity];
            let len = raw::decompress_into(&data, &mut output, dictionary);
            if len == capacity && self.output_capacity.is_some() {
                warn!("decompression filled the whole {} byte buffer, output may be truncated", capacity);
            }
            output.truncate(len);
            data = output;
        }

        debug!("unpacked {} bytes", data.len());
        data
    }

    /// Read `reader` to the end and decode it.
    #[throws]
    pub fn unpack_from<R: Read>(&self, mut reader: R) -> Vec<u8> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        self.unpack(&input)?
    }
}

/// Unpack a container that needs no password.
#[throws]
pub fn unpack(input: &[u8]) -> Vec<u8> {
    UnpackSettings::default().unpack(input)?
}

/// Unpack a container, decrypting it with `password` if it is encrypted.
#[throws]
pub fn unpack_with_password(input: &[u8], password: &[u8]) -> Vec<u8> {
    UnpackSettings::default().password(password).unpack(input)?
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::raw::derive_key;

    const DICT: &[u8; 16] = b"23456789@ABCDEFG";
    const COMPRESSED: [u8; 8] = [0x07, 0x70, 0xF2, 0x07, 0x52, 0xFE, 0x07, 0x8F];

    fn expanded() -> Vec<u8> {
        let mut v = vec![0x32; 7];
        v.push(0xF2);
        v.extend_from_slice(&[0x34; 5]);
        v.push(0xFE);
        v.extend_from_slice(&[0x47; 8]);
        v
    }

    fn container(flags: u8, dict: Option<&[u8; 16]>, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0x02, 0x13, 0x01, flags];
        if let Some(d) = dict {
            out.extend_from_slice(d);
        }
        if flags & 0x20 != 0 {
            out.extend_from_slice(&raw::checksum(payload).to_be_bytes());
        }
        out.extend_from_slice(payload);
        out
    }

    fn encrypt(data: &[u8], password: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        raw::decrypt_in_place(&mut out, derive_key(password));
        out
    }

    #[test]
    fn plain() {
        assert_eq!(unpack(&container(0x00, None, b"hello")).unwrap(), b"hello");
    }

    #[test]
    fn compressed_only() {
        assert_eq!(unpack(&container(0x80, Some(DICT), &COMPRESSED)).unwrap(), expanded());
    }

    #[test]
    fn all_stages() {
        let ciphertext = encrypt(&COMPRESSED, b"hunter2");
        let input = container(0xE0, Some(DICT), &ciphertext);
        assert_eq!(unpack_with_password(&input, b"hunter2").unwrap(), expanded());
        // any permutation of the password derives the same key
        assert_eq!(unpack_with_password(&input, b"2hunter").unwrap(), expanded());
    }

    #[test]
    fn checksum_is_over_the_ciphertext() {
        let ciphertext = encrypt(b"some secret text", b"pw");
        let mut input = container(0x60, None, &ciphertext);
        assert_eq!(unpack_with_password(&input, b"pw").unwrap(), b"some secret text");

        let last = input.len() - 1;
        input[last] ^= 0x01;
        match unpack_with_password(&input, b"pw") {
            Err(UnpackError::ChecksumMismatch { expected, actual }) => {
                assert_eq!(expected, raw::checksum(&ciphertext));
                assert_ne!(actual, expected);
            }
            other => panic!("expected a checksum mismatch, got {:?}", other),
        }
    }

    #[test]
    fn checksum_can_be_skipped() {
        let mut input = container(0x20, None, b"abc");
        input[4] ^= 0xFF;
        assert!(unpack(&input).is_err());
        assert_eq!(UnpackSettings::default().verify_checksum(false).unpack(&input).unwrap(), b"abc");
    }

    #[test]
    fn checksum_checked_before_password() {
        let mut input = container(0x60, None, &encrypt(b"xyz", b"pw"));
        input[5] = input[5].wrapping_add(1);
        assert!(matches!(unpack(&input), Err(UnpackError::ChecksumMismatch { .. })));

        let parsed = Container::parse(&input).unwrap();
        assert!(matches!(parsed.verify_checksum(), Err(UnpackError::ChecksumMismatch { .. })));
        assert!(Container::parse(&container(0x00, None, b"xyz")).unwrap().verify_checksum().is_ok());
    }

    #[test]
    fn missing_password() {
        let input = container(0x40, None, b"xyz");
        assert!(matches!(unpack(&input), Err(UnpackError::PasswordRequired)));
    }

    #[test]
    fn degenerate_key() {
        let input = container(0x40, None, b"xyz");
        assert!(matches!(unpack_with_password(&input, b""), Err(UnpackError::DegenerateKey)));
    }

    #[test]
    fn password_ignored_when_not_encrypted() {
        assert_eq!(unpack_with_password(&container(0x00, None, b"abc"), b"pw").unwrap(), b"abc");
    }

    #[test]
    fn bad_header() {
        let err = unpack(&[0x02, 0x14, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, UnpackError::HeaderParseError(ParseError::WrongMagic(0x0214))));
    }

    #[test]
    fn capacity_override_truncates() {
        let input = container(0x80, Some(DICT), &COMPRESSED);
        let out = UnpackSettings::default().output_capacity(10).unpack(&input).unwrap();
        assert_eq!(out, &expanded()[..10]);
    }

    #[test]
    fn from_reader() {
        let input = container(0x80, Some(DICT), &COMPRESSED);
        let out = UnpackSettings::default().unpack_from(io::Cursor::new(input)).unwrap();
        assert_eq!(out, expanded());
    }

    #[test]
    fn into_io_error() {
        let e: io::Error = UnpackError::PasswordRequired.into();
        assert_eq!(e.kind(), ErrorKind::Other);
    }
}
