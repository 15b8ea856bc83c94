//! Decoder for dictpack containers.
//!
//! A container is a short header followed by a payload that may be checksummed,
//! encrypted with an LFSR stream cipher, and compressed with a dictionary run-length
//! code, in any combination. [`unpack`] undoes all of that in one call. The individual
//! codecs live in [`raw`] for callers who want to drive them by hand.

#![forbid(unsafe_code)]

pub mod raw;
pub mod container;

pub use container::{
    unpack, unpack_with_password, Container, Flags, Header, ParseError, UnpackError,
    UnpackSettings,
};
