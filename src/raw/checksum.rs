//! The 16-bit additive checksum.
//!
//! The checksum is nothing more than the sum of all bytes, wrapped to 16 bits. It's the
//! integrity check stored in container headers, and it doubles as the (weak) password
//! to key derivation: `"ab"` and `"ba"` map to the same key, as does any other
//! permutation of the same bytes.

use std::hash::Hasher;

/// Streaming form of [`checksum`].
///
/// Because the sum is additive, feeding data in any number of chunks gives the same
/// result as checksumming the concatenation in one go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checksum16(u16);

impl Checksum16 {
    pub fn new() -> Self { Self::default() }

    pub fn value(&self) -> u16 { self.0 }
}

impl Hasher for Checksum16 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes.iter().fold(self.0, |sum, &b| sum.wrapping_add(b.into()));
    }

    fn finish(&self) -> u64 {
        self.0.into()
    }
}

/// Sum of every byte in `data`, modulo 65536.
pub fn checksum(data: &[u8]) -> u16 {
    let mut hasher = Checksum16::new();
    hasher.write(data);
    hasher.value()
}

/// Derive a cipher key from a password by checksumming its raw bytes.
pub fn derive_key(password: &[u8]) -> u16 {
    checksum(password)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn small_sum() {
        assert_eq!(checksum(&[0x01, 0x03, 0x04]), 0x0008);
    }

    #[test]
    fn empty() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn wraps_at_16_bits() {
        // 258 * 0xFF = 0x1_00FE
        assert_eq!(checksum(&[0xFF; 258]), 0x00FE);
        assert_eq!(checksum(&vec![0x01; 65536]), 0);
    }

    #[test]
    fn additive_over_concatenation() {
        let mut rng = StdRng::seed_from_u64(0x0213);
        for _ in 0..100 {
            let mut a = vec![0u8; rng.gen_range(0, 2000)];
            let mut b = vec![0u8; rng.gen_range(0, 2000)];
            rng.fill(&mut a[..]);
            rng.fill(&mut b[..]);

            let joined: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
            assert_eq!(checksum(&joined), checksum(&a).wrapping_add(checksum(&b)));

            let mut hasher = Checksum16::new();
            hasher.write(&a);
            hasher.write(&b);
            assert_eq!(hasher.value(), checksum(&joined));
            assert_eq!(hasher.finish(), u64::from(checksum(&joined)));
        }
    }

    #[test]
    fn key_derivation_collides_on_permutations() {
        assert_eq!(derive_key(b"ab"), derive_key(b"ba"));
        assert_eq!(derive_key(b"password"), 0x0373);
    }
}
