//! LFSR stream cipher.
//!
//! The keystream comes from a 16-bit Fibonacci LFSR with taps at bits 0, 11, 13 and 14.
//! That polynomial is maximal-length: any nonzero seed cycles through all 65535 nonzero
//! states before repeating. Zero maps to itself and yields an all-zero keystream.

use tracing::trace;

use super::sink::BoundedOutput;

/// Advance an LFSR state by one step.
#[inline]
pub fn step(state: u16) -> u16 {
    let feedback = (state ^ (state >> 11) ^ (state >> 13) ^ (state >> 14)) & 1;
    (state >> 1) | (feedback << 15)
}

/// The keystream register.
///
/// Each state provides two keystream bytes, low byte first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lfsr(u16);

impl Lfsr {
    /// Seed the register from a key. The key is stepped once before any keystream
    /// is produced, so the key itself never appears in the keystream.
    pub fn new(key: u16) -> Self {
        Lfsr(step(key))
    }

    /// Wrap a raw register value without the initial step.
    pub fn from_state(state: u16) -> Self {
        Lfsr(state)
    }

    pub fn state(&self) -> u16 { self.0 }

    /// The two keystream bytes of the current state, then advance.
    #[inline]
    pub fn next_pair(&mut self) -> [u8; 2] {
        let pair = self.0.to_le_bytes();
        self.0 = step(self.0);
        pair
    }

    /// XOR the keystream over `input` and write the result into `output`.
    ///
    /// Stops when either side runs out and returns the number of bytes written. A
    /// trailing odd byte takes the low half of the current state and the register is
    /// left unstepped.
    pub fn apply(&mut self, input: &[u8], output: &mut [u8]) -> usize {
        let mut sink = BoundedOutput::new(output);
        let mut chunks = input.chunks_exact(2);
        for chunk in &mut chunks {
            let [lo, hi] = self.0.to_le_bytes();
            if !sink.push(chunk[0] ^ lo) || !sink.push(chunk[1] ^ hi) {
                return sink.written();
            }
            self.0 = step(self.0);
        }
        if let [last] = *chunks.remainder() {
            sink.push(last ^ self.0.to_le_bytes()[0]);
        }
        sink.written()
    }

    /// In-place version of [`apply`](Lfsr::apply).
    pub fn apply_in_place(&mut self, data: &mut [u8]) {
        let mut chunks = data.chunks_exact_mut(2);
        for chunk in &mut chunks {
            let [lo, hi] = self.next_pair();
            chunk[0] ^= lo;
            chunk[1] ^= hi;
        }
        if let [last] = chunks.into_remainder() {
            *last ^= self.0.to_le_bytes()[0];
        }
    }
}

/// Iterating yields successive register states, starting with the current one.
impl Iterator for Lfsr {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let current = self.0;
        self.0 = step(current);
        Some(current)
    }
}

/// Decrypt `input` into `output` with `key` and return the number of bytes written.
///
/// This is a plain XOR stream, so running it over its own output with the same key
/// gives back the original input.
pub fn decrypt(input: &[u8], output: &mut [u8], key: u16) -> usize {
    trace!("decrypting {} bytes into a {} byte buffer", input.len(), output.len());
    Lfsr::new(key).apply(input, output)
}

/// Decrypt `data` in place with `key`.
pub fn decrypt_in_place(data: &mut [u8], key: u16) {
    trace!("decrypting {} bytes in place", data.len());
    Lfsr::new(key).apply_in_place(data)
}
