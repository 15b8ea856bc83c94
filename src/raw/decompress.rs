use tracing::trace;

use super::sink::BoundedOutput;
use super::{Dictionary, ESCAPE};

/// Decode an escape-coded payload into `output` and return how many bytes were written.
///
/// The format is byte oriented:
/// * any byte other than `0x07` is a literal
/// * `07 00` is a literal `0x07`
/// * `07 XY` (XY != 0) repeats `dictionary[Y]` X times
///
/// Decoding stops silently once `output` is full, so the returned length may cover only
/// part of the input. Callers that care should size the buffer with
/// [`max_decompressed_len`](super::max_decompressed_len).
///
/// An escape byte at the very end of the input has no instruction byte. It is decoded
/// as a literal `0x07`. No encoder is known to produce this, so don't count on it
/// surviving a round trip.
pub fn decompress_into(input: &[u8], output: &mut [u8], dictionary: &Dictionary) -> usize {
    let mut sink = BoundedOutput::new(output);
    let mut bytes = input.iter().copied();

    while let Some(byte) = bytes.next() {
        if sink.is_full() {
            trace!("output full, dropping the rest of the input");
            break;
        }

        if byte != ESCAPE {
            sink.push(byte);
            continue;
        }

        match bytes.next() {
            None | Some(0) => {
                sink.push(ESCAPE);
            }
            Some(instruction) => {
                let count = usize::from(instruction >> 4);
                let value = dictionary.get(instruction & 0x0F);
                sink.fill(value, count);
            }
        }
    }

    sink.written()
}

/// Decompress all of `input` into a fresh vector holding at most `capacity` bytes.
pub fn decompress(input: &[u8], dictionary: &Dictionary, capacity: usize) -> Vec<u8> {
    let mut vec = vec![0u8; capacity];
    let len = decompress_into(input, &mut vec, dictionary);
    vec.truncate(len);
    vec
}
