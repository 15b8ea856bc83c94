use std::mem;

/// A write cursor over a fixed-size output buffer.
///
/// Every write checks the remaining capacity first, so the codecs built on top of this
/// can never run past the end of the buffer the caller handed them. Once the buffer is
/// full, further writes are refused and the codec is expected to stop.
pub struct BoundedOutput<'a> {
    remaining: &'a mut [u8],
    written: usize,
}

impl<'a> BoundedOutput<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        BoundedOutput { remaining: buf, written: 0 }
    }

    /// Append a single byte. Returns `false` (and writes nothing) if the buffer is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.remaining.is_empty() {
            return false;
        }
        let (head, tail) = mem::replace(&mut self.remaining, &mut []).split_at_mut(1);
        head[0] = byte;
        self.remaining = tail;
        self.written += 1;
        true
    }

    /// Append `byte` up to `count` times, stopping early when the buffer fills up.
    /// Returns how many copies were actually written.
    #[inline]
    pub fn fill(&mut self, byte: u8, count: usize) -> usize {
        let amt = count.min(self.remaining.len());
        let (head, tail) = mem::replace(&mut self.remaining, &mut []).split_at_mut(amt);
        for b in head.iter_mut() {
            *b = byte;
        }
        self.remaining = tail;
        self.written += amt;
        amt
    }

    pub fn is_full(&self) -> bool { self.remaining.is_empty() }
    pub fn written(&self) -> usize { self.written }
}
