//! Fixed-capacity circular byte buffer
//!
//! Storage is allocated once at construction. Overflow rejects the incoming
//! byte instead of evicting old data, so a slow reader always sees the oldest
//! input intact.

use alloc::boxed::Box;
use alloc::vec;

pub struct Ring {
    data: Box<[u8]>,
    /// Index of the oldest byte
    head: usize,
    /// Bytes currently stored
    len: usize,
}

impl Ring {
    /// Create a ring holding at most `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Ring {
            data: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity()
    }

    /// Space left for writing
    pub fn available_space(&self) -> usize {
        self.capacity() - self.len
    }

    /// Append one byte; false (and nothing stored) when full
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = (self.head + self.len) % self.capacity();
        self.data[tail] = byte;
        self.len += 1;
        true
    }

    /// Append all of `bytes` or none of them
    pub fn push_all(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.available_space() {
            return false;
        }
        for &byte in bytes {
            self.push(byte);
        }
        true
    }

    /// Remove the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(byte)
    }

    /// Oldest byte without removing it
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.data[self.head])
        }
    }

    /// Drain bytes into `out` while `pred` accepts them
    ///
    /// `pred` sees each byte before it is removed; the first rejected byte
    /// stays in the ring. Stops early when `out` is full. Returns the number
    /// of bytes written to `out`.
    pub fn pop_while<F>(&mut self, out: &mut [u8], mut pred: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let mut n = 0;
        while n < out.len() {
            match self.peek() {
                Some(byte) if pred(byte) => {
                    out[n] = byte;
                    self.pop();
                    n += 1;
                }
                _ => break,
            }
        }
        n
    }

    /// Discard everything
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut ring = Ring::with_capacity(4);
        assert!(ring.push(b'a'));
        assert!(ring.push(b'b'));
        assert_eq!(ring.pop(), Some(b'a'));
        assert_eq!(ring.pop(), Some(b'b'));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_overflow_rejects_newest() {
        let mut ring = Ring::with_capacity(8);
        for i in 0..8u8 {
            assert!(ring.push(i));
        }
        assert!(!ring.push(99));
        assert_eq!(ring.len(), 8);

        let mut out = [0u8; 8];
        assert_eq!(ring.pop_while(&mut out, |_| true), 8);
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_wraparound() {
        let mut ring = Ring::with_capacity(3);
        ring.push(1);
        ring.push(2);
        ring.pop();
        ring.push(3);
        ring.push(4);
        assert!(ring.is_full());
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
    }

    #[test]
    fn test_push_all_is_all_or_nothing() {
        let mut ring = Ring::with_capacity(4);
        assert!(ring.push_all(b"abc"));
        assert!(!ring.push_all(b"de"));
        assert_eq!(ring.len(), 3);
        assert!(ring.push_all(b"d"));
        assert!(ring.is_full());
    }

    #[test]
    fn test_pop_while_stops_at_rejected_byte() {
        let mut ring = Ring::with_capacity(16);
        ring.push_all(b"ab\ncd");
        let mut out = [0u8; 16];
        let n = ring.pop_while(&mut out, |b| b != b'\n');
        assert_eq!(&out[..n], b"ab");
        assert_eq!(ring.peek(), Some(b'\n'));
        assert_eq!(ring.len(), 3);
    }
}
