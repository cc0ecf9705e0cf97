//! Growable bit vector
//!
//! A plain `Vec<u64>` of words with positional get/set. Reading a bit past the
//! end yields `false`, and setting one grows the vector to fit, so callers never
//! size it up front. Bits are only ever set; there is no need to shrink.
//!
//! # Binary format
//!
//! ```text
//! word_count: nat (see crate::codec)
//! words:      word_count × i64, big-endian, bit i lives in word i / 64
//! ```

use std::fmt;
use std::io::{self, Read, Write};

use crate::codec;

const WORD_BITS: usize = 64;

// Upper bound on words reserved before a corrupt length prefix is noticed.
const PREALLOC_WORDS_LIMIT: usize = 1 << 16;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    words: Vec<u64>,
}

impl BitVector {
    /// Create an empty bit vector.
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        match self.words.get(i / WORD_BITS) {
            Some(word) => word & (1u64 << (i % WORD_BITS)) != 0,
            None => false,
        }
    }

    #[inline]
    pub fn set(&mut self, i: usize) {
        let idx = i / WORD_BITS;
        if idx >= self.words.len() {
            self.words.resize(idx + 1, 0);
        }
        self.words[idx] |= 1u64 << (i % WORD_BITS);
    }

    /// Number of 64-bit words backing the vector
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    /// Positions of all set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(wi * WORD_BITS + bit)
            })
        })
    }

    /// Number of bytes [`write`](Self::write) produces.
    pub fn encoded_len(&self) -> usize {
        codec::nat_len(self.word_len()) + self.word_len() * 8
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        codec::write_nat(w, self.word_len())?;
        for &word in &self.words {
            codec::write_i64(w, word as i64)?;
        }
        Ok(())
    }

    /// Decode a bit vector written by [`write`](Self::write).
    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let len = codec::read_nat(r)?;
        let mut words = Vec::with_capacity(len.min(PREALLOC_WORDS_LIMIT));
        for _ in 0..len {
            words.push(codec::read_i64(r)? as u64);
        }
        Ok(Self { words })
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_get_past_end_is_false() {
        let bv = BitVector::new();
        assert!(!bv.get(0));
        assert!(!bv.get(10_000));
        assert_eq!(bv.word_len(), 0);
    }

    #[test]
    fn test_set_grows() {
        let mut bv = BitVector::new();
        bv.set(3);
        assert_eq!(bv.word_len(), 1);
        bv.set(64);
        assert_eq!(bv.word_len(), 2);
        bv.set(200);
        assert_eq!(bv.word_len(), 4);
        assert!(bv.get(3) && bv.get(64) && bv.get(200));
        assert!(!bv.get(4) && !bv.get(63) && !bv.get(199));
        assert_eq!(bv.iter_ones().collect::<Vec<_>>(), vec![3, 64, 200]);
    }

    #[test]
    fn test_high_bit_survives_encoding() {
        let mut bv = BitVector::new();
        bv.set(63);
        bv.set(0);
        let mut buf = Vec::new();
        bv.write(&mut buf).unwrap();
        assert_eq!(buf.len(), bv.encoded_len());
        // nat(1) then one big-endian word with bits 63 and 0 set
        assert_eq!(buf, vec![0, 1, 0x80, 0, 0, 0, 0, 0, 0, 1]);

        let back = BitVector::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, bv);
    }

    #[test]
    fn test_empty_encoding() {
        let mut buf = Vec::new();
        BitVector::new().write(&mut buf).unwrap();
        assert_eq!(buf, vec![0, 0]);
    }

    #[test]
    fn test_truncated_read_fails() {
        let err = BitVector::read(&mut Cursor::new(vec![0, 2, 0, 0, 0, 0])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_debug_lists_set_bits() {
        let mut bv = BitVector::new();
        bv.set(1);
        bv.set(70);
        assert_eq!(format!("{:?}", bv), "{1, 70}");
    }
}
