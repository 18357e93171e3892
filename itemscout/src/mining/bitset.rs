//! Heap-allocated bitmask used for both item masks and transaction masks.
//!
//! Bits are stored in `u64` words. Padding bits beyond the logical length stay
//! zero, so `count_ones` and `ones` never see phantom bits.

/// Largest bit index count a mask may address. Bit indices are `u32`.
pub const MAX_BITS: usize = u32::MAX as usize;

const WORD_BITS: usize = 64;

/// Fixed-length bitmask sized once per mining run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bitmask {
    words: Vec<u64>,
    len: usize,
}

impl Bitmask {
    /// Creates an all-zero mask addressing `len` bits.
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Creates a mask of `len` bits with exactly `bit` set.
    pub fn single(len: usize, bit: usize) -> Self {
        let mut mask = Self::with_len(len);
        mask.set(bit);
        mask
    }

    /// Number of addressable bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Sets `bit`.
    ///
    /// # Panics
    ///
    /// Panics if `bit >= self.len()`.
    #[inline]
    pub fn set(&mut self, bit: usize) {
        assert!(bit < self.len, "bit {} out of range for mask of {}", bit, self.len);
        self.words[bit / WORD_BITS] |= 1u64 << (bit % WORD_BITS);
    }

    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        bit < self.len && self.words[bit / WORD_BITS] & (1u64 << (bit % WORD_BITS)) != 0
    }

    /// Population count.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bitwise AND. Both masks must have the same length.
    #[inline]
    pub fn intersect(&self, other: &Bitmask) -> Bitmask {
        debug_assert_eq!(self.len, other.len, "intersecting masks of different widths");
        Bitmask {
            words: self
                .words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| a & b)
                .collect(),
            len: self.len,
        }
    }

    /// Bitwise OR. Both masks must have the same length.
    #[inline]
    pub fn union(&self, other: &Bitmask) -> Bitmask {
        debug_assert_eq!(self.len, other.len, "joining masks of different widths");
        Bitmask {
            words: self
                .words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| a | b)
                .collect(),
            len: self.len,
        }
    }

    /// Iterates set bit indices in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Lowest set bit, if any.
    pub fn first_one(&self) -> Option<usize> {
        self.ones().next()
    }

    /// Highest set bit, if any.
    pub fn last_one(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &w)| w != 0)
            .map(|(i, &w)| i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize))
    }
}

/// Number of transactions covered by `mask`.
#[inline]
pub fn support_of(mask: &Bitmask) -> usize {
    mask.count_ones()
}

/// Iterator over the set bits of a [`Bitmask`].
pub struct Ones<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}
