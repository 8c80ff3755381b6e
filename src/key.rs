//! Fixed-width unsigned keys and the bit-field extraction primitive.
//!
//! Bits are numbered from the least-significant end (`0`) while the trie
//! consumes them from the most-significant end. `pos` in [`extract`] is the
//! index of the highest bit of the field being read.

use std::fmt;

/// Trait for unsigned integer keys stored in an [`LcTrie`](crate::LcTrie).
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. All bit arithmetic is done on
/// the key widened to `u64`, so `BITS` is the only thing that differs between
/// widths.
pub trait TrieKey: Copy + Ord + fmt::Debug {
    /// Key width in bits (`KEY_BITS`).
    const BITS: u32;

    /// Zero-extend the key to 64 bits.
    fn to_u64(self) -> u64;

    /// Number of leading bits `self` and `other` have in common, in
    /// `0..=Self::BITS`.
    #[inline(always)]
    fn common_prefix_len(self, other: Self) -> u32 {
        let diff = self.to_u64() ^ other.to_u64();
        // The widened value has `64 - BITS` zero bits on top.
        (diff.leading_zeros() - (64 - Self::BITS)).min(Self::BITS)
    }
}

macro_rules! impl_trie_key {
    ($($t:ty),*) => {
        $(
            impl TrieKey for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_trie_key!(u8, u16, u32, u64);

/// Largest branching width a node can encode.
pub const MAX_BRANCH: u32 = 31;

/// Read the `branch`-bit field of `key` whose most-significant bit is `pos`.
///
/// Expects `1 <= branch <= 31` and `pos >= branch - 1`. Anything else is a
/// bug in the caller and panics.
#[inline(always)]
pub fn extract(pos: u32, branch: u32, key: u64) -> u32 {
    assert!(
        (1..=MAX_BRANCH).contains(&branch) && pos >= branch - 1 && pos < 64,
        "extract contract violated: pos={pos} branch={branch}"
    );
    ((key >> (pos - (branch - 1))) & ((1u64 << branch) - 1)) as u32
}

/// Read the `width`-bit field that starts after the `shift` most-significant
/// bits of a `K::BITS`-wide key.
#[inline(always)]
pub(crate) fn field_after<K: TrieKey>(key: K, shift: u32, width: u32) -> u32 {
    extract(K::BITS - 1 - shift, width, key.to_u64())
}
