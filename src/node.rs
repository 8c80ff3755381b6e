//! Packed trie node.

use std::fmt;

/// One trie node packed into 32 bits.
///
/// Layout (as an integer, most-significant first):
/// - Bits 27..=31: `branch` (0 = leaf, 1..=31 = internal)
/// - Bits 20..=26: `skip` (path-compressed bits, 0..=127)
/// - Bits 0..=19: `next` (leaf: entry index, internal: first child slot)
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Node(u32);

impl Node {
    pub const BRANCH_BITS: u32 = 5;
    pub const SKIP_BITS: u32 = 7;
    pub const NEXT_BITS: u32 = 20;

    const NEXT_SHIFT: u32 = 0;
    const SKIP_SHIFT: u32 = Self::NEXT_BITS;
    const BRANCH_SHIFT: u32 = Self::NEXT_BITS + Self::SKIP_BITS;

    pub const MAX_BRANCH: u32 = (1 << Self::BRANCH_BITS) - 1;
    pub const MAX_SKIP: u32 = (1 << Self::SKIP_BITS) - 1;
    pub const MAX_NEXT: u32 = (1 << Self::NEXT_BITS) - 1;

    /// Placeholder written into reserved slots before they are filled.
    pub(crate) const VACANT: Node = Node(0);

    #[inline]
    pub fn leaf(entry: u32) -> Self {
        debug_assert!(entry <= Self::MAX_NEXT);
        Self(entry << Self::NEXT_SHIFT)
    }

    #[inline]
    pub fn internal(branch: u32, skip: u32, next: u32) -> Self {
        debug_assert!((1..=Self::MAX_BRANCH).contains(&branch));
        debug_assert!(skip <= Self::MAX_SKIP);
        debug_assert!(next <= Self::MAX_NEXT);
        Self(
            (branch << Self::BRANCH_SHIFT)
                | (skip << Self::SKIP_SHIFT)
                | (next << Self::NEXT_SHIFT),
        )
    }

    #[inline]
    pub fn branch(self) -> u32 {
        (self.0 >> Self::BRANCH_SHIFT) & Self::MAX_BRANCH
    }

    #[inline]
    pub fn skip(self) -> u32 {
        (self.0 >> Self::SKIP_SHIFT) & Self::MAX_SKIP
    }

    #[inline]
    pub fn next(self) -> u32 {
        (self.0 >> Self::NEXT_SHIFT) & Self::MAX_NEXT
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        self.branch() == 0
    }

    /// Raw packed word.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "Leaf(entry={})", self.next())
        } else {
            write!(
                f,
                "Internal(branch={}, skip={}, next={})",
                self.branch(),
                self.skip(),
                self.next()
            )
        }
    }
}
