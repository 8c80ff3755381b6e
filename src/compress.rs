//! Path and level compression decisions for a sorted key range.
//!
//! Both calculators work on `entries[first..first + nkeys]`, a range whose keys
//! already agree on their `pre` most-significant bits.

use smallvec::SmallVec;

use crate::builder::MAX_NODES;
use crate::dedup::KeyEntry;
use crate::error::{BuildError, Result};
use crate::key::{field_after, TrieKey, MAX_BRANCH};
use crate::node::Node;

/// Number of leading bits, after the first `pre`, shared by every key in the
/// range.
///
/// The range is sorted, so any bit on which its first and last keys agree is
/// shared by every key between them.
pub fn compute_skip<K: TrieKey>(
    entries: &[KeyEntry<K>],
    first: usize,
    nkeys: usize,
    pre: u32,
) -> u32 {
    debug_assert!(nkeys >= 1);
    debug_assert!(pre <= K::BITS);
    let last = first + nkeys - 1;
    let common = entries[first].key.common_prefix_len(entries[last].key);
    debug_assert!(common >= pre, "range does not share its {pre}-bit prefix");
    common
        .saturating_sub(pre)
        .min(K::BITS - pre)
        .min(Node::MAX_SKIP)
}

/// A range split into `2^branch` contiguous children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub branch: u32,
    first: usize,
    end: usize,
    /// Interior boundaries: child `j` starts at `bounds[j - 1]`.
    bounds: SmallVec<[usize; 15]>,
}

impl Partition {
    /// Number of children (`2^branch`).
    #[inline]
    pub fn children(&self) -> usize {
        1 << self.branch
    }

    /// The `2^branch - 1` interior boundaries.
    pub fn bounds(&self) -> &[usize] {
        &self.bounds
    }

    /// Half-open entry range of child `j`.
    #[inline]
    pub fn child(&self, j: usize) -> (usize, usize) {
        let lo = if j == 0 { self.first } else { self.bounds[j - 1] };
        let hi = if j + 1 == self.children() { self.end } else { self.bounds[j] };
        (lo, hi)
    }

    /// Number of children holding no keys.
    pub fn empty_children(&self) -> usize {
        (0..self.children())
            .filter(|&j| {
                let (lo, hi) = self.child(j);
                lo == hi
            })
            .count()
    }
}

/// Boundaries splitting the range on the `width`-bit field at `shift`.
fn split<K: TrieKey>(
    entries: &[KeyEntry<K>],
    first: usize,
    nkeys: usize,
    shift: u32,
    width: u32,
) -> SmallVec<[usize; 15]> {
    let range = &entries[first..first + nkeys];
    let mut bounds = SmallVec::with_capacity((1 << width) - 1);
    let mut lo = 0;
    for j in 1..(1u32 << width) {
        // Fields are non-decreasing across a sorted range that shares the
        // `shift`-bit prefix, so each search can resume at the previous bound.
        lo += range[lo..].partition_point(|e| field_after(e.key, shift, width) < j);
        bounds.push(first + lo);
    }
    bounds
}

fn non_empty_children(bounds: &[usize], first: usize, end: usize) -> usize {
    let mut prev = first;
    let mut count = 0;
    for &b in bounds.iter().chain(std::iter::once(&end)) {
        if b > prev {
            count += 1;
        }
        prev = b;
    }
    count
}

/// Largest branching width whose children meet `fill_factor`.
///
/// The width is bounded by the bits left after `pre + skip`, by
/// `floor(log2(nkeys))` and by [`MAX_BRANCH`]. With `fill_factor == 1.0` every
/// child of the returned partition is non-empty. Widths are tried in
/// increasing order and the search stops at the first one that fails.
pub fn compute_branch<K: TrieKey>(
    entries: &[KeyEntry<K>],
    first: usize,
    nkeys: usize,
    pre: u32,
    skip: u32,
    fill_factor: f64,
) -> Partition {
    debug_assert!(nkeys >= 2);
    let shift = pre + skip;
    let log2 = usize::BITS - 1 - nkeys.leading_zeros();
    let limit = (K::BITS - shift).min(log2).min(MAX_BRANCH);
    debug_assert!(limit >= 1, "range of {nkeys} keys has no bits left to branch on");

    let end = first + nkeys;
    let mut branch = 1;
    let mut bounds = split(entries, first, nkeys, shift, 1);

    while branch < limit {
        let wider = split(entries, first, nkeys, shift, branch + 1);
        let required = fill_factor * (1u64 << (branch + 1)) as f64;
        if (non_empty_children(&wider, first, end) as f64) < required {
            break;
        }
        branch += 1;
        bounds = wider;
    }

    Partition {
        branch,
        first,
        end,
        bounds,
    }
}

/// Partition the range on exactly `branch` bits at `pre + skip`, whether or not
/// the children are empty.
///
/// Fails with [`BuildError::TooManyNodes`] when `2^branch` children could not
/// fit in the node array, before any splitting is done.
pub(crate) fn fixed_branch<K: TrieKey>(
    entries: &[KeyEntry<K>],
    first: usize,
    nkeys: usize,
    pre: u32,
    skip: u32,
    branch: u32,
) -> Result<Partition> {
    let shift = pre + skip;
    let branch = branch.min(K::BITS - shift).min(MAX_BRANCH).max(1);
    if (1usize << branch) > MAX_NODES {
        return Err(BuildError::TooManyNodes { limit: MAX_NODES });
    }
    Ok(Partition {
        branch,
        first,
        end: first + nkeys,
        bounds: split(entries, first, nkeys, shift, branch),
    })
}
