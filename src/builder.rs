//! Top-down construction of the node array.
//!
//! Every node is written into a slot reserved by its parent. An internal node
//! reserves a contiguous block of `2^branch` slots for its children before
//! recursing, so its `next` field is known when the node itself is written.
//! The root occupies slot 0.

use tracing::trace;

use crate::compress::{compute_branch, compute_skip, fixed_branch, Partition};
use crate::config::BuildConfig;
use crate::dedup::KeyEntry;
use crate::error::{BuildError, Result};
use crate::key::{TrieKey, MAX_BRANCH};
use crate::node::Node;

/// Maximum number of node slots (addressable by an internal node's `next`).
pub const MAX_NODES: usize = Node::MAX_NEXT as usize + 1;

pub(crate) struct Builder<'a, K> {
    entries: &'a [KeyEntry<K>],
    nodes: Vec<Node>,
    fill_factor: f64,
    root_branch: Option<u32>,
}

impl<'a, K: TrieKey> Builder<'a, K> {
    /// `entries` must be non-empty, sorted, and free of duplicate keys.
    pub(crate) fn new(entries: &'a [KeyEntry<K>], config: &BuildConfig) -> Self {
        Self {
            entries,
            // Roughly two slots per key under full-fill.
            nodes: Vec::with_capacity(entries.len().saturating_mul(2).min(MAX_NODES)),
            fill_factor: config.fill_factor,
            root_branch: config.root_branch.map(u32::from),
        }
    }

    pub(crate) fn build(mut self) -> Result<Vec<Node>> {
        debug_assert!(!self.entries.is_empty());
        let root = self.reserve(1)?;
        self.make_node(0, self.entries.len(), 0, root as usize)?;
        self.nodes.shrink_to_fit();
        Ok(self.nodes)
    }

    /// Append `n` vacant slots and return the index of the first.
    fn reserve(&mut self, n: usize) -> Result<u32> {
        let base = self.nodes.len();
        if base + n > MAX_NODES {
            return Err(BuildError::TooManyNodes { limit: MAX_NODES });
        }
        self.nodes.resize(base + n, Node::VACANT);
        Ok(base as u32)
    }

    fn partition(
        &self,
        first: usize,
        nkeys: usize,
        pre: u32,
        skip: u32,
        slot: usize,
    ) -> Result<Partition> {
        match self.root_branch {
            Some(width) if slot == 0 => {
                let width = width.min(K::BITS - pre - skip).min(MAX_BRANCH);
                // Check before splitting: a wide fixed root is 2^width searches.
                if self.nodes.len() + (1usize << width) > MAX_NODES {
                    return Err(BuildError::TooManyNodes { limit: MAX_NODES });
                }
                fixed_branch(self.entries, first, nkeys, pre, skip, width)
            }
            _ => Ok(compute_branch(
                self.entries,
                first,
                nkeys,
                pre,
                skip,
                self.fill_factor,
            )),
        }
    }

    /// Build the subtree over `entries[first..first + nkeys]` into `slot`.
    fn make_node(&mut self, first: usize, nkeys: usize, pre: u32, slot: usize) -> Result<()> {
        if nkeys == 1 {
            self.nodes[slot] = Node::leaf(first as u32);
            return Ok(());
        }

        let skip = compute_skip(self.entries, first, nkeys, pre);
        let partition = self.partition(first, nkeys, pre, skip, slot)?;
        let child_base = self.reserve(partition.children())?;
        self.nodes[slot] = Node::internal(partition.branch, skip, child_base);
        trace!(
            slot,
            first,
            nkeys,
            pre,
            skip,
            branch = partition.branch,
            child_base,
            "internal node"
        );

        let child_pre = pre + skip + partition.branch;
        let last = first + nkeys - 1;
        for j in 0..partition.children() {
            let (lo, hi) = partition.child(j);
            let child_slot = child_base as usize + j;
            if lo == hi {
                // No key has this prefix. Any entry works as long as lookups
                // still compare against it, so point at the nearest one.
                self.nodes[child_slot] = Node::leaf(lo.min(last) as u32);
            } else {
                self.make_node(lo, hi - lo, child_pre, child_slot)?;
            }
        }
        Ok(())
    }
}
