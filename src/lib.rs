//! # lc-trie
//!
//! A static Level-Compressed trie (LC-trie) over fixed-width integer keys.
//!
//! Based on "IP-address lookup using LC-tries" (IEEE JSAC 1999, Nilsson and
//! Karlsson).
//!
//! The trie is built once from a set of `(key, value)` pairs and is immutable
//! afterwards. Two compressions keep it shallow and small:
//!
//! - **Path compression**: a node skips every leading bit its whole subtree
//!   agrees on.
//! - **Level compression**: a node branches on several bits at once when the
//!   keys below it are dense enough to fill the children.
//!
//! Nodes are packed into 32 bits each (`branch:5 | skip:7 | next:20`), keys
//! reference their value through an 8-bit offset into a deduplicated value
//! table, and lookups are exact-match only.
//!
//! ## Example
//!
//! ```rust
//! use lc_trie::LcTrie;
//!
//! let trie: LcTrie<u32, usize> = LcTrie::build(vec![
//!     (0x00b7_4a03, 1),
//!     (0x00c0_0300, 3),
//!     (0xc025_4a00, 2),
//!     (0xc033_4100, 3),
//! ])
//! .unwrap();
//!
//! assert_eq!(trie.lookup(0x00b7_4a03), Some(&1));
//! assert_eq!(trie.lookup(0xc033_4100), Some(&3));
//! assert_eq!(trie.lookup(0x1234_5678), None);
//! assert_eq!(trie.value_count(), 3);
//! ```

#![deny(unsafe_code)]

pub mod builder;
pub mod compress;
pub mod config;
pub mod dedup;
pub mod error;
pub mod key;
pub mod node;

pub use config::BuildConfig;
pub use error::BuildError;
pub use key::TrieKey;

use tracing::{debug, debug_span};

use builder::Builder;
use dedup::KeyEntry;
use key::extract;
use node::Node;

// =============================================================================
// Statistics
// =============================================================================

/// Shape and size of a built trie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrieStats {
    /// Number of keys stored
    pub keys: usize,
    /// Number of distinct values
    pub values: usize,
    /// Total node slots
    pub nodes: usize,
    /// Slots holding internal nodes
    pub internal_nodes: usize,
    /// Slots holding a key's own leaf
    pub leaves: usize,
    /// Slots filling an empty child (only with a sparse fill factor or a
    /// fixed root branch)
    pub empty_leaves: usize,
    /// Deepest leaf, counted in internal nodes from the root
    pub max_depth: usize,
    /// Mean leaf depth over all keys
    pub avg_depth: f64,
    /// Heap bytes held by the trie
    pub bytes: usize,
}

// =============================================================================
// LcTrie
// =============================================================================

/// A static level-compressed trie mapping `K` keys to at most 256 distinct `V`
/// values.
pub struct LcTrie<K = u32, V = usize> {
    /// Deduplicated value table.
    values: Vec<V>,
    /// Keys sorted ascending, each with its offset into `values`.
    entries: Vec<KeyEntry<K>>,
    /// Node array; the root is slot 0.
    nodes: Vec<Node>,
}

impl<K: TrieKey, V: PartialEq> LcTrie<K, V> {
    /// Build a trie with the default configuration.
    pub fn build<I>(pairs: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::build_with_config(pairs, &BuildConfig::default())
    }

    /// Build a trie with the given configuration.
    ///
    /// The input need not be sorted. A key supplied twice with equal values is
    /// stored once; with different values the build fails.
    pub fn build_with_config<I>(pairs: I, config: &BuildConfig) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let _span = debug_span!(
            "LcTrie::build",
            key_bits = K::BITS,
            fill_factor = config.fill_factor
        )
        .entered();
        config.validate()?;

        let (entries, values) = match dedup::dedup(pairs) {
            Ok(interned) => interned,
            Err(BuildError::EmptyInput) if config.allow_empty => {
                debug!("empty input, returning always-miss trie");
                return Ok(Self::empty());
            }
            Err(e) => return Err(e),
        };
        debug!(keys = entries.len(), values = values.len(), "interned input");

        let nodes = Builder::new(&entries, config).build()?;
        let trie = Self {
            values,
            entries,
            nodes,
        };
        debug!(
            nodes = trie.nodes.len(),
            bytes = trie.memory_usage(),
            "built trie"
        );
        Ok(trie)
    }
}

impl<K: TrieKey, V> LcTrie<K, V> {
    /// A trie holding no keys; every lookup misses.
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            entries: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Slot of the leaf `key` descends to, or `None` for an empty trie.
    #[inline]
    fn leaf_slot(&self, key: K) -> Option<usize> {
        let mut node = *self.nodes.first()?;
        let bits = key.to_u64();
        let mut slot = 0usize;
        // Bits not yet consumed; the next field's top bit is `remaining - 1`.
        let mut remaining = K::BITS;
        while !node.is_leaf() {
            remaining -= node.skip();
            let branch = node.branch();
            let child = extract(remaining - 1, branch, bits);
            remaining -= branch;
            slot = node.next() as usize + child as usize;
            node = self.nodes[slot];
        }
        Some(slot)
    }

    /// Get the value for `key`.
    #[inline]
    pub fn lookup(&self, key: K) -> Option<&V> {
        let leaf = self.nodes[self.leaf_slot(key)?];
        let entry = self.entries[leaf.next() as usize];
        if entry.key == key {
            Some(&self.values[entry.value as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn contains_key(&self, key: K) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct values.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// The deduplicated value table, in first-seen order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of node slots.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The packed node array; the root is slot 0.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterate `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            values: &self.values,
            entries: self.entries.iter(),
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.values.capacity() * std::mem::size_of::<V>()
            + self.entries.capacity() * std::mem::size_of::<KeyEntry<K>>()
            + self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    /// Walk the node array and summarise its shape.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats {
            keys: self.len(),
            values: self.value_count(),
            nodes: self.nodes.len(),
            bytes: self.memory_usage(),
            ..TrieStats::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let mut depth_sum = 0usize;
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some((slot, depth)) = stack.pop() {
            let node = self.nodes[slot];
            if node.is_leaf() {
                let key = self.entries[node.next() as usize].key;
                if self.leaf_slot(key) == Some(slot) {
                    stats.leaves += 1;
                    stats.max_depth = stats.max_depth.max(depth);
                    depth_sum += depth;
                } else {
                    stats.empty_leaves += 1;
                }
                continue;
            }
            stats.internal_nodes += 1;
            let base = node.next() as usize;
            for child in base..base + (1usize << node.branch()) {
                stack.push((child, depth + 1));
            }
        }
        if stats.leaves > 0 {
            stats.avg_depth = depth_sum as f64 / stats.leaves as f64;
        }
        stats
    }
}

impl<K: TrieKey, V> Default for LcTrie<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: Clone, V: Clone> Clone for LcTrie<K, V> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            entries: self.entries.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<K: TrieKey, V: std::fmt::Debug> std::fmt::Debug for LcTrie<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: TrieKey, V> IntoIterator for &'a LcTrie<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, K, V> {
    values: &'a [V],
    entries: std::slice::Iter<'a, KeyEntry<K>>,
}

impl<'a, K: TrieKey, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        Some((entry.key, &self.values[entry.value as usize]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K: TrieKey, V> ExactSizeIterator for Iter<'_, K, V> {}


#[cfg(test)]
mod proptests;
