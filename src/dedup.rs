//! Value deduplication and the sorted key array.
//!
//! Every key refers to its value through an 8-bit offset into a shared value
//! table, so a trie holds at most [`MAX_VALUES`] distinct values no matter how
//! many keys it has.

use crate::error::{BuildError, Result};
use crate::key::TrieKey;
use crate::node::Node;

/// Maximum number of distinct values (addressable by a `u8` offset).
pub const MAX_VALUES: usize = 1 << u8::BITS;

/// Maximum number of keys (addressable by a leaf's `next` field).
pub const MAX_KEYS: usize = Node::MAX_NEXT as usize + 1;

/// A key and the offset of its value in the value table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEntry<K> {
    pub key: K,
    pub value: u8,
}

/// Intern `pairs` into a sorted key array and a deduplicated value table.
///
/// Values are compared by equality and stored in first-seen order. Entries are
/// sorted ascending by key; a key repeated with the same value collapses to one
/// entry, a key repeated with a different value is an error.
pub fn dedup<K, V, I>(pairs: I) -> Result<(Vec<KeyEntry<K>>, Vec<V>)>
where
    K: TrieKey,
    V: PartialEq,
    I: IntoIterator<Item = (K, V)>,
{
    let pairs = pairs.into_iter();
    let mut entries: Vec<KeyEntry<K>> = Vec::with_capacity(pairs.size_hint().0);
    let mut values: Vec<V> = Vec::new();

    for (key, val) in pairs {
        let idx = match values.iter().position(|v| *v == val) {
            Some(idx) => idx,
            None => {
                if values.len() == MAX_VALUES {
                    return Err(BuildError::CapacityExceeded { limit: MAX_VALUES });
                }
                values.push(val);
                values.len() - 1
            }
        };
        entries.push(KeyEntry {
            key,
            value: idx as u8,
        });
    }

    if entries.is_empty() {
        return Err(BuildError::EmptyInput);
    }

    // Stable, so the surviving duplicate is the first one supplied.
    entries.sort_by_key(|e| e.key);

    let mut conflict = None;
    entries.dedup_by(|cur, prev| {
        if cur.key != prev.key {
            return false;
        }
        if cur.value != prev.value && conflict.is_none() {
            conflict = Some(cur.key);
        }
        true
    });
    if let Some(key) = conflict {
        return Err(BuildError::DuplicateKey { key: key.to_u64() });
    }

    if entries.len() > MAX_KEYS {
        return Err(BuildError::TooManyKeys {
            count: entries.len(),
            limit: MAX_KEYS,
        });
    }

    entries.shrink_to_fit();
    values.shrink_to_fit();
    Ok((entries, values))
}
