//! Construction errors.

use thiserror::Error;

/// Error returned by [`LcTrie::build`](crate::LcTrie::build).
///
/// Construction aborts on the first error; no partial trie is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// No pairs were supplied and the config does not allow an empty trie.
    #[error("cannot build a trie from an empty input")]
    EmptyInput,

    /// More distinct values than an 8-bit value offset can address.
    #[error("more than {limit} distinct values")]
    CapacityExceeded { limit: usize },

    /// The same key was supplied with two different values.
    #[error("key {key:#x} mapped to conflicting values")]
    DuplicateKey { key: u64 },

    /// More keys than a leaf's `next` field can address.
    #[error("{count} keys exceeds the limit of {limit}")]
    TooManyKeys { count: usize, limit: usize },

    /// The node array outgrew the `next` field of an internal node.
    #[error("node array exceeds {limit} slots")]
    TooManyNodes { limit: usize },

    /// A [`BuildConfig`](crate::BuildConfig) field is out of range.
    #[error("invalid build config: {0}")]
    InvalidConfig(&'static str),
}

/// Result type for trie construction.
pub type Result<T> = std::result::Result<T, BuildError>;
