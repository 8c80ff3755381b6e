//! Build-time tuning knobs.

use crate::error::{BuildError, Result};
use crate::key::MAX_BRANCH;

/// Configuration for trie construction.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Minimum share of non-empty children required to widen a node's
    /// branching, in `(0, 1]`. `1.0` is strict full-fill: a node only
    /// branches on `b` bits if all `2^b` children are non-empty.
    pub fill_factor: f64,
    /// Branch the root on exactly this many bits (clamped to the bits left
    /// after the root skip) instead of computing the width.
    pub root_branch: Option<u8>,
    /// Return an always-miss trie for empty input instead of
    /// [`BuildError::EmptyInput`].
    pub allow_empty: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            fill_factor: 1.0,
            root_branch: None,
            allow_empty: false,
        }
    }
}

impl BuildConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.fill_factor > 0.0 && self.fill_factor <= 1.0) {
            return Err(BuildError::InvalidConfig("fill_factor must be in (0, 1]"));
        }
        if let Some(b) = self.root_branch {
            if b == 0 || u32::from(b) > MAX_BRANCH {
                return Err(BuildError::InvalidConfig("root_branch must be in 1..=31"));
            }
        }
        Ok(())
    }
}
