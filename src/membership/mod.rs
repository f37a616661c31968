//! Membership testing data structures
//!
//! This module provides probabilistic data structures for testing set membership.
//! These structures trade a small probability of false positives for significant
//! space savings compared to exact set representations.
//!
//! # Example
//!
//! ```
//! use flowsketch::membership::{check_uniqueness, BloomFilter};
//!
//! let mut bloom = BloomFilter::new(1000, 0.01);
//! let verdicts = check_uniqueness(&mut bloom, ["hunter2", "letmein", "hunter2", "   "]);
//! assert_eq!(verdicts, vec![true, true, false, false]);
//! ```

mod bloom;

pub use bloom::{optimal_params, BloomFilter};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Run each candidate through `filter`, reporting whether it was unique
///
/// Candidates may be plain `&str` or `Option<&str>`, where `None` stands for a
/// missing value. For each candidate, in order:
///
/// - `None`, empty, or whitespace-only: `false`, the filter is left untouched
/// - already in the filter: `false`, not inserted again
/// - otherwise: inserted, `true`
///
/// A `false` for a valid candidate may be a false positive of the filter; a
/// `true` is always correct.
pub fn check_uniqueness<'a, I, S>(filter: &mut BloomFilter, candidates: I) -> Vec<bool>
where
    I: IntoIterator<Item = S>,
    S: Into<Option<&'a str>>,
{
    candidates
        .into_iter()
        .map(|candidate| match candidate.into() {
            Some(value) if !value.trim().is_empty() => filter.check_and_insert(value),
            _ => false,
        })
        .collect()
}
