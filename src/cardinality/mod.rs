//! Cardinality (distinct count) estimation algorithms
//!
//! This module provides implementations of sketches for estimating the number
//! of distinct elements in a data stream.
//!
//! # Algorithms
//!
//! - [`HyperLogLog`]: The classic HLL algorithm with small and large range
//!   corrections
//!
//! # Example
//!
//! ```
//! use flowsketch::cardinality::HyperLogLog;
//!
//! let mut hll = HyperLogLog::default(); // precision 14, ~0.8% error
//!
//! for i in 0..10000 {
//!     hll.insert(&i.to_string());
//! }
//!
//! let estimate = hll.estimate();
//! println!("estimated distinct count: {}", estimate);
//! ```

mod hyperloglog;

pub use hyperloglog::{
    Estimate, HyperLogLog, Regime, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION,
};

use crate::math;

/// Compute the required precision for a target error rate
///
/// HLL error is approximately 1.04 / sqrt(2^p)
pub fn precision_for_error(target_error: f64) -> u8 {
    // m = (1.04 / error)^2, p = log2(m)
    let m = math::powi(1.04 / target_error, 2);
    let p = math::ceil(math::log2(m)) as u8;
    p.clamp(MIN_PRECISION, MAX_PRECISION)
}

/// Compute the memory usage for a given precision
pub fn memory_for_precision(precision: u8) -> usize {
    1usize << precision
}

/// Compute the expected error for a given precision
pub fn error_for_precision(precision: u8) -> f64 {
    let m = (1usize << precision) as f64;
    1.04 / math::sqrt(m)
}
