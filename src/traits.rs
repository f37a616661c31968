//! Core traits for streaming sketches
//!
//! Both sketches implement the base [`Sketch`] trait, with a specialized trait
//! per algorithm family ([`CardinalitySketch`], [`MembershipSketch`]).

use core::fmt::Debug;

/// Error returned when a sketch is constructed with invalid parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Expected item count must be positive
    ZeroExpectedItems,
    /// False positive rate must lie strictly between 0 and 1
    InvalidFalsePositiveRate(f64),
    /// Bit vector must hold at least one bit
    ZeroBits,
    /// At least one hash function is required
    ZeroHashes,
    /// Precision outside the supported range
    PrecisionOutOfRange {
        precision: u8,
        min: u8,
        max: u8,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroExpectedItems => write!(f, "expected_items must be positive"),
            ConfigError::InvalidFalsePositiveRate(p) => {
                write!(f, "false_positive_rate must be in (0, 1), got {}", p)
            }
            ConfigError::ZeroBits => write!(f, "num_bits must be positive"),
            ConfigError::ZeroHashes => write!(f, "num_hashes must be positive"),
            ConfigError::PrecisionOutOfRange { precision, min, max } => {
                write!(
                    f,
                    "precision must be between {} and {}, got {}",
                    min, max, precision
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Error bounds for a sketch estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBounds {
    /// Lower bound of the estimate
    pub lower: f64,
    /// Point estimate
    pub estimate: f64,
    /// Upper bound of the estimate
    pub upper: f64,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence: f64,
}

impl ErrorBounds {
    /// Create new error bounds
    pub fn new(lower: f64, estimate: f64, upper: f64, confidence: f64) -> Self {
        Self {
            lower,
            estimate,
            upper,
            confidence,
        }
    }

    /// Check if a value falls within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Relative width (width / estimate)
    pub fn relative_width(&self) -> f64 {
        if self.estimate == 0.0 {
            0.0
        } else {
            self.width() / self.estimate
        }
    }
}

/// Core trait for all streaming sketches
///
/// Sketches are accumulators: items go in, answers come out. There is no
/// removal and no reset.
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed (duplicates included)
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Cardinality (distinct count) estimation sketches
pub trait CardinalitySketch: Sketch {
    /// Estimate number of distinct items seen
    fn estimate(&self) -> u64;

    /// Get error bounds at given confidence level (0.0 to 1.0)
    fn error_bounds(&self, confidence: f64) -> ErrorBounds;

    /// Relative standard error (RSE) of the estimate
    ///
    /// RSE = standard_error / true_value ≈ 1.04 / sqrt(m) for HLL
    fn relative_error(&self) -> f64;

    /// Estimate with default 95% confidence bounds
    fn estimate_with_bounds(&self) -> ErrorBounds {
        self.error_bounds(0.95)
    }
}

/// Membership testing sketches (Bloom filters, etc.)
pub trait MembershipSketch: Sketch {
    /// Test if item might be in set
    ///
    /// - `true` means item might be present (possible false positive)
    /// - `false` means item is definitely not present
    fn contains(&self, item: &Self::Item) -> bool;

    /// Theoretical false positive rate given current state
    fn false_positive_rate(&self) -> f64;

    /// Number of items added
    fn len(&self) -> usize;
}
