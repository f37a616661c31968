//! Bloom filter for probabilistic set membership
//!
//! A Bloom filter is a space-efficient probabilistic data structure that tests
//! whether an element is a member of a set. False positives are possible, but
//! false negatives are not.

use crate::math;
use crate::traits::{ConfigError, MembershipSketch, Sketch};
use core::f64::consts::LN_2;
use xxhash_rust::xxh3::xxh3_64_with_seed;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Seed of the first base hash
const SEED_H1: u64 = 0;
/// Seed of the second base hash, kept apart from the first for independence
const SEED_H2: u64 = 0x9e37_79b9_7f4a_7c15;

/// Bloom filter for set membership testing
///
/// Bits are stored one per bit in a byte vector of exactly `ceil(m / 8)` bytes.
/// The `k` bit positions of an item come from double hashing two seeded
/// xxh3 hashes: `(h1 + i * h2) mod m`.
///
/// # Example
///
/// ```
/// use flowsketch::membership::BloomFilter;
///
/// // Create filter for ~1000 items with 1% false positive rate
/// let mut bloom = BloomFilter::new(1000, 0.01);
///
/// bloom.insert("apple");
/// bloom.insert("banana");
///
/// assert!(bloom.contains("apple"));   // true - definitely inserted
/// assert!(bloom.contains("banana"));  // true - definitely inserted
/// assert!(!bloom.contains("cherry")); // probably false (might be false positive)
/// ```
///
/// # False Positive Rate
///
/// The actual false positive rate depends on the number of items inserted.
/// If you insert more items than the expected capacity, the false positive
/// rate will increase.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array, LSB first within each byte
    bits: Vec<u8>,
    /// Number of bits (m)
    num_bits: usize,
    /// Number of hash functions (k)
    num_hashes: usize,
    /// Number of items inserted
    count: u64,
}

impl BloomFilter {
    /// Create a new Bloom filter with expected capacity and false positive rate
    ///
    /// Sizing follows the closed-form optimum:
    ///
    /// - `m = ceil(-n * ln(p) / ln(2)^2)`
    /// - `k = round(m / n * ln(2))`, at least 1
    ///
    /// # Arguments
    ///
    /// * `expected_items` - Expected number of items to insert
    /// * `false_positive_rate` - Desired false positive rate (e.g., 0.01 for 1%)
    ///
    /// # Panics
    ///
    /// Panics if `expected_items` is 0 or `false_positive_rate` is not in (0, 1)
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        match Self::try_new(expected_items, false_positive_rate) {
            Ok(bloom) => bloom,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible version of [`BloomFilter::new`]
    pub fn try_new(expected_items: usize, false_positive_rate: f64) -> Result<Self, ConfigError> {
        let (num_bits, num_hashes) = optimal_params(expected_items, false_positive_rate)?;
        log::debug!(
            "bloom filter sized for n={} p={}: m={} bits, k={} hashes",
            expected_items,
            false_positive_rate,
            num_bits,
            num_hashes
        );
        Self::try_with_params(num_bits, num_hashes)
    }

    /// Create a Bloom filter with specific parameters
    ///
    /// # Arguments
    ///
    /// * `num_bits` - Number of bits in the filter
    /// * `num_hashes` - Number of hash functions
    ///
    /// # Panics
    ///
    /// Panics if either argument is 0
    pub fn with_params(num_bits: usize, num_hashes: usize) -> Self {
        match Self::try_with_params(num_bits, num_hashes) {
            Ok(bloom) => bloom,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible version of [`BloomFilter::with_params`]
    pub fn try_with_params(num_bits: usize, num_hashes: usize) -> Result<Self, ConfigError> {
        if num_bits == 0 {
            return Err(ConfigError::ZeroBits);
        }
        if num_hashes == 0 {
            return Err(ConfigError::ZeroHashes);
        }

        Ok(Self {
            bits: vec![0u8; num_bits.div_ceil(8)],
            num_bits,
            num_hashes,
            count: 0,
        })
    }

    /// Insert an item into the filter
    pub fn insert(&mut self, item: &str) {
        self.insert_bytes(item.as_bytes());
    }

    /// Insert raw bytes
    pub fn insert_bytes(&mut self, item: &[u8]) {
        self.count += 1;

        let (h1, h2) = base_hashes(item);
        for i in 0..self.num_hashes {
            let bit_idx = self.bit_index(h1, h2, i);
            self.bits[bit_idx / 8] |= 1u8 << (bit_idx % 8);
        }
    }

    /// Check if an item might be in the filter
    ///
    /// Returns `true` if the item might be in the set (possibly a false positive),
    /// or `false` if the item is definitely not in the set.
    pub fn contains(&self, item: &str) -> bool {
        self.contains_bytes(item.as_bytes())
    }

    /// Check raw bytes
    pub fn contains_bytes(&self, item: &[u8]) -> bool {
        let (h1, h2) = base_hashes(item);
        (0..self.num_hashes).all(|i| self.get_bit(self.bit_index(h1, h2, i)))
    }

    /// Insert `item` unless it is already present
    ///
    /// Returns `true` when the item was new and has been inserted, `false`
    /// when the filter already (possibly falsely) reported it present. A
    /// present item is not inserted again.
    pub fn check_and_insert(&mut self, item: &str) -> bool {
        if self.contains(item) {
            return false;
        }
        self.insert(item);
        true
    }

    /// Get the number of bits in the filter
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Get the number of hash functions
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Raw bit storage, `ceil(num_bits / 8)` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Get the number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Fraction of bits set to 1
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.num_bits as f64
    }

    /// Estimate the current false positive rate
    ///
    /// This is based on the actual fill ratio of the filter.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        math::powi(self.fill_ratio(), self.num_hashes as i32)
    }

    /// Theoretical false positive rate after `items` distinct insertions
    ///
    /// `(1 - e^(-k * n / m))^k`
    pub fn expected_false_positive_rate(&self, items: usize) -> f64 {
        let k = self.num_hashes as f64;
        let exponent = -k * items as f64 / self.num_bits as f64;
        math::powi(1.0 - math::exp(exponent), self.num_hashes as i32)
    }

    /// Estimate the number of items in the filter
    ///
    /// Uses the fill ratio to estimate cardinality.
    pub fn estimated_count(&self) -> f64 {
        let bits_set = self.bits_set() as f64;
        let m = self.num_bits as f64;
        let k = self.num_hashes as f64;

        if bits_set >= m {
            return f64::INFINITY;
        }

        // n ≈ -m/k * ln(1 - X/m) where X is bits set
        -(m / k) * math::ln(1.0 - bits_set / m)
    }

    /// Bit set by the `i`-th hash, `(h1 + i * h2) mod m`
    #[inline]
    fn bit_index(&self, h1: u64, h2: u64, i: usize) -> usize {
        let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
        (hash % self.num_bits as u64) as usize
    }

    #[inline]
    fn get_bit(&self, bit_idx: usize) -> bool {
        (self.bits[bit_idx / 8] >> (bit_idx % 8)) & 1 == 1
    }
}

/// Optimal `(m, k)` for `n` expected items at false positive rate `p`
pub fn optimal_params(
    expected_items: usize,
    false_positive_rate: f64,
) -> Result<(usize, usize), ConfigError> {
    if expected_items == 0 {
        return Err(ConfigError::ZeroExpectedItems);
    }
    // Negated form also rejects NaN
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(ConfigError::InvalidFalsePositiveRate(false_positive_rate));
    }

    let n = expected_items as f64;
    let num_bits = math::ceil(-n * math::ln(false_positive_rate) / (LN_2 * LN_2)) as usize;
    let num_hashes = (math::round(num_bits as f64 / n * LN_2) as usize).max(1);

    Ok((num_bits, num_hashes))
}

/// Two independent base hashes of `item`
#[inline]
fn base_hashes(item: &[u8]) -> (u64, u64) {
    (
        xxh3_64_with_seed(item, SEED_H1),
        xxh3_64_with_seed(item, SEED_H2),
    )
}

impl Sketch for BloomFilter {
    type Item = [u8];

    fn update(&mut self, item: &Self::Item) {
        self.insert_bytes(item);
    }

    fn size_bytes(&self) -> usize {
        self.bits.len() + core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl MembershipSketch for BloomFilter {
    fn contains(&self, item: &Self::Item) -> bool {
        self.contains_bytes(item)
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimated_false_positive_rate()
    }

    fn len(&self) -> usize {
        self.count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut bloom = BloomFilter::new(1000, 0.01);

        bloom.insert("apple");
        bloom.insert("banana");
        bloom.insert("cherry");

        assert!(bloom.contains("apple"));
        assert!(bloom.contains("banana"));
        assert!(bloom.contains("cherry"));
    }

    #[test]
    fn test_empty_contains_nothing() {
        let bloom = BloomFilter::new(100, 0.01);
        assert!(!bloom.contains("apple"));
        assert!(!bloom.contains(""));
        assert_eq!(bloom.bits_set(), 0);
        assert!(bloom.is_empty());
    }

    #[test]
    fn test_sizing_matches_closed_form() {
        let bloom = BloomFilter::new(1000, 0.01);

        let n = 1000.0f64;
        let m = (-n * 0.01f64.ln() / (LN_2 * LN_2)).ceil();
        let k = (m / n * LN_2).round().max(1.0);

        assert_eq!(bloom.num_bits(), m as usize);
        assert_eq!(bloom.num_hashes(), k as usize);
        assert_eq!(bloom.num_bits(), 9586);
        assert_eq!(bloom.num_hashes(), 7);
    }

    #[test]
    fn test_hash_count_at_least_one() {
        // p close to 1 gives m/n * ln2 < 0.5
        let (m, k) = optimal_params(1000, 0.9).unwrap();
        assert_eq!(m, 220);
        assert_eq!(k, 1);
    }

    #[test]
    fn test_storage_length() {
        for (n, p) in [(1, 0.5), (7, 0.1), (1000, 0.01), (12345, 0.001)] {
            let bloom = BloomFilter::new(n, p);
            assert_eq!(bloom.as_bytes().len(), bloom.num_bits().div_ceil(8));
            assert!(bloom.as_bytes().len() * 8 >= bloom.num_bits());
        }
    }

    #[test]
    fn test_with_params_exact_bits() {
        let bloom = BloomFilter::with_params(13, 3);
        assert_eq!(bloom.num_bits(), 13);
        assert_eq!(bloom.num_hashes(), 3);
        assert_eq!(bloom.as_bytes().len(), 2);
    }

    #[test]
    fn test_insert_sets_at_most_k_bits() {
        let mut bloom = BloomFilter::new(1000, 0.01);
        bloom.insert("apple");
        assert!(bloom.bits_set() >= 1);
        assert!(bloom.bits_set() <= bloom.num_hashes());
    }

    #[test]
    fn test_bit_index_double_hashing() {
        let bloom = BloomFilter::with_params(100, 4);
        assert_eq!(bloom.bit_index(7, 10, 0), 7);
        assert_eq!(bloom.bit_index(7, 10, 1), 17);
        assert_eq!(bloom.bit_index(7, 10, 3), 37);
        assert_eq!(bloom.bit_index(95, 10, 1), 5);
        // wrapping arithmetic stays in range
        assert!(bloom.bit_index(u64::MAX, u64::MAX, 3) < 100);
    }

    #[test]
    fn test_invalid_params() {
        assert_eq!(
            BloomFilter::try_new(0, 0.01).unwrap_err(),
            ConfigError::ZeroExpectedItems
        );
        assert!(matches!(
            BloomFilter::try_new(10, 0.0),
            Err(ConfigError::InvalidFalsePositiveRate(_))
        ));
        assert!(matches!(
            BloomFilter::try_new(10, 1.0),
            Err(ConfigError::InvalidFalsePositiveRate(_))
        ));
        assert!(matches!(
            BloomFilter::try_new(10, f64::NAN),
            Err(ConfigError::InvalidFalsePositiveRate(_))
        ));
        assert_eq!(
            BloomFilter::try_with_params(0, 3).unwrap_err(),
            ConfigError::ZeroBits
        );
        assert_eq!(
            BloomFilter::try_with_params(64, 0).unwrap_err(),
            ConfigError::ZeroHashes
        );
    }

    #[test]
    #[should_panic(expected = "expected_items must be positive")]
    fn test_new_panics_on_zero_items() {
        BloomFilter::new(0, 0.01);
    }

    #[test]
    fn test_no_false_negatives() {
        let mut bloom = BloomFilter::new(1000, 0.01);

        // Insert many items
        for i in 0..1000 {
            let item = format!("item_{}", i);
            bloom.insert(&item);
        }

        // All inserted items must be found (no false negatives)
        for i in 0..1000 {
            let item = format!("item_{}", i);
            assert!(bloom.contains(&item), "Missing item_{}", i);
        }
    }

    #[test]
    fn test_false_positive_rate() {
        let mut bloom = BloomFilter::new(1000, 0.01);

        // Insert 1000 items
        for i in 0..1000 {
            let item = format!("item_{}", i);
            bloom.insert(&item);
        }

        // Test 10000 items that were NOT inserted
        let mut false_positives = 0;
        for i in 0..10000 {
            let item = format!("other_{}", i);
            if bloom.contains(&item) {
                false_positives += 1;
            }
        }

        // False positive rate should be roughly 1% (allow some margin)
        let fp_rate = false_positives as f64 / 10000.0;
        assert!(fp_rate < 0.03, "FP rate too high: {}", fp_rate);
    }

    #[test]
    fn test_check_and_insert() {
        let mut bloom = BloomFilter::new(100, 0.01);

        assert!(bloom.check_and_insert("apple"));
        assert!(!bloom.check_and_insert("apple"));
        assert!(bloom.contains("apple"));
        // Second call did not insert again
        assert_eq!(bloom.count(), 1);
    }

    #[test]
    fn test_expected_false_positive_rate() {
        let bloom = BloomFilter::new(10_000, 0.01);
        let at_design_load = bloom.expected_false_positive_rate(10_000);
        assert!(
            (at_design_load - 0.01).abs() < 0.001,
            "expected ~0.01, got {}",
            at_design_load
        );
        assert_eq!(bloom.expected_false_positive_rate(0), 0.0);
        assert!(bloom.expected_false_positive_rate(20_000) > at_design_load);
    }

    #[test]
    fn test_estimated_count() {
        let mut bloom = BloomFilter::new(1000, 0.01);

        for i in 0..500 {
            let item = format!("item_{}", i);
            bloom.insert(&item);
        }

        let estimated = bloom.estimated_count();
        // Should be roughly 500, allow 20% error
        assert!(
            estimated > 400.0 && estimated < 600.0,
            "Estimate: {}",
            estimated
        );
    }

    #[test]
    fn test_saturated_filter() {
        let mut bloom = BloomFilter::with_params(8, 1);
        for i in 0..1000 {
            bloom.insert(&format!("item_{}", i));
        }
        assert_eq!(bloom.bits_set(), 8);
        assert_eq!(bloom.fill_ratio(), 1.0);
        assert_eq!(bloom.estimated_count(), f64::INFINITY);
        assert_eq!(bloom.estimated_false_positive_rate(), 1.0);
    }

    #[test]
    fn test_sketch_trait() {
        let mut bloom = BloomFilter::new(100, 0.01);
        bloom.update(b"apple");

        assert!(MembershipSketch::contains(&bloom, b"apple".as_slice()));
        assert!(bloom.contains("apple"));
        assert_eq!(bloom.len(), 1);
        assert!(bloom.size_bytes() >= bloom.as_bytes().len());
    }
}
