//! # Flowsketch
//!
//! Probabilistic membership and distinct counting for string streams.
//!
//! Flowsketch provides two independent accumulators that answer questions about
//! large or unbounded streams without keeping every value:
//!
//! - **Membership**: a Bloom filter with a tunable false positive rate and no
//!   false negatives, e.g. to reject reused passwords
//! - **Cardinality**: HyperLogLog for estimating the number of distinct values,
//!   e.g. distinct client addresses in an access log
//!
//! ## Quick Start
//!
//! ```rust
//! use flowsketch::prelude::*;
//!
//! // Count distinct users
//! let mut hll = HyperLogLog::new(14);
//! for user_id in ["alice", "bob", "charlie", "alice"] {
//!     hll.insert(user_id);
//! }
//! println!("Distinct users: ~{}", hll.estimate());
//!
//! // Reject reused passwords
//! let mut seen = BloomFilter::new(1000, 0.01);
//! let verdicts = check_uniqueness(&mut seen, ["hunter2", "", "hunter2"]);
//! assert_eq!(verdicts, vec![true, false, false]);
//! ```
//!
//! Both sketches are single-owner accumulators: `insert` takes `&mut self`,
//! queries take `&self`. Share one across threads behind your own lock.
//!
//! ## Feature Flags
//!
//! Algorithm families:
//! - `cardinality` (default): HyperLogLog for distinct counting
//! - `membership` (default): Bloom filter and the uniqueness check
//! - `stream`: JSON-lines field extraction for feeding sketches from logs
//! - `full`: Enable everything
//!
//! Platform features:
//! - `std` (default): Standard library support; without it the crate is
//!   `no_std` + `alloc` and uses `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

#[cfg(any(feature = "cardinality", feature = "membership"))]
pub(crate) mod math;

#[cfg(feature = "cardinality")]
#[cfg_attr(docsrs, doc(cfg(feature = "cardinality")))]
pub mod cardinality;

#[cfg(feature = "membership")]
#[cfg_attr(docsrs, doc(cfg(feature = "membership")))]
pub mod membership;

#[cfg(feature = "stream")]
#[cfg_attr(docsrs, doc(cfg(feature = "stream")))]
pub mod stream;

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "cardinality")]
    pub use crate::cardinality::HyperLogLog;

    #[cfg(feature = "membership")]
    pub use crate::membership::{check_uniqueness, BloomFilter};
}

#[cfg(feature = "cardinality")]
pub use cardinality::HyperLogLog;

#[cfg(feature = "membership")]
pub use membership::BloomFilter;
