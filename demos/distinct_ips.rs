//! Count distinct client addresses in a JSON-lines access log
//!
//! Compares an exact `HashSet` count against a default HyperLogLog.
//!
//! Run with: cargo run --example distinct_ips --features full -- [access.log]

use flowsketch::cardinality::HyperLogLog;
use flowsketch::stream::field_values;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::time::Instant;

const FIELD: &str = "remote_addr";

fn count_exact(path: &str) -> io::Result<(usize, f64)> {
    let start = Instant::now();
    let mut seen = HashSet::new();
    for addr in field_values(BufReader::new(File::open(path)?), FIELD) {
        seen.insert(addr?);
    }
    Ok((seen.len(), start.elapsed().as_secs_f64()))
}

fn count_hll(path: &str) -> io::Result<(u64, f64)> {
    let start = Instant::now();
    let mut hll = HyperLogLog::default();
    let mut values = field_values(BufReader::new(File::open(path)?), FIELD);
    for addr in values.by_ref() {
        hll.insert(&addr?);
    }
    log::info!(
        "read {} lines, skipped {}",
        values.lines_read(),
        values.skipped()
    );
    Ok((hll.estimate(), start.elapsed().as_secs_f64()))
}

fn main() -> io::Result<()> {
    log_init::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "access.log".to_owned());
    println!("Processing {}\n", path);

    let (exact, exact_secs) = count_exact(&path)?;
    let (approx, approx_secs) = count_hll(&path)?;

    println!("{:<24}{:>16}{:>16}", "", "Exact", "HyperLogLog");
    println!("{:<24}{:>16}{:>16}", "Distinct addresses", exact, approx);
    println!(
        "{:<24}{:>16.5}{:>16.5}",
        "Elapsed (s)", exact_secs, approx_secs
    );
    Ok(())
}
