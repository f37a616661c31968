//! Reject reused passwords with a Bloom filter
//!
//! Run with: cargo run --example password_check

use flowsketch::membership::{check_uniqueness, BloomFilter};

fn main() {
    log_init::init();

    let passwords = [
        Some("password123"),
        Some("123456"),
        Some("helloWorld"),
        Some("123456"),
        Some("password123"),
        Some(""),
        None,
        Some("   "),
        Some("newPass"),
    ];

    let mut bloom = BloomFilter::new(1000, 0.01);
    let verdicts = check_uniqueness(&mut bloom, passwords);

    for (password, unique) in passwords.iter().zip(verdicts) {
        let shown = match password {
            Some(p) => format!("'{}'", p),
            None => "<missing>".to_owned(),
        };
        let verdict = if unique {
            "unique"
        } else {
            "already used or invalid"
        };
        println!("{} -> {}", shown, verdict);
    }
}
