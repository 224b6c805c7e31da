// src/hardforks.rs

/// London hard fork (EIP-1559 activation), 2021-08-05. The burn starts here.
pub const LONDON_TIMESTAMP: i64 = 1628166822;

/// Paris hard fork, the proof-of-stake merge, 2022-09-15.
pub const MERGE_TIMESTAMP: i64 = 1663224162;

pub const MERGE_BLOCK_NUMBER: u64 = 15537393;

/// Terminal total difficulty in tera-units (the chain value divided by 1e12).
pub const TOTAL_TERMINAL_DIFFICULTY: f64 = 58_750_000_000.0;
