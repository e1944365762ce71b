/// Target total for basket allocations, in percent
pub const TOTAL_ALLOCATION: f64 = 100.0;

/// Tolerance for the allocation sum check, in percentage points
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

/// Target total for signal source weights
pub const TOTAL_SOURCE_WEIGHT: f64 = 1.0;

/// Tolerance for the source weight sum check
pub const SOURCE_WEIGHT_TOLERANCE: f64 = 1e-3;

/// Notional investment assumed per basket for performance tracking, in USD
pub const BASE_INVESTMENT: f64 = 1000.0;

/// How long a parsed stock list stays fresh, in seconds
pub const STOCK_LIST_CACHE_SECS: u64 = 10 * 60;
