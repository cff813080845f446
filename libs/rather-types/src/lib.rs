#![no_std]

mod listing;
mod pool;
mod treasury;

pub use listing::*;
pub use pool::*;
pub use treasury::*;

/// Denominator for every percentage in the protocol
pub const PERCENT: i128 = 100;

/// Swap fee skimmed to the treasury, in percent of the base-asset leg
pub const FEE_RATE: i128 = 10;

/// Relist price after a sweep, in percent of the purchase price (10% premium)
pub const RELIST_PREMIUM_PERCENT: i128 = 110;

/// Default cooldown between two sweeps (seconds of ledger time)
pub const DEFAULT_COOLDOWN_PERIOD: u64 = 3600;

/// Default minimum floor price the treasury is willing to sweep
/// (0.001 of a 7-decimal base asset)
pub const DEFAULT_MIN_SWEEP_THRESHOLD: i128 = 10_000;

/// Maximum page size for paginated views.
/// Keeps a single call within Soroban's read entry limits (100 entries).
pub const MAX_PAGE_SIZE: u32 = 50;

/// Clamp a requested page to `[start, start + min(limit, MAX_PAGE_SIZE))`
/// intersected with `[0, count)`
pub fn page_bounds(start_index: u32, limit: u32, count: u32) -> (u32, u32) {
    let safe_limit = if limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    };
    let start = start_index.min(count);
    let end = start.saturating_add(safe_limit).min(count);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_caps_limit() {
        assert_eq!(page_bounds(0, 500, 1000), (0, 50));
        assert_eq!(page_bounds(10, 5, 1000), (10, 15));
    }

    #[test]
    fn test_page_bounds_past_end() {
        assert_eq!(page_bounds(8, 10, 10), (8, 10));
        assert_eq!(page_bounds(20, 10, 10), (10, 10));
        assert_eq!(page_bounds(0, 10, 0), (0, 0));
    }

    #[test]
    fn test_page_bounds_no_overflow() {
        assert_eq!(page_bounds(u32::MAX - 1, 50, u32::MAX), (u32::MAX - 1, u32::MAX));
    }

    #[test]
    fn test_relist_premium_is_ten_percent() {
        assert_eq!(RELIST_PREMIUM_PERCENT - PERCENT, 10);
    }
}
