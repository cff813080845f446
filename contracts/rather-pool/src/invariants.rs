// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Properties of the pool that must hold after every call. The swap and
// liquidity paths check the ones they can break before committing state.
//
// 1. PRODUCT INVARIANT
//    - eth_reserve * rather_reserve never decreases across a swap
//
// 2. RESERVE INVARIANTS
//    - Reserves are never negative
//    - A swap never empties a reserve
//
// 3. CONSERVATION
//    - Reserves equal the balances the pool actually holds
//
// ============================================================================

use crate::error::PoolError;
use rather_types::PoolReserves;
use soroban_sdk::Env;

// ============================================================================
// PRODUCT INVARIANT
// ============================================================================

/// Property:
///   eth_after * rather_after >= eth_before * rather_before
///
/// Holds because outputs round down and the fee leaves the curve.
pub fn product_non_decreasing(env: &Env, before: &PoolReserves, after: &PoolReserves) -> bool {
    rather_math::product_non_decreasing(env, before, after)
}

// ============================================================================
// RESERVE INVARIANTS
// ============================================================================

pub fn reserves_non_negative(reserves: &PoolReserves) -> bool {
    reserves.eth_reserve >= 0 && reserves.rather_reserve >= 0
}

/// Property:
///   amount_out < reserve
pub fn output_within_reserve(amount_out: i128, reserve: i128) -> bool {
    amount_out >= 0 && amount_out < reserve
}

// ============================================================================
// CONSERVATION
// ============================================================================

/// Property:
///   eth_reserve == base_asset.balance(pool) && rather_reserve == token.balance(pool)
pub fn reserves_match_balances(
    reserves: &PoolReserves,
    eth_balance: i128,
    rather_balance: i128,
) -> bool {
    reserves.eth_reserve == eth_balance && reserves.rather_reserve == rather_balance
}

// ============================================================================
// COMPOSITE CHECKS
// ============================================================================

/// Run before a swap commits its new reserves
pub fn check_swap(env: &Env, before: &PoolReserves, after: &PoolReserves) -> Result<(), PoolError> {
    if !reserves_non_negative(after) || !after.has_liquidity() {
        return Err(PoolError::InvariantViolation);
    }
    if !product_non_decreasing(env, before, after) {
        return Err(PoolError::InvariantViolation);
    }
    Ok(())
}
