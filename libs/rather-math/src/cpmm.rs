//! Constant-product pricing for the base-asset/token pair.
//!
//! All helpers return `None` instead of panicking so the pool can map the
//! failure to its own error codes.

use crate::full_math::{mul_div, wide_mul};
use rather_types::{PoolReserves, SwapQuote, FEE_RATE, PERCENT, RELIST_PREMIUM_PERCENT};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::Env;

/// Split a base-asset amount into (fee, remainder).
/// fee = amount * FEE_RATE / 100, rounded down.
pub fn split_fee(amount: i128) -> Option<(i128, i128)> {
    if amount < 0 {
        return None;
    }
    let fee = amount.fixed_mul_floor(FEE_RATE, PERCENT)?;
    Some((fee, amount - fee))
}

/// Output of the constant-product curve for an input that has already
/// had its fee removed:
///   amount_out = reserve_out * amount_in / (reserve_in + amount_in)
/// Rounds down, so the caller never receives more than the curve allows.
pub fn get_amount_out(
    env: &Env,
    amount_in: i128,
    reserve_in: i128,
    reserve_out: i128,
) -> Option<i128> {
    if amount_in <= 0 || reserve_in <= 0 || reserve_out <= 0 {
        return None;
    }
    let denominator = reserve_in.checked_add(amount_in)?;
    mul_div(env, reserve_out, amount_in, denominator)
}

/// Amount of side B matching `amount_a` at the current reserve ratio (rounds down)
pub fn quote_proportional(env: &Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Option<i128> {
    if reserve_a <= 0 || reserve_b <= 0 {
        return None;
    }
    mul_div(env, amount_a, reserve_b, reserve_a)
}

/// Relist price after a sweep: price * 110 / 100, rounded down
pub fn apply_relist_premium(price: i128) -> Option<i128> {
    if price <= 0 {
        return None;
    }
    price.fixed_mul_floor(RELIST_PREMIUM_PERCENT, PERCENT)
}

/// Quote base asset -> token. The fee comes off the input before it
/// touches the curve; only `amount_in - fee` enters the reserves.
///
/// Returns None when the curve can't be evaluated (empty reserves,
/// non-positive input, overflow). Callers check drain/zero output.
pub fn quote_eth_for_rather(env: &Env, reserves: &PoolReserves, eth_in: i128) -> Option<SwapQuote> {
    let (fee, net_in) = split_fee(eth_in)?;
    let amount_out = if net_in == 0 {
        0
    } else {
        get_amount_out(env, net_in, reserves.eth_reserve, reserves.rather_reserve)?
    };

    Some(SwapQuote {
        amount_in: eth_in,
        amount_out,
        fee,
        reserves_after: PoolReserves {
            eth_reserve: reserves.eth_reserve.checked_add(net_in)?,
            rather_reserve: reserves.rather_reserve.checked_sub(amount_out)?,
        },
    })
}

/// Quote token -> base asset. The curve pays out `gross`; the fee is
/// taken from that base-asset output, the caller gets `gross - fee`.
pub fn quote_rather_for_eth(env: &Env, reserves: &PoolReserves, rather_in: i128) -> Option<SwapQuote> {
    let gross = get_amount_out(env, rather_in, reserves.rather_reserve, reserves.eth_reserve)?;
    let (fee, net_out) = split_fee(gross)?;

    Some(SwapQuote {
        amount_in: rather_in,
        amount_out: net_out,
        fee,
        reserves_after: PoolReserves {
            eth_reserve: reserves.eth_reserve.checked_sub(gross)?,
            rather_reserve: reserves.rather_reserve.checked_add(rather_in)?,
        },
    })
}

/// k = eth_reserve * rather_reserve must never decrease across a swap
pub fn product_non_decreasing(env: &Env, before: &PoolReserves, after: &PoolReserves) -> bool {
    let k_before = wide_mul(env, before.eth_reserve, before.rather_reserve);
    let k_after = wide_mul(env, after.eth_reserve, after.rather_reserve);
    k_after >= k_before
}
