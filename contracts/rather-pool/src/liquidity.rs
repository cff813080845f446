use crate::error::PoolError;
use crate::storage::{get_reserves, set_reserves};
use crate::swap::{load_config, move_asset};
use rather_math::quote_proportional;
use rather_types::PoolReserves;
use soroban_sdk::{log, Address, Env, Symbol};

/// Amounts actually taken from a deposit of (eth_amount, rather_amount).
///
/// An empty pool takes both as given and they define the price. Otherwise
/// the larger side is clamped to the current ratio (rounding down).
pub fn deposit_amounts(
    env: &Env,
    reserves: &PoolReserves,
    eth_amount: i128,
    rather_amount: i128,
) -> Result<(i128, i128), PoolError> {
    if eth_amount <= 0 || rather_amount <= 0 {
        return Err(PoolError::InvalidAmount);
    }
    if !reserves.has_liquidity() {
        return Ok((eth_amount, rather_amount));
    }

    let rather_optimal = quote_proportional(env, eth_amount, reserves.eth_reserve, reserves.rather_reserve)
        .ok_or(PoolError::ArithmeticError)?;

    let (eth_used, rather_used) = if rather_optimal <= rather_amount {
        (eth_amount, rather_optimal)
    } else {
        let eth_optimal =
            quote_proportional(env, rather_amount, reserves.rather_reserve, reserves.eth_reserve)
                .ok_or(PoolError::ArithmeticError)?;
        (eth_optimal, rather_amount)
    };

    if eth_used == 0 || rather_used == 0 {
        return Err(PoolError::InvalidAmount);
    }
    Ok((eth_used, rather_used))
}

/// Deposit both sides at the current ratio.
/// Reserves are written before the pulls; a failed pull reverts everything.
pub fn add_liquidity(
    env: &Env,
    provider: Address,
    eth_amount: i128,
    rather_amount: i128,
) -> Result<(i128, i128), PoolError> {
    let config = load_config(env)?;
    let reserves = get_reserves(env);

    let (eth_used, rather_used) = deposit_amounts(env, &reserves, eth_amount, rather_amount)?;
    if eth_used != eth_amount || rather_used != rather_amount {
        log!(env, "liquidity clamped", eth_used, rather_used);
    }

    let new_reserves = PoolReserves {
        eth_reserve: reserves
            .eth_reserve
            .checked_add(eth_used)
            .ok_or(PoolError::ArithmeticError)?,
        rather_reserve: reserves
            .rather_reserve
            .checked_add(rather_used)
            .ok_or(PoolError::ArithmeticError)?,
    };
    set_reserves(env, &new_reserves);

    let pool = env.current_contract_address();
    move_asset(env, &config.base_asset, &provider, &pool, eth_used)?;
    move_asset(env, &config.rather_token, &provider, &pool, rather_used)?;

    env.events().publish(
        (Symbol::new(env, "liquidity_added"), provider),
        (eth_used, rather_used),
    );

    Ok((eth_used, rather_used))
}
