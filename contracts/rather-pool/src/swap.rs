use crate::error::PoolError;
use crate::invariants::{check_swap, output_within_reserve};
use crate::storage::{get_config, get_reserves, set_reserves};
use rather_math::{quote_eth_for_rather, quote_rather_for_eth};
use rather_types::{PoolConfig, PoolReserves, SwapQuote};
use soroban_sdk::{token, Address, Env, IntoVal, Symbol};

/// Quote a base asset -> token swap. Used by both the view and the swap.
pub fn quote_eth_in(env: &Env, reserves: &PoolReserves, eth_in: i128) -> Result<SwapQuote, PoolError> {
    if eth_in <= 0 {
        return Err(PoolError::NoEthSent);
    }
    if !reserves.has_liquidity() {
        return Err(PoolError::NoLiquidity);
    }

    let quote = quote_eth_for_rather(env, reserves, eth_in).ok_or(PoolError::ArithmeticError)?;

    if !output_within_reserve(quote.amount_out, reserves.rather_reserve) {
        return Err(PoolError::InsufficientLiquidity);
    }
    if quote.amount_out == 0 {
        return Err(PoolError::ZeroOutput);
    }
    Ok(quote)
}

/// Quote a token -> base asset swap. `amount_out` is net of the fee.
pub fn quote_rather_in(
    env: &Env,
    reserves: &PoolReserves,
    rather_in: i128,
) -> Result<SwapQuote, PoolError> {
    if rather_in <= 0 {
        return Err(PoolError::NoRatherSent);
    }
    if !reserves.has_liquidity() {
        return Err(PoolError::NoLiquidity);
    }

    let quote = quote_rather_for_eth(env, reserves, rather_in).ok_or(PoolError::ArithmeticError)?;

    let gross = quote
        .amount_out
        .checked_add(quote.fee)
        .ok_or(PoolError::ArithmeticError)?;
    if !output_within_reserve(gross, reserves.eth_reserve) {
        return Err(PoolError::InsufficientLiquidity);
    }
    if quote.amount_out == 0 {
        return Err(PoolError::ZeroOutput);
    }
    Ok(quote)
}

/// Swap base asset for tokens.
///
/// The user pays `eth_in` in total: `eth_in - fee` enters the reserves and
/// `fee` goes to the treasury. Reserves are written before any transfer.
pub fn swap_eth_for_rather(env: &Env, user: Address, eth_in: i128) -> Result<i128, PoolError> {
    let reserves = get_reserves(env);
    let quote = quote_eth_in(env, &reserves, eth_in)?;

    let config = get_config(env).ok_or(PoolError::NotInitialized)?;
    let treasury = config.treasury.clone().ok_or(PoolError::NotConfigured)?;

    check_swap(env, &reserves, &quote.reserves_after)?;
    set_reserves(env, &quote.reserves_after);

    let pool = env.current_contract_address();
    let net_in = quote.amount_in - quote.fee;

    move_asset(env, &config.base_asset, &user, &pool, net_in)?;

    // A treasury-originated swap keeps its own fee and books it itself
    if quote.fee > 0 && user != treasury {
        move_asset(env, &config.base_asset, &user, &treasury, quote.fee)?;
        credit_treasury_fee(env, &treasury, quote.fee)?;
    }

    move_asset(env, &config.rather_token, &pool, &user, quote.amount_out)?;

    emit_swapped(env, &user, true, &quote);
    Ok(quote.amount_out)
}

/// Swap tokens for base asset. The fee is taken from the base-asset output.
pub fn swap_rather_for_eth(env: &Env, user: Address, rather_in: i128) -> Result<i128, PoolError> {
    let reserves = get_reserves(env);
    let quote = quote_rather_in(env, &reserves, rather_in)?;

    let config = get_config(env).ok_or(PoolError::NotInitialized)?;
    let treasury = config.treasury.clone().ok_or(PoolError::NotConfigured)?;

    check_swap(env, &reserves, &quote.reserves_after)?;
    set_reserves(env, &quote.reserves_after);

    let pool = env.current_contract_address();
    move_asset(env, &config.rather_token, &user, &pool, rather_in)?;
    move_asset(env, &config.base_asset, &pool, &user, quote.amount_out)?;

    if quote.fee > 0 {
        move_asset(env, &config.base_asset, &pool, &treasury, quote.fee)?;
        if user != treasury {
            credit_treasury_fee(env, &treasury, quote.fee)?;
        }
    }

    emit_swapped(env, &user, false, &quote);
    Ok(quote.amount_out)
}

pub fn load_config(env: &Env) -> Result<PoolConfig, PoolError> {
    get_config(env).ok_or(PoolError::NotInitialized)
}

/// Token transfer; a rejection (balance, auth) becomes `TransferFailed`
pub fn move_asset(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), PoolError> {
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(PoolError::TransferFailed),
    }
}

fn credit_treasury_fee(env: &Env, treasury: &Address, fee: i128) -> Result<(), PoolError> {
    let result = env.try_invoke_contract::<(), soroban_sdk::Error>(
        treasury,
        &Symbol::new(env, "credit_fee"),
        (env.current_contract_address(), fee).into_val(env),
    );
    match result {
        Ok(Ok(())) => Ok(()),
        _ => Err(PoolError::FeeCreditRejected),
    }
}

fn emit_swapped(env: &Env, user: &Address, is_eth_for_rather: bool, quote: &SwapQuote) {
    env.events().publish(
        (Symbol::new(env, "swapped"), user.clone()),
        (is_eth_for_rather, quote.amount_in, quote.amount_out, quote.fee),
    );
}
