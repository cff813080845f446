use crate::error::TreasuryError;
use crate::storage::{get_state, set_state};
use crate::{load_config, try_call};
use rather_math::apply_relist_premium;
use rather_types::{ProceedsRoute, SweepConfig, SweepOutcome, TreasuryState};
use soroban_sdk::{log, Address, Env, IntoVal, Symbol};

/// Decide whether a floor listing can be swept right now.
///
/// Checked in order: something is listed, the floor clears the minimum
/// threshold, the cooldown has elapsed, operational funds cover the floor.
pub fn sweep_outcome(sweep: &SweepConfig, state: &TreasuryState, floor_price: i128, now: u64) -> SweepOutcome {
    if floor_price <= 0 {
        return SweepOutcome::NoListings;
    }
    if floor_price < sweep.min_sweep_threshold {
        return SweepOutcome::BelowThreshold;
    }
    if now < state.last_sweep_time.saturating_add(sweep.cooldown_period) {
        return SweepOutcome::CoolingDown;
    }
    if state.operational_balance < floor_price {
        return SweepOutcome::InsufficientBalance;
    }
    SweepOutcome::Swept
}

/// Buy the floor NFT with operational funds and relist it at a premium.
///
/// Bookkeeping is committed before the marketplace is called. The
/// marketplace moves no payment for a treasury purchase, so the proceeds
/// are booked here against the configured route.
pub fn check_and_sweep(env: &Env) -> Result<SweepOutcome, TreasuryError> {
    let config = load_config(env)?;
    let marketplace = config.marketplace.clone().ok_or(TreasuryError::NotConfigured)?;

    let mut state = get_state(env);
    let (floor_price, floor_token_id) = marketplace_floor(env, &marketplace)?;
    let now = env.ledger().timestamp();

    let outcome = sweep_outcome(&config.sweep, &state, floor_price, now);
    if outcome != SweepOutcome::Swept {
        log!(env, "sweep skipped", outcome, floor_price, state.operational_balance);
        return Ok(outcome);
    }

    let relist_price = apply_relist_premium(floor_price).ok_or(TreasuryError::ArithmeticError)?;

    state
        .debit(ProceedsRoute::Operational, floor_price)
        .ok_or(TreasuryError::InsufficientTreasuryBalance)?;
    state
        .credit(config.proceeds_route, floor_price)
        .ok_or(TreasuryError::ArithmeticError)?;
    state.last_sweep_time = now;
    set_state(env, &state);

    let treasury = env.current_contract_address();
    marketplace_buy(env, &marketplace, &treasury, floor_token_id, floor_price)?;
    nft_approve(env, &config.nft, &treasury, &marketplace, floor_token_id)?;
    marketplace_list(env, &marketplace, &treasury, floor_token_id, relist_price)?;

    env.events().publish(
        (Symbol::new(env, "swept"), floor_token_id),
        (floor_price, relist_price),
    );

    Ok(SweepOutcome::Swept)
}

fn marketplace_floor(env: &Env, marketplace: &Address) -> Result<(i128, u32), TreasuryError> {
    try_call(env, marketplace, "get_floor_price", ().into_val(env)).ok_or(TreasuryError::SweepFailed)
}

fn marketplace_buy(
    env: &Env,
    marketplace: &Address,
    buyer: &Address,
    token_id: u32,
    price: i128,
) -> Result<(), TreasuryError> {
    try_call(
        env,
        marketplace,
        "buy_nft",
        (buyer.clone(), token_id, price).into_val(env),
    )
    .ok_or(TreasuryError::SweepFailed)
}

fn marketplace_list(
    env: &Env,
    marketplace: &Address,
    seller: &Address,
    token_id: u32,
    price: i128,
) -> Result<(), TreasuryError> {
    try_call(
        env,
        marketplace,
        "list_nft",
        (seller.clone(), token_id, price).into_val(env),
    )
    .ok_or(TreasuryError::SweepFailed)
}

fn nft_approve(
    env: &Env,
    nft: &Address,
    owner: &Address,
    to: &Address,
    token_id: u32,
) -> Result<(), TreasuryError> {
    try_call(
        env,
        nft,
        "approve",
        (owner.clone(), to.clone(), token_id).into_val(env),
    )
    .ok_or(TreasuryError::SweepFailed)
}
