#![no_std]

mod burn;
mod error;
mod storage;
mod sweep;

pub use error::TreasuryError;

use rather_types::{ProceedsRoute, SweepConfig, SweepOutcome, TreasuryConfig, TreasuryStats};
use soroban_sdk::{
    contract, contractimpl, panic_with_error, token, Address, Env, Symbol, TryFromVal, Val, Vec,
};
use storage::{get_config, get_state, has_config, set_config, set_state};

/// Protocol treasury.
///
/// Holds the base asset split into an operational partition (funds floor
/// sweeps) and a burn partition (funds buy-and-burn). Swap fees land in
/// operational; marketplace proceeds follow the configured route.
#[contract]
pub struct RatherTreasury;

#[contractimpl]
impl RatherTreasury {
    pub fn initialize(
        env: Env,
        admin: Address,
        base_asset: Address,
        rather_token: Address,
        nft: Address,
        sweep: SweepConfig,
    ) {
        if has_config(&env) {
            panic_with_error!(&env, TreasuryError::AlreadyInitialized);
        }
        if sweep.min_sweep_threshold < 0 {
            panic_with_error!(&env, TreasuryError::InvalidAmount);
        }
        admin.require_auth();

        set_config(
            &env,
            &TreasuryConfig {
                admin,
                base_asset,
                rather_token,
                nft,
                marketplace: None,
                pool: None,
                proceeds_route: ProceedsRoute::Burn,
                sweep,
            },
        );
        set_state(&env, &Default::default());
    }

    // === Admin ===

    pub fn set_marketplace(env: Env, marketplace: Address) -> Result<(), TreasuryError> {
        let mut config = load_admin_config(&env)?;
        config.marketplace = Some(marketplace);
        set_config(&env, &config);
        Ok(())
    }

    pub fn set_liquidity_pool(env: Env, pool: Address) -> Result<(), TreasuryError> {
        let mut config = load_admin_config(&env)?;
        config.pool = Some(pool);
        set_config(&env, &config);
        Ok(())
    }

    pub fn set_sweep_config(env: Env, sweep: SweepConfig) -> Result<(), TreasuryError> {
        let mut config = load_admin_config(&env)?;
        if sweep.min_sweep_threshold < 0 {
            return Err(TreasuryError::InvalidAmount);
        }
        config.sweep = sweep;
        set_config(&env, &config);
        Ok(())
    }

    /// Choose which partition marketplace proceeds are credited to
    pub fn set_proceeds_route(env: Env, route: ProceedsRoute) -> Result<(), TreasuryError> {
        let mut config = load_admin_config(&env)?;
        config.proceeds_route = route;
        set_config(&env, &config);
        Ok(())
    }

    // === Credits ===

    /// Book a swap fee the pool has already transferred in
    pub fn credit_fee(env: Env, from: Address, amount: i128) -> Result<(), TreasuryError> {
        from.require_auth();
        let config = load_config(&env)?;
        if config.pool.as_ref() != Some(&from) {
            return Err(TreasuryError::Unauthorized);
        }

        book_credit(&env, &config, ProceedsRoute::Operational, amount)?;

        env.events()
            .publish((Symbol::new(&env, "fee_credited"), from), amount);
        Ok(())
    }

    /// Book sale proceeds the marketplace has already transferred in
    pub fn credit_proceeds(env: Env, from: Address, amount: i128) -> Result<(), TreasuryError> {
        from.require_auth();
        let config = load_config(&env)?;
        if config.marketplace.as_ref() != Some(&from) {
            return Err(TreasuryError::Unauthorized);
        }

        book_credit(&env, &config, config.proceeds_route, amount)?;

        env.events().publish(
            (Symbol::new(&env, "proceeds_credited"), from),
            (config.proceeds_route, amount),
        );
        Ok(())
    }

    /// Top up the operational partition from any account
    pub fn donate(env: Env, from: Address, amount: i128) -> Result<(), TreasuryError> {
        from.require_auth();
        let config = load_config(&env)?;
        if amount <= 0 {
            return Err(TreasuryError::InvalidAmount);
        }

        let mut state = get_state(&env);
        state
            .credit(ProceedsRoute::Operational, amount)
            .ok_or(TreasuryError::ArithmeticError)?;
        set_state(&env, &state);

        let pulled = token::Client::new(&env, &config.base_asset).try_transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );
        if !matches!(pulled, Ok(Ok(()))) {
            return Err(TreasuryError::TransferFailed);
        }

        env.events()
            .publish((Symbol::new(&env, "donated"), from), amount);
        Ok(())
    }

    // === Flywheel ===

    /// Sweep the marketplace floor if eligible. Anyone may call.
    /// Every outcome other than `Swept` leaves state untouched.
    pub fn check_and_sweep(env: Env) -> Result<SweepOutcome, TreasuryError> {
        sweep::check_and_sweep(&env)
    }

    /// Spend the whole burn balance on tokens and burn them (admin only).
    ///
    /// # Returns
    /// Tokens burned
    pub fn manual_buy_and_burn(env: Env) -> Result<i128, TreasuryError> {
        burn::manual_buy_and_burn(&env)
    }

    // === View Functions ===

    pub fn get_treasury_stats(env: Env) -> Result<TreasuryStats, TreasuryError> {
        let config = load_config(&env)?;
        let state = get_state(&env);
        let rather_balance =
            token::Client::new(&env, &config.rather_token).balance(&env.current_contract_address());

        Ok(TreasuryStats {
            total_balance: state.total_balance,
            operational_balance: state.operational_balance,
            burn_balance: state.burn_balance,
            rather_balance,
        })
    }

    pub fn min_sweep_threshold(env: Env) -> Result<i128, TreasuryError> {
        Ok(load_config(&env)?.sweep.min_sweep_threshold)
    }

    pub fn cooldown_period(env: Env) -> Result<u64, TreasuryError> {
        Ok(load_config(&env)?.sweep.cooldown_period)
    }

    pub fn last_sweep_time(env: Env) -> u64 {
        get_state(&env).last_sweep_time
    }

    pub fn proceeds_route(env: Env) -> Result<ProceedsRoute, TreasuryError> {
        Ok(load_config(&env)?.proceeds_route)
    }

    pub fn get_config(env: Env) -> Result<TreasuryConfig, TreasuryError> {
        load_config(&env)
    }
}

// === Helper Functions ===

pub(crate) fn load_config(env: &Env) -> Result<TreasuryConfig, TreasuryError> {
    get_config(env).ok_or(TreasuryError::NotInitialized)
}

/// Call another contract, turning any failure into None so the callee's
/// error codes never surface as ours
pub(crate) fn try_call<T: TryFromVal<Env, Val>>(
    env: &Env,
    contract: &Address,
    func: &str,
    args: Vec<Val>,
) -> Option<T> {
    match env.try_invoke_contract::<T, soroban_sdk::Error>(contract, &Symbol::new(env, func), args) {
        Ok(Ok(value)) => Some(value),
        _ => None,
    }
}

fn load_admin_config(env: &Env) -> Result<TreasuryConfig, TreasuryError> {
    let config = load_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

/// Credit a partition, refusing to book more than the treasury holds
fn book_credit(
    env: &Env,
    config: &TreasuryConfig,
    route: ProceedsRoute,
    amount: i128,
) -> Result<(), TreasuryError> {
    if amount <= 0 {
        return Err(TreasuryError::InvalidAmount);
    }

    let mut state = get_state(env);
    state
        .credit(route, amount)
        .ok_or(TreasuryError::ArithmeticError)?;

    let held = token::Client::new(env, &config.base_asset).balance(&env.current_contract_address());
    if state.total_balance > held {
        return Err(TreasuryError::UnbackedCredit);
    }

    set_state(env, &state);
    Ok(())
}
