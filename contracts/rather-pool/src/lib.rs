#![no_std]

mod error;
mod invariants;
mod liquidity;
mod storage;
mod swap;

pub use error::PoolError;

use rather_types::{PoolConfig, PoolReserves, ReserveCheck};
use soroban_sdk::{contract, contractimpl, panic_with_error, token, Address, Env};
use storage::{get_reserves, has_config, set_config, set_reserves};
use swap::load_config;

/// Constant-product pool between the base asset and the protocol token.
/// Every swap skims 10% of its base-asset leg to the treasury.
#[contract]
pub struct RatherPool;

#[contractimpl]
impl RatherPool {
    /// Initialize an empty pool
    pub fn initialize(env: Env, admin: Address, base_asset: Address, rather_token: Address) {
        if has_config(&env) {
            panic_with_error!(&env, PoolError::AlreadyInitialized);
        }
        admin.require_auth();

        set_config(
            &env,
            &PoolConfig {
                admin,
                base_asset,
                rather_token,
                treasury: None,
            },
        );
        set_reserves(&env, &PoolReserves::default());
    }

    /// Wire the fee recipient (admin only)
    pub fn set_treasury(env: Env, treasury: Address) -> Result<(), PoolError> {
        let mut config = load_config(&env)?;
        config.admin.require_auth();

        config.treasury = Some(treasury);
        set_config(&env, &config);
        Ok(())
    }

    /// Pay `eth_in` of the base asset, receive tokens.
    ///
    /// # Returns
    /// Tokens received
    pub fn swap_eth_for_rather(env: Env, user: Address, eth_in: i128) -> Result<i128, PoolError> {
        user.require_auth();
        swap::swap_eth_for_rather(&env, user, eth_in)
    }

    /// Pay `rather_in` tokens, receive base asset net of the fee.
    ///
    /// # Returns
    /// Base asset received
    pub fn swap_rather_for_eth(env: Env, user: Address, rather_in: i128) -> Result<i128, PoolError> {
        user.require_auth();
        swap::swap_rather_for_eth(&env, user, rather_in)
    }

    /// Deposit liquidity at the current ratio.
    ///
    /// # Returns
    /// (eth_amount, rather_amount) actually deposited
    pub fn add_liquidity(
        env: Env,
        provider: Address,
        eth_amount: i128,
        rather_amount: i128,
    ) -> Result<(i128, i128), PoolError> {
        provider.require_auth();
        liquidity::add_liquidity(&env, provider, eth_amount, rather_amount)
    }

    // === Quotes ===

    /// Tokens `swap_eth_for_rather(eth_in)` would pay out right now
    pub fn get_rather_out(env: Env, eth_in: i128) -> Result<i128, PoolError> {
        let quote = swap::quote_eth_in(&env, &get_reserves(&env), eth_in)?;
        Ok(quote.amount_out)
    }

    /// Base asset `swap_rather_for_eth(rather_in)` would pay out right now
    pub fn get_eth_out(env: Env, rather_in: i128) -> Result<i128, PoolError> {
        let quote = swap::quote_rather_in(&env, &get_reserves(&env), rather_in)?;
        Ok(quote.amount_out)
    }

    // === View Functions ===

    pub fn get_reserves(env: Env) -> PoolReserves {
        get_reserves(&env)
    }

    pub fn eth_reserve(env: Env) -> i128 {
        get_reserves(&env).eth_reserve
    }

    pub fn rather_reserve(env: Env) -> i128 {
        get_reserves(&env).rather_reserve
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, PoolError> {
        load_config(&env)
    }

    pub fn treasury(env: Env) -> Option<Address> {
        storage::get_config(&env).and_then(|config| config.treasury)
    }

    /// Compare the recorded reserves with what the pool actually holds.
    /// Reports a mismatch; never corrects it.
    pub fn check_reserves(env: Env) -> Result<ReserveCheck, PoolError> {
        let config = load_config(&env)?;
        let reserves = get_reserves(&env);
        let pool = env.current_contract_address();

        let eth_balance = token::Client::new(&env, &config.base_asset).balance(&pool);
        let rather_balance = token::Client::new(&env, &config.rather_token).balance(&pool);

        Ok(ReserveCheck {
            eth_reserve: reserves.eth_reserve,
            rather_reserve: reserves.rather_reserve,
            eth_balance,
            rather_balance,
            in_sync: invariants::reserves_match_balances(&reserves, eth_balance, rather_balance),
        })
    }
}
