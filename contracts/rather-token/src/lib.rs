#![no_std]

mod storage;

use soroban_sdk::{
    contract, contracterror, contractimpl, log, panic_with_error, Address, Env, String, Symbol,
};
use storage::{
    get_admin, get_allowance, get_balance, get_metadata, get_total_burned, get_total_supply,
    get_treasury, is_initialized, set_admin, set_allowance, set_balance, set_metadata,
    set_total_burned, set_total_supply, set_treasury, TokenMetadata,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    InvalidExpiration = 7,
}

/// Fixed-issuance protocol token. Supply only ever shrinks, through
/// treasury burns.
#[contract]
pub struct RatherToken;

#[contractimpl]
impl RatherToken {
    /// Initialize metadata and mint the whole supply to `admin`
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        decimals: u32,
        initial_supply: i128,
    ) {
        if is_initialized(&env) {
            panic_with_error!(&env, TokenError::AlreadyInitialized);
        }
        if initial_supply < 0 {
            panic_with_error!(&env, TokenError::InvalidAmount);
        }

        admin.require_auth();

        set_admin(&env, &admin);
        set_metadata(
            &env,
            &TokenMetadata {
                name,
                symbol,
                decimals,
            },
        );
        set_total_supply(&env, initial_supply);
        set_total_burned(&env, 0);
        set_balance(&env, &admin, initial_supply);

        env.events().publish(
            (Symbol::new(&env, "mint"), admin),
            initial_supply,
        );
    }

    /// Wire the only address allowed to burn
    pub fn set_treasury(env: Env, treasury: Address) -> Result<(), TokenError> {
        let admin = get_admin(&env).ok_or(TokenError::NotInitialized)?;
        admin.require_auth();

        set_treasury(&env, &treasury);
        Ok(())
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();
        check_nonnegative(amount)?;

        move_balance(&env, &from, &to, amount)?;

        env.events()
            .publish((Symbol::new(&env, "transfer"), from, to), amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), TokenError> {
        spender.require_auth();
        check_nonnegative(amount)?;

        spend_allowance(&env, &from, &spender, amount)?;
        move_balance(&env, &from, &to, amount)?;

        env.events()
            .publish((Symbol::new(&env, "transfer"), from, to), amount);
        Ok(())
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), TokenError> {
        from.require_auth();
        check_nonnegative(amount)?;

        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            return Err(TokenError::InvalidExpiration);
        }

        set_allowance(&env, &from, &spender, amount, expiration_ledger);

        env.events().publish(
            (Symbol::new(&env, "approve"), from, spender),
            (amount, expiration_ledger),
        );
        Ok(())
    }

    /// Destroy `amount` of the treasury's own tokens.
    /// Supply drops and total_burned grows by exactly `amount`.
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();

        let treasury = get_treasury(&env).ok_or(TokenError::Unauthorized)?;
        if from != treasury {
            return Err(TokenError::Unauthorized);
        }
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }

        let balance = get_balance(&env, &from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance);
        }

        set_balance(&env, &from, balance - amount);
        set_total_supply(&env, get_total_supply(&env) - amount);
        set_total_burned(&env, get_total_burned(&env) + amount);

        log!(&env, "burned", amount, get_total_burned(&env));
        env.events().publish((Symbol::new(&env, "burn"), from), amount);
        Ok(())
    }

    // === View Functions ===

    pub fn balance(env: Env, id: Address) -> i128 {
        get_balance(&env, &id)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        get_allowance(&env, &from, &spender).amount
    }

    pub fn total_supply(env: Env) -> i128 {
        get_total_supply(&env)
    }

    /// Cumulative amount destroyed; never decreases
    pub fn total_burned(env: Env) -> i128 {
        get_total_burned(&env)
    }

    pub fn decimals(env: Env) -> Result<u32, TokenError> {
        Ok(get_metadata(&env).ok_or(TokenError::NotInitialized)?.decimals)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        Ok(get_metadata(&env).ok_or(TokenError::NotInitialized)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        Ok(get_metadata(&env).ok_or(TokenError::NotInitialized)?.symbol)
    }

    pub fn admin(env: Env) -> Result<Address, TokenError> {
        get_admin(&env).ok_or(TokenError::NotInitialized)
    }

    pub fn treasury(env: Env) -> Option<Address> {
        get_treasury(&env)
    }
}

fn check_nonnegative(amount: i128) -> Result<(), TokenError> {
    if amount < 0 {
        Err(TokenError::InvalidAmount)
    } else {
        Ok(())
    }
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), TokenError> {
    let from_balance = get_balance(env, from);
    if from_balance < amount {
        return Err(TokenError::InsufficientBalance);
    }
    if from == to {
        return Ok(());
    }
    set_balance(env, from, from_balance - amount);
    set_balance(env, to, get_balance(env, to) + amount);
    Ok(())
}

fn spend_allowance(env: &Env, from: &Address, spender: &Address, amount: i128) -> Result<(), TokenError> {
    let allowance = get_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(TokenError::InsufficientAllowance);
    }
    if amount > 0 {
        set_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        );
    }
    Ok(())
}
