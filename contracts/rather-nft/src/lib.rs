#![no_std]

mod storage;

use rather_types::page_bounds;
use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String, Symbol,
    Vec,
};
use storage::{
    add_token_to_owner, clear_approval, get_approval, get_config, get_owner, get_uri, has_config,
    is_operator, minted_count, next_token_id, owner_token_at, owner_token_count,
    remove_token_from_owner, set_approval, set_config, set_operator, set_owner, set_uri,
    NftConfig,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum NftError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    TokenNotFound = 3,
    NotOwnerOrApproved = 4,
    InvalidRecipient = 5,
    InvalidAmount = 6,
    /// Mint price payment was rejected
    PaymentFailed = 7,
}

// ============================================================================
// Ownership index
// ============================================================================
// - Owner tokens use indexed storage (count + indexed entries) instead of a
//   Vec so a single entry never grows unbounded
// - Removal uses swap-and-pop, so enumeration order is not mint order
// - Unpaginated views are capped at MAX_PAGE_SIZE entries
// ============================================================================

#[contract]
pub struct RatherNft;

#[contractimpl]
impl RatherNft {
    /// Initialize the collection
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        base_uri: String,
        base_asset: Address,
        mint_price: i128,
    ) {
        if has_config(&env) {
            panic_with_error!(&env, NftError::AlreadyInitialized);
        }
        if mint_price < 0 {
            panic_with_error!(&env, NftError::InvalidAmount);
        }
        admin.require_auth();

        set_config(
            &env,
            &NftConfig {
                admin,
                name,
                symbol,
                base_uri,
                base_asset,
                mint_price,
            },
        );
    }

    /// Mint a new token to `to`. IDs start at 0.
    /// `to` pays the mint price (if any) to the admin.
    pub fn mint(env: Env, to: Address, uri: String) -> Result<u32, NftError> {
        to.require_auth();
        let config = load_config(&env)?;

        if to == env.current_contract_address() {
            return Err(NftError::InvalidRecipient);
        }

        let token_id = next_token_id(&env);
        set_owner(&env, token_id, &to);
        set_uri(&env, token_id, &uri);
        add_token_to_owner(&env, &to, token_id);

        if config.mint_price > 0 {
            let paid = token::Client::new(&env, &config.base_asset).try_transfer(
                &to,
                &config.admin,
                &config.mint_price,
            );
            if !matches!(paid, Ok(Ok(()))) {
                return Err(NftError::PaymentFailed);
            }
        }

        env.events()
            .publish((Symbol::new(&env, "minted"), to), token_id);

        Ok(token_id)
    }

    pub fn set_mint_price(env: Env, mint_price: i128) -> Result<(), NftError> {
        let mut config = load_config(&env)?;
        config.admin.require_auth();
        if mint_price < 0 {
            return Err(NftError::InvalidAmount);
        }
        config.mint_price = mint_price;
        set_config(&env, &config);
        Ok(())
    }

    // === Transfers ===

    /// Owner-initiated transfer
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u32) -> Result<(), NftError> {
        from.require_auth();
        let owner = get_owner(&env, token_id).ok_or(NftError::TokenNotFound)?;
        if owner != from {
            return Err(NftError::NotOwnerOrApproved);
        }
        move_token(&env, &from, &to, token_id)
    }

    /// Transfer by the owner, the token's approved address or an operator
    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        token_id: u32,
    ) -> Result<(), NftError> {
        spender.require_auth();
        let owner = get_owner(&env, token_id).ok_or(NftError::TokenNotFound)?;
        if owner != from || !is_approved_or_owner(&env, &spender, &owner, token_id) {
            return Err(NftError::NotOwnerOrApproved);
        }
        move_token(&env, &from, &to, token_id)
    }

    // === Approvals ===

    /// Approve `to` for a single token. `owner` must own the token or be
    /// one of the owner's operators.
    pub fn approve(env: Env, owner: Address, to: Address, token_id: u32) -> Result<(), NftError> {
        owner.require_auth();
        let actual = get_owner(&env, token_id).ok_or(NftError::TokenNotFound)?;
        if actual != owner && !is_operator(&env, &actual, &owner) {
            return Err(NftError::NotOwnerOrApproved);
        }

        set_approval(&env, token_id, &to);

        env.events().publish(
            (Symbol::new(&env, "approve"), actual),
            (to, token_id),
        );
        Ok(())
    }

    pub fn set_approval_for_all(env: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();
        set_operator(&env, &owner, &operator, approved);

        env.events().publish(
            (Symbol::new(&env, "approval_for_all"), owner),
            (operator, approved),
        );
    }

    // === View Functions ===

    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, NftError> {
        get_owner(&env, token_id).ok_or(NftError::TokenNotFound)
    }

    pub fn get_approved(env: Env, token_id: u32) -> Option<Address> {
        get_approval(&env, token_id)
    }

    pub fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool {
        is_operator(&env, &owner, &operator)
    }

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        owner_token_count(&env, &owner)
    }

    /// First page of the owner's tokens
    pub fn tokens_of_owner(env: Env, owner: Address) -> Vec<u32> {
        Self::tokens_of_owner_paginated(env, owner, 0, rather_types::MAX_PAGE_SIZE)
    }

    /// Returns up to `limit` token IDs starting from `start_index`.
    /// Maximum limit is 50 to stay within Soroban's read entry limits.
    pub fn tokens_of_owner_paginated(
        env: Env,
        owner: Address,
        start_index: u32,
        limit: u32,
    ) -> Vec<u32> {
        let count = owner_token_count(&env, &owner);
        let (start, end) = page_bounds(start_index, limit, count);

        let mut tokens = Vec::new(&env);
        for i in start..end {
            if let Some(token_id) = owner_token_at(&env, &owner, i) {
                tokens.push_back(token_id);
            }
        }
        tokens
    }

    /// Per-token URI, falling back to the collection base URI
    pub fn token_uri(env: Env, token_id: u32) -> Result<String, NftError> {
        get_owner(&env, token_id).ok_or(NftError::TokenNotFound)?;
        let uri = get_uri(&env, token_id);
        match uri {
            Some(uri) if uri.len() > 0 => Ok(uri),
            _ => Ok(load_config(&env)?.base_uri),
        }
    }

    pub fn total_supply(env: Env) -> u32 {
        minted_count(&env)
    }

    pub fn name(env: Env) -> Result<String, NftError> {
        Ok(load_config(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, NftError> {
        Ok(load_config(&env)?.symbol)
    }

    pub fn mint_price(env: Env) -> Result<i128, NftError> {
        Ok(load_config(&env)?.mint_price)
    }
}

// === Helper Functions ===

fn load_config(env: &Env) -> Result<NftConfig, NftError> {
    get_config(env).ok_or(NftError::NotInitialized)
}

fn is_approved_or_owner(env: &Env, spender: &Address, owner: &Address, token_id: u32) -> bool {
    if spender == owner {
        return true;
    }
    if get_approval(env, token_id).as_ref() == Some(spender) {
        return true;
    }
    is_operator(env, owner, spender)
}

fn move_token(env: &Env, from: &Address, to: &Address, token_id: u32) -> Result<(), NftError> {
    if *to == env.current_contract_address() {
        return Err(NftError::InvalidRecipient);
    }

    set_owner(env, token_id, to);
    clear_approval(env, token_id);

    if from != to {
        remove_token_from_owner(env, from, token_id);
        add_token_to_owner(env, to, token_id);
    }

    env.events().publish(
        (Symbol::new(env, "transfer"), from.clone(), to.clone()),
        token_id,
    );
    Ok(())
}
