use soroban_sdk::{contracttype, Address, Env, String};

/// Storage keys for the token contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address (Instance storage)
    Admin,
    /// Only address allowed to burn (Instance storage)
    Treasury,
    /// Token metadata (Instance storage)
    Metadata,
    /// Circulating supply (Instance storage)
    TotalSupply,
    /// Cumulative burned amount (Instance storage)
    TotalBurned,
    /// Balance per holder (Persistent storage)
    Balance(Address),
    /// Allowance per (owner, spender) (Temporary storage)
    Allowance(Address, Address),
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

// === Admin / Treasury ===

pub fn get_admin(env: &Env) -> Option<Address> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn get_treasury(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Treasury)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&DataKey::Treasury, treasury);
    extend_instance_ttl(env);
}

// === Metadata ===

pub fn get_metadata(env: &Env) -> Option<TokenMetadata> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Metadata)
}

pub fn set_metadata(env: &Env, metadata: &TokenMetadata) {
    env.storage().instance().set(&DataKey::Metadata, metadata);
}

// === Supply ===

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

pub fn get_total_burned(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalBurned)
        .unwrap_or(0)
}

pub fn set_total_burned(env: &Env, burned: i128) {
    env.storage().instance().set(&DataKey::TotalBurned, &burned);
}

// === Balances ===

pub fn get_balance(env: &Env, id: &Address) -> i128 {
    let key = DataKey::Balance(id.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    }
}

// === Allowances ===

/// Expired allowances read as zero
pub fn get_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    let allowance: AllowanceValue = env.storage().temporary().get(&key).unwrap_or_default();
    if allowance.expiration_ledger < env.ledger().sequence() {
        AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        }
    } else {
        allowance
    }
}

pub fn set_allowance(env: &Env, from: &Address, spender: &Address, amount: i128, expiration_ledger: u32) {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    let allowance = AllowanceValue {
        amount,
        expiration_ledger,
    };
    env.storage().temporary().set(&key, &allowance);

    if amount > 0 {
        let live_for = expiration_ledger.saturating_sub(env.ledger().sequence());
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
}
