use rather_types::{TreasuryConfig, TreasuryState};
use soroban_sdk::{contracttype, Env};

/// Storage keys for the treasury contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Treasury configuration (Instance storage)
    Config,
    /// Balances and sweep timer (Instance storage)
    State,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<TreasuryConfig> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &TreasuryConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> TreasuryState {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or_default()
}

pub fn set_state(env: &Env, state: &TreasuryState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}
