use rather_types::{PoolConfig, PoolReserves};
use soroban_sdk::{contracttype, Env};

// ============================================================================
// Storage layout
// ============================================================================
// - Config and reserves are small, fixed-size and touched by every call, so
//   both live in Instance storage
// - No persistent entries: the pool keeps no per-user state
// ============================================================================

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Current reserves (Instance storage)
    Reserves,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<PoolConfig> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Reserves ===

pub fn get_reserves(env: &Env) -> PoolReserves {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Reserves)
        .unwrap_or_default()
}

pub fn set_reserves(env: &Env, reserves: &PoolReserves) {
    env.storage().instance().set(&DataKey::Reserves, reserves);
    extend_instance_ttl(env);
}
