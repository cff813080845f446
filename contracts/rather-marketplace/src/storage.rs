use rather_types::{Floor, Listing};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Each listing and each list link is its own persistent entry
// - Active listings form a doubly linked list (Head/Tail in Instance
//   storage), so append and unlink touch at most 3 entries
// - The floor is cached in Instance storage; a rescan walks the whole list
//   and is only needed when the floor listing leaves or is repriced upwards
// ============================================================================

/// Storage keys for the marketplace contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Marketplace configuration (Instance storage)
    Config,
    /// First active token id (Instance storage)
    Head,
    /// Last active token id (Instance storage)
    Tail,
    /// Number of active listings (Instance storage)
    ActiveCount,
    /// Cached floor (Instance storage)
    Floor,
    /// Token ID -> Listing (Persistent storage)
    Listing(u32),
    /// Token ID -> neighbours in the active list (Persistent storage)
    Link(u32),
}

/// Marketplace configuration
#[contracttype]
#[derive(Clone, Debug)]
pub struct MarketplaceConfig {
    pub admin: Address,
    /// NFT collection traded here
    pub nft: Address,
    /// Asset prices are denominated in
    pub base_asset: Address,
    /// Proceeds recipient, None until wired
    pub treasury: Option<Address>,
}

/// Neighbours of an active listing
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListLink {
    pub prev: Option<u32>,
    pub next: Option<u32>,
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

pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<MarketplaceConfig> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &MarketplaceConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Listings ===

pub fn get_listing(env: &Env, token_id: u32) -> Option<Listing> {
    env.storage().persistent().get(&DataKey::Listing(token_id))
}

pub fn set_listing(env: &Env, token_id: u32, listing: &Listing) {
    let key = DataKey::Listing(token_id);
    env.storage().persistent().set(&key, listing);
    extend_persistent_ttl(env, &key);
}

// === Active list ===

pub fn get_head(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::Head)
}

pub fn get_tail(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::Tail)
}

pub fn set_head(env: &Env, head: Option<u32>) {
    match head {
        Some(id) => env.storage().instance().set(&DataKey::Head, &id),
        None => env.storage().instance().remove(&DataKey::Head),
    }
}

pub fn set_tail(env: &Env, tail: Option<u32>) {
    match tail {
        Some(id) => env.storage().instance().set(&DataKey::Tail, &id),
        None => env.storage().instance().remove(&DataKey::Tail),
    }
}

pub fn get_link(env: &Env, token_id: u32) -> ListLink {
    env.storage()
        .persistent()
        .get(&DataKey::Link(token_id))
        .unwrap_or_default()
}

pub fn set_link(env: &Env, token_id: u32, link: &ListLink) {
    let key = DataKey::Link(token_id);
    env.storage().persistent().set(&key, link);
    extend_persistent_ttl(env, &key);
}

pub fn remove_link(env: &Env, token_id: u32) {
    env.storage().persistent().remove(&DataKey::Link(token_id));
}

pub fn get_active_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ActiveCount)
        .unwrap_or(0)
}

pub fn set_active_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::ActiveCount, &count);
}

// === Floor ===

pub fn get_floor(env: &Env) -> Floor {
    env.storage()
        .instance()
        .get(&DataKey::Floor)
        .unwrap_or_else(Floor::none)
}

pub fn set_floor(env: &Env, floor: &Floor) {
    if floor.is_none() {
        env.storage().instance().remove(&DataKey::Floor);
    } else {
        env.storage().instance().set(&DataKey::Floor, floor);
    }
}
