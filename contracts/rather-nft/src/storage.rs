use soroban_sdk::{contracttype, Address, Env, String};

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Collection configuration
    Config,
    /// Next token ID counter
    NextTokenId,
    /// Token ID -> Owner
    Owner(u32),
    /// Token ID -> metadata URI
    Uri(u32),
    /// Owner -> token count (indexed storage for scalability)
    OwnerTokenCount(Address),
    /// Owner -> index -> token ID (indexed storage to avoid unbounded Vec)
    OwnerTokenAt(Address, u32),
    /// Token ID -> index in owner's list (for O(1) removal)
    TokenIndex(u32),
    /// Token ID -> approved address
    Approval(u32),
    /// Owner -> operator -> approved for all
    ApprovalForAll(Address, Address),
}

/// Collection configuration
#[contracttype]
#[derive(Clone, Debug)]
pub struct NftConfig {
    pub admin: Address,
    pub name: String,
    pub symbol: String,
    /// Returned by token_uri for tokens minted without their own URI
    pub base_uri: String,
    /// Asset the mint price is paid in
    pub base_asset: Address,
    /// Paid by the recipient to the admin on mint; zero means free
    pub mint_price: i128,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn set_persistent<V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Option<NftConfig> {
    extend_instance_ttl(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &NftConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

/// Returns the next ID and advances the counter
pub fn next_token_id(env: &Env) -> u32 {
    let id: u32 = env
        .storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextTokenId, &(id + 1));
    id
}

pub fn minted_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(0)
}

// === Ownership ===

pub fn get_owner(env: &Env, token_id: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Owner(token_id))
}

pub fn set_owner(env: &Env, token_id: u32, owner: &Address) {
    set_persistent(env, &DataKey::Owner(token_id), owner);
}

pub fn get_uri(env: &Env, token_id: u32) -> Option<String> {
    env.storage().persistent().get(&DataKey::Uri(token_id))
}

pub fn set_uri(env: &Env, token_id: u32, uri: &String) {
    set_persistent(env, &DataKey::Uri(token_id), uri);
}

// === Approvals ===

pub fn get_approval(env: &Env, token_id: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Approval(token_id))
}

pub fn set_approval(env: &Env, token_id: u32, approved: &Address) {
    set_persistent(env, &DataKey::Approval(token_id), approved);
}

pub fn clear_approval(env: &Env, token_id: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::Approval(token_id));
}

pub fn is_operator(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::ApprovalForAll(owner.clone(), operator.clone()))
        .unwrap_or(false)
}

pub fn set_operator(env: &Env, owner: &Address, operator: &Address, approved: bool) {
    let key = DataKey::ApprovalForAll(owner.clone(), operator.clone());
    if approved {
        set_persistent(env, &key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

// === Owner enumeration ===

pub fn owner_token_count(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerTokenCount(owner.clone()))
        .unwrap_or(0)
}

pub fn owner_token_at(env: &Env, owner: &Address, index: u32) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerTokenAt(owner.clone(), index))
}

/// Append to the owner's indexed list - O(1)
pub fn add_token_to_owner(env: &Env, owner: &Address, token_id: u32) {
    let count = owner_token_count(env, owner);

    set_persistent(env, &DataKey::OwnerTokenAt(owner.clone(), count), &token_id);
    set_persistent(env, &DataKey::TokenIndex(token_id), &count);
    set_persistent(env, &DataKey::OwnerTokenCount(owner.clone()), &(count + 1));
}

/// Remove from the owner's indexed list using swap-and-pop - O(1)
pub fn remove_token_from_owner(env: &Env, owner: &Address, token_id: u32) {
    let count = owner_token_count(env, owner);
    if count == 0 {
        return;
    }

    let index_to_remove: u32 = env
        .storage()
        .persistent()
        .get(&DataKey::TokenIndex(token_id))
        .unwrap_or(0);
    let last_index = count - 1;

    if index_to_remove != last_index {
        if let Some(last_token_id) = owner_token_at(env, owner, last_index) {
            set_persistent(
                env,
                &DataKey::OwnerTokenAt(owner.clone(), index_to_remove),
                &last_token_id,
            );
            set_persistent(env, &DataKey::TokenIndex(last_token_id), &index_to_remove);
        }
    }

    env.storage()
        .persistent()
        .remove(&DataKey::OwnerTokenAt(owner.clone(), last_index));
    env.storage()
        .persistent()
        .remove(&DataKey::TokenIndex(token_id));

    if count > 1 {
        set_persistent(env, &DataKey::OwnerTokenCount(owner.clone()), &(count - 1));
    } else {
        env.storage()
            .persistent()
            .remove(&DataKey::OwnerTokenCount(owner.clone()));
    }
}
