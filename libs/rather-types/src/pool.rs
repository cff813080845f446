use soroban_sdk::{contracttype, Address};

/// Pool reserves - stored in Instance storage, written on every swap
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolReserves {
    /// Base asset held for pricing
    pub eth_reserve: i128,
    /// Protocol token held for pricing
    pub rather_reserve: i128,
}

impl PoolReserves {
    pub fn is_empty(&self) -> bool {
        self.eth_reserve == 0 && self.rather_reserve == 0
    }

    /// Both sides funded; swaps require this
    pub fn has_liquidity(&self) -> bool {
        self.eth_reserve > 0 && self.rather_reserve > 0
    }
}

/// Pool configuration - set at initialization, treasury wired afterwards
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Operator allowed to wire the treasury
    pub admin: Address,
    /// Base asset token contract
    pub base_asset: Address,
    /// Protocol token contract
    pub rather_token: Address,
    /// Fee recipient, None until wired
    pub treasury: Option<Address>,
}

/// Result of a quote; shared by the view functions and the swap paths
/// so both use identical arithmetic
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapQuote {
    /// Amount the caller pays in
    pub amount_in: i128,
    /// Amount the caller receives
    pub amount_out: i128,
    /// Fee forwarded to the treasury (always base asset)
    pub fee: i128,
    /// Reserves after the swap is applied
    pub reserves_after: PoolReserves,
}

/// Reserve/balance reconciliation view
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveCheck {
    pub eth_reserve: i128,
    pub rather_reserve: i128,
    /// Base asset actually held by the pool
    pub eth_balance: i128,
    /// Protocol token actually held by the pool
    pub rather_balance: i128,
    /// True when both reserves equal the held balances
    pub in_sync: bool,
}
