use soroban_sdk::{contracttype, Address};

use crate::{DEFAULT_COOLDOWN_PERIOD, DEFAULT_MIN_SWEEP_THRESHOLD};

/// Treasury partition that marketplace sale proceeds are credited to
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProceedsRoute {
    Burn,
    Operational,
}

/// Sweep tunables
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepConfig {
    /// Floors below this price are ignored
    pub min_sweep_threshold: i128,
    /// Minimum ledger seconds between two sweeps
    pub cooldown_period: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_sweep_threshold: DEFAULT_MIN_SWEEP_THRESHOLD,
            cooldown_period: DEFAULT_COOLDOWN_PERIOD,
        }
    }
}

/// Treasury configuration
#[contracttype]
#[derive(Clone, Debug)]
pub struct TreasuryConfig {
    /// Privileged operator (buy-and-burn, wiring)
    pub admin: Address,
    pub base_asset: Address,
    pub rather_token: Address,
    pub nft: Address,
    pub marketplace: Option<Address>,
    pub pool: Option<Address>,
    pub proceeds_route: ProceedsRoute,
    pub sweep: SweepConfig,
}

/// Treasury balances and sweep timer
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TreasuryState {
    /// Always operational_balance + burn_balance
    pub total_balance: i128,
    /// Earmarked for floor sweeps
    pub operational_balance: i128,
    /// Earmarked for buy-and-burn
    pub burn_balance: i128,
    /// Ledger timestamp of the last successful sweep
    pub last_sweep_time: u64,
}

impl TreasuryState {
    /// Partition invariant
    pub fn is_balanced(&self) -> bool {
        self.operational_balance >= 0
            && self.burn_balance >= 0
            && self.operational_balance.checked_add(self.burn_balance) == Some(self.total_balance)
    }

    /// Credit a partition, keeping the total in step.
    /// Returns None on overflow or negative amount.
    pub fn credit(&mut self, route: ProceedsRoute, amount: i128) -> Option<()> {
        if amount < 0 {
            return None;
        }
        let total = self.total_balance.checked_add(amount)?;
        match route {
            ProceedsRoute::Operational => {
                self.operational_balance = self.operational_balance.checked_add(amount)?
            }
            ProceedsRoute::Burn => self.burn_balance = self.burn_balance.checked_add(amount)?,
        }
        self.total_balance = total;
        Some(())
    }

    /// Debit a partition. Returns None if the partition can't cover it.
    pub fn debit(&mut self, route: ProceedsRoute, amount: i128) -> Option<()> {
        if amount < 0 {
            return None;
        }
        match route {
            ProceedsRoute::Operational => {
                if self.operational_balance < amount {
                    return None;
                }
                self.operational_balance -= amount;
            }
            ProceedsRoute::Burn => {
                if self.burn_balance < amount {
                    return None;
                }
                self.burn_balance -= amount;
            }
        }
        self.total_balance -= amount;
        Some(())
    }
}

/// Public stats view: (total, operational, burn, protocol tokens held)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreasuryStats {
    pub total_balance: i128,
    pub operational_balance: i128,
    pub burn_balance: i128,
    pub rather_balance: i128,
}

/// Result of `check_and_sweep`. Everything except `Swept` is a silent no-op.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SweepOutcome {
    Swept,
    NoListings,
    BelowThreshold,
    CoolingDown,
    InsufficientBalance,
}
