use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TreasuryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// Marketplace or pool not wired yet
    NotConfigured = 3,
    /// Caller is not the wired pool/marketplace
    Unauthorized = 4,
    /// Partition can't cover the debit
    InsufficientTreasuryBalance = 5,
    /// Credit exceeds the base asset actually held
    UnbackedCredit = 6,
    InvalidAmount = 7,
    ArithmeticError = 8,
    /// Marketplace purchase or relist of the floor token was rejected
    SweepFailed = 9,
    /// Pool swap or token burn was rejected
    BurnFailed = 10,
    /// Base-asset transfer into the treasury was rejected
    TransferFailed = 11,
}
