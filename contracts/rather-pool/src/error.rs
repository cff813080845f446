use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// Treasury not wired yet
    NotConfigured = 3,
    /// Base-asset swap with a zero or negative amount
    NoEthSent = 4,
    /// Token swap with a zero or negative amount
    NoRatherSent = 5,
    /// One of the reserves is empty
    NoLiquidity = 6,
    /// Output would drain the reserve
    InsufficientLiquidity = 7,
    /// Input too small to buy anything
    ZeroOutput = 8,
    InvalidAmount = 9,
    ArithmeticError = 10,
    InvariantViolation = 11,
    /// A base-asset or token transfer was rejected
    TransferFailed = 12,
    /// Treasury refused to book the fee
    FeeCreditRejected = 13,
}
