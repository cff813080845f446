use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketplaceError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// Treasury not wired yet
    NotConfigured = 3,
    /// Seller doesn't own the token or hasn't approved the marketplace
    NotOwnerOrApproved = 4,
    ListingNotActive = 5,
    InvalidPrice = 6,
    /// Payment differs from the asking price
    IncorrectPayment = 7,
    NotSeller = 8,
    /// Buyer's base-asset payment was rejected
    PaymentFailed = 9,
    /// Treasury refused to book the proceeds
    ProceedsRejected = 10,
    /// Prune of a listing the seller can still deliver
    ListingStillValid = 11,
}
