use soroban_sdk::{contracttype, Address};

/// Marketplace listing, keyed by NFT token id
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    /// Asking price in base asset units
    pub price: i128,
    /// Owner at listing time; the only address allowed to cancel
    pub seller: Address,
    /// False once bought or cancelled
    pub active: bool,
}

/// Cached minimum over active listings
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Floor {
    pub price: i128,
    pub token_id: u32,
}

impl Floor {
    /// Sentinel returned when nothing is listed
    pub fn none() -> Self {
        Self {
            price: 0,
            token_id: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.price == 0
    }

    /// True if a listing at `price` would become the new floor.
    /// Ties keep the existing floor (earliest listing wins).
    pub fn is_undercut_by(&self, price: i128) -> bool {
        self.is_none() || price < self.price
    }
}
