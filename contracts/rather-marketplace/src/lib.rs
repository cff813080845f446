#![no_std]

mod error;
mod floor;
mod storage;

pub use error::MarketplaceError;

use rather_types::Listing;
use soroban_sdk::{
    contract, contractimpl, panic_with_error, token, Address, Env, IntoVal, Symbol, TryFromVal,
    Val, Vec,
};
use storage::{get_active_count, get_config, get_floor, get_listing, has_config, set_config, set_listing, MarketplaceConfig};

/// Fixed-price marketplace for one NFT collection. Sale proceeds go to
/// the treasury.
#[contract]
pub struct RatherMarketplace;

#[contractimpl]
impl RatherMarketplace {
    pub fn initialize(env: Env, admin: Address, nft: Address, base_asset: Address) {
        if has_config(&env) {
            panic_with_error!(&env, MarketplaceError::AlreadyInitialized);
        }
        admin.require_auth();

        set_config(
            &env,
            &MarketplaceConfig {
                admin,
                nft,
                base_asset,
                treasury: None,
            },
        );
    }

    /// Wire the proceeds recipient (admin only)
    pub fn set_treasury(env: Env, treasury: Address) -> Result<(), MarketplaceError> {
        let mut config = load_config(&env)?;
        config.admin.require_auth();

        config.treasury = Some(treasury);
        set_config(&env, &config);
        Ok(())
    }

    /// List (or reprice) a token. The seller must own it and have approved
    /// the marketplace for it, directly or as operator.
    pub fn list_nft(env: Env, seller: Address, token_id: u32, price: i128) -> Result<(), MarketplaceError> {
        seller.require_auth();
        let config = load_config(&env)?;

        if price <= 0 {
            return Err(MarketplaceError::InvalidPrice);
        }

        if !seller_can_deliver(&env, &config.nft, &seller, token_id) {
            return Err(MarketplaceError::NotOwnerOrApproved);
        }

        let previous = get_listing(&env, token_id).filter(|listing| listing.active);
        set_listing(
            &env,
            token_id,
            &Listing {
                price,
                seller: seller.clone(),
                active: true,
            },
        );

        match previous {
            // Already active: keeps its place in listing order
            Some(old) => floor::on_repriced(&env, token_id, old.price, price),
            None => {
                floor::append(&env, token_id);
                floor::on_appended(&env, token_id, price);
            }
        }

        env.events()
            .publish((Symbol::new(&env, "listed"), seller), (token_id, price));
        Ok(())
    }

    pub fn cancel_listing(env: Env, seller: Address, token_id: u32) -> Result<(), MarketplaceError> {
        seller.require_auth();

        let mut listing = active_listing(&env, token_id)?;
        if listing.seller != seller {
            return Err(MarketplaceError::NotSeller);
        }

        listing.active = false;
        set_listing(&env, token_id, &listing);
        floor::unlink(&env, token_id);
        floor::on_removed(&env, token_id);

        env.events()
            .publish((Symbol::new(&env, "cancelled"), seller), token_id);
        Ok(())
    }

    /// Close a listing the seller can no longer deliver: the token moved
    /// away or the marketplace lost its approval. Anyone may call.
    pub fn prune_listing(env: Env, token_id: u32) -> Result<(), MarketplaceError> {
        let config = load_config(&env)?;

        let mut listing = active_listing(&env, token_id)?;
        if seller_can_deliver(&env, &config.nft, &listing.seller, token_id) {
            return Err(MarketplaceError::ListingStillValid);
        }

        listing.active = false;
        set_listing(&env, token_id, &listing);
        floor::unlink(&env, token_id);
        floor::on_removed(&env, token_id);

        env.events()
            .publish((Symbol::new(&env, "pruned"), listing.seller), token_id);
        Ok(())
    }

    /// Buy a listed token for exactly its price.
    ///
    /// The listing is closed and the floor updated before the NFT and the
    /// payment move. A purchase by the treasury moves no payment; the
    /// treasury books those proceeds itself.
    ///
    /// A listing the seller can no longer deliver fails with
    /// `NotOwnerOrApproved`.
    pub fn buy_nft(env: Env, buyer: Address, token_id: u32, payment: i128) -> Result<(), MarketplaceError> {
        buyer.require_auth();
        let config = load_config(&env)?;

        let mut listing = active_listing(&env, token_id)?;
        if payment != listing.price {
            return Err(MarketplaceError::IncorrectPayment);
        }
        let treasury = config.treasury.clone().ok_or(MarketplaceError::NotConfigured)?;

        listing.active = false;
        set_listing(&env, token_id, &listing);
        floor::unlink(&env, token_id);
        floor::on_removed(&env, token_id);

        let marketplace = env.current_contract_address();
        nft_transfer_from(&env, &config.nft, &marketplace, &listing.seller, &buyer, token_id)?;

        if buyer != treasury {
            pay(&env, &config.base_asset, &buyer, &treasury, listing.price)?;
            credit_treasury_proceeds(&env, &treasury, listing.price)?;
        }

        env.events().publish(
            (Symbol::new(&env, "sold"), buyer),
            (token_id, listing.seller, listing.price),
        );
        Ok(())
    }

    // === View Functions ===

    /// (price, token_id) of the cheapest active listing, (0, 0) when empty
    pub fn get_floor_price(env: Env) -> (i128, u32) {
        let floor = get_floor(&env);
        (floor.price, floor.token_id)
    }

    /// All active token ids in listing order.
    /// WARNING: walks the whole book; use get_active_listings_paginated
    /// once the book outgrows Soroban's read limits.
    pub fn get_active_listings(env: Env) -> Vec<u32> {
        floor::active_ids(&env, 0, get_active_count(&env))
    }

    /// Returns up to `limit` active token ids starting from `start_index`.
    /// Maximum limit is 50.
    pub fn get_active_listings_paginated(env: Env, start_index: u32, limit: u32) -> Vec<u32> {
        floor::active_page(&env, start_index, limit)
    }

    pub fn active_listing_count(env: Env) -> u32 {
        get_active_count(&env)
    }

    /// Listing record for a token, including closed ones
    pub fn get_listing(env: Env, token_id: u32) -> Option<Listing> {
        get_listing(&env, token_id)
    }

    pub fn treasury(env: Env) -> Option<Address> {
        get_config(&env).and_then(|config| config.treasury)
    }

    pub fn nft(env: Env) -> Result<Address, MarketplaceError> {
        Ok(load_config(&env)?.nft)
    }
}

// === Helper Functions ===

fn load_config(env: &Env) -> Result<MarketplaceConfig, MarketplaceError> {
    get_config(env).ok_or(MarketplaceError::NotInitialized)
}

fn active_listing(env: &Env, token_id: u32) -> Result<Listing, MarketplaceError> {
    get_listing(env, token_id)
        .filter(|listing| listing.active)
        .ok_or(MarketplaceError::ListingNotActive)
}

/// Seller still owns the token and the marketplace may move it
fn seller_can_deliver(env: &Env, nft: &Address, seller: &Address, token_id: u32) -> bool {
    match nft_owner_of(env, nft, token_id) {
        Some(owner) => owner == *seller && marketplace_approved(env, nft, &owner, token_id),
        None => false,
    }
}

fn marketplace_approved(env: &Env, nft: &Address, owner: &Address, token_id: u32) -> bool {
    let marketplace = env.current_contract_address();

    let approved: Option<Option<Address>> =
        try_call(env, nft, "get_approved", (token_id,).into_val(env));
    if approved.flatten().as_ref() == Some(&marketplace) {
        return true;
    }

    try_call(
        env,
        nft,
        "is_approved_for_all",
        (owner.clone(), marketplace).into_val(env),
    )
    .unwrap_or(false)
}

/// None for an unminted token
fn nft_owner_of(env: &Env, nft: &Address, token_id: u32) -> Option<Address> {
    try_call(env, nft, "owner_of", (token_id,).into_val(env))
}

fn nft_transfer_from(
    env: &Env,
    nft: &Address,
    spender: &Address,
    from: &Address,
    to: &Address,
    token_id: u32,
) -> Result<(), MarketplaceError> {
    try_call::<()>(
        env,
        nft,
        "transfer_from",
        (spender.clone(), from.clone(), to.clone(), token_id).into_val(env),
    )
    .ok_or(MarketplaceError::NotOwnerOrApproved)
}

fn pay(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), MarketplaceError> {
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(MarketplaceError::PaymentFailed),
    }
}

fn credit_treasury_proceeds(
    env: &Env,
    treasury: &Address,
    amount: i128,
) -> Result<(), MarketplaceError> {
    try_call::<()>(
        env,
        treasury,
        "credit_proceeds",
        (env.current_contract_address(), amount).into_val(env),
    )
    .ok_or(MarketplaceError::ProceedsRejected)
}

/// Call another contract, turning any failure into None so the callee's
/// error codes never surface as ours
fn try_call<T: TryFromVal<Env, Val>>(
    env: &Env,
    contract: &Address,
    func: &str,
    args: Vec<Val>,
) -> Option<T> {
    match env.try_invoke_contract::<T, soroban_sdk::Error>(contract, &Symbol::new(env, func), args) {
        Ok(Ok(value)) => Some(value),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::mock_treasury::{MockTreasury, MockTreasuryClient};
    use super::*;
    use rather_nft::{RatherNft, RatherNftClient};
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::token::{StellarAssetClient, TokenClient};
    use soroban_sdk::{Address, Env, String};

    const UNIT: i128 = 10_000_000;

    struct Setup<'a> {
        env: Env,
        market: RatherMarketplaceClient<'a>,
        nft: RatherNftClient<'a>,
        base: TokenClient<'a>,
        treasury: MockTreasuryClient<'a>,
    }

    impl<'a> Setup<'a> {
        /// Mint a token to `owner` and approve the marketplace for it
        fn mint_approved(&self, owner: &Address) -> u32 {
            let id = self.nft.mint(owner, &String::from_str(&self.env, "ipfs://token"));
            self.nft.approve(owner, &self.market.address, &id);
            id
        }

        fn fund(&self, user: &Address, amount: i128) {
            StellarAssetClient::new(&self.env, &self.base.address).mint(user, &amount);
        }

        fn listed(&self, seller: &Address, price: i128) -> u32 {
            let id = self.mint_approved(seller);
            self.market.list_nft(seller, &id, &price);
            id
        }
    }

    fn setup<'a>() -> Setup<'a> {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let base_id = env.register_stellar_asset_contract_v2(admin.clone()).address();

        let nft = RatherNftClient::new(&env, &env.register(RatherNft, ()));
        nft.initialize(
            &admin,
            &String::from_str(&env, "Rather NFT"),
            &String::from_str(&env, "RNFT"),
            &String::from_str(&env, ""),
            &base_id,
            &0,
        );

        let market = RatherMarketplaceClient::new(&env, &env.register(RatherMarketplace, ()));
        market.initialize(&admin, &nft.address, &base_id);

        let treasury = MockTreasuryClient::new(&env, &env.register(MockTreasury, ()));
        market.set_treasury(&treasury.address);

        Setup {
            base: TokenClient::new(&env, &base_id),
            market,
            nft,
            treasury,
            env,
        }
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1)")]
    fn test_initialize_twice_fails() {
        let s = setup();
        let admin = Address::generate(&s.env);
        s.market.initialize(&admin, &s.nft.address, &s.base.address);
    }

    // === Listing Tests ===

    #[test]
    fn test_list_sets_floor() {
        let s = setup();
        let seller = Address::generate(&s.env);

        assert_eq!(s.market.get_floor_price(), (0, 0));

        let id = s.listed(&seller, UNIT / 100);

        assert_eq!(s.market.get_floor_price(), (UNIT / 100, id));
        assert_eq!(s.market.get_active_listings(), Vec::from_array(&s.env, [id]));
        assert_eq!(
            s.market.get_listing(&id),
            Some(Listing {
                price: UNIT / 100,
                seller,
                active: true,
            })
        );
    }

    #[test]
    fn test_list_requires_owner_and_approval() {
        let s = setup();
        let owner = Address::generate(&s.env);
        let other = Address::generate(&s.env);

        let unapproved = s.nft.mint(&owner, &String::from_str(&s.env, ""));
        assert_eq!(
            s.market.try_list_nft(&owner, &unapproved, &UNIT),
            Err(Ok(MarketplaceError::NotOwnerOrApproved))
        );

        let approved = s.mint_approved(&owner);
        assert_eq!(
            s.market.try_list_nft(&other, &approved, &UNIT),
            Err(Ok(MarketplaceError::NotOwnerOrApproved))
        );
        assert_eq!(
            s.market.try_list_nft(&owner, &approved, &0),
            Err(Ok(MarketplaceError::InvalidPrice))
        );

        // Operator approval is enough
        s.nft.set_approval_for_all(&owner, &s.market.address, &true);
        s.market.list_nft(&owner, &unapproved, &UNIT);
        assert_eq!(s.market.active_listing_count(), 1);
    }

    #[test]
    fn test_list_unminted_token_fails() {
        let s = setup();
        let seller = Address::generate(&s.env);
        assert_eq!(
            s.market.try_list_nft(&seller, &42, &UNIT),
            Err(Ok(MarketplaceError::NotOwnerOrApproved))
        );
        assert_eq!(s.market.active_listing_count(), 0);
    }

    // === Purchase Tests ===

    #[test]
    fn test_buy_pays_treasury_and_moves_nft() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT / 100);
        s.fund(&buyer, UNIT / 100);

        s.market.buy_nft(&buyer, &id, &(UNIT / 100));

        assert_eq!(s.nft.owner_of(&id), buyer);
        assert_eq!(s.base.balance(&buyer), 0);
        assert_eq!(s.base.balance(&s.treasury.address), UNIT / 100);
        assert_eq!(s.treasury.credited(), UNIT / 100);
        assert_eq!(s.market.get_floor_price(), (0, 0));
        assert!(!s.market.get_listing(&id).unwrap().active);
        assert_eq!(s.market.active_listing_count(), 0);
    }

    #[test]
    fn test_buy_rejects_wrong_payment() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);
        s.fund(&buyer, 2 * UNIT);

        assert_eq!(
            s.market.try_buy_nft(&buyer, &id, &(UNIT - 1)),
            Err(Ok(MarketplaceError::IncorrectPayment))
        );
        assert_eq!(
            s.market.try_buy_nft(&buyer, &id, &(UNIT + 1)),
            Err(Ok(MarketplaceError::IncorrectPayment))
        );
        assert_eq!(
            s.market.try_buy_nft(&buyer, &99, &UNIT),
            Err(Ok(MarketplaceError::ListingNotActive))
        );
        assert_eq!(s.nft.owner_of(&id), seller);
        assert_eq!(s.market.get_floor_price(), (UNIT, id));
    }

    #[test]
    fn test_buy_without_funds_is_atomic() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);

        assert_eq!(
            s.market.try_buy_nft(&buyer, &id, &UNIT),
            Err(Ok(MarketplaceError::PaymentFailed))
        );
        assert_eq!(s.nft.owner_of(&id), seller);
        assert!(s.market.get_listing(&id).unwrap().active);
        assert_eq!(s.market.get_floor_price(), (UNIT, id));
        assert_eq!(s.market.active_listing_count(), 1);
    }

    #[test]
    fn test_buy_requires_treasury() {
        let env = Env::default();
        env.mock_all_auths();
        let admin = Address::generate(&env);
        let base_id = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let nft = RatherNftClient::new(&env, &env.register(RatherNft, ()));
        nft.initialize(
            &admin,
            &String::from_str(&env, "n"),
            &String::from_str(&env, "n"),
            &String::from_str(&env, ""),
            &base_id,
            &0,
        );
        let market = RatherMarketplaceClient::new(&env, &env.register(RatherMarketplace, ()));
        market.initialize(&admin, &nft.address, &base_id);

        let seller = Address::generate(&env);
        let id = nft.mint(&seller, &String::from_str(&env, ""));
        nft.approve(&seller, &market.address, &id);
        market.list_nft(&seller, &id, &UNIT);

        assert_eq!(
            market.try_buy_nft(&admin, &id, &UNIT),
            Err(Ok(MarketplaceError::NotConfigured))
        );
    }

    #[test]
    fn test_rejected_proceeds_revert_purchase() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);
        s.fund(&buyer, UNIT);
        s.treasury.reject_credits();

        assert_eq!(
            s.market.try_buy_nft(&buyer, &id, &UNIT),
            Err(Ok(MarketplaceError::ProceedsRejected))
        );
        assert_eq!(s.nft.owner_of(&id), seller);
        assert_eq!(s.base.balance(&buyer), UNIT);
        assert_eq!(s.market.get_floor_price(), (UNIT, id));
    }

    #[test]
    fn test_buy_of_moved_token_fails() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let holder = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);
        s.fund(&buyer, UNIT);

        s.nft.transfer(&seller, &holder, &id);

        assert_eq!(
            s.market.try_buy_nft(&buyer, &id, &UNIT),
            Err(Ok(MarketplaceError::NotOwnerOrApproved))
        );
        assert_eq!(s.nft.owner_of(&id), holder);
        assert_eq!(s.base.balance(&buyer), UNIT);
        assert!(s.market.get_listing(&id).unwrap().active);
    }

    // === Cancel Tests ===

    #[test]
    fn test_cancel_listing() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let other = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);

        assert_eq!(
            s.market.try_cancel_listing(&other, &id),
            Err(Ok(MarketplaceError::NotSeller))
        );

        s.market.cancel_listing(&seller, &id);
        assert_eq!(s.market.get_floor_price(), (0, 0));
        assert_eq!(
            s.market.try_cancel_listing(&seller, &id),
            Err(Ok(MarketplaceError::ListingNotActive))
        );
    }

    // === Prune Tests ===

    #[test]
    fn test_prune_moved_token_restores_floor() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let holder = Address::generate(&s.env);

        let cheap = s.listed(&seller, 100);
        let other = s.listed(&seller, 300);
        s.nft.transfer(&seller, &holder, &cheap);

        // Anyone may prune once the seller can't deliver
        s.market.prune_listing(&cheap);

        assert_eq!(s.market.get_floor_price(), (300, other));
        assert!(!s.market.get_listing(&cheap).unwrap().active);
        assert_eq!(s.market.get_active_listings(), Vec::from_array(&s.env, [other]));
    }

    #[test]
    fn test_prune_revoked_operator_approval() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let id = s.nft.mint(&seller, &String::from_str(&s.env, ""));
        s.nft.set_approval_for_all(&seller, &s.market.address, &true);
        s.market.list_nft(&seller, &id, &UNIT);

        s.nft.set_approval_for_all(&seller, &s.market.address, &false);

        s.market.prune_listing(&id);
        assert_eq!(s.market.get_floor_price(), (0, 0));
        assert_eq!(s.market.active_listing_count(), 0);
    }

    #[test]
    fn test_prune_rejects_deliverable_listing() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let id = s.listed(&seller, UNIT);

        assert_eq!(
            s.market.try_prune_listing(&id),
            Err(Ok(MarketplaceError::ListingStillValid))
        );
        assert_eq!(
            s.market.try_prune_listing(&99),
            Err(Ok(MarketplaceError::ListingNotActive))
        );
        assert_eq!(s.market.get_floor_price(), (UNIT, id));
    }

    // === Floor Tests ===

    #[test]
    fn test_floor_tracks_minimum_through_changes() {
        let s = setup();
        let seller = Address::generate(&s.env);

        let a = s.listed(&seller, 500);
        let b = s.listed(&seller, 300);
        let c = s.listed(&seller, 300);
        let d = s.listed(&seller, 700);

        // Tie at 300: earliest listing wins
        assert_eq!(s.market.get_floor_price(), (300, b));

        s.market.cancel_listing(&seller, &b);
        assert_eq!(s.market.get_floor_price(), (300, c));

        s.market.cancel_listing(&seller, &c);
        assert_eq!(s.market.get_floor_price(), (500, a));

        // Reprice a non-floor listing below the floor
        s.market.list_nft(&seller, &d, &100);
        assert_eq!(s.market.get_floor_price(), (100, d));

        // Reprice the floor listing upwards
        s.market.list_nft(&seller, &d, &900);
        assert_eq!(s.market.get_floor_price(), (500, a));

        // Order is unchanged by repricing
        assert_eq!(
            s.market.get_active_listings(),
            Vec::from_array(&s.env, [a, d])
        );
    }

    #[test]
    fn test_reprice_to_tie_prefers_earlier_listing() {
        let s = setup();
        let seller = Address::generate(&s.env);

        let a = s.listed(&seller, 900);
        let b = s.listed(&seller, 400);
        assert_eq!(s.market.get_floor_price(), (400, b));

        s.market.list_nft(&seller, &a, &400);
        assert_eq!(s.market.get_floor_price(), (400, a));
    }

    #[test]
    fn test_floor_matches_brute_force_minimum() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let buyer = Address::generate(&s.env);
        s.fund(&buyer, 100 * UNIT);

        let prices = [70i128, 20, 90, 20, 55, 10, 80];
        let mut ids = [0u32; 7];
        for (i, price) in prices.iter().enumerate() {
            ids[i] = s.listed(&seller, *price);
        }

        let check = |s: &Setup| {
            let mut expected = (0i128, 0u32);
            for id in s.market.get_active_listings().iter() {
                let listing = s.market.get_listing(&id).unwrap();
                if expected.0 == 0 || listing.price < expected.0 {
                    expected = (listing.price, id);
                }
            }
            assert_eq!(s.market.get_floor_price(), expected);
        };

        check(&s);
        s.market.buy_nft(&buyer, &ids[5], &10);
        check(&s);
        s.market.buy_nft(&buyer, &ids[1], &20);
        check(&s);
        s.market.cancel_listing(&seller, &ids[3]);
        check(&s);
        s.market.list_nft(&seller, &ids[4], &95);
        check(&s);
        s.market.buy_nft(&buyer, &ids[0], &70);
        check(&s);
    }

    #[test]
    fn test_active_listings_order_and_pages() {
        let s = setup();
        let seller = Address::generate(&s.env);
        let mut ids = Vec::new(&s.env);
        for i in 0..6 {
            ids.push_back(s.listed(&seller, 100 + i));
        }

        assert_eq!(s.market.get_active_listings(), ids);

        s.market.cancel_listing(&seller, &ids.get_unchecked(2));
        assert_eq!(
            s.market.get_active_listings(),
            Vec::from_array(
                &s.env,
                [
                    ids.get_unchecked(0),
                    ids.get_unchecked(1),
                    ids.get_unchecked(3),
                    ids.get_unchecked(4),
                    ids.get_unchecked(5),
                ]
            )
        );

        let page = s.market.get_active_listings_paginated(&1, &2);
        assert_eq!(
            page,
            Vec::from_array(&s.env, [ids.get_unchecked(1), ids.get_unchecked(3)])
        );
        assert_eq!(s.market.get_active_listings_paginated(&10, &2).len(), 0);

        // Relisting a closed token appends it at the end
        s.nft.approve(&seller, &s.market.address, &ids.get_unchecked(2));
        s.market.list_nft(&seller, &ids.get_unchecked(2), &1);
        assert_eq!(s.market.get_active_listings().last(), Some(ids.get_unchecked(2)));
        assert_eq!(s.market.get_floor_price(), (1, ids.get_unchecked(2)));
    }
}
