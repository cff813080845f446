//! Active-listing order and the cached floor.
//!
//! Listings are kept in listing order as a doubly linked list. The floor is
//! the cheapest active listing, earliest-listed first on ties. It is updated
//! in O(1) on every change except when the floor listing itself leaves the
//! book or gets more expensive, which forces a walk over the list.

use crate::storage::{
    get_active_count, get_floor, get_head, get_link, get_listing, get_tail, remove_link,
    set_active_count, set_floor, set_head, set_link, set_tail, ListLink,
};
use rather_types::{page_bounds, Floor};
use soroban_sdk::{Env, Vec};

/// Append a newly active token at the tail
pub fn append(env: &Env, token_id: u32) {
    let tail = get_tail(env);

    set_link(
        env,
        token_id,
        &ListLink {
            prev: tail,
            next: None,
        },
    );

    match tail {
        Some(tail_id) => {
            let mut tail_link = get_link(env, tail_id);
            tail_link.next = Some(token_id);
            set_link(env, tail_id, &tail_link);
        }
        None => set_head(env, Some(token_id)),
    }
    set_tail(env, Some(token_id));
    set_active_count(env, get_active_count(env) + 1);
}

/// Remove a token from the active list
pub fn unlink(env: &Env, token_id: u32) {
    let link = get_link(env, token_id);

    match link.prev {
        Some(prev_id) => {
            let mut prev_link = get_link(env, prev_id);
            prev_link.next = link.next;
            set_link(env, prev_id, &prev_link);
        }
        None => set_head(env, link.next),
    }

    match link.next {
        Some(next_id) => {
            let mut next_link = get_link(env, next_id);
            next_link.prev = link.prev;
            set_link(env, next_id, &next_link);
        }
        None => set_tail(env, link.prev),
    }

    remove_link(env, token_id);
    set_active_count(env, get_active_count(env).saturating_sub(1));
}

/// Active token ids in listing order, `[start_index, start_index + limit)`
pub fn active_ids(env: &Env, start_index: u32, limit: u32) -> Vec<u32> {
    let mut ids = Vec::new(env);
    let mut cursor = get_head(env);
    let mut position = 0u32;
    let end = start_index.saturating_add(limit);

    while let Some(token_id) = cursor {
        if position >= end {
            break;
        }
        if position >= start_index {
            ids.push_back(token_id);
        }
        position += 1;
        cursor = get_link(env, token_id).next;
    }
    ids
}

/// One page of active ids, capped at MAX_PAGE_SIZE
pub fn active_page(env: &Env, start_index: u32, limit: u32) -> Vec<u32> {
    let (start, end) = page_bounds(start_index, limit, get_active_count(env));
    active_ids(env, start, end - start)
}

/// Recompute the floor by walking every active listing
pub fn rescan(env: &Env) -> Floor {
    let mut floor = Floor::none();
    let mut cursor = get_head(env);

    while let Some(token_id) = cursor {
        if let Some(listing) = get_listing(env, token_id) {
            if listing.active && floor.is_undercut_by(listing.price) {
                floor = Floor {
                    price: listing.price,
                    token_id,
                };
            }
        }
        cursor = get_link(env, token_id).next;
    }

    set_floor(env, &floor);
    floor
}

/// Floor update after a listing at the tail
pub fn on_appended(env: &Env, token_id: u32, price: i128) {
    if get_floor(env).is_undercut_by(price) {
        set_floor(env, &Floor { price, token_id });
    }
}

/// Floor update after an active listing changed price in place
pub fn on_repriced(env: &Env, token_id: u32, old_price: i128, new_price: i128) {
    let floor = get_floor(env);

    if floor.token_id == token_id && !floor.is_none() {
        if new_price <= old_price {
            set_floor(
                env,
                &Floor {
                    price: new_price,
                    token_id,
                },
            );
        } else {
            rescan(env);
        }
    } else if floor.is_undercut_by(new_price) {
        set_floor(
            env,
            &Floor {
                price: new_price,
                token_id,
            },
        );
    } else if new_price == floor.price {
        // Ties go to the earlier listing
        rescan(env);
    }
}

/// Floor update after a token left the active list
pub fn on_removed(env: &Env, token_id: u32) {
    let floor = get_floor(env);
    if !floor.is_none() && floor.token_id == token_id {
        rescan(env);
    }
}
