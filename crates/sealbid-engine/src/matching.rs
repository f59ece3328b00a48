//! Pure first-fit price matching.
//!
//! The only functions this module exposes are side-effect free: no store,
//! no oracle, no clock. Settlement hands them the fully-decrypted bid set
//! and persists whatever they decide.
//!
//! ## The rule
//!
//! Buyer prices are scanned in submission order; for each, seller prices
//! are scanned in submission order; the first pair with
//! `buyer >= seller` is the match and iteration stops immediately. This is
//! deliberately first-fit, not price-improving: given buyers `[10, 7]` and
//! sellers `[8, 6]`, the match is `(10, 8)` even though `(10, 6)` would be
//! better for the buyer.

use rust_decimal::Decimal;
use sealbid_types::{Bid, BidRole};

/// A crossing buyer/seller price pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub buyer: Decimal,
    pub seller: Decimal,
}

/// Split decrypted bid prices into buyer and seller lists, preserving
/// submission order.
///
/// Bids without a decrypted price are skipped (they cannot occur after a
/// successful decrypt barrier), and bids whose role is neither `buyer` nor
/// `seller` are commercially inert — persisted, reported, never matched.
#[must_use]
pub fn partition_prices(bids: &[Bid]) -> (Vec<Decimal>, Vec<Decimal>) {
    let mut buyers = Vec::new();
    let mut sellers = Vec::new();
    for bid in bids {
        let Some(price) = bid.decrypted_price else {
            continue;
        };
        match bid.parsed_role() {
            Some(BidRole::Buyer) => buyers.push(price),
            Some(BidRole::Seller) => sellers.push(price),
            None => {}
        }
    }
    (buyers, sellers)
}

/// First-fit scan over the two price lists.
///
/// Returns the first `(buyer, seller)` pair in submission order with
/// `buyer >= seller`, or `None` if no pair crosses.
#[must_use]
pub fn first_fit(buyers: &[Decimal], sellers: &[Decimal]) -> Option<MatchedPair> {
    for &buyer in buyers {
        for &seller in sellers {
            if buyer >= seller {
                return Some(MatchedPair { buyer, seller });
            }
        }
    }
    None
}
