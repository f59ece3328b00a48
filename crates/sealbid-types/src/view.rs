//! Phase-shaped status views.
//!
//! A status query returns a different shape depending on where the session
//! is in its lifecycle: before `deadline + buffer` the view carries
//! ciphertext only; once the trade is terminal it carries decrypted prices
//! and the matched pair. The constructors here are the single place that
//! decides what a bid reveals, so confidentiality cannot leak from a
//! forgotten field elsewhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Bid, Trade, TradeStatus};

/// One bid as reported in a status view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    /// Raw role string as submitted.
    pub role: String,
    /// The time-locked ciphertext.
    pub encrypted_price: String,
    /// Present only once the session has settled.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub decrypted_price: Option<Decimal>,
    /// Submission time (epoch seconds).
    pub timestamp: i64,
}

/// The full status-query response body for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// The session's bid deadline (epoch seconds).
    pub deadline: i64,
    /// All bids for the session, in submission order.
    pub bids: Vec<BidView>,
    /// The matched buyer price, once terminal and matched.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub matched_buyer_price: Option<Decimal>,
    /// The matched seller price, once terminal and matched.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub matched_seller_price: Option<Decimal>,
}

impl SessionView {
    /// View of a session whose deadline (plus buffer) has not passed.
    ///
    /// Decrypted prices are masked unconditionally; nothing the store holds
    /// can make a sealed view reveal a price.
    #[must_use]
    pub fn sealed(trade: &Trade, bids: &[Bid]) -> Self {
        Self {
            status: trade.status,
            deadline: trade.deadline,
            bids: bids
                .iter()
                .map(|b| BidView {
                    role: b.role.clone(),
                    encrypted_price: b.encrypted_price.clone(),
                    decrypted_price: None,
                    timestamp: b.submitted_at,
                })
                .collect(),
            matched_buyer_price: None,
            matched_seller_price: None,
        }
    }

    /// View of a settled session: decrypted prices and the matched pair.
    #[must_use]
    pub fn settled(trade: &Trade, bids: &[Bid]) -> Self {
        Self {
            status: trade.status,
            deadline: trade.deadline,
            bids: bids
                .iter()
                .map(|b| BidView {
                    role: b.role.clone(),
                    encrypted_price: b.encrypted_price.clone(),
                    decrypted_price: b.decrypted_price,
                    timestamp: b.submitted_at,
                })
                .collect(),
            matched_buyer_price: trade.buyer_price,
            matched_seller_price: trade.seller_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BidId, SessionId};

    fn trade(status: TradeStatus) -> Trade {
        Trade {
            session_id: SessionId::from("s"),
            deadline: 1_700_000_015,
            status,
            buyer_price: None,
            seller_price: None,
        }
    }

    fn bid_with_price(price: Option<Decimal>) -> Bid {
        Bid {
            id: BidId(1),
            session_id: SessionId::from("s"),
            role: "buyer".into(),
            encrypted_price: "ct".into(),
            decrypted_price: price,
            submitted_at: 1_700_000_001,
        }
    }

    #[test]
    fn sealed_view_masks_decrypted_prices() {
        // Even a bid the store already decrypted must not leak pre-deadline.
        let bids = vec![bid_with_price(Some(Decimal::new(10, 0)))];
        let view = SessionView::sealed(&trade(TradeStatus::Pending), &bids);
        assert!(view.bids[0].decrypted_price.is_none());
        assert!(view.matched_buyer_price.is_none());
    }

    #[test]
    fn settled_view_reveals_prices() {
        let mut t = trade(TradeStatus::Matched);
        t.buyer_price = Some(Decimal::new(10, 0));
        t.seller_price = Some(Decimal::new(8, 0));
        let bids = vec![bid_with_price(Some(Decimal::new(10, 0)))];
        let view = SessionView::settled(&t, &bids);
        assert_eq!(view.bids[0].decrypted_price, Some(Decimal::new(10, 0)));
        assert_eq!(view.matched_buyer_price, Some(Decimal::new(10, 0)));
        assert_eq!(view.matched_seller_price, Some(Decimal::new(8, 0)));
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let bids = vec![bid_with_price(None)];
        let view = SessionView::sealed(&trade(TradeStatus::Pending), &bids);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["bids"][0].get("encryptedPrice").is_some());
        assert!(json["bids"][0].get("decryptedPrice").is_none(), "masked field is omitted");
        assert!(json.get("matchedBuyerPrice").is_none());
    }

    #[test]
    fn matched_prices_serialize_as_numbers() {
        let mut t = trade(TradeStatus::Matched);
        t.buyer_price = Some(Decimal::new(105, 1));
        t.seller_price = Some(Decimal::new(8, 0));
        let view = SessionView::settled(&t, &[]);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["matchedBuyerPrice"].is_number());
        assert!((json["matchedBuyerPrice"].as_f64().unwrap() - 10.5).abs() < 1e-9);
    }
}
