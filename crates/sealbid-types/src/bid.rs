//! Bid types for the Sealbid matcher.
//!
//! A bid's price exists in two forms: the opaque ciphertext produced by the
//! time-lock oracle at intake, and the decrypted price filled in exactly
//! once during settlement. Before the session deadline only the ciphertext
//! exists anywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BidId, SessionId};

/// Which side of the trade a bid is on.
///
/// Role strings are persisted verbatim; parsing is deliberately lossy.
/// A bid whose stored role is neither `"buyer"` nor `"seller"` is kept and
/// reported in status views but is inert for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidRole {
    Buyer,
    Seller,
}

impl BidRole {
    /// Parse a stored role string. Exact match only — unknown roles are
    /// not an error, they are simply excluded from matching.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "buyer" => Some(Self::Buyer),
            "seller" => Some(Self::Seller),
            _ => None,
        }
    }
}

impl std::fmt::Display for BidRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

/// A persisted bid row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    /// Store-assigned monotonic identifier (insertion order).
    pub id: BidId,
    /// The session this bid belongs to.
    pub session_id: SessionId,
    /// Raw role string as submitted (see [`BidRole::parse`]).
    pub role: String,
    /// Ciphertext from the time-lock oracle, bound to the session deadline.
    pub encrypted_price: String,
    /// Filled exactly once during settlement; `None` until then.
    pub decrypted_price: Option<Decimal>,
    /// Submission time (epoch seconds). Informational only.
    pub submitted_at: i64,
}

impl Bid {
    /// The bid's role, if it is one the matcher recognizes.
    #[must_use]
    pub fn parsed_role(&self) -> Option<BidRole> {
        BidRole::parse(&self.role)
    }
}

/// Returned to the submitter: the deadline the bid's ciphertext is bound to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BidReceipt {
    /// Unix timestamp (seconds) after which the session's bids unlock.
    pub deadline: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_exact_match() {
        assert_eq!(BidRole::parse("buyer"), Some(BidRole::Buyer));
        assert_eq!(BidRole::parse("seller"), Some(BidRole::Seller));
        // Case-sensitive, like the stored strings.
        assert_eq!(BidRole::parse("Buyer"), None);
        assert_eq!(BidRole::parse("observer"), None);
        assert_eq!(BidRole::parse(""), None);
    }

    #[test]
    fn role_display_roundtrips_through_parse() {
        for role in [BidRole::Buyer, BidRole::Seller] {
            assert_eq!(BidRole::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn unknown_role_is_kept_but_inert() {
        let bid = Bid {
            id: BidId(1),
            session_id: SessionId::from("s"),
            role: "market-maker".into(),
            encrypted_price: "ct".into(),
            decrypted_price: None,
            submitted_at: 0,
        };
        assert_eq!(bid.parsed_role(), None);
        assert_eq!(bid.role, "market-maker");
    }

    #[test]
    fn bid_serde_roundtrip() {
        let bid = Bid {
            id: BidId(9),
            session_id: SessionId::from("s"),
            role: "buyer".into(),
            encrypted_price: "ciphertext".into(),
            decrypted_price: Some(Decimal::new(105, 1)),
            submitted_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&bid).unwrap();
        let back: Bid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, bid.id);
        assert_eq!(back.decrypted_price, bid.decrypted_price);
    }
}
