//! Trade session types.
//!
//! One [`Trade`] row exists per session. Its `deadline` is assigned exactly
//! once (first caller wins) and its `status` makes a single transition from
//! `pending` to a terminal value during settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::SessionId;

/// Lifecycle status of a trade session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Collecting bids; deadline not yet processed.
    Pending,
    /// Settlement found a crossing buyer/seller pair.
    Matched,
    /// Settlement ran and no pair crossed.
    Unmatched,
}

impl TradeStatus {
    /// Parse a stored status string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "matched" => Some(Self::Matched),
            "unmatched" => Some(Self::Unmatched),
            _ => None,
        }
    }

    /// Whether this status is terminal. Terminal statuses never change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Matched | Self::Unmatched)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Matched => write!(f, "matched"),
            Self::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// A trade session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Caller-supplied primary key.
    pub session_id: SessionId,
    /// Unix timestamp (seconds) all of the session's bids are locked until.
    pub deadline: i64,
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// The matched buyer price; set only on transition to `matched`.
    pub buyer_price: Option<Decimal>,
    /// The matched seller price; set only on transition to `matched`.
    pub seller_price: Option<Decimal>,
}

impl Trade {
    /// Whether settlement has already run to a terminal status.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} deadline={}",
            self.session_id, self.status, self.deadline
        )
    }
}
