//! Encrypted bid intake.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use sealbid_oracle::TimelockOracle;
use sealbid_store::TradeStore;
use sealbid_types::{BidReceipt, Result, SealbidError, SessionId};

use crate::registry::DeadlineRegistry;

/// Accepts a role-tagged price, seals it against the session deadline, and
/// persists the ciphertext.
///
/// Effect order matters: deadline first (creating the trade row if this is
/// the session's first bid), then the oracle round-trip, then the bid row.
/// An oracle failure leaves no bid behind; a storage failure after
/// encryption discards the ciphertext — encryption is never cached, the
/// caller retries the whole submission.
pub struct BidIntake {
    registry: DeadlineRegistry,
    oracle: Arc<dyn TimelockOracle>,
    store: TradeStore,
}

impl BidIntake {
    #[must_use]
    pub fn new(
        registry: DeadlineRegistry,
        oracle: Arc<dyn TimelockOracle>,
        store: TradeStore,
    ) -> Self {
        Self {
            registry,
            oracle,
            store,
        }
    }

    /// Submit one bid. The role string is persisted verbatim; roles the
    /// matcher does not recognize are accepted here and ignored there.
    pub async fn submit_bid(
        &self,
        session: &SessionId,
        role: &str,
        price: Decimal,
    ) -> Result<BidReceipt> {
        let deadline = self.registry.get_or_set_deadline(session).await?;

        let ciphertext = self
            .oracle
            .encrypt(&price.to_string(), deadline)
            .await
            .map_err(SealbidError::encryption)?;

        let submitted_at = Utc::now().timestamp();
        let id = self
            .store
            .insert_bid(session, role, &ciphertext, submitted_at)
            .await
            .map_err(SealbidError::storage)?;

        tracing::info!(%session, %id, role, deadline, "bid sealed and persisted");
        Ok(BidReceipt { deadline })
    }
}
