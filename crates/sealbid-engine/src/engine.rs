//! The engine facade: one handle over the three components.

use std::sync::Arc;

use rust_decimal::Decimal;

use sealbid_oracle::TimelockOracle;
use sealbid_store::TradeStore;
use sealbid_types::{BidReceipt, EngineConfig, Result, SessionId, SessionView};

use crate::{BidIntake, DeadlineRegistry, SettlementEngine};

/// Everything a caller needs: submit bids, query status.
///
/// Wire once at startup and share behind an `Arc`; all components are safe
/// for concurrent use and sessions are independent of each other.
pub struct OtcEngine {
    intake: BidIntake,
    settlement: SettlementEngine,
}

impl OtcEngine {
    #[must_use]
    pub fn new(store: TradeStore, oracle: Arc<dyn TimelockOracle>, config: &EngineConfig) -> Self {
        let registry = DeadlineRegistry::new(store.clone(), config);
        let intake = BidIntake::new(registry, Arc::clone(&oracle), store.clone());
        let settlement = SettlementEngine::new(store, oracle, config);
        Self { intake, settlement }
    }

    /// Submit a role-tagged price for a session. See [`BidIntake::submit_bid`].
    pub async fn submit_bid(
        &self,
        session: &SessionId,
        role: &str,
        price: Decimal,
    ) -> Result<BidReceipt> {
        self.intake.submit_bid(session, role, price).await
    }

    /// Report (and, past the deadline, settle) a session.
    /// See [`SettlementEngine::status`].
    pub async fn status(&self, session: &SessionId) -> Result<SessionView> {
        self.settlement.status(session).await
    }
}
