//! Post-deadline settlement: decrypt, match, transition exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;

use sealbid_oracle::TimelockOracle;
use sealbid_store::TradeStore;
use sealbid_types::{
    Bid, BidId, EngineConfig, Result, SealbidError, SessionId, SessionView, Trade, TradeStatus,
};

use crate::matching;

/// Drives a session from `pending` to its terminal status.
///
/// Expiry is lazy and pull-based: every status query compares the current
/// time against `deadline + decrypt_buffer`; nothing is scheduled. The
/// first query past that point performs decrypt-and-match; all later
/// queries return the stored result without touching the oracle.
///
/// Two serialization layers keep the terminal transition exactly-once:
/// a per-session async mutex around decrypt-and-match (saves duplicate
/// oracle work within this process), and the store's conditional
/// `pending -> terminal` update (authoritative, holds even across
/// processes sharing the database).
pub struct SettlementEngine {
    store: TradeStore,
    oracle: Arc<dyn TimelockOracle>,
    decrypt_buffer_secs: i64,
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(store: TradeStore, oracle: Arc<dyn TimelockOracle>, config: &EngineConfig) -> Self {
        Self {
            store,
            oracle,
            decrypt_buffer_secs: config.decrypt_buffer_secs(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Report the session's current state, settling it if its deadline
    /// (plus buffer) has passed and it is still `pending`.
    pub async fn status(&self, session: &SessionId) -> Result<SessionView> {
        let trade = self.load_trade(session).await?;

        let now = Utc::now().timestamp();
        if now < trade.deadline + self.decrypt_buffer_secs {
            // Inside the confidentiality window: ciphertext only.
            let bids = self.load_bids(session).await?;
            return Ok(SessionView::sealed(&trade, &bids));
        }

        if trade.is_settled() {
            return self.settled_view(&trade).await;
        }

        let lock = self.session_lock(session);
        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent query may have settled the
        // session while we waited.
        let trade = self.load_trade(session).await?;
        if trade.is_settled() {
            return self.settled_view(&trade).await;
        }

        self.decrypt_and_match(&trade).await
    }

    // -----------------------------------------------------------------
    // Decrypt-and-match (runs under the session lock)
    // -----------------------------------------------------------------

    async fn decrypt_and_match(&self, trade: &Trade) -> Result<SessionView> {
        let session = &trade.session_id;
        let mut bids = self.load_bids(session).await?;

        let decrypted = self.decrypt_sealed_bids(trade, &bids).await?;
        for (id, price) in decrypted {
            if let Some(bid) = bids.iter_mut().find(|b| b.id == id) {
                bid.decrypted_price = Some(price);
            }
        }

        let (buyers, sellers) = matching::partition_prices(&bids);
        let (status, buyer_price, seller_price) = match matching::first_fit(&buyers, &sellers) {
            Some(pair) => (TradeStatus::Matched, Some(pair.buyer), Some(pair.seller)),
            None => (TradeStatus::Unmatched, None, None),
        };

        let won = self
            .store
            .finalize_trade(session, status, buyer_price, seller_price)
            .await
            .map_err(SealbidError::storage)?;

        if !won {
            // Another settler (possibly in another process) committed the
            // terminal transition first; its stored result is authoritative.
            let trade = self.load_trade(session).await?;
            return self.settled_view(&trade).await;
        }

        tracing::info!(%session, %status, "session settled");
        let trade = Trade {
            session_id: session.clone(),
            deadline: trade.deadline,
            status,
            buyer_price,
            seller_price,
        };
        Ok(SessionView::settled(&trade, &bids))
    }

    /// Decrypt every bid whose price is still sealed, concurrently, and
    /// persist each success as it completes.
    ///
    /// `join_all` is the completion barrier: matching never runs against a
    /// half-updated set. It also does not cancel siblings on failure, so a
    /// partial outage leaves every successful decrypt durable — a retry
    /// only re-attempts the bids still null.
    async fn decrypt_sealed_bids(
        &self,
        trade: &Trade,
        bids: &[Bid],
    ) -> Result<Vec<(BidId, Decimal)>> {
        let jobs = bids
            .iter()
            .filter(|bid| bid.decrypted_price.is_none())
            .map(|bid| {
                let id = bid.id;
                let ciphertext = bid.encrypted_price.clone();
                async move {
                    let plaintext = self
                        .oracle
                        .decrypt(&ciphertext, trade.deadline)
                        .await
                        .map_err(SealbidError::decryption)?;
                    let price: Decimal = plaintext
                        .trim()
                        .parse()
                        .map_err(|_| SealbidError::UnparseablePrice { raw: plaintext })?;
                    self.store
                        .set_decrypted_price(id, price)
                        .await
                        .map_err(SealbidError::storage)?;
                    Ok::<(BidId, Decimal), SealbidError>((id, price))
                }
            });

        let mut decrypted = Vec::new();
        for result in futures::future::join_all(jobs).await {
            decrypted.push(result?);
        }
        Ok(decrypted)
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn session_lock(&self, session: &SessionId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("session lock table poisoned");
        locks.entry(session.clone()).or_default().clone()
    }

    async fn load_trade(&self, session: &SessionId) -> Result<Trade> {
        self.store
            .trade(session)
            .await
            .map_err(SealbidError::storage)?
            .ok_or_else(|| SealbidError::SessionNotFound(session.clone()))
    }

    async fn load_bids(&self, session: &SessionId) -> Result<Vec<Bid>> {
        self.store
            .bids(session)
            .await
            .map_err(SealbidError::storage)
    }

    async fn settled_view(&self, trade: &Trade) -> Result<SessionView> {
        let bids = self.load_bids(&trade.session_id).await?;
        Ok(SessionView::settled(trade, &bids))
    }
}
