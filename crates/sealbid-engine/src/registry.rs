//! Per-session deadline establishment.

use chrono::Utc;
use sealbid_store::TradeStore;
use sealbid_types::{EngineConfig, Result, SealbidError, SessionId};

/// Lazily establishes one commit deadline per session.
///
/// The first caller for an unseen session computes `now + commit_window`
/// and races it into the store; every caller — winner or loser — returns
/// whatever deadline the store persisted. A deadline is therefore assigned
/// at most once and is immutable afterwards.
#[derive(Debug, Clone)]
pub struct DeadlineRegistry {
    store: TradeStore,
    commit_window_secs: i64,
}

impl DeadlineRegistry {
    #[must_use]
    pub fn new(store: TradeStore, config: &EngineConfig) -> Self {
        Self {
            store,
            commit_window_secs: config.commit_window_secs(),
        }
    }

    /// Return the session's deadline, creating the trade row if absent.
    pub async fn get_or_set_deadline(&self, session: &SessionId) -> Result<i64> {
        // Fast path: the session already has a deadline.
        if let Some(trade) = self
            .store
            .trade(session)
            .await
            .map_err(SealbidError::storage)?
        {
            return Ok(trade.deadline);
        }

        let proposed = Utc::now().timestamp() + self.commit_window_secs;
        let trade = self
            .store
            .create_trade_if_absent(session, proposed)
            .await
            .map_err(SealbidError::storage)?;

        if trade.deadline != proposed {
            tracing::debug!(
                %session,
                stored = trade.deadline,
                proposed,
                "lost deadline race; adopting stored deadline"
            );
        }
        Ok(trade.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registry(window_secs: u64) -> DeadlineRegistry {
        let store = TradeStore::in_memory().await.unwrap();
        store.init().await.unwrap();
        let config = EngineConfig {
            commit_window: std::time::Duration::from_secs(window_secs),
            ..EngineConfig::default()
        };
        DeadlineRegistry::new(store, &config)
    }

    #[tokio::test]
    async fn deadline_is_in_the_commit_window() {
        let registry = registry(15).await;
        let before = Utc::now().timestamp();
        let deadline = registry
            .get_or_set_deadline(&SessionId::from("s"))
            .await
            .unwrap();
        let after = Utc::now().timestamp();
        assert!(deadline >= before + 15 && deadline <= after + 15);
    }

    #[tokio::test]
    async fn repeated_calls_return_the_same_deadline() {
        let registry = registry(15).await;
        let session = SessionId::from("s");
        let first = registry.get_or_set_deadline(&session).await.unwrap();
        for _ in 0..3 {
            assert_eq!(registry.get_or_set_deadline(&session).await.unwrap(), first);
        }
    }

    #[tokio::test]
    async fn concurrent_first_callers_agree() {
        let registry = registry(15).await;
        let session = SessionId::from("s");
        let (a, b, c) = tokio::join!(
            registry.get_or_set_deadline(&session),
            registry.get_or_set_deadline(&session),
            registry.get_or_set_deadline(&session),
        );
        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
    }

    #[tokio::test]
    async fn sessions_do_not_share_deadlines() {
        let registry = registry(15).await;
        let a = registry
            .get_or_set_deadline(&SessionId::from("a"))
            .await
            .unwrap();
        // Same window, so values may collide in seconds — assert rows are
        // independent by checking both exist with their own key.
        let b = registry
            .get_or_set_deadline(&SessionId::from("b"))
            .await
            .unwrap();
        assert_eq!(
            registry.get_or_set_deadline(&SessionId::from("a")).await.unwrap(),
            a
        );
        assert_eq!(
            registry.get_or_set_deadline(&SessionId::from("b")).await.unwrap(),
            b
        );
    }
}
