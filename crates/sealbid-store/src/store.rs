//! The trade/bid store.

use std::path::Path;

use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use sealbid_types::{Bid, BidId, SessionId, Trade, TradeStatus};

/// Storage for trade sessions and their bids.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TradeStore {
    pool: SqlitePool,
}

impl TradeStore {
    /// Wrap an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) a database file.
    pub async fn connect(db_path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path.as_ref().display());
        let pool = SqlitePool::connect(&db_url).await?;
        Ok(Self { pool })
    }

    /// An in-memory database, for tests. Single connection: SQLite gives
    /// every in-memory connection its own database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                session_id   TEXT PRIMARY KEY,
                deadline     INTEGER NOT NULL,
                status       TEXT NOT NULL,
                buyer_price  TEXT,
                seller_price TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bids (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id      TEXT NOT NULL REFERENCES trades(session_id),
                role            TEXT NOT NULL,
                encrypted_price TEXT NOT NULL,
                decrypted_price TEXT,
                submitted_at    INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_bids_session ON bids(session_id, id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("trade/bid schema ready");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Trades
    // -----------------------------------------------------------------

    /// Fetch a trade row, if the session exists.
    pub async fn trade(&self, session: &SessionId) -> Result<Option<Trade>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT session_id, deadline, status, buyer_price, seller_price \
             FROM trades WHERE session_id = ?",
        )
        .bind(session.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(trade_from_row).transpose()
    }

    /// Create the trade row with the given deadline unless one already
    /// exists, then return the persisted row.
    ///
    /// The insert is conflict-free (`ON CONFLICT DO NOTHING`), so under
    /// concurrent first callers exactly one deadline value lands and every
    /// caller reads it back — losers never observe their own computed
    /// deadline.
    pub async fn create_trade_if_absent(
        &self,
        session: &SessionId,
        deadline: i64,
    ) -> Result<Trade, sqlx::Error> {
        sqlx::query(
            "INSERT INTO trades (session_id, deadline, status) VALUES (?, ?, ?) \
             ON CONFLICT(session_id) DO NOTHING",
        )
        .bind(session.as_str())
        .bind(deadline)
        .bind(TradeStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        self.trade(session).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Terminal transition: `pending -> status`, with the matched pair.
    ///
    /// Conditional on the row still being `pending`; returns `true` iff
    /// this caller performed the transition. A `false` means another
    /// settler won — re-read the row for the stored result.
    pub async fn finalize_trade(
        &self,
        session: &SessionId,
        status: TradeStatus,
        buyer_price: Option<Decimal>,
        seller_price: Option<Decimal>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE trades SET status = ?, buyer_price = ?, seller_price = ? \
             WHERE session_id = ? AND status = ?",
        )
        .bind(status.to_string())
        .bind(buyer_price.map(|p| p.to_string()))
        .bind(seller_price.map(|p| p.to_string()))
        .bind(session.as_str())
        .bind(TradeStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // -----------------------------------------------------------------
    // Bids
    // -----------------------------------------------------------------

    /// Insert a bid with its ciphertext. Returns the assigned id.
    pub async fn insert_bid(
        &self,
        session: &SessionId,
        role: &str,
        encrypted_price: &str,
        submitted_at: i64,
    ) -> Result<BidId, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO bids (session_id, role, encrypted_price, submitted_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(session.as_str())
        .bind(role)
        .bind(encrypted_price)
        .bind(submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(BidId(result.last_insert_rowid()))
    }

    /// All bids for a session, in insertion (id) order.
    pub async fn bids(&self, session: &SessionId) -> Result<Vec<Bid>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, session_id, role, encrypted_price, decrypted_price, submitted_at \
             FROM bids WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bid_from_row).collect()
    }

    /// Record a bid's decrypted price. Write-once: a bid whose price is
    /// already set is left untouched.
    pub async fn set_decrypted_price(
        &self,
        bid: BidId,
        price: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bids SET decrypted_price = ? WHERE id = ? AND decrypted_price IS NULL",
        )
        .bind(price.to_string())
        .bind(bid.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn trade_from_row(row: &SqliteRow) -> Result<Trade, sqlx::Error> {
    let status_raw: String = row.try_get("status")?;
    let status = TradeStatus::parse(&status_raw).ok_or_else(|| {
        sqlx::Error::Decode(format!("unknown trade status {status_raw:?}").into())
    })?;

    Ok(Trade {
        session_id: SessionId::new(row.try_get::<String, _>("session_id")?),
        deadline: row.try_get("deadline")?,
        status,
        buyer_price: decimal_column(row, "buyer_price")?,
        seller_price: decimal_column(row, "seller_price")?,
    })
}

fn bid_from_row(row: &SqliteRow) -> Result<Bid, sqlx::Error> {
    Ok(Bid {
        id: BidId(row.try_get("id")?),
        session_id: SessionId::new(row.try_get::<String, _>("session_id")?),
        role: row.try_get("role")?,
        encrypted_price: row.try_get("encrypted_price")?,
        decrypted_price: decimal_column(row, "decrypted_price")?,
        submitted_at: row.try_get("submitted_at")?,
    })
}

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Option<Decimal>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| {
        s.parse::<Decimal>().map_err(|e| {
            sqlx::Error::Decode(format!("bad decimal in column {column}: {e}").into())
        })
    })
    .transpose()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> TradeStore {
        let store = TradeStore::in_memory().await.unwrap();
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let store = store().await;
        store.init().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let store = store().await;
        assert!(store.trade(&SessionId::from("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_if_absent_first_writer_wins() {
        let store = store().await;
        let session = SessionId::from("s1");

        let first = store.create_trade_if_absent(&session, 100).await.unwrap();
        assert_eq!(first.deadline, 100);
        assert_eq!(first.status, TradeStatus::Pending);

        // A later caller with its own computed deadline reads back the winner's.
        let second = store.create_trade_if_absent(&session, 999).await.unwrap();
        assert_eq!(second.deadline, 100);

        let stored = store.trade(&session).await.unwrap().unwrap();
        assert_eq!(stored.deadline, 100);
    }

    #[tokio::test]
    async fn bids_come_back_in_insertion_order() {
        let store = store().await;
        let session = SessionId::from("s1");
        store.create_trade_if_absent(&session, 100).await.unwrap();

        let a = store.insert_bid(&session, "buyer", "ct-a", 1).await.unwrap();
        let b = store.insert_bid(&session, "seller", "ct-b", 2).await.unwrap();
        let c = store.insert_bid(&session, "observer", "ct-c", 3).await.unwrap();
        assert!(a < b && b < c);

        let bids = store.bids(&session).await.unwrap();
        assert_eq!(bids.len(), 3);
        assert_eq!(bids[0].encrypted_price, "ct-a");
        assert_eq!(bids[2].role, "observer");
        assert!(bids.iter().all(|b| b.decrypted_price.is_none()));
    }

    #[tokio::test]
    async fn decrypted_price_is_write_once() {
        let store = store().await;
        let session = SessionId::from("s1");
        store.create_trade_if_absent(&session, 100).await.unwrap();
        let id = store.insert_bid(&session, "buyer", "ct", 1).await.unwrap();

        store.set_decrypted_price(id, Decimal::new(10, 0)).await.unwrap();
        // Second write is a no-op.
        store.set_decrypted_price(id, Decimal::new(20, 0)).await.unwrap();

        let bids = store.bids(&session).await.unwrap();
        assert_eq!(bids[0].decrypted_price, Some(Decimal::new(10, 0)));
    }

    #[tokio::test]
    async fn finalize_is_a_single_transition() {
        let store = store().await;
        let session = SessionId::from("s1");
        store.create_trade_if_absent(&session, 100).await.unwrap();

        let won = store
            .finalize_trade(
                &session,
                TradeStatus::Matched,
                Some(Decimal::new(10, 0)),
                Some(Decimal::new(8, 0)),
            )
            .await
            .unwrap();
        assert!(won);

        // A losing concurrent settler must not overwrite the result.
        let won_again = store
            .finalize_trade(
                &session,
                TradeStatus::Unmatched,
                None,
                None,
            )
            .await
            .unwrap();
        assert!(!won_again);

        let stored = store.trade(&session).await.unwrap().unwrap();
        assert_eq!(stored.status, TradeStatus::Matched);
        assert_eq!(stored.buyer_price, Some(Decimal::new(10, 0)));
        assert_eq!(stored.seller_price, Some(Decimal::new(8, 0)));
    }

    #[tokio::test]
    async fn finalize_unmatched_leaves_prices_null() {
        let store = store().await;
        let session = SessionId::from("s1");
        store.create_trade_if_absent(&session, 100).await.unwrap();

        let won = store
            .finalize_trade(&session, TradeStatus::Unmatched, None, None)
            .await
            .unwrap();
        assert!(won);

        let stored = store.trade(&session).await.unwrap().unwrap();
        assert_eq!(stored.status, TradeStatus::Unmatched);
        assert!(stored.buyer_price.is_none());
        assert!(stored.seller_price.is_none());
    }

    #[tokio::test]
    async fn fractional_prices_survive_text_roundtrip() {
        let store = store().await;
        let session = SessionId::from("s1");
        store.create_trade_if_absent(&session, 100).await.unwrap();
        let id = store.insert_bid(&session, "buyer", "ct", 1).await.unwrap();

        let price: Decimal = "10.125".parse().unwrap();
        store.set_decrypted_price(id, price).await.unwrap();

        let bids = store.bids(&session).await.unwrap();
        assert_eq!(bids[0].decrypted_price, Some(price));
    }
}
