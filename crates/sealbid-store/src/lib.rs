//! # sealbid-store
//!
//! Durable storage for the Sealbid matcher: one `trades` row per session,
//! many `bids` rows per trade, SQLite via `sqlx`.
//!
//! This crate owns every cross-process serialization point the engine
//! leans on:
//!
//! - **Deadline creation**: `create_trade_if_absent` is a conflict-free
//!   insert plus read-back — concurrent first callers all observe the one
//!   persisted deadline.
//! - **Terminal transition**: `finalize_trade` is a conditional update
//!   guarded on `status = 'pending'` — exactly one caller wins.
//! - **Decrypted prices**: `set_decrypted_price` only fills `NULL`, so the
//!   value is write-once.
//!
//! Prices are stored as TEXT-encoded decimals, never floats.

mod store;

pub use store::TradeStore;
