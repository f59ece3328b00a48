//! # sealbid-types
//!
//! Shared types, errors, and configuration for the **Sealbid** time-lock
//! OTC matcher.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`SessionId`], [`BidId`]
//! - **Bid model**: [`Bid`], [`BidRole`], [`BidReceipt`]
//! - **Trade model**: [`Trade`], [`TradeStatus`]
//! - **Status views**: [`SessionView`], [`BidView`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`SealbidError`] with `SB_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod bid;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod trade;
pub mod view;

// Re-export all primary types at crate root for ergonomic imports:
//   use sealbid_types::{Bid, BidRole, Trade, TradeStatus, ...};

pub use bid::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use trade::*;
pub use view::*;

// Constants are accessed via `sealbid_types::constants::FOO`
// (not re-exported to avoid name collisions).
