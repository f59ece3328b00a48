//! # sealbid-engine
//!
//! The trade-session state machine and settlement engine. Three components,
//! one per concern, composed by [`OtcEngine`]:
//!
//! 1. **[`DeadlineRegistry`]**: lazily establishes one commit deadline per
//!    session, idempotent under concurrent first callers.
//! 2. **[`BidIntake`]**: accepts a role-tagged price, has the oracle seal
//!    it against the session deadline, persists the ciphertext.
//! 3. **[`SettlementEngine`]**: past deadline + buffer, decrypts all bids,
//!    runs the first-fit match, and performs the session's single terminal
//!    transition.
//!
//! ## Flow
//!
//! ```text
//! submit_bid → DeadlineRegistry.get_or_set_deadline() → oracle.encrypt()
//!            → TradeStore.insert_bid()
//! status     → lazy expiry check → decrypt barrier → first_fit() →
//!              TradeStore.finalize_trade()  (conditional, exactly once)
//! ```
//!
//! The matcher itself ([`matching`]) is pure — no I/O, no clocks.

pub mod engine;
pub mod intake;
pub mod matching;
pub mod registry;
pub mod settlement;

pub use engine::OtcEngine;
pub use intake::BidIntake;
pub use registry::DeadlineRegistry;
pub use settlement::SettlementEngine;
