//! # sealbid-oracle
//!
//! The time-lock encryption boundary. Sealbid never implements the
//! cryptography itself — it hands a plaintext and an unlock timestamp to a
//! remote oracle and gets back a ciphertext that cannot be decrypted before
//! that timestamp.
//!
//! - [`TimelockOracle`]: the async interface the engine consumes
//! - [`NanoShutterOracle`]: HTTP client for the NanoShutter service
//! - [`MockOracle`]: in-memory oracle for tests, with scripted failures
//! - [`OracleError`]: failure taxonomy for both directions

mod client;
mod error;
mod mock;
mod timelock;

pub use client::NanoShutterOracle;
pub use error::OracleError;
pub use mock::MockOracle;
pub use timelock::TimelockOracle;
