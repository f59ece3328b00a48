//! The oracle interface the engine consumes.

use async_trait::async_trait;

use crate::OracleError;

/// A time-lock encryption oracle.
///
/// `encrypt` seals a plaintext so it cannot be recovered before
/// `unlock_time`; `decrypt` is only guaranteed to succeed once the current
/// time has reached `unlock_time`. Both are single request/response calls —
/// no streaming, no partial results.
///
/// Implementations:
/// - [`NanoShutterOracle`](crate::NanoShutterOracle): the real HTTP service
/// - [`MockOracle`](crate::MockOracle): in-memory, for tests
#[async_trait]
pub trait TimelockOracle: Send + Sync {
    /// Seal `plaintext` until `unlock_time` (epoch seconds).
    async fn encrypt(&self, plaintext: &str, unlock_time: i64) -> Result<String, OracleError>;

    /// Recover the plaintext of a ciphertext sealed until `unlock_time`.
    async fn decrypt(&self, ciphertext: &str, unlock_time: i64) -> Result<String, OracleError>;
}
