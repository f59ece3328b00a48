//! Oracle error types.

use thiserror::Error;

/// Failures from the time-lock oracle, either direction.
///
/// The engine does not retry these; it maps them into its own taxonomy and
/// surfaces them to the caller (retry policy is an external concern).
#[derive(Debug, Error)]
pub enum OracleError {
    /// Transport-level failure: the oracle could not be reached at all.
    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    /// The oracle answered with a non-success status.
    #[error("oracle rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The oracle answered 2xx but the body was not the expected shape.
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),

    /// Decryption attempted before the ciphertext's unlock time.
    #[error("ciphertext is locked until {unlock_time} (now {now})")]
    Locked { unlock_time: i64, now: i64 },

    /// The ciphertext was not produced by this oracle.
    #[error("unknown ciphertext: {0}")]
    UnknownCiphertext(String),
}
