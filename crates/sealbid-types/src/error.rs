//! Error types for the Sealbid matcher.
//!
//! All errors use the `SB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Session errors
//! - 2xx: Intake / encryption errors
//! - 3xx: Settlement / decryption errors
//! - 4xx: Storage errors
//! - 9xx: General / internal errors

use std::fmt;

use thiserror::Error;

use crate::SessionId;

/// Central error enum for all Sealbid operations.
#[derive(Debug, Error)]
pub enum SealbidError {
    // =================================================================
    // Session Errors (1xx)
    // =================================================================
    /// A status query named a session no trade row exists for.
    #[error("SB_ERR_100: Trade session not found: {0}")]
    SessionNotFound(SessionId),

    // =================================================================
    // Intake / Encryption Errors (2xx)
    // =================================================================
    /// The time-lock oracle was unreachable or rejected the encrypt call.
    /// No bid row is persisted when this is returned.
    #[error("SB_ERR_200: Encryption failed: {reason}")]
    Encryption { reason: String },

    // =================================================================
    // Settlement / Decryption Errors (3xx)
    // =================================================================
    /// The oracle was unreachable or rejected a decrypt call. The trade
    /// stays `pending`; a later query retries the still-encrypted bids.
    #[error("SB_ERR_300: Decryption failed: {reason}")]
    Decryption { reason: String },

    /// The oracle decrypted successfully but the plaintext is not a price.
    #[error("SB_ERR_301: Decrypted plaintext is not a price: {raw:?}")]
    UnparseablePrice { raw: String },

    // =================================================================
    // Storage Errors (4xx)
    // =================================================================
    /// The persistence layer is unavailable or a statement failed.
    #[error("SB_ERR_400: Storage error: {0}")]
    Storage(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SB_ERR_900: Internal error: {0}")]
    Internal(String),
}

impl SealbidError {
    /// Wrap an oracle failure from the encrypt path.
    pub fn encryption(err: impl fmt::Display) -> Self {
        Self::Encryption {
            reason: err.to_string(),
        }
    }

    /// Wrap an oracle failure from the decrypt path.
    pub fn decryption(err: impl fmt::Display) -> Self {
        Self::Decryption {
            reason: err.to_string(),
        }
    }

    /// Wrap a storage-layer failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Whether the caller can usefully retry the same request.
    ///
    /// Storage and oracle failures are transient ("try again"); an unknown
    /// session or garbage plaintext will not heal on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Encryption { .. } | Self::Decryption { .. } | Self::Storage(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealbidError>;
