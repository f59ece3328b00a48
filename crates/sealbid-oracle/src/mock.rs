//! Mock time-lock oracle for tests.
//!
//! Seals plaintexts in an in-memory vault keyed by generated tokens, and
//! enforces the unlock time on decrypt the way the real service does.
//! Failures can be scripted to exercise the engine's retry paths, and call
//! counters let tests assert that settlement decrypts each bid exactly once.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::{OracleError, TimelockOracle};

struct SealedEntry {
    plaintext: String,
    unlock_time: i64,
}

/// In-memory [`TimelockOracle`] for tests.
pub struct MockOracle {
    vault: RwLock<HashMap<String, SealedEntry>>,
    next_token: AtomicU64,
    fail_encrypts: AtomicU64,
    fail_decrypts: AtomicU64,
    encrypt_calls: AtomicU64,
    decrypt_calls: AtomicU64,
    decrypt_successes: AtomicU64,
}

impl MockOracle {
    /// Create an empty mock oracle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vault: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(0),
            fail_encrypts: AtomicU64::new(0),
            fail_decrypts: AtomicU64::new(0),
            encrypt_calls: AtomicU64::new(0),
            decrypt_calls: AtomicU64::new(0),
            decrypt_successes: AtomicU64::new(0),
        }
    }

    /// Make the next `n` encrypt calls fail as if the oracle were down.
    pub fn fail_next_encrypts(&self, n: u64) {
        self.fail_encrypts.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` decrypt calls fail as if the oracle were down.
    pub fn fail_next_decrypts(&self, n: u64) {
        self.fail_decrypts.store(n, Ordering::SeqCst);
    }

    /// Total encrypt calls received.
    pub fn encrypt_calls(&self) -> u64 {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    /// Total decrypt calls received, including scripted failures.
    pub fn decrypt_calls(&self) -> u64 {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    /// Decrypt calls that returned a plaintext.
    pub fn decrypt_successes(&self) -> u64 {
        self.decrypt_successes.load(Ordering::SeqCst)
    }

    fn take_scripted_failure(counter: &AtomicU64) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimelockOracle for MockOracle {
    async fn encrypt(&self, plaintext: &str, unlock_time: i64) -> Result<String, OracleError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_scripted_failure(&self.fail_encrypts) {
            return Err(OracleError::Unreachable("scripted oracle outage".into()));
        }
        let token = format!("sealed:{}", self.next_token.fetch_add(1, Ordering::SeqCst));
        let mut vault = self.vault.write().expect("vault lock poisoned");
        vault.insert(
            token.clone(),
            SealedEntry {
                plaintext: plaintext.to_string(),
                unlock_time,
            },
        );
        Ok(token)
    }

    async fn decrypt(&self, ciphertext: &str, _unlock_time: i64) -> Result<String, OracleError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_scripted_failure(&self.fail_decrypts) {
            return Err(OracleError::Unreachable("scripted oracle outage".into()));
        }

        let vault = self.vault.read().expect("vault lock poisoned");
        let entry = vault
            .get(ciphertext)
            .ok_or_else(|| OracleError::UnknownCiphertext(ciphertext.to_string()))?;

        let now = Utc::now().timestamp();
        if now < entry.unlock_time {
            return Err(OracleError::Locked {
                unlock_time: entry.unlock_time,
                now,
            });
        }

        self.decrypt_successes.fetch_add(1, Ordering::SeqCst);
        Ok(entry.plaintext.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip_after_unlock() {
        let oracle = MockOracle::new();
        let now = Utc::now().timestamp();
        let ct = oracle.encrypt("42.5", now).await.unwrap();
        assert_ne!(ct, "42.5", "ciphertext must not be the plaintext");
        let plain = oracle.decrypt(&ct, now).await.unwrap();
        assert_eq!(plain, "42.5");
    }

    #[tokio::test]
    async fn locked_before_unlock_time() {
        let oracle = MockOracle::new();
        let unlock = Utc::now().timestamp() + 3600;
        let ct = oracle.encrypt("99", unlock).await.unwrap();
        let err = oracle.decrypt(&ct, unlock).await.unwrap_err();
        assert!(matches!(err, OracleError::Locked { .. }));
        assert_eq!(oracle.decrypt_successes(), 0);
    }

    #[tokio::test]
    async fn unknown_ciphertext_rejected() {
        let oracle = MockOracle::new();
        let err = oracle.decrypt("not-a-token", 0).await.unwrap_err();
        assert!(matches!(err, OracleError::UnknownCiphertext(_)));
    }

    #[tokio::test]
    async fn scripted_failures_then_recovery() {
        let oracle = MockOracle::new();
        let now = Utc::now().timestamp();
        let ct = oracle.encrypt("7", now).await.unwrap();

        oracle.fail_next_decrypts(2);
        assert!(oracle.decrypt(&ct, now).await.is_err());
        assert!(oracle.decrypt(&ct, now).await.is_err());
        assert_eq!(oracle.decrypt(&ct, now).await.unwrap(), "7");

        assert_eq!(oracle.decrypt_calls(), 3);
        assert_eq!(oracle.decrypt_successes(), 1);
    }

    #[tokio::test]
    async fn scripted_encrypt_failure() {
        let oracle = MockOracle::new();
        oracle.fail_next_encrypts(1);
        assert!(oracle.encrypt("7", 0).await.is_err());
        assert!(oracle.encrypt("7", 0).await.is_ok());
        assert_eq!(oracle.encrypt_calls(), 2);
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let oracle = MockOracle::new();
        let a = oracle.encrypt("1", 0).await.unwrap();
        let b = oracle.encrypt("1", 0).await.unwrap();
        assert_ne!(a, b);
    }
}
