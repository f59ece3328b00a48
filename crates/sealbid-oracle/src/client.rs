//! HTTP client for the NanoShutter time-lock service.
//!
//! Two endpoints, both POST with a JSON body and a `{"message": …}` reply:
//!
//! ```text
//! POST {base}/encrypt/with_time   {"cypher_text": <plaintext>, "timestamp": <unlock>}
//! POST {base}/decrypt/with_time   {"encrypted_msg": <ciphertext>, "timestamp": <unlock>}
//! ```
//!
//! Field names (including `cypher_text` for the *plaintext*) are the
//! upstream API's, not ours.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{OracleError, TimelockOracle};

/// Client for a NanoShutter-compatible time-lock oracle.
#[derive(Debug, Clone)]
pub struct NanoShutterOracle {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct EncryptRequest<'a> {
    cypher_text: &'a str,
    timestamp: i64,
}

#[derive(Serialize)]
struct DecryptRequest<'a> {
    encrypted_msg: &'a str,
    timestamp: i64,
}

#[derive(Deserialize)]
struct OracleReply {
    message: String,
}

impl NanoShutterOracle {
    /// Create a client against the given base URL (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn call<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, OracleError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(OracleError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let reply: OracleReply = resp
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;
        Ok(reply.message)
    }
}

#[async_trait]
impl TimelockOracle for NanoShutterOracle {
    async fn encrypt(&self, plaintext: &str, unlock_time: i64) -> Result<String, OracleError> {
        tracing::debug!(unlock_time, "encrypting against time-lock oracle");
        self.call(
            "/encrypt/with_time",
            &EncryptRequest {
                cypher_text: plaintext,
                timestamp: unlock_time,
            },
        )
        .await
    }

    async fn decrypt(&self, ciphertext: &str, unlock_time: i64) -> Result<String, OracleError> {
        tracing::debug!(unlock_time, "decrypting via time-lock oracle");
        self.call(
            "/decrypt/with_time",
            &DecryptRequest {
                encrypted_msg: ciphertext,
                timestamp: unlock_time,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_request_wire_shape() {
        let req = EncryptRequest {
            cypher_text: "105.5",
            timestamp: 1_700_000_015,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["cypher_text"], "105.5");
        assert_eq!(json["timestamp"], 1_700_000_015);
    }

    #[test]
    fn decrypt_request_wire_shape() {
        let req = DecryptRequest {
            encrypted_msg: "0xdeadbeef",
            timestamp: 1_700_000_015,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["encrypted_msg"], "0xdeadbeef");
        assert_eq!(json["timestamp"], 1_700_000_015);
    }

    #[test]
    fn reply_parses_message_field() {
        let reply: OracleReply = serde_json::from_str(r#"{"message":"sealed"}"#).unwrap();
        assert_eq!(reply.message, "sealed");
    }

    #[test]
    fn base_url_is_joined_without_mangling() {
        let oracle = NanoShutterOracle::new("https://oracle.example");
        assert_eq!(oracle.base_url, "https://oracle.example");
    }
}
