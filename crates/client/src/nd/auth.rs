//! Broker request signing
//!
//! Every authenticated call carries five headers:
//! - `KC-API-KEY`: the API key, verbatim
//! - `KC-API-SIGN`: base64(HMAC-SHA256(secret, timestamp + METHOD + path?query + body))
//! - `KC-API-TIMESTAMP`: the Unix-millisecond timestamp used in the signing string
//! - `KC-API-PASSPHRASE`: base64(HMAC-SHA256(secret, passphrase))
//! - `KC-API-KEY-VERSION`: fixed `2`
//!
//! The signing string has no delimiters. Query strings and bodies are
//! produced once and the same text is signed and sent.

use crate::credentials::Credential;
use crate::errors::{BrokerError, Result};
use ndbroker_core::timestamp_ms_string;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "KC-API-KEY";
pub const HEADER_API_SIGN: &str = "KC-API-SIGN";
pub const HEADER_API_TIMESTAMP: &str = "KC-API-TIMESTAMP";
pub const HEADER_API_PASSPHRASE: &str = "KC-API-PASSPHRASE";
pub const HEADER_API_KEY_VERSION: &str = "KC-API-KEY-VERSION";

/// Key version marker for HMAC-encrypted passphrases
pub const KEY_VERSION: &str = "2";

/// Insertion-ordered, percent-encoded query string
///
/// The rendered form is what gets signed and what goes on the request
/// line, so parameter order and encoding can never drift between the two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append only when the value is present
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as `k=v&k2=v2` (no leading `?`)
    pub fn render(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Endpoint path with the rendered query appended
    pub fn request_path(&self, endpoint: &str) -> String {
        if self.is_empty() {
            endpoint.to_string()
        } else {
            format!("{endpoint}?{}", self.render())
        }
    }
}

/// Inputs of one signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput {
    timestamp: String,
    method: String,
    request_path: String,
    body: String,
}

impl SigningInput {
    /// Inputs stamped with the current Unix milliseconds
    pub fn new(method: &str, request_path: &str, body: Option<&str>) -> Self {
        Self::with_timestamp(timestamp_ms_string(), method, request_path, body)
    }

    /// Inputs with a caller-supplied timestamp. A missing body signs as `""`.
    pub fn with_timestamp(
        timestamp: impl Into<String>,
        method: &str,
        request_path: &str,
        body: Option<&str>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            method: method.to_ascii_uppercase(),
            request_path: request_path.to_string(),
            body: body.unwrap_or_default().to_string(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// timestamp + METHOD + path?query + body, no separators
    pub fn signing_string(&self) -> String {
        let mut s = String::with_capacity(
            self.timestamp.len() + self.method.len() + self.request_path.len() + self.body.len(),
        );
        s.push_str(&self.timestamp);
        s.push_str(&self.method);
        s.push_str(&self.request_path);
        s.push_str(&self.body);
        s
    }
}

/// Authentication values for one request
#[derive(Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub timestamp: String,
    pub signature: String,
    pub encrypted_passphrase: String,
    pub key_version: &'static str,
}

impl SignedHeaders {
    /// Header name/value pairs in a stable order
    pub fn to_header_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (HEADER_API_KEY, self.api_key.clone()),
            (HEADER_API_SIGN, self.signature.clone()),
            (HEADER_API_TIMESTAMP, self.timestamp.clone()),
            (HEADER_API_PASSPHRASE, self.encrypted_passphrase.clone()),
            (HEADER_API_KEY_VERSION, self.key_version.to_string()),
        ]
    }
}

impl fmt::Debug for SignedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedHeaders")
            .field("api_key", &ndbroker_core::mask_key(&self.api_key))
            .field("timestamp", &self.timestamp)
            .field("signature", &self.signature)
            .field("key_version", &self.key_version)
            .finish_non_exhaustive()
    }
}

/// Request signer bound to one credential snapshot
pub struct BrokerSigner {
    credential: Credential,
}

impl BrokerSigner {
    /// Refuses incomplete credentials; partial secrets are never used
    pub fn new(credential: Credential) -> Result<Self> {
        if !credential.is_complete() {
            return Err(BrokerError::NotConfigured);
        }
        Ok(Self { credential })
    }

    /// Compute the authentication headers for one request
    pub fn sign(&self, input: &SigningInput) -> Result<SignedHeaders> {
        let signature = hmac_base64(self.credential.api_secret(), &input.signing_string())?;
        let encrypted_passphrase = self.encrypt_passphrase()?;

        Ok(SignedHeaders {
            api_key: self.credential.api_key().to_string(),
            timestamp: input.timestamp().to_string(),
            signature,
            encrypted_passphrase,
            key_version: KEY_VERSION,
        })
    }

    /// The passphrase is sent HMAC-ed with the API secret as key
    pub fn encrypt_passphrase(&self) -> Result<String> {
        hmac_base64(self.credential.api_secret(), self.credential.passphrase())
    }

    /// Recompute and compare a signature
    pub fn verify(&self, input: &SigningInput, signature: &str) -> bool {
        match hmac_base64(self.credential.api_secret(), &input.signing_string()) {
            Ok(expected) => expected == signature,
            Err(_) => false,
        }
    }
}

fn hmac_base64(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| BrokerError::SigningError(format!("HMAC setup failed: {e}")))?;
    mac.update(message.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
