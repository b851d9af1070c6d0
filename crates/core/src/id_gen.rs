//! Identifiers
//!
//! Client order ids make broker transfers idempotent on the remote side;
//! request ids tag the log lines of one outbound call.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::timing::millis;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Longest client order id the broker API accepts
pub const MAX_CLIENT_OID_LEN: usize = 128;

/// Caller-chosen id attached to transfers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOid(String);

impl ClientOid {
    /// Fresh id of the form `ND-<millis>-<nanoid>`
    pub fn new() -> Self {
        Self(generate_id_with_prefix("ND"))
    }

    /// Accept a caller-supplied id if the broker API would accept it
    pub fn parse(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let charset_ok = id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        (charset_ok && (1..=MAX_CLIENT_OID_LEN).contains(&id.len())).then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientOid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-call id: process sequence number plus a short random suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId {
    seq: u64,
    tag: String,
}

impl RequestId {
    pub fn next() -> Self {
        Self {
            seq: REQUEST_SEQ.fetch_add(1, Ordering::Relaxed),
            tag: nanoid!(6),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}-{}", self.seq, self.tag)
    }
}

/// 12 character nanoid
pub fn generate_id() -> String {
    nanoid!(12)
}

/// `<prefix>-<unix millis>-<8 character nanoid>`
pub fn generate_id_with_prefix(prefix: &str) -> String {
    format!("{prefix}-{}-{}", millis(), nanoid!(8))
}
