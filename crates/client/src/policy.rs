//! Live-or-demo decision shared by every dashboard feature

use crate::credentials::{Credential, CredentialGate, CredentialStore};
use crate::errors::Result;
use serde::Serialize;
use std::future::Future;
use tracing::{info, warn};

/// Where a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Demo,
}

/// A value tagged with its source, so callers can show a demo banner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self { data, source: DataSource::Live }
    }

    pub fn demo(data: T) -> Self {
        Self { data, source: DataSource::Demo }
    }

    pub fn is_demo(&self) -> bool {
        self.source == DataSource::Demo
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Decides between the remote API and demo data
///
/// - unconfigured: demo data, the remote is never called
/// - configured: the live call; its errors propagate, except an
///   authentication rejection when `fallback_on_auth_rejected` is set
///
/// The store is read once per resolution. The live call receives that
/// snapshot and signs with it.
pub struct FallbackPolicy<S> {
    gate: CredentialGate<S>,
    fallback_on_auth_rejected: bool,
}

impl<S> Clone for FallbackPolicy<S> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            fallback_on_auth_rejected: self.fallback_on_auth_rejected,
        }
    }
}

impl<S: CredentialStore> FallbackPolicy<S> {
    pub fn new(gate: CredentialGate<S>) -> Self {
        Self {
            gate,
            fallback_on_auth_rejected: false,
        }
    }

    pub fn with_fallback_on_auth_rejected(mut self, enable: bool) -> Self {
        self.fallback_on_auth_rejected = enable;
        self
    }

    pub fn gate(&self) -> &CredentialGate<S> {
        &self.gate
    }

    pub fn source(&self) -> DataSource {
        if self.gate.is_configured() {
            DataSource::Live
        } else {
            DataSource::Demo
        }
    }

    pub async fn resolve<T, L, Fut, D>(&self, feature: &str, live: L, demo: D) -> Result<Sourced<T>>
    where
        L: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<T>>,
        D: FnOnce() -> T,
    {
        let Some(credential) = self.gate.load() else {
            info!("📦 {}: credentials not configured, serving demo data", feature);
            return Ok(Sourced::demo(demo()));
        };

        match live(credential).await {
            Ok(data) => Ok(Sourced::live(data)),
            Err(e) if e.is_auth_rejected() && self.fallback_on_auth_rejected => {
                warn!("📦 {}: {}, serving demo data", feature, e);
                Ok(Sourced::demo(demo()))
            }
            Err(e) => Err(e),
        }
    }
}
