//! Broker credentials, their read-only stores, and the credential gate
//!
//! The gate is the one place that decides whether the integration is
//! configured. Both the signing path and the demo-data fallback ask it,
//! so the two can never disagree.

use crate::errors::{BrokerError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Store key of the API key
pub const API_KEY_NAME: &str = "broker_api_key";
/// Store key of the API secret
pub const API_SECRET_NAME: &str = "broker_api_secret";
/// Store key of the API passphrase
pub const PASSPHRASE_NAME: &str = "broker_api_passphrase";

const CREDENTIAL_NAMES: [&str; 3] = [API_KEY_NAME, API_SECRET_NAME, PASSPHRASE_NAME];

/// Broker API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    api_secret: String,
    passphrase: String,
}

impl Credential {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// All three fields are non-empty after trimming whitespace
    pub fn is_complete(&self) -> bool {
        [&self.api_key, &self.api_secret, &self.passphrase]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub(crate) fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &ndbroker_core::mask_key(&self.api_key))
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Read-only key-value access to stored credentials
pub trait CredentialStore {
    /// Read one named value; `Ok(None)` when absent
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Read several values as one snapshot
    ///
    /// Stores backed by a single document override this so all names come
    /// from the same read.
    fn get_many(&self, names: &[&str]) -> Result<Vec<Option<String>>> {
        names.iter().map(|name| self.get(name)).collect()
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn get_many(&self, names: &[&str]) -> Result<Vec<Option<String>>> {
        (**self).get_many(names)
    }
}

/// A credential serves as its own fixed snapshot store
impl CredentialStore for Credential {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let value = match name {
            API_KEY_NAME => &self.api_key,
            API_SECRET_NAME => &self.api_secret,
            PASSPHRASE_NAME => &self.passphrase,
            _ => return Ok(None),
        };
        Ok(Some(value.clone()))
    }
}

/// In-memory store, filled at construction
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    values: HashMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding all three credential fields
    pub fn with_credential(api_key: &str, api_secret: &str, passphrase: &str) -> Self {
        Self::new()
            .with_value(API_KEY_NAME, api_key)
            .with_value(API_SECRET_NAME, api_secret)
            .with_value(PASSPHRASE_NAME, passphrase)
    }

    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.get(name).cloned())
    }
}

/// Process environment store; `broker_api_key` is read from `BROKER_API_KEY`
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a `.env` file first if one exists, then read the environment
    pub fn with_dotenv() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self
    }

    pub fn env_var_name(name: &str) -> String {
        name.to_ascii_uppercase()
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        match std::env::var(Self::env_var_name(name)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(BrokerError::CredentialStore(format!("{name}: {e}"))),
        }
    }
}

/// Persistent store: a flat JSON object of string values on disk
///
/// The file is re-read on every access so edits made by the settings flow
/// are picked up by the next request. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(BrokerError::CredentialStore(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            BrokerError::CredentialStore(format!("{}: {e}", self.path.display()))
        })
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(name))
    }

    fn get_many(&self, names: &[&str]) -> Result<Vec<Option<String>>> {
        let mut values = self.read_all()?;
        Ok(names.iter().map(|name| values.remove(*name)).collect())
    }
}

/// Store selected by configuration
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Env(EnvCredentialStore),
    File(JsonFileCredentialStore),
    Memory(MemoryCredentialStore),
}

impl CredentialStore for CredentialSource {
    fn get(&self, name: &str) -> Result<Option<String>> {
        match self {
            CredentialSource::Env(store) => store.get(name),
            CredentialSource::File(store) => store.get(name),
            CredentialSource::Memory(store) => store.get(name),
        }
    }

    fn get_many(&self, names: &[&str]) -> Result<Vec<Option<String>>> {
        match self {
            CredentialSource::Env(store) => store.get_many(names),
            CredentialSource::File(store) => store.get_many(names),
            CredentialSource::Memory(store) => store.get_many(names),
        }
    }
}

/// The single authority on "is this integration configured"
pub struct CredentialGate<S> {
    store: Arc<S>,
}

impl<S> Clone for CredentialGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CredentialStore> CredentialGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read all three fields in one snapshot and return them if complete
    ///
    /// Store failures count as "not configured".
    pub fn load(&self) -> Option<Credential> {
        let values = match self.store.get_many(&CREDENTIAL_NAMES) {
            Ok(values) => values,
            Err(e) => {
                warn!("Credential store unreadable, treating as unconfigured: {}", e);
                return None;
            }
        };

        let mut fields = values.into_iter().map(Option::unwrap_or_default);
        let credential = Credential::new(
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
        );

        credential.is_complete().then_some(credential)
    }

    /// True only if api key, secret and passphrase are all non-blank
    pub fn is_configured(&self) -> bool {
        self.load().is_some()
    }

    /// Like `load`, but unconfigured is an error
    pub fn require(&self) -> Result<Credential> {
        self.load().ok_or(BrokerError::NotConfigured)
    }
}
