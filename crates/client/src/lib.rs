//! # ndbroker Client
//!
//! Authenticated client for the exchange broker API behind the back-office
//! dashboard.
//!
//! ## Architecture
//!
//! - **Credential gate** - one predicate decides "configured or not"
//! - **Request signer** - HMAC-SHA256 over timestamp, method, path and body
//! - **Transport seam** - `HttpTransport`, with a monoio + rustls implementation
//! - **401 classification** - authentication rejections surface as their own error
//! - **Fallback policy** - unconfigured features serve tagged demo data

pub mod config;
pub mod credentials;
pub mod demo;
pub mod desk;
pub mod errors;
pub mod http;
pub mod nd;
pub mod policy;
pub mod traits;

pub use config::BrokerConfig;
pub use credentials::{
    Credential, CredentialGate, CredentialSource, CredentialStore, EnvCredentialStore,
    JsonFileCredentialStore, MemoryCredentialStore,
};
pub use desk::BrokerDesk;
pub use errors::{BrokerError, Result};
pub use http::{HttpRequest, HttpResponse, MonoioHttpsClient};
pub use nd::{BrokerRestClient, BrokerSigner, QueryString, SignedHeaders, SigningInput};
pub use policy::{DataSource, FallbackPolicy, Sourced};
pub use traits::HttpTransport;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::BrokerConfig;
    pub use crate::credentials::*;
    pub use crate::desk::BrokerDesk;
    pub use crate::errors::{BrokerError, Result};
    pub use crate::http::{HttpRequest, HttpResponse, MonoioHttpsClient};
    pub use crate::nd::*;
    pub use crate::policy::{DataSource, FallbackPolicy, Sourced};
    pub use crate::traits::HttpTransport;
    pub use ndbroker_core::prelude::*;
}
