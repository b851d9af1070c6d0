//! Broker ("ND" sub-account broker) API integration
//!
//! `auth` builds the signed headers, `rest` speaks the endpoints, `types`
//! holds the wire records.

pub mod auth;
pub mod rest;
pub mod types;

pub use auth::{BrokerSigner, QueryString, SignedHeaders, SigningInput, KEY_VERSION};
pub use rest::{decode_response, BrokerRestClient};
pub use types::*;
