//! Environment-driven configuration and the env credential store
//!
//! These tests mutate process environment variables, so they run serially.

use ndbroker_client::config::{ENV_BASE_URL, ENV_CREDENTIALS_FILE, ENV_FALLBACK_ON_AUTH_REJECTED, ENV_TIMEOUT_MS};
use ndbroker_client::prelude::*;
use serial_test::serial;
use std::env;

const CREDENTIAL_VARS: [&str; 3] = ["BROKER_API_KEY", "BROKER_API_SECRET", "BROKER_API_PASSPHRASE"];
const CONFIG_VARS: [&str; 4] = [ENV_BASE_URL, ENV_TIMEOUT_MS, ENV_FALLBACK_ON_AUTH_REJECTED, ENV_CREDENTIALS_FILE];

fn clear(vars: &[&str]) {
    for var in vars {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_env_store_tracks_environment() {
    clear(&CREDENTIAL_VARS);
    let gate = CredentialGate::new(EnvCredentialStore::new());
    assert!(!gate.is_configured());

    env::set_var("BROKER_API_KEY", "ak1");
    env::set_var("BROKER_API_SECRET", "sk1");
    assert!(!gate.is_configured());

    env::set_var("BROKER_API_PASSPHRASE", "pp1");
    assert!(gate.is_configured());
    assert_eq!(gate.require().unwrap().api_key(), "ak1");

    env::set_var("BROKER_API_SECRET", "  ");
    assert!(!gate.is_configured());

    clear(&CREDENTIAL_VARS);
}

#[test]
#[serial]
fn test_env_overrides_apply() {
    clear(&CONFIG_VARS);
    env::set_var(ENV_BASE_URL, "https://sandbox.example.com");
    env::set_var(ENV_TIMEOUT_MS, "2500");
    env::set_var(ENV_FALLBACK_ON_AUTH_REJECTED, "true");
    env::set_var(ENV_CREDENTIALS_FILE, "/var/lib/ndbroker/credentials.json");

    let config = BrokerConfig::default().with_env_overrides().unwrap();
    assert_eq!(config.base_url, "https://sandbox.example.com");
    assert_eq!(config.timeout_ms, 2_500);
    assert!(config.fallback_on_auth_rejected);
    assert!(matches!(config.credential_source(), CredentialSource::File(_)));

    clear(&CONFIG_VARS);
}

#[test]
#[serial]
fn test_unset_and_blank_vars_keep_defaults() {
    clear(&CONFIG_VARS);
    env::set_var(ENV_BASE_URL, "   ");

    let config = BrokerConfig::default().with_env_overrides().unwrap();
    assert_eq!(config, BrokerConfig::default());

    clear(&CONFIG_VARS);
}

#[test]
#[serial]
fn test_malformed_timeout_is_configuration_error() {
    clear(&CONFIG_VARS);
    env::set_var(ENV_TIMEOUT_MS, "ten seconds");

    let err = BrokerConfig::default().with_env_overrides().unwrap_err();
    assert!(matches!(err, BrokerError::ConfigurationError(_)));

    clear(&CONFIG_VARS);
}

#[test]
#[serial]
fn test_desk_over_env_follows_configuration() {
    clear(&CREDENTIAL_VARS);
    clear(&CONFIG_VARS);

    let desk = BrokerDesk::connect(BrokerConfig::default()).unwrap();
    assert_eq!(desk.data_source(), DataSource::Demo);

    env::set_var("BROKER_API_KEY", "ak1");
    env::set_var("BROKER_API_SECRET", "sk1");
    env::set_var("BROKER_API_PASSPHRASE", "pp1");
    assert_eq!(desk.data_source(), DataSource::Live);
    assert!(desk.is_configured());

    clear(&CREDENTIAL_VARS);
}
