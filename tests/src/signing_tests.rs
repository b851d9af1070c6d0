//! Credential gate and request signing
//!
//! Pinned signatures were computed independently with a reference
//! HMAC-SHA256 implementation.

use ndbroker_client::credentials::{API_KEY_NAME, API_SECRET_NAME, PASSPHRASE_NAME};
use ndbroker_client::prelude::*;
use proptest::prelude::*;
use rstest::*;

const TIMESTAMP: &str = "1700000000000";
const INFO_PATH: &str = "/api/v1/broker/nd/info?begin=20240101&end=20240131&tradeType=1";
const TRANSFER_PATH: &str = "/api/v1/broker/nd/transfer";
const TRANSFER_BODY: &str = r#"{"currency":"USDT","amount":"10"}"#;

fn signer(api_key: &str, secret: &str, passphrase: &str) -> BrokerSigner {
    BrokerSigner::new(Credential::new(api_key, secret, passphrase)).unwrap()
}

fn signature(secret: &str, timestamp: &str, method: &str, path: &str, body: Option<&str>) -> String {
    let input = SigningInput::with_timestamp(timestamp, method, path, body);
    signer("ak", secret, "pp").sign(&input).unwrap().signature
}

// ============================================================================
// CREDENTIAL GATE
// ============================================================================

#[cfg(test)]
mod gate {
    use super::*;

    #[rstest]
    #[case(None, Some("sk1"), Some("pp1"))]
    #[case(Some("ak1"), None, Some("pp1"))]
    #[case(Some("ak1"), Some("sk1"), None)]
    #[case(None, None, None)]
    #[case(Some(""), Some("sk1"), Some("pp1"))]
    #[case(Some("ak1"), Some("   "), Some("pp1"))]
    #[case(Some("ak1"), Some("sk1"), Some("\t\n"))]
    fn test_incomplete_credentials_are_unconfigured(
        #[case] api_key: Option<&str>,
        #[case] secret: Option<&str>,
        #[case] passphrase: Option<&str>,
    ) {
        let mut store = MemoryCredentialStore::new();
        for (name, value) in [(API_KEY_NAME, api_key), (API_SECRET_NAME, secret), (PASSPHRASE_NAME, passphrase)] {
            if let Some(value) = value {
                store = store.with_value(name, value);
            }
        }

        let gate = CredentialGate::new(store);
        assert!(!gate.is_configured());
        assert!(gate.load().is_none());
        assert_eq!(gate.require().unwrap_err(), BrokerError::NotConfigured);
    }

    #[rstest]
    #[case("ak1", "sk1", "pp1")]
    #[case(" ak1 ", "sk1", "pp1")]
    #[case("a", "b", "c")]
    fn test_complete_credentials_are_configured(
        #[case] api_key: &str,
        #[case] secret: &str,
        #[case] passphrase: &str,
    ) {
        let gate = CredentialGate::new(MemoryCredentialStore::with_credential(api_key, secret, passphrase));
        assert!(gate.is_configured());
        assert_eq!(gate.require().unwrap().api_key(), api_key);
    }

    #[test]
    fn test_incomplete_credential_cannot_sign() {
        let result = BrokerSigner::new(Credential::new("ak1", "", "pp1"));
        assert!(matches!(result, Err(BrokerError::NotConfigured)));
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

#[cfg(test)]
mod signatures {
    use super::*;

    #[test]
    fn test_transfer_signature_is_pinned() {
        let input = SigningInput::with_timestamp(TIMESTAMP, "POST", TRANSFER_PATH, Some(TRANSFER_BODY));
        let headers = signer("ak1", "sk1", "pp1").sign(&input).unwrap();

        assert_eq!(headers.signature, "Z0QCmzsbLWD7f1xGHaLFXx5gYWM0aDQ+THu3V8h24XA=");
        assert_eq!(headers.encrypted_passphrase, "q1hFTE9B6wdIpufSf07eXDTFVS3oYhr/zZS0zD8n1kM=");
        assert_eq!(headers.api_key, "ak1");
        assert_eq!(headers.timestamp, TIMESTAMP);
        assert_eq!(headers.key_version, "2");
    }

    #[test]
    fn test_info_signature_is_pinned() {
        assert_eq!(
            signature("testsecret", TIMESTAMP, "GET", INFO_PATH, None),
            "/SNdekNKG8ty+PnCx3kA9aFX8WfqTVThH4N/y+bvrb0="
        );
        assert_eq!(
            signer("ak", "testsecret", "testpass").encrypt_passphrase().unwrap(),
            "5geeOuzPRVAMNghwj4ECAxLPxLiO667f7Kkx53zWBsc="
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let first = signature("testsecret", TIMESTAMP, "GET", INFO_PATH, None);
        let second = signature("testsecret", TIMESTAMP, "GET", INFO_PATH, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_pairs_carry_all_five_headers() {
        let input = SigningInput::with_timestamp(TIMESTAMP, "GET", INFO_PATH, None);
        let pairs = signer("ak1", "sk1", "pp1").sign(&input).unwrap().to_header_pairs();
        let names: Vec<&str> = pairs.iter().map(|(name, _)| *name).collect();

        assert_eq!(
            names,
            ["KC-API-KEY", "KC-API-SIGN", "KC-API-TIMESTAMP", "KC-API-PASSPHRASE", "KC-API-KEY-VERSION"]
        );
    }

    #[rstest]
    #[case("null")]
    #[case("{}")]
    #[case(" ")]
    fn test_empty_body_signs_as_empty_string(#[case] other: &str) {
        let absent = signature("sk1", TIMESTAMP, "POST", TRANSFER_PATH, None);
        let empty = signature("sk1", TIMESTAMP, "POST", TRANSFER_PATH, Some(""));
        let distinct = signature("sk1", TIMESTAMP, "POST", TRANSFER_PATH, Some(other));

        assert_eq!(absent, empty);
        assert_ne!(absent, distinct);
    }

    #[test]
    fn test_method_is_signed_uppercase() {
        assert_eq!(
            signature("sk1", TIMESTAMP, "get", INFO_PATH, None),
            signature("sk1", TIMESTAMP, "GET", INFO_PATH, None)
        );
    }

    #[test]
    fn test_query_order_is_part_of_signature() {
        let ordered = QueryString::new().push("begin", "20240101").push("end", "20240131");
        let swapped = QueryString::new().push("end", "20240131").push("begin", "20240101");

        let a = signature("sk1", TIMESTAMP, "GET", &ordered.request_path("/x"), None);
        let b = signature("sk1", TIMESTAMP, "GET", &swapped.request_path("/x"), None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_headers_debug_hides_passphrase() {
        let input = SigningInput::with_timestamp(TIMESTAMP, "GET", INFO_PATH, None);
        let headers = signer("ak1234567890", "sk1", "pp1").sign(&input).unwrap();
        let debug = format!("{headers:?}");

        assert!(!debug.contains(&headers.encrypted_passphrase));
        assert!(!debug.contains("ak1234567890"));
    }
}

// ============================================================================
// PROPERTY-BASED
// ============================================================================

#[cfg(test)]
mod properties {
    use super::*;

    proptest! {
        #[test]
        fn test_timestamp_change_changes_signature(
            ts in 1_600_000_000_000u64..1_900_000_000_000u64,
            body in "[ -~]{0,40}",
        ) {
            let a = signature("sk1", &ts.to_string(), "POST", TRANSFER_PATH, Some(&body));
            let b = signature("sk1", &(ts + 1).to_string(), "POST", TRANSFER_PATH, Some(&body));
            prop_assert_ne!(a, b);
        }

        #[test]
        fn test_path_change_changes_signature(
            path in "/api/v[1-3]/[a-z/]{1,24}",
            suffix in "[a-zA-Z0-9]{1,3}",
        ) {
            let a = signature("sk1", TIMESTAMP, "GET", &path, None);
            let b = signature("sk1", TIMESTAMP, "GET", &format!("{path}{suffix}"), None);
            prop_assert_ne!(a, b);
        }

        #[test]
        fn test_body_change_changes_signature(
            body in "[ -~]{0,40}",
            suffix in "[ -~]{1,3}",
        ) {
            let a = signature("sk1", TIMESTAMP, "POST", TRANSFER_PATH, Some(&body));
            let b = signature("sk1", TIMESTAMP, "POST", TRANSFER_PATH, Some(&format!("{body}{suffix}")));
            prop_assert_ne!(a, b);
        }

        #[test]
        fn test_secret_change_changes_signature(
            secret in "[a-zA-Z0-9]{1,32}",
            suffix in "[a-zA-Z0-9]{1,3}",
        ) {
            let a = signature(&secret, TIMESTAMP, "GET", INFO_PATH, None);
            let b = signature(&format!("{secret}{suffix}"), TIMESTAMP, "GET", INFO_PATH, None);
            prop_assert_ne!(a, b);
        }

        #[test]
        fn test_method_change_changes_signature(
            methods in prop::sample::subsequence(vec!["GET", "POST", "DELETE", "PUT"], 2),
        ) {
            let a = signature("sk1", TIMESTAMP, methods[0], TRANSFER_PATH, None);
            let b = signature("sk1", TIMESTAMP, methods[1], TRANSFER_PATH, None);
            prop_assert_ne!(a, b);
        }

        #[test]
        fn test_signer_verifies_own_signature(
            path in "/[a-z]{1,12}",
            body in "[ -~]{0,24}",
        ) {
            let input = SigningInput::with_timestamp(TIMESTAMP, "POST", &path, Some(&body));
            let signer = signer("ak1", "sk1", "pp1");
            let headers = signer.sign(&input).unwrap();
            prop_assert!(signer.verify(&input, &headers.signature));
        }
    }
}
