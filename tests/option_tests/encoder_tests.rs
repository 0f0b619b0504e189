//! Option encoder tests
//!
//! Tests for option tables, parameter validation and payload encoding.

use std::collections::HashSet;

use atlaswire::options::{encode, encode_by_name, OptionId};
use atlaswire::{
    ClientConfig, DatabaseOption, NetworkOption, OptionEncoder, OptionParam, ParamKind, Scope,
    TransactionOption, WireError,
};

fn sample_param(kind: ParamKind) -> OptionParam {
    match kind {
        ParamKind::None => OptionParam::None,
        ParamKind::Int64 => OptionParam::Int(42),
        ParamKind::Bytes => OptionParam::bytes([0xDE, 0xAD, 0xBE, 0xEF]),
        ParamKind::String => OptionParam::from("hello"),
    }
}

// =============================================================================
// Table Tests
// =============================================================================

#[test]
fn test_codes_unique_per_scope() {
    for scope in [Scope::Network, Scope::Database, Scope::Transaction] {
        let options = OptionId::all(scope);
        let codes: HashSet<u32> = options.iter().map(|o| o.descriptor().code).collect();
        assert_eq!(codes.len(), options.len(), "duplicate code in {} scope", scope);
    }
}

#[test]
fn test_stable_codes() {
    assert_eq!(NetworkOption::TlsCertBytes.code(), 42);
    assert_eq!(NetworkOption::Knob.code(), 40);
    assert_eq!(DatabaseOption::LocationCacheSize.code(), 10);
    assert_eq!(DatabaseOption::TransactionTimeout.code(), 500);
    assert_eq!(TransactionOption::Timeout.code(), 500);
    assert_eq!(TransactionOption::RetryLimit.code(), 501);
    assert_eq!(TransactionOption::AccessSystemKeys.code(), 301);
    assert_eq!(TransactionOption::NextWriteNoWriteConflictRange.code(), 30);
}

#[test]
fn test_same_code_in_different_scopes() {
    let db = encode(DatabaseOption::TransactionTimeout, OptionParam::Int(1)).unwrap();
    let tr = encode(TransactionOption::Timeout, OptionParam::Int(1)).unwrap();

    assert_eq!(db.code, tr.code);
    assert_eq!(db.scope, Scope::Database);
    assert_eq!(tr.scope, Scope::Transaction);
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_every_option_encodes_its_declared_kind() {
    for scope in [Scope::Network, Scope::Database, Scope::Transaction] {
        for option in OptionId::all(scope) {
            let descriptor = option.descriptor();
            let encoded = encode(option, sample_param(descriptor.kind)).unwrap();

            assert_eq!(encoded.scope, scope);
            assert_eq!(encoded.code, descriptor.code);
            match descriptor.kind {
                ParamKind::None => assert_eq!(encoded.payload, None),
                ParamKind::Int64 => assert_eq!(encoded.payload_bytes(), &42i64.to_le_bytes()),
                ParamKind::Bytes => assert_eq!(encoded.payload_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]),
                ParamKind::String => assert_eq!(encoded.payload_bytes(), b"hello"),
            }
        }
    }
}

#[test]
fn test_timeout_5000_little_endian() {
    let encoded = encode(TransactionOption::Timeout, 5000i64.into()).unwrap();

    assert_eq!(encoded.code, 500);
    assert_eq!(
        encoded.payload_bytes(),
        &[0x88, 0x13, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn test_int_extremes() {
    let min = encode(TransactionOption::SizeLimit, OptionParam::Int(i64::MIN)).unwrap();
    assert_eq!(min.payload_bytes(), &[0, 0, 0, 0, 0, 0, 0, 0x80]);

    let max = encode(TransactionOption::SizeLimit, OptionParam::Int(i64::MAX)).unwrap();
    assert_eq!(max.payload_bytes(), &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn test_empty_string_is_present_but_empty() {
    let encoded = encode(NetworkOption::TraceEnable, OptionParam::from("")).unwrap();
    assert_eq!(encoded.payload, Some(bytes::Bytes::new()));
}

#[test]
fn test_string_is_raw_utf8() {
    let encoded = encode(TransactionOption::DebugTransactionIdentifier, "tx-\u{e9}".into()).unwrap();
    assert_eq!(encoded.payload_bytes(), "tx-\u{e9}".as_bytes());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_wrong_kind_rejected() {
    let err = encode(TransactionOption::Timeout, OptionParam::from("5000")).unwrap_err();
    match err {
        WireError::InvalidParameterType {
            scope,
            option,
            expected,
            actual,
        } => {
            assert_eq!(scope, Scope::Transaction);
            assert_eq!(option, "timeout");
            assert_eq!(expected, ParamKind::Int64);
            assert_eq!(actual, ParamKind::String);
        }
        other => panic!("Expected InvalidParameterType, got {:?}", other),
    }
}

#[test]
fn test_parameter_for_parameterless_option_rejected() {
    let result = encode(TransactionOption::AccessSystemKeys, OptionParam::Int(1));
    assert!(matches!(result, Err(WireError::InvalidParameterType { .. })));
}

#[test]
fn test_missing_parameter_rejected() {
    let result = encode(NetworkOption::TlsCertBytes, OptionParam::None);
    assert!(matches!(result, Err(WireError::InvalidParameterType { .. })));
}

#[test]
fn test_bytes_and_string_are_distinct_kinds() {
    let result = encode(NetworkOption::TlsCertBytes, OptionParam::from("pem"));
    assert!(matches!(result, Err(WireError::InvalidParameterType { .. })));

    let result = encode(NetworkOption::TlsCertPath, OptionParam::bytes(b"/etc/cert"));
    assert!(matches!(result, Err(WireError::InvalidParameterType { .. })));
}

#[test]
fn test_deprecated_option_still_encodes() {
    assert!(TransactionOption::ReadAheadDisable.descriptor().deprecated);
    let encoded = encode(TransactionOption::ReadAheadDisable, OptionParam::None).unwrap();
    assert_eq!(encoded.code, 52);

    let quiet = OptionEncoder::new(&ClientConfig::builder().warn_on_deprecated(false).build());
    let encoded = quiet
        .encode(NetworkOption::ClusterFile, OptionParam::from("/etc/cluster"))
        .unwrap();
    assert_eq!(encoded.code, 20);
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_encode_by_name() {
    let encoded = encode_by_name(Scope::Transaction, "retry_limit", OptionParam::Int(-1)).unwrap();
    assert_eq!(encoded.code, 501);
    assert_eq!(encoded.payload_bytes(), &[0xFF; 8]);
}

#[test]
fn test_lookup_is_case_and_dash_insensitive() {
    let option = OptionId::lookup(Scope::Network, "TLS-CERT-PATH").unwrap();
    assert_eq!(option, OptionId::Network(NetworkOption::TlsCertPath));
}

#[test]
fn test_lookup_is_scoped() {
    // snapshot_ryw_enable exists in two scopes with different codes
    let db = OptionId::lookup(Scope::Database, "snapshot_ryw_enable").unwrap();
    let tr = OptionId::lookup(Scope::Transaction, "snapshot_ryw_enable").unwrap();
    assert_eq!(db.descriptor().code, 26);
    assert_eq!(tr.descriptor().code, 600);

    let err = OptionId::lookup(Scope::Network, "timeout").unwrap_err();
    assert!(matches!(err, WireError::UnknownOption { scope: Scope::Network, .. }));
}

#[test]
fn test_scope_parsing() {
    assert_eq!("db".parse::<Scope>().unwrap(), Scope::Database);
    assert_eq!("Transaction".parse::<Scope>().unwrap(), Scope::Transaction);
    assert!(matches!(
        "cluster".parse::<Scope>(),
        Err(WireError::UnknownScope(name)) if name == "cluster"
    ));
}
