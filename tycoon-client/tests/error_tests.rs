//! Tests for error construction, display, and wire codes

use tycoon_client::Error;

#[test]
fn test_error_constructors() {
    let err = Error::invalid_route("/streak/42");
    assert_eq!(err.to_string(), "Invalid API route: /streak/42");

    let err = Error::invalid_server_index(12, 10);
    assert_eq!(
        err.to_string(),
        "Invalid server index 12, pool has 10 servers"
    );

    let err = Error::invalid_stat_name("quarry_tunnel");
    assert_eq!(err.to_string(), "Invalid stat name: quarry_tunnel");

    let err = Error::invalid_economy_record(3, "expected 6 fields, got 2");
    assert_eq!(
        err.to_string(),
        "Invalid economy record at line 3: expected 6 fields, got 2"
    );
}

#[test]
fn test_wire_codes() {
    assert_eq!(Error::NoCharges.code(), Some("no_charges"));
    assert_eq!(Error::KeyRequired.code(), Some("key_protected"));
    assert_eq!(Error::InvalidKey.code(), Some("invalid_key"));
    assert_eq!(
        Error::invalid_route("/streak/42").code(),
        Some("invalid_api")
    );
}

#[test]
fn test_local_errors_have_no_wire_code() {
    assert_eq!(Error::invalid_server_index(12, 10).code(), None);
    assert_eq!(Error::invalid_stat_name("x").code(), None);
    assert_eq!(Error::EmptyServerPool.code(), None);
    assert_eq!(Error::invalid_economy_record(1, "x").code(), None);
}

#[test]
fn test_display_is_never_empty() {
    let errors = [
        Error::NoCharges,
        Error::KeyRequired,
        Error::InvalidKey,
        Error::EmptyServerPool,
        Error::invalid_route("/x"),
        Error::invalid_server_index(0, 0),
        Error::invalid_stat_name("x"),
        Error::invalid_economy_record(1, "x"),
    ];

    for err in errors {
        assert!(!err.to_string().is_empty());
    }
}
