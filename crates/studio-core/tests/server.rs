// crates/studio-core/tests/server.rs
// ============================================================================
// Module: Server Resolution Tests
// Description: Name-to-URL mapping and its reverse.
// Purpose: Pin the public server-name contract.
// Dependencies: studio-core
// ============================================================================

//! Server-name resolution tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use studio_core::resolve_server_url;
use studio_core::server_name;

#[test]
fn resolves_the_documented_table() {
    let cases = [
        ("", "https://edgefirst.studio"),
        ("saas", "https://edgefirst.studio"),
        ("test", "https://test.edgefirst.studio"),
        ("stage", "https://stage.edgefirst.studio"),
        ("dev", "https://dev.edgefirst.studio"),
        ("acme", "https://acme.edgefirst.studio"),
    ];
    for (name, url) in cases {
        assert_eq!(resolve_server_url(name), url, "name {name:?}");
    }
}

#[test]
fn resolves_test_and_empty_exactly() {
    assert_eq!(resolve_server_url("test"), "https://test.edgefirst.studio");
    assert_eq!(resolve_server_url(""), "https://edgefirst.studio");
}

#[test]
fn resolution_is_total_for_arbitrary_names() {
    for name in ["a", "with-dash", "UPPER", "ünïcode", "x.y"] {
        assert_eq!(resolve_server_url(name), format!("https://{name}.edgefirst.studio"));
    }
}

#[test]
fn server_name_reverses_resolution() {
    for name in ["saas", "test", "stage", "dev", "customer-7"] {
        assert_eq!(server_name(&resolve_server_url(name)), name);
    }
    assert_eq!(server_name(&resolve_server_url("")), "saas");
}

#[test]
fn server_name_of_foreign_url_is_its_host() {
    assert_eq!(server_name("http://localhost:8080/api"), "localhost");
    assert_eq!(server_name("not a url"), "not a url");
}
