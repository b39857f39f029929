// crates/studio-client/src/memory/tests.rs
// ============================================================================
// Module: In-Memory Studio Unit Tests
// Description: Unit tests for name filtering, paging and token checks.
// Purpose: Pin the service-side behavior the client tests rely on.
// Dependencies: studio-client, studio-core, tokio
// ============================================================================

//! ## Overview
//! Exercises the private helpers of [`super::InMemoryStudio`] and its
//! request-level checks.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;
use studio_core::Annotation;
use studio_core::Project;
use studio_core::ProjectId;
use studio_core::Sample;
use studio_core::SampleId;

use super::InMemoryStudio;
use super::annotates;
use super::filter_by_name;
use super::page;
use crate::transport::CODE_AUTHENTICATION_FAILED;
use crate::transport::CODE_INVALID_PARAMS;
use crate::transport::CODE_METHOD_NOT_FOUND;
use crate::transport::CODE_TOKEN_EXPIRED;
use crate::transport::RpcRequest;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn project(id: u64, name: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        name: name.to_string(),
        description: String::new(),
    }
}

fn names(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|p| p.name.as_str()).collect()
}

fn request(studio: &InMemoryStudio, method: &str, token: Option<String>) -> RpcRequest {
    RpcRequest {
        endpoint: studio.url(),
        method: method.to_string(),
        params: json!({}),
        bearer_token: token,
    }
}

fn rpc_code(err: &TransportError) -> i64 {
    match err {
        TransportError::Rpc {
            code,
            ..
        } => *code,
        other => panic!("expected rpc error, got {other}"),
    }
}

// ============================================================================
// SECTION: Name Filter
// ============================================================================

#[test]
fn name_filter_orders_exact_then_case_insensitive_then_shorter() {
    let projects = vec![
        project(1, "Deer Tracking"),
        project(2, "deer"),
        project(3, "Deer"),
        project(4, "Reindeer"),
        project(5, "Cars"),
        project(6, "DEER"),
    ];
    let filtered = filter_by_name(projects.iter(), Some("Deer"), |p| &p.name);
    assert_eq!(names(&filtered), vec!["Deer", "DEER", "deer", "Reindeer", "Deer Tracking"]);
}

#[test]
fn absent_name_keeps_insertion_order() {
    let projects = vec![project(2, "b"), project(1, "a")];
    let filtered = filter_by_name(projects.iter(), None, |p| &p.name);
    assert_eq!(names(&filtered), vec!["b", "a"]);
}

#[test]
fn unmatched_name_yields_empty_list() {
    let projects = vec![project(1, "Deer")];
    assert!(filter_by_name(projects.iter(), Some("zebra"), |p| &p.name).is_empty());
}

// ============================================================================
// SECTION: Paging
// ============================================================================

#[test]
fn pages_advance_until_exhausted() {
    let items: Vec<u32> = (0 .. 5).collect();
    let (first, next) = page(&items, None, 2).unwrap();
    assert_eq!(first, vec![0, 1]);
    assert_eq!(next.as_deref(), Some("2"));
    let (second, next) = page(&items, next.as_deref(), 2).unwrap();
    assert_eq!(second, vec![2, 3]);
    let (last, next) = page(&items, next.as_deref(), 2).unwrap();
    assert_eq!(last, vec![4]);
    assert!(next.is_none());
}

#[test]
fn empty_listing_is_one_empty_page() {
    let items: Vec<u32> = Vec::new();
    let (entries, next) = page(&items, None, 10).unwrap();
    assert!(entries.is_empty());
    assert!(next.is_none());
}

#[test]
fn foreign_cursor_is_invalid_params() {
    let items = vec![1, 2, 3];
    assert_eq!(rpc_code(&page(&items, Some("abc"), 2).unwrap_err()), CODE_INVALID_PARAMS);
    assert_eq!(rpc_code(&page(&items, Some("9"), 2).unwrap_err()), CODE_INVALID_PARAMS);
}

// ============================================================================
// SECTION: Annotations
// ============================================================================

#[test]
fn annotations_attach_by_sample_id_before_image_name() {
    let sample = Sample {
        id: Some(SampleId::new(7)),
        image_name: Some("frame-000.jpg".to_string()),
        ..Sample::default()
    };
    let by_id = Annotation {
        sample_id: Some(SampleId::new(7)),
        ..Annotation::default()
    };
    let other_id = Annotation {
        sample_id: Some(SampleId::new(8)),
        name: Some("frame-000.jpg".to_string()),
        ..Annotation::default()
    };
    let by_name = Annotation {
        name: Some("frame-000.jpg".to_string()),
        ..Annotation::default()
    };
    assert!(annotates(&by_id, &sample));
    assert!(!annotates(&other_id, &sample));
    assert!(annotates(&by_name, &sample));
    assert!(!annotates(&Annotation::default(), &Sample::default()));
}

// ============================================================================
// SECTION: Request Checks
// ============================================================================

#[tokio::test]
async fn expired_tokens_are_rejected_as_expired() {
    let studio = InMemoryStudio::new().with_user("alice", "pw").with_token_ttl(-60);
    let token = studio.issue_token("alice").unwrap();
    let err = studio.call(request(&studio, "auth.verify_token", Some(token))).await.unwrap_err();
    assert_eq!(rpc_code(&err), CODE_TOKEN_EXPIRED);
}

#[tokio::test]
async fn missing_and_unknown_tokens_fail_authentication() {
    let studio = InMemoryStudio::new().with_user("alice", "pw");
    let missing = studio.call(request(&studio, "project.list", None)).await.unwrap_err();
    assert_eq!(rpc_code(&missing), CODE_AUTHENTICATION_FAILED);
    let unknown = studio
        .call(request(&studio, "project.list", Some("a.b.c".to_string())))
        .await
        .unwrap_err();
    assert_eq!(rpc_code(&unknown), CODE_AUTHENTICATION_FAILED);
}

#[tokio::test]
async fn unknown_methods_are_reported() {
    let studio = InMemoryStudio::new().with_user("alice", "pw");
    let token = studio.issue_token("alice").unwrap();
    let err = studio.call(request(&studio, "project.delete", Some(token))).await.unwrap_err();
    assert_eq!(rpc_code(&err), CODE_METHOD_NOT_FOUND);
}

#[tokio::test]
async fn requests_for_other_servers_fail_at_the_network_layer() {
    let studio = InMemoryStudio::for_server("test");
    let mut misrouted = request(&studio, "version", None);
    misrouted.endpoint = "https://edgefirst.studio".to_string();
    let err = studio.call(misrouted).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
    assert_eq!(studio.calls(), vec!["version".to_string()]);
}

#[tokio::test]
async fn issued_tokens_name_the_server_and_user() {
    let studio = InMemoryStudio::for_server("test").with_user("alice", "pw");
    let token = studio.issue_token("alice").unwrap();
    let claims = studio_core::TokenClaims::decode(&token).unwrap();
    assert_eq!(claims.server.as_deref(), Some("test"));
    assert_eq!(claims.username.as_deref(), Some("alice"));
    assert_eq!(studio.session_count(), 1);
    assert!(studio.issue_token("mallory").is_err());
}
