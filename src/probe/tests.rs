//! Tests for the DNS probe

use super::*;
use crate::testing::{Behavior, FakeResolver};
use proptest::prelude::*;
use std::time::Instant;

fn probe() -> DnsProbe {
    DnsProbe::new(Duration::from_millis(500))
}

#[test]
fn test_normalize_server_appends_default_port() {
    assert_eq!(normalize_server("8.8.8.8"), "8.8.8.8:53");
    assert_eq!(normalize_server("8.8.8.8:5353"), "8.8.8.8:5353");
    assert_eq!(normalize_server("dns.example"), "dns.example:53");
    assert_eq!(normalize_server("dns.example:853"), "dns.example:853");
    assert_eq!(normalize_server("2001:4860:4860::8888"), "[2001:4860:4860::8888]:53");
    assert_eq!(normalize_server("[::1]"), "[::1]:53");
    assert_eq!(normalize_server("[::1]:5300"), "[::1]:5300");
}

#[test]
fn test_normalize_lookup_appends_root() {
    assert_eq!(normalize_lookup("www.example.com"), "www.example.com.");
    assert_eq!(normalize_lookup("www.example.com."), "www.example.com.");
}

#[tokio::test]
async fn test_missing_lookup_fails_without_network() {
    let resolver = FakeResolver::spawn(Behavior::Answer).await;
    let result = probe().probe(&resolver.server(), "").await;

    assert_eq!(result, Err(ProbeError::MissingLookup));
    assert_eq!(resolver.queries(), 0);
}

#[tokio::test]
async fn test_probe_success() {
    let resolver = FakeResolver::spawn(Behavior::Answer).await;
    let reply = probe()
        .probe(&resolver.server(), "www.example.com")
        .await
        .unwrap();

    assert_eq!(reply.response_code, ResponseCode::NoError);
    assert_eq!(reply.answers, 1);
    assert_eq!(resolver.queries(), 1);
}

#[tokio::test]
async fn test_negative_answer_counts_as_success() {
    let resolver = FakeResolver::spawn(Behavior::NxDomain).await;
    let reply = probe()
        .probe(&resolver.server(), "missing.example.")
        .await
        .unwrap();

    assert_eq!(reply.response_code, ResponseCode::NXDomain);
    assert_eq!(reply.answers, 0);
}

#[tokio::test]
async fn test_wrong_id_is_failure() {
    let resolver = FakeResolver::spawn(Behavior::WrongId).await;
    let err = probe()
        .probe(&resolver.server(), "www.example.com.")
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::IdMismatch { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_garbage_reply_is_failure() {
    let resolver = FakeResolver::spawn(Behavior::Garbage).await;
    let err = probe()
        .probe(&resolver.server(), "www.example.com.")
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Malformed { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let resolver = FakeResolver::spawn(Behavior::Silent).await;
    let probe = DnsProbe::new(Duration::from_millis(200));

    let started = Instant::now();
    let err = probe
        .probe(&resolver.server(), "www.example.com.")
        .await
        .unwrap_err();

    assert_eq!(err, ProbeError::Timeout { timeout_ms: 200 });
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_unreachable_server_fails_within_timeout() {
    let probe = DnsProbe::new(Duration::from_millis(1000));

    let started = Instant::now();
    let result = probe.probe("127.0.0.1:55555", "www.example.com.").await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn test_invalid_name_is_rejected() {
    let label = "a".repeat(64);
    let resolver = FakeResolver::spawn(Behavior::Answer).await;
    let err = probe().probe(&resolver.server(), &label).await.unwrap_err();

    assert!(matches!(err, ProbeError::InvalidName { .. }), "got {err:?}");
    assert_eq!(resolver.queries(), 0);
}

#[tokio::test]
#[ignore = "requires access to a public resolver"]
async fn test_public_resolver() {
    let started = Instant::now();
    probe().probe("8.8.8.8", "www.example.com.").await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(500));
}

proptest! {
    #[test]
    fn normalized_lookup_is_rooted_once(name in "[a-z0-9]{1,10}(\\.[a-z0-9]{1,10}){0,3}\\.?") {
        let normalized = normalize_lookup(&name);
        prop_assert!(normalized.ends_with('.'));
        prop_assert!(!normalized.ends_with(".."));
        prop_assert_eq!(normalize_lookup(&normalized), normalized.clone());
    }

    #[test]
    fn normalized_server_always_has_port(host in "[a-z][a-z0-9-]{0,15}(\\.[a-z0-9]{1,8}){0,2}", port in proptest::option::of(1u16..=u16::MAX)) {
        let server = match port {
            Some(port) => format!("{}:{}", host, port),
            None => host.clone(),
        };
        let normalized = normalize_server(&server);
        let expected = port.unwrap_or(DEFAULT_DNS_PORT);
        prop_assert_eq!(normalized, format!("{}:{}", host, expected));
    }
}
