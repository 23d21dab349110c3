// Orchestrator tests.
//
// Providers are replaced by in-process fakes so no network is involved.

use super::*;
use crate::config::{ALL_GEO_FAILED_MESSAGE, PRIVATE_IP_MESSAGE};
use crate::error_handling::{ProviderError, ProviderErrorKind};
use crate::models::{GeoOutcome, GeoRecord, ThreatRecord};
use async_trait::async_trait;
use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;
use std::time::Duration;

type EventLog = Arc<Mutex<Vec<String>>>;

/// Geolocation fake: succeeds or fails after an optional delay, logging calls.
struct FakeGeo {
    name: &'static str,
    succeed: bool,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    events: EventLog,
}

impl FakeGeo {
    fn ok(name: &'static str) -> Self {
        Self {
            name,
            succeed: true,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(name: &'static str) -> Self {
        Self {
            succeed: false,
            ..Self::ok(name)
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn with_events(mut self, events: &EventLog) -> Self {
        self.events = Arc::clone(events);
        self
    }

    fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl GeoProvider for FakeGeo {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _client: &reqwest::Client, ip: &str) -> Result<GeoRecord, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(format!("{} start {}", self.name, ip));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("{} end {}", self.name, ip));

        if self.succeed {
            Ok(GeoRecord {
                provider: self.name.to_string(),
                ip: Some(ip.to_string()),
                city: Some("Testville".to_string()),
                ..Default::default()
            })
        } else {
            Err(ProviderError::Rejected {
                provider: self.name,
                message: "simulated outage".to_string(),
            })
        }
    }
}

/// Threat fake.
struct FakeThreat {
    result: fn() -> Result<ThreatOutcome, ProviderError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    events: EventLog,
}

impl FakeThreat {
    fn new(result: fn() -> Result<ThreatOutcome, ProviderError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ThreatProvider for FakeThreat {
    fn name(&self) -> &'static str {
        "FakeThreat"
    }

    async fn fetch(
        &self,
        _client: &reqwest::Client,
        ip: &str,
    ) -> Result<ThreatOutcome, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(format!("threat start {}", ip));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.events.lock().unwrap().push(format!("threat end {}", ip));
        (self.result)()
    }
}

fn threat_ok() -> Result<ThreatOutcome, ProviderError> {
    Ok(ThreatOutcome::Found(ThreatRecord {
        provider: "FakeThreat".to_string(),
        is_whitelisted: Some(false),
        abuse_confidence_score: Some(12),
        total_reports: Some(3),
        usage_type: Some("Data Center".to_string()),
    }))
}

fn threat_fail() -> Result<ThreatOutcome, ProviderError> {
    Err(ProviderError::Rejected {
        provider: "FakeThreat",
        message: "quota exceeded".to_string(),
    })
}

fn threat_unconfigured() -> Result<ThreatOutcome, ProviderError> {
    Ok(ThreatOutcome::not_configured())
}

fn config_with_order(order: &[&str]) -> Config {
    Config {
        geo_fallback_order: order.iter().map(|s| s.to_string()).collect(),
        threat_provider: "fake".to_string(),
        ..Default::default()
    }
}

fn ips(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn enabled() -> ScanOptions {
    ScanOptions { no_threat: false }
}

#[tokio::test]
async fn test_private_ip_short_circuits_without_provider_calls() {
    let geo = FakeGeo::ok("primary");
    let geo_calls = geo.calls();
    let threat = FakeThreat::new(threat_ok);
    let threat_calls = Arc::clone(&threat.calls);
    let registry = ProviderRegistry::new()
        .with_geo("primary", geo)
        .with_threat("fake", threat);
    let orchestrator =
        Orchestrator::new(&config_with_order(&["primary"]), &registry, enabled()).unwrap();

    let client = reqwest::Client::new();
    let results = orchestrator
        .run_with_client(&client, &ips(&["192.168.1.1", "10.0.0.7", "::1"]))
        .await;

    for (result, ip) in results.iter().zip(["192.168.1.1", "10.0.0.7", "::1"]) {
        assert_eq!(
            result,
            &LookupResult::Failed {
                ip: ip.to_string(),
                error: PRIVATE_IP_MESSAGE.to_string()
            }
        );
    }
    assert_eq!(geo_calls.load(Ordering::SeqCst), 0);
    assert_eq!(threat_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_first_success_wins_and_later_providers_are_skipped() {
    let first = FakeGeo::ok("first");
    let second = FakeGeo::ok("second");
    let second_calls = second.calls();
    let registry = ProviderRegistry::new()
        .with_geo("first", first)
        .with_geo("second", second);
    let orchestrator = Orchestrator::new(
        &config_with_order(&["first", "second"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let client = reqwest::Client::new();
    let result = orchestrator.process_ip(&client, "8.8.8.8").await;

    let record = result
        .geolocation()
        .and_then(GeoOutcome::record)
        .expect("geolocation should resolve");
    assert_eq!(record.provider, "first");
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fallback_moves_to_next_provider_after_failure() {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let registry = ProviderRegistry::new()
        .with_geo(
            "first",
            FakeGeo::failing("first")
                .with_delay(Duration::from_millis(20))
                .with_events(&events),
        )
        .with_geo("second", FakeGeo::ok("second").with_events(&events));
    let orchestrator = Orchestrator::new(
        &config_with_order(&["first", "second"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let client = reqwest::Client::new();
    let result = orchestrator.process_ip(&client, "1.1.1.1").await;

    assert_eq!(
        result.geolocation().and_then(GeoOutcome::record).map(|r| r.provider.as_str()),
        Some("second")
    );
    // Strictly sequential: the second provider starts after the first ends
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "first start 1.1.1.1",
            "first end 1.1.1.1",
            "second start 1.1.1.1",
            "second end 1.1.1.1"
        ]
    );
    assert_eq!(
        orchestrator
            .stats()
            .get_failure_count(ProviderErrorKind::LogicalFailure),
        1
    );
}

#[tokio::test]
async fn test_all_geo_providers_failing_keeps_full_batch() {
    let registry = ProviderRegistry::new()
        .with_geo("a", FakeGeo::failing("a"))
        .with_geo("b", FakeGeo::failing("b"))
        .with_threat("fake", FakeThreat::new(threat_ok));
    let orchestrator =
        Orchestrator::new(&config_with_order(&["a", "b"]), &registry, enabled()).unwrap();

    let client = reqwest::Client::new();
    let input = ips(&["8.8.8.8", "1.1.1.1", "9.9.9.9"]);
    let results = orchestrator.run_with_client(&client, &input).await;

    assert_eq!(results.len(), input.len());
    for (result, ip) in results.iter().zip(&input) {
        assert_eq!(result.ip(), ip);
        assert_eq!(
            result.geolocation(),
            Some(&GeoOutcome::Failed {
                error: ALL_GEO_FAILED_MESSAGE.to_string()
            })
        );
        // Threat slot is unaffected by the geolocation failure
        assert!(result.threat_intel().and_then(ThreatOutcome::record).is_some());
    }
    assert_eq!(orchestrator.stats().geo_exhausted(), 3);
    assert_eq!(orchestrator.stats().total_failures(), 6);
}

#[tokio::test]
async fn test_threat_failure_is_captured_in_its_slot_only() {
    let registry = ProviderRegistry::new()
        .with_geo("geo", FakeGeo::ok("geo"))
        .with_threat("fake", FakeThreat::new(threat_fail));
    let orchestrator =
        Orchestrator::new(&config_with_order(&["geo"]), &registry, enabled()).unwrap();

    let client = reqwest::Client::new();
    let result = orchestrator.process_ip(&client, "8.8.8.8").await;

    assert!(result.geolocation().and_then(GeoOutcome::record).is_some());
    assert_eq!(
        result.threat_intel(),
        Some(&ThreatOutcome::Failed {
            error: "FakeThreat failed: quota exceeded".to_string()
        })
    );
}

#[tokio::test]
async fn test_unconfigured_threat_is_a_normal_result() {
    let registry = ProviderRegistry::new()
        .with_geo("geo", FakeGeo::ok("geo"))
        .with_threat("fake", FakeThreat::new(threat_unconfigured));
    let orchestrator =
        Orchestrator::new(&config_with_order(&["geo"]), &registry, enabled()).unwrap();

    let client = reqwest::Client::new();
    let results = orchestrator
        .run_with_client(&client, &ips(&["8.8.8.8", "1.1.1.1"]))
        .await;

    for result in &results {
        assert_eq!(result.threat_intel(), Some(&ThreatOutcome::not_configured()));
    }
    assert_eq!(orchestrator.stats().total_failures(), 0);
}

#[tokio::test]
async fn test_no_threat_leaves_slot_empty_and_skips_provider() {
    let threat = FakeThreat::new(threat_ok);
    let threat_calls = Arc::clone(&threat.calls);
    let registry = ProviderRegistry::new()
        .with_geo("geo", FakeGeo::ok("geo"))
        .with_threat("fake", threat);
    let orchestrator = Orchestrator::new(
        &config_with_order(&["geo"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let client = reqwest::Client::new();
    let result = orchestrator.process_ip(&client, "8.8.8.8").await;

    assert_eq!(result.threat_intel(), Some(&ThreatOutcome::Disabled {}));
    assert_eq!(threat_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_geo_and_threat_run_concurrently() {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let mut threat = FakeThreat::new(threat_ok);
    threat.delay = Duration::from_millis(30);
    threat.events = Arc::clone(&events);
    let registry = ProviderRegistry::new()
        .with_geo(
            "geo",
            FakeGeo::ok("geo")
                .with_delay(Duration::from_millis(30))
                .with_events(&events),
        )
        .with_threat("fake", threat);
    let orchestrator =
        Orchestrator::new(&config_with_order(&["geo"]), &registry, enabled()).unwrap();

    let client = reqwest::Client::new();
    orchestrator.process_ip(&client, "8.8.8.8").await;

    let events = events.lock().unwrap();
    let threat_start = events
        .iter()
        .position(|e| e == "threat start 8.8.8.8")
        .unwrap();
    let geo_end = events.iter().position(|e| e == "geo end 8.8.8.8").unwrap();
    assert!(threat_start < geo_end, "threat lookup should not wait for geolocation");
}

#[tokio::test]
async fn test_results_follow_input_order_not_completion_order() {
    // The first IP is the slowest, so it completes last
    struct SlowFirst;

    #[async_trait]
    impl GeoProvider for SlowFirst {
        fn name(&self) -> &'static str {
            "slow-first"
        }

        async fn fetch(
            &self,
            _client: &reqwest::Client,
            ip: &str,
        ) -> Result<GeoRecord, ProviderError> {
            if ip == "8.8.8.8" {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(GeoRecord {
                provider: "slow-first".to_string(),
                ip: Some(ip.to_string()),
                ..Default::default()
            })
        }
    }

    let registry = ProviderRegistry::new().with_geo("slow", SlowFirst);
    let orchestrator = Orchestrator::new(
        &config_with_order(&["slow"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let input = ips(&["8.8.8.8", "1.1.1.1", "192.168.0.1", "9.9.9.9"]);
    let results = orchestrator.run(&input).await.expect("batch should run");

    let order: Vec<&str> = results.iter().map(LookupResult::ip).collect();
    assert_eq!(order, vec!["8.8.8.8", "1.1.1.1", "192.168.0.1", "9.9.9.9"]);
    assert_eq!(
        results[0]
            .geolocation()
            .and_then(GeoOutcome::record)
            .and_then(|r| r.ip.as_deref()),
        Some("8.8.8.8")
    );
}

#[tokio::test]
async fn test_cancellation_abandons_in_flight_work() {
    let registry = ProviderRegistry::new().with_geo(
        "stuck",
        FakeGeo::ok("stuck").with_delay(Duration::from_secs(30)),
    );
    let orchestrator = Orchestrator::new(
        &config_with_order(&["stuck"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = orchestrator
        .run_until_cancelled(&ips(&["8.8.8.8"]), &cancel)
        .await;

    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_already_cancelled_token_does_no_work() {
    let geo = FakeGeo::ok("geo");
    let calls = geo.calls();
    let registry = ProviderRegistry::new().with_geo("geo", geo);
    let orchestrator = Orchestrator::new(
        &config_with_order(&["geo"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = orchestrator
        .run_until_cancelled(&ips(&["8.8.8.8"]), &cancel)
        .await;

    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_provider_in_order_is_config_error() {
    let registry = ProviderRegistry::new().with_geo("geo", FakeGeo::ok("geo"));
    let err = Orchestrator::new(
        &config_with_order(&["geo", "nope"]),
        &registry,
        ScanOptions { no_threat: true },
    )
    .err();
    assert_eq!(
        err,
        Some(ConfigError::UnknownProvider {
            kind: "geolocation",
            name: "nope".to_string()
        })
    );
}

#[test]
fn test_missing_threat_provider_only_matters_when_enabled() {
    let registry = ProviderRegistry::new().with_geo("geo", FakeGeo::ok("geo"));
    let config = config_with_order(&["geo"]);

    assert!(Orchestrator::new(&config, &registry, ScanOptions { no_threat: true }).is_ok());
    assert!(matches!(
        Orchestrator::new(&config, &registry, enabled()).err(),
        Some(ConfigError::UnknownProvider { kind: "threat", .. })
    ));
}
