// crates.io
use time::{Duration, macros};
// self
use mcp_relay_core::health::{AuthOutcome, HealthMonitor, HealthStatus};

#[test]
fn clean_traffic_reports_healthy() {
	let started_at = macros::datetime!(2025-11-10 12:00 UTC);
	let monitor = HealthMonitor::started_at(started_at);

	// 100 requests, 96 successful, 200 ms each, no errors, no auth failures.
	for index in 0..100 {
		monitor.record_request(index < 96, Duration::milliseconds(200));
	}
	for _ in 0..10 {
		monitor.record_auth(AuthOutcome::Success);
	}

	let now = started_at + Duration::minutes(10);
	let report = monitor.snapshot_at(now);

	assert_eq!(report.status, HealthStatus::Healthy);
	assert_eq!(report.checks.passed(), 4);
	assert_eq!(report.success_rate, 0.96);
	assert_eq!(report.average_latency_ms, 200.);
	assert_eq!(report.uptime, Duration::minutes(10));
	assert!(report.last_error.is_none());
}

#[test]
fn one_failing_check_degrades() {
	let monitor = HealthMonitor::started_at(macros::datetime!(2025-11-10 12:00 UTC));

	// 50 % success rate fails the success check; everything else stays green.
	monitor.record_request(true, Duration::milliseconds(100));
	monitor.record_request(false, Duration::milliseconds(100));

	let report = monitor.snapshot_at(macros::datetime!(2025-11-10 12:10 UTC));

	assert_eq!(report.checks.passed(), 3);
	assert_eq!(report.status, HealthStatus::Degraded);
	assert!(!report.checks.success_rate_ok);
}

#[test]
fn two_failing_checks_are_unhealthy() {
	let monitor = HealthMonitor::started_at(macros::datetime!(2025-11-10 12:00 UTC));
	let now = macros::datetime!(2025-11-10 12:10 UTC);

	monitor.record_request(true, Duration::milliseconds(100));
	monitor.record_request(false, Duration::milliseconds(100));
	monitor.record_error_at("upstream 502", now - Duration::minutes(1));

	let report = monitor.snapshot_at(now);

	assert_eq!(report.checks.passed(), 2);
	assert_eq!(report.status, HealthStatus::Unhealthy);
	assert!(!report.checks.recent_error_free);

	let last_error = report.last_error.expect("Recorded error should surface in the report.");

	assert_eq!(last_error.message, "upstream 502");
}

#[test]
fn auth_failure_ratio_uses_the_ten_percent_cap() {
	let monitor = HealthMonitor::new();

	for _ in 0..20 {
		monitor.record_auth(AuthOutcome::Success);
	}
	monitor.record_auth(AuthOutcome::Failure);

	// 1 failure against 20 successes sits below the 10 % cap.
	assert!(monitor.snapshot().checks.auth_failure_ratio_ok);

	monitor.record_auth(AuthOutcome::Failure);
	monitor.record_auth(AuthOutcome::Failure);

	// 3 failures against 20 successes breaches it.
	let report = monitor.snapshot();

	assert!(!report.checks.auth_failure_ratio_ok);
	assert_eq!(report.auth.failure, 3);
}

#[test]
fn rate_limited_attempts_are_counted_separately() {
	let monitor = HealthMonitor::new();

	monitor.record_auth(AuthOutcome::RateLimited);
	monitor.record_auth(AuthOutcome::RateLimited);

	let report = monitor.snapshot();

	assert_eq!(report.auth.rate_limited, 2);
	assert_eq!(report.auth.failure, 0);
	// Refusals are not auth failures; the ratio check stays green.
	assert!(report.checks.auth_failure_ratio_ok);
}

#[test]
fn cache_hit_rate_tracks_recorded_lookups() {
	let monitor = HealthMonitor::new();

	monitor.record_cache_hit(true);
	monitor.record_cache_hit(true);
	monitor.record_cache_hit(false);
	monitor.record_cache_hit(true);

	let report = monitor.snapshot();

	assert_eq!(report.cache.hits, 3);
	assert_eq!(report.cache.misses, 1);
	assert_eq!(report.cache_hit_rate, 0.75);
}

#[test]
fn idle_monitor_is_healthy_and_serializes() {
	let monitor = HealthMonitor::started_at(macros::datetime!(2025-11-10 12:00 UTC));
	let report = monitor.snapshot_at(macros::datetime!(2025-11-10 12:00:30 UTC));

	assert_eq!(report.status, HealthStatus::Healthy);

	let payload =
		serde_json::to_value(&report).expect("Health report should serialize to JSON.");

	assert_eq!(payload["status"], "healthy");
	assert_eq!(payload["requests"]["total"], 0);
}
