//! Fixed-window attempt limiter used to throttle repeated authentication failures.
//!
//! Windows are fixed, not sliding: the first attempt for an identifier opens a window and
//! attempts inside it count against the budget. The first attempt after the window elapses
//! resets the record, so a read can mutate state. Stale identifiers linger until their next
//! access; there is no background sweep, because the set is bounded by active callers.

// self
use crate::{
	_prelude::*,
	config::RateLimitConfig,
	obs::{ComponentKind, EventOutcome, record_component_event},
};

#[derive(Clone, Debug)]
struct AttemptWindow {
	attempts: u32,
	window_start: OffsetDateTime,
}

/// Fixed-window rate limiter keyed by caller identifier.
///
/// Refusal is a boolean, never an error; the caller decides whether to surface it as an
/// auth failure.
#[derive(Debug)]
pub struct FixedWindowLimiter {
	config: RateLimitConfig,
	records: Mutex<HashMap<String, AttemptWindow>>,
}
impl FixedWindowLimiter {
	/// Creates a limiter with the given tuning.
	pub fn new(config: RateLimitConfig) -> Self {
		Self { config, records: Mutex::new(HashMap::new()) }
	}

	/// Records an attempt for the identifier and reports whether it may proceed, using the
	/// current wall clock.
	pub fn is_allowed(&self, identifier: &str) -> bool {
		self.is_allowed_at(identifier, OffsetDateTime::now_utc())
	}

	/// [`is_allowed`](Self::is_allowed) as of `now`.
	///
	/// Once the budget is exhausted the counter stops incrementing, so refused attempts do
	/// not extend the lockout.
	pub fn is_allowed_at(&self, identifier: &str, now: OffsetDateTime) -> bool {
		if !self.config.enabled {
			return true;
		}

		let mut records = self.records.lock();
		let allowed = match records.get_mut(identifier) {
			Some(record) if now - record.window_start > self.config.window => {
				record.attempts = 1;
				record.window_start = now;

				true
			},
			Some(record) if record.attempts >= self.config.max_attempts => false,
			Some(record) => {
				record.attempts += 1;

				true
			},
			None => {
				records.insert(
					identifier.to_owned(),
					AttemptWindow { attempts: 1, window_start: now },
				);

				true
			},
		};

		record_component_event(
			ComponentKind::RateLimiter,
			if allowed { EventOutcome::Allow } else { EventOutcome::Refuse },
		);

		allowed
	}

	/// Attempts left in the identifier's current window, using the current wall clock.
	pub fn remaining(&self, identifier: &str) -> u32 {
		self.remaining_at(identifier, OffsetDateTime::now_utc())
	}

	/// [`remaining`](Self::remaining) as of `now`. Does not count as an attempt.
	pub fn remaining_at(&self, identifier: &str, now: OffsetDateTime) -> u32 {
		if !self.config.enabled {
			return self.config.max_attempts;
		}

		match self.records.lock().get(identifier) {
			Some(record) if now - record.window_start > self.config.window =>
				self.config.max_attempts,
			Some(record) => self.config.max_attempts.saturating_sub(record.attempts),
			None => self.config.max_attempts,
		}
	}

	/// Number of tracked identifiers.
	pub fn tracked(&self) -> usize {
		self.records.lock().len()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn limiter(max_attempts: u32, window: Duration) -> FixedWindowLimiter {
		FixedWindowLimiter::new(
			RateLimitConfig::default().with_max_attempts(max_attempts).with_window(window),
		)
	}

	#[test]
	fn budget_exhausts_then_window_reset_restores() {
		let limiter = limiter(5, Duration::minutes(15));
		let start = macros::datetime!(2025-11-10 12:00 UTC);

		for _ in 0..5 {
			assert!(limiter.is_allowed_at("caller-1", start));
		}
		assert!(!limiter.is_allowed_at("caller-1", start));
		assert_eq!(limiter.remaining_at("caller-1", start), 0);

		// First attempt after the window elapses resets the record to count = 1.
		let later = start + Duration::minutes(15) + Duration::seconds(1);

		assert!(limiter.is_allowed_at("caller-1", later));
		assert_eq!(limiter.remaining_at("caller-1", later), 4);
	}

	#[test]
	fn refused_attempts_do_not_extend_the_window() {
		let limiter = limiter(1, Duration::seconds(60));
		let start = macros::datetime!(2025-11-10 12:00 UTC);

		assert!(limiter.is_allowed_at("caller-1", start));
		assert!(!limiter.is_allowed_at("caller-1", start + Duration::seconds(30)));
		// The refusal above did not restart the window.
		assert!(limiter.is_allowed_at("caller-1", start + Duration::seconds(61)));
	}

	#[test]
	fn identifiers_are_independent() {
		let limiter = limiter(1, Duration::seconds(60));
		let now = macros::datetime!(2025-11-10 12:00 UTC);

		assert!(limiter.is_allowed_at("caller-1", now));
		assert!(limiter.is_allowed_at("caller-2", now));
		assert!(!limiter.is_allowed_at("caller-1", now));
		assert_eq!(limiter.tracked(), 2);
	}

	#[test]
	fn disabled_limiter_always_allows() {
		let limiter = FixedWindowLimiter::new(
			RateLimitConfig::default().with_enabled(false).with_max_attempts(1),
		);

		for _ in 0..10 {
			assert!(limiter.is_allowed("caller-1"));
		}
		assert_eq!(limiter.remaining("caller-1"), 1);
	}
}
