//! Optional observability helpers for the relay core.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `relay_core.component` with the
//!   `component` and `stage` fields.
//! - Enable `metrics` to increment the `relay_core_event_total` counter for every cache
//!   lookup, batch flush, and rate-limit decision, labeled by `component` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Core components observed by the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
	/// Response cache.
	Cache,
	/// Request batcher.
	Batcher,
	/// Auth rate limiter.
	RateLimiter,
	/// Secure token cache.
	TokenCache,
}
impl ComponentKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ComponentKind::Cache => "cache",
			ComponentKind::Batcher => "batcher",
			ComponentKind::RateLimiter => "rate_limiter",
			ComponentKind::TokenCache => "token_cache",
		}
	}
}
impl Display for ComponentKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for component events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventOutcome {
	/// Lookup served from local state.
	Hit,
	/// Lookup fell through to the network.
	Miss,
	/// Batch group flushed successfully.
	Flush,
	/// Attempt admitted by the limiter.
	Allow,
	/// Attempt refused by the limiter.
	Refuse,
	/// Operation failed.
	Failure,
}
impl EventOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EventOutcome::Hit => "hit",
			EventOutcome::Miss => "miss",
			EventOutcome::Flush => "flush",
			EventOutcome::Allow => "allow",
			EventOutcome::Refuse => "refuse",
			EventOutcome::Failure => "failure",
		}
	}
}
impl Display for EventOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
