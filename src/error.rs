//! Core error types shared across the cache, batcher, and dispatch layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical core error exposed by public APIs.
///
/// Cache misses and rate-limit refusals are normal negative results and never surface here.
/// The enum is `Clone` so a single executor failure can fan out verbatim to every member of
/// a flushed batch.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
	/// Local configuration or descriptor problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Batch executor reported a failure; shared by every member of the flush.
	#[error("Batch executor failed: {message}.")]
	BatchExecutor {
		/// Executor-supplied failure summary.
		message: String,
	},
	/// Executor returned a result list whose length does not match the submitted batch.
	#[error("Batch executor returned {actual} results for {expected} requests.")]
	BatchShapeMismatch {
		/// Number of requests submitted in the flush.
		expected: usize,
		/// Number of results the executor produced.
		actual: usize,
	},
	/// A flush completed without delivering a result to this member.
	#[error("Batch flush dropped the pending request without a result.")]
	BatchAbandoned,
	/// Upstream dispatch failure; opaque to the core and recorded as-is.
	#[error("Transport error occurred during dispatch: {message}.")]
	Transport {
		/// Transport-specific failure summary.
		message: String,
	},
}
impl Error {
	/// Wraps a transport-specific failure, keeping only its rendered message.
	pub fn transport(source: impl Display) -> Self {
		Self::Transport { message: source.to_string() }
	}

	/// Wraps an executor failure, keeping only its rendered message.
	pub fn batch_executor(source: impl Display) -> Self {
		Self::BatchExecutor { message: source.to_string() }
	}
}

/// Configuration and validation failures raised by the core.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Request descriptor contains an invalid URL.
	#[error("Request descriptor contains an invalid URL.")]
	InvalidUrl(#[from] url::ParseError),
	/// HTTP method string is not a valid token.
	#[error("Request method `{method}` is not a valid HTTP method.")]
	InvalidMethod {
		/// Offending method string.
		method: String,
	},
}
