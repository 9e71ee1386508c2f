//! Time-windowed request batcher that coalesces near-simultaneous calls to the same logical
//! endpoint into one downstream execution.
//!
//! Requests are grouped by method + path with the query stripped; callers that cannot treat
//! same-path requests as interchangeable plug in their own key function. A group flushes when
//! it reaches `max_size` or when its window timer fires, whichever comes first, and each group
//! is flushed at most once. Flushing removes the group before the executor runs, so a slow
//! executor never blocks new batch formation for the same key.
//!
//! Results are matched to requests by position. An executor that returns a list of a different
//! length fails every member with [`Error::BatchShapeMismatch`] instead of delivering results
//! that may belong to someone else.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use tokio::{sync::oneshot, task::JoinHandle};
// self
use crate::{
	_prelude::*,
	config::BatchConfig,
	http::{RequestDescriptor, ResponseParts},
	obs::{ComponentKind, ComponentSpan, EventOutcome, record_component_event},
};

/// Boxed future returned by [`BatchExecutor::execute`].
pub type ExecuteFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<ResponseParts>>> + 'a + Send>>;

/// Downstream execution capability supplied by the caller per batch.
///
/// Implementations must return exactly one result per submitted request, in submission order.
pub trait BatchExecutor
where
	Self: Send + Sync,
{
	/// Executes one flushed batch.
	fn execute(&self, batch: Vec<RequestDescriptor>) -> ExecuteFuture<'_>;
}
impl<F> BatchExecutor for F
where
	F: Fn(Vec<RequestDescriptor>) -> ExecuteFuture<'static> + Send + Sync,
{
	fn execute(&self, batch: Vec<RequestDescriptor>) -> ExecuteFuture<'_> {
		(self)(batch)
	}
}

/// Identifier deciding which pending requests may share one flush.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey(String);
impl GroupKey {
	/// Wraps an arbitrary grouping label; used by custom [`GroupKeyFn`] implementations.
	pub fn new(label: impl Into<String>) -> Self {
		Self(label.into())
	}

	/// Default grouping: method + scheme/authority/path, query stripped.
	pub fn for_request(request: &RequestDescriptor) -> Self {
		let url = &request.url;

		Self(format!("{} {}://{}{}", request.method, url.scheme(), url.authority(), url.path()))
	}
}
impl Display for GroupKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Pluggable grouping function.
pub type GroupKeyFn = Arc<dyn Fn(&RequestDescriptor) -> GroupKey + Send + Sync>;

struct PendingCall {
	request: RequestDescriptor,
	reply: oneshot::Sender<Result<ResponseParts>>,
}

struct BatchGroup {
	// Distinguishes this group from a successor under the same key, so a stale timer
	// never flushes a group it did not open.
	epoch: u64,
	executor: Arc<dyn BatchExecutor>,
	pending: Vec<PendingCall>,
	timer: JoinHandle<()>,
}

type GroupMap = Arc<Mutex<HashMap<GroupKey, BatchGroup>>>;

/// Coalesces concurrent requests per [`GroupKey`] into bounded downstream batches.
#[derive(Clone)]
pub struct RequestBatcher {
	config: BatchConfig,
	group_key_fn: GroupKeyFn,
	groups: GroupMap,
	epochs: Arc<AtomicU64>,
}
impl RequestBatcher {
	/// Creates a batcher with the default query-stripping group key.
	pub fn new(config: BatchConfig) -> Self {
		Self {
			config,
			group_key_fn: Arc::new(GroupKey::for_request),
			groups: Arc::default(),
			epochs: Arc::default(),
		}
	}

	/// Replaces the grouping function.
	///
	/// The default treats all requests to one method + path as interchangeable, which is a
	/// domain assumption about the upstream API, not a generic guarantee.
	pub fn with_group_key_fn(
		mut self,
		group_key_fn: impl Fn(&RequestDescriptor) -> GroupKey + Send + Sync + 'static,
	) -> Self {
		self.group_key_fn = Arc::new(group_key_fn);

		self
	}

	/// Folds the request into its group and resolves once the group flushes.
	///
	/// The executor supplied on the first enqueue of a group runs the whole flush. With
	/// batching disabled (or `max_size` ≤ 1) the request executes as a singleton batch
	/// immediately.
	pub async fn enqueue(
		&self,
		request: RequestDescriptor,
		executor: Arc<dyn BatchExecutor>,
	) -> Result<ResponseParts> {
		if !self.config.enabled || self.config.max_size <= 1 {
			return Self::execute_single(request, executor).await;
		}

		let key = (self.group_key_fn)(&request);
		let (reply, receiver) = oneshot::channel();
		let full_group = {
			let mut groups = self.groups.lock();

			if !groups.contains_key(&key) {
				let group = self.open_group(key.clone(), Arc::clone(&executor));

				groups.insert(key.clone(), group);
			}

			let full = groups.get_mut(&key).map(|group| {
				group.pending.push(PendingCall { request, reply });

				group.pending.len() >= self.config.max_size
			});

			if full == Some(true) { groups.remove(&key) } else { None }
		};

		// Size-triggered flush runs on the enqueueing task; the window timer is cancelled
		// here, its only other terminus being natural expiry.
		if let Some(group) = full_group {
			group.timer.abort();

			Self::flush(group).await;
		}

		match receiver.await {
			Ok(result) => result,
			Err(_) => Err(Error::BatchAbandoned),
		}
	}

	fn open_group(&self, key: GroupKey, executor: Arc<dyn BatchExecutor>) -> BatchGroup {
		let epoch = self.epochs.fetch_add(1, Ordering::Relaxed);
		let groups = Arc::clone(&self.groups);
		let window = std::time::Duration::try_from(self.config.window).unwrap_or_default();
		let timer = tokio::spawn(async move {
			tokio::time::sleep(window).await;

			let expired = {
				let mut groups = groups.lock();

				match groups.get(&key) {
					Some(group) if group.epoch == epoch => groups.remove(&key),
					_ => None,
				}
			};

			if let Some(group) = expired {
				Self::flush(group).await;
			}
		});

		BatchGroup { epoch, executor, pending: Vec::new(), timer }
	}

	async fn flush(group: BatchGroup) {
		let BatchGroup { executor, pending, .. } = group;
		let span = ComponentSpan::new(ComponentKind::Batcher, "flush");
		let batch = pending.iter().map(|call| call.request.clone()).collect::<Vec<_>>();
		let outcome = span.instrument(executor.execute(batch)).await;

		record_component_event(
			ComponentKind::Batcher,
			if outcome.is_ok() { EventOutcome::Flush } else { EventOutcome::Failure },
		);

		match outcome {
			Ok(results) if results.len() == pending.len() =>
				for (call, result) in pending.into_iter().zip(results) {
					let _ = call.reply.send(Ok(result));
				},
			Ok(results) => {
				let error =
					Error::BatchShapeMismatch { expected: pending.len(), actual: results.len() };

				for call in pending {
					let _ = call.reply.send(Err(error.clone()));
				}
			},
			Err(error) =>
				for call in pending {
					let _ = call.reply.send(Err(error.clone()));
				},
		}
	}

	async fn execute_single(
		request: RequestDescriptor,
		executor: Arc<dyn BatchExecutor>,
	) -> Result<ResponseParts> {
		let mut results = executor.execute(vec![request]).await?;

		if results.len() != 1 {
			return Err(Error::BatchShapeMismatch { expected: 1, actual: results.len() });
		}

		results.pop().ok_or(Error::BatchAbandoned)
	}

	/// Number of groups currently accumulating.
	pub fn open_groups(&self) -> usize {
		self.groups.lock().len()
	}
}
impl Debug for RequestBatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestBatcher")
			.field("config", &self.config)
			.field("open_groups", &self.open_groups())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// self
	use super::*;

	fn request(url: &str) -> RequestDescriptor {
		RequestDescriptor::new("GET", url).expect("Request fixture should build successfully.")
	}

	#[derive(Default)]
	struct CountingExecutor(AtomicUsize);
	impl BatchExecutor for CountingExecutor {
		fn execute(&self, batch: Vec<RequestDescriptor>) -> ExecuteFuture<'_> {
			self.0.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move { Ok(batch.iter().map(|_| ResponseParts::new(200)).collect()) })
		}
	}

	#[test]
	fn group_keys_strip_queries() {
		let a = GroupKey::for_request(&request("https://api.example.com/items?page=1"));
		let b = GroupKey::for_request(&request("https://api.example.com/items?page=2"));
		let c = GroupKey::for_request(&request("https://api.example.com/other"));

		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[tokio::test(start_paused = true)]
	async fn custom_group_key_fn_overrides_grouping() {
		// Collapse every request into one group regardless of path.
		let batcher = RequestBatcher::new(BatchConfig::default().with_max_size(2))
			.with_group_key_fn(|_| GroupKey::new("everything"));
		let counting = Arc::new(CountingExecutor::default());
		let executor: Arc<dyn BatchExecutor> = counting.clone();
		let (items, users) = tokio::join!(
			batcher.enqueue(request("https://api.example.com/items"), executor.clone()),
			batcher.enqueue(request("https://api.example.com/users"), executor),
		);

		assert!(items.is_ok());
		assert!(users.is_ok());
		// One flush served both paths; the default key would have used two.
		assert_eq!(counting.0.load(Ordering::SeqCst), 1);
	}
}
