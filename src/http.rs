//! Request/response descriptors and the outbound dispatch capability.
//!
//! The module exposes [`RequestDescriptor`] and [`ResponseParts`] as the core's only view of
//! HTTP traffic, plus the [`HttpDispatch`] trait so embedders can bring their own client.
//! The core never performs I/O itself; the cache and batcher only prepare or consume values
//! of these types. A reqwest-backed [`ReqwestDispatcher`] ships behind the `reqwest` feature.

// self
use crate::{_prelude::*, error::ConfigError};

/// Boxed future returned by [`HttpDispatch::dispatch`].
pub type DispatchFuture<'a> = Pin<Box<dyn Future<Output = Result<ResponseParts>> + 'a + Send>>;

/// Outbound HTTP capability supplied by the embedding service.
///
/// Implementations map a descriptor to a response or a transport failure. Transport failures
/// are opaque to the core; wrap them with [`Error::transport`] so the health aggregator can
/// record them without interpreting them.
pub trait HttpDispatch
where
	Self: Send + Sync,
{
	/// Executes a single request.
	fn dispatch(&self, request: RequestDescriptor) -> DispatchFuture<'_>;
}

/// Immutable description of one outbound HTTP request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
	/// Uppercased HTTP method.
	pub method: String,
	/// Parsed absolute URL, query included.
	pub url: Url,
	/// Outgoing headers; names are matched case-insensitively on read.
	pub headers: BTreeMap<String, String>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl RequestDescriptor {
	/// Creates a descriptor after validating the method token and parsing the URL.
	pub fn new(method: impl AsRef<str>, url: impl AsRef<str>) -> Result<Self, ConfigError> {
		let method = method.as_ref().trim();

		if method.is_empty() || !method.bytes().all(|byte| byte.is_ascii_alphabetic()) {
			return Err(ConfigError::InvalidMethod { method: method.to_owned() });
		}

		let url = Url::parse(url.as_ref())?;

		Ok(Self {
			method: method.to_ascii_uppercase(),
			url,
			headers: BTreeMap::new(),
			body: None,
		})
	}

	/// Adds an outgoing header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Attaches a request body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		header_lookup(&self.headers, name)
	}

	/// Sets a header in place; used by the cache when injecting conditional headers.
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.headers.insert(name.into(), value.into());
	}
}

/// Decomposed HTTP response as the core consumes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseParts {
	/// HTTP status code.
	pub status: u16,
	/// Response headers; names are matched case-insensitively on read.
	pub headers: BTreeMap<String, String>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ResponseParts {
	/// Creates an empty response with the given status.
	pub fn new(status: u16) -> Self {
		Self { status, headers: BTreeMap::new(), body: Vec::new() }
	}

	/// Adds a response header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Attaches a response body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Returns a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		header_lookup(&self.headers, name)
	}

	/// Returns the `ETag` validator, if present.
	pub fn etag(&self) -> Option<&str> {
		self.header("etag")
	}

	/// Returns the `Last-Modified` validator, if present.
	pub fn last_modified(&self) -> Option<&str> {
		self.header("last-modified")
	}

	/// True for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

fn header_lookup<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(stored, _)| stored.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}

/// Thin [`HttpDispatch`] adapter around [`ReqwestClient`] so shared HTTP behavior lives in
/// one place. Embedders that need timeouts, proxies, or custom TLS configure the client
/// before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestDispatcher(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestDispatcher {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpDispatch for ReqwestDispatcher {
	fn dispatch(&self, request: RequestDescriptor) -> DispatchFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method =
				reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|_| {
					ConfigError::InvalidMethod { method: request.method.clone() }
				})?;
			let mut builder = client.request(method, request.url.clone());

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(Error::transport)?;
			let mut parts = ResponseParts::new(response.status().as_u16());

			for (name, value) in response.headers() {
				if let Ok(text) = value.to_str() {
					parts.headers.insert(name.as_str().to_owned(), text.to_owned());
				}
			}

			parts.body = response.bytes().await.map_err(Error::transport)?.to_vec();

			Ok(parts)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn descriptor_normalizes_method_case() {
		let request = RequestDescriptor::new("get", "https://api.example.com/items")
			.expect("Descriptor fixture should build successfully.");

		assert_eq!(request.method, "GET");
	}

	#[test]
	fn descriptor_rejects_malformed_methods() {
		assert!(matches!(
			RequestDescriptor::new("G E T", "https://api.example.com/items"),
			Err(ConfigError::InvalidMethod { .. })
		));
		assert!(matches!(
			RequestDescriptor::new("", "https://api.example.com/items"),
			Err(ConfigError::InvalidMethod { .. })
		));
	}

	#[test]
	fn descriptor_rejects_malformed_urls() {
		assert!(matches!(
			RequestDescriptor::new("GET", "not a url"),
			Err(ConfigError::InvalidUrl(_))
		));
	}

	#[test]
	fn header_reads_are_case_insensitive() {
		let response = ResponseParts::new(200)
			.with_header("ETag", "\"v1\"")
			.with_header("Last-Modified", "Mon, 01 Jan 2024 00:00:00 GMT");

		assert_eq!(response.etag(), Some("\"v1\""));
		assert_eq!(response.header("LAST-MODIFIED"), response.last_modified());
		assert!(response.is_success());
	}
}
