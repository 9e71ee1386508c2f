#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use mcp_relay_core::http::{HttpDispatch, ReqwestDispatcher, RequestDescriptor};

#[tokio::test]
async fn dispatch_round_trips_status_headers_and_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("x-api-key", "secret-key");
			then.status(200).header("ETag", "\"v1\"").body("[]");
		})
		.await;
	let dispatcher = ReqwestDispatcher::default();
	let request = RequestDescriptor::new("GET", server.url("/items"))
		.expect("Request fixture should build successfully.")
		.with_header("x-api-key", "secret-key");
	let response =
		dispatcher.dispatch(request).await.expect("Dispatch against the mock should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status, 200);
	assert_eq!(response.etag(), Some("\"v1\""));
	assert_eq!(response.body, b"[]");
}

#[tokio::test]
async fn dispatch_sends_request_bodies() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/items").body("{\"name\":\"widget\"}");
			then.status(201);
		})
		.await;
	let dispatcher = ReqwestDispatcher::default();
	let request = RequestDescriptor::new("POST", server.url("/items"))
		.expect("Request fixture should build successfully.")
		.with_body("{\"name\":\"widget\"}");
	let response =
		dispatcher.dispatch(request).await.expect("Dispatch against the mock should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status, 201);
	assert!(response.is_success());
}

#[tokio::test]
async fn connection_failures_surface_as_transport_errors() {
	let dispatcher = ReqwestDispatcher::default();
	// Port 9 (discard) on localhost is not listening.
	let request = RequestDescriptor::new("GET", "http://127.0.0.1:9/unreachable")
		.expect("Request fixture should build successfully.");
	let error = dispatcher
		.dispatch(request)
		.await
		.expect_err("Dispatch against a closed port should fail.");

	assert!(matches!(error, mcp_relay_core::error::Error::Transport { .. }));
}
