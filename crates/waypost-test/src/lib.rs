//! # Waypost Test
//!
//! In-memory testing for waypost dispatchers: requests go straight into
//! [`Dispatcher::dispatch`](waypost_core::Dispatcher::dispatch) with no
//! network or port binding.
//!
//! - [`TestClient`] - sends requests to a dispatcher
//! - [`TestRequest`] - builds [`ServerRequest`](waypost_extract::ServerRequest)s
//! - [`TestResponse`] - status, header, body and JSON assertions
//!
//! A request no endpoint accepts comes back as `404 Not Found` and
//! [`TestResponse::was_handled`] returns false.
//!
//! ## Example
//!
//! ```ignore
//! #[tokio::test]
//! async fn echo_repeats_body() {
//!     let client = TestClient::new(app());
//!
//!     client
//!         .get("/echo")
//!         .query("count", "3")
//!         .body("ab")
//!         .send()
//!         .await
//!         .assert_status_code(200)
//!         .assert_body_eq("ababab");
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/waypost-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
