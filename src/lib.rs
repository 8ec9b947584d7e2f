#![allow(clippy::needless_doctest_main)]
//! `graphql_query_mock` lets you mock the GraphQL operations your application executes,
//! to perform black-box testing of applications talking to a GraphQL API.
//!
//! It matches operations by name and variables, and answers them with canned data,
//! GraphQL errors, failing statuses or responses computed on the fly.
//!
//! # Table of Contents
//! 1. [Getting started](#getting-started)
//! 2. [Matching](#matching)
//! 3. [Spying](#spying)
//! 4. [Controlling when responses are delivered](#controlling-when-responses-are-delivered)
//! 5. [Test isolation](#test-isolation)
//!
//! ## Getting started
//! ```rust
//! use graphql_query_mock::{Mock, MockServer};
//! use serde_json::{json, Value};
//!
//! #[async_std::main]
//! async fn main() {
//!     // Start a background HTTP server on a random local port
//!     let mock_server = MockServer::start().await;
//!
//!     // Arrange the behaviour of the MockServer adding a Mock:
//!     // when it receives the `TestQuery` operation it will respond with some data.
//!     Mock::given("TestQuery")
//!         .respond_with(json!({ "test": "data" }))
//!         // Mounting the mock on the mock server - it's now effective!
//!         .mount(&mock_server)
//!         .await;
//!
//!     // If we send the operation using any HTTP client it behaves as expected.
//!     let client = reqwest::Client::new();
//!     let body: Value = client
//!         .post(mock_server.url())
//!         .json(&json!({ "query": "query TestQuery { test }" }))
//!         .send()
//!         .await
//!         .unwrap()
//!         .json()
//!         .await
//!         .unwrap();
//!     assert_eq!(body, json!({ "data": { "test": "data" } }));
//!
//!     // If the operation doesn't match any `Mock` mounted on our `MockServer` an error is returned.
//!     let status = client
//!         .post(mock_server.url())
//!         .json(&json!({ "query": "query MissingQuery { test }" }))
//!         .send()
//!         .await
//!         .unwrap()
//!         .status();
//!     assert_eq!(status.as_u16(), 500);
//! }
//! ```
//!
//! You don't need an HTTP server if your GraphQL client lets you plug in your own
//! transport: call [`QueryMock::dispatch`] or [`QueryMock::handle_request`] directly.
//!
//! ## Matching
//!
//! A [`Mock`] matches operations by name and, by default, by variables - see
//! [`MockBuilder`] for the available options and [`QueryMock`] for the order in which
//! mocks are tried.
//!
//! ## Spying
//!
//! Every answered operation is recorded: use [`QueryMock::calls`] to check which
//! operations your application executed, with which variables and headers.
//!
//! ## Controlling when responses are delivered
//!
//! [`Mock::mount_with_controlled_resolution`] holds back the responses of a mock until
//! you release them, to assert on the state of your application while a request is
//! in flight.
//!
//! ## Test isolation
//!
//! Each instance of [`QueryMock`] (and therefore of [`MockServer`]) is fully isolated:
//! use one per test to avoid cross-test interference.
mod error;
pub mod identity;
mod mock;
mod mock_server;
mod mock_set;
mod mounted_mock;
pub mod operation;
mod query_mock;
mod request;
mod resolution;
mod respond;
mod response;
pub mod variables;

pub use error::{DispatchError, StatusFailure, VariablesMismatch};
pub use identity::MockId;
pub use mock::{ChangeServerResponseFn, MatchVariables, Mock, MockBuilder};
pub use mock_server::{MockServer, MockServerBuilder};
pub use query_mock::{CallRecord, QueryMock, QueryMockBuilder};
pub use request::{BodyPrintLimit, OperationContext, Request};
pub use resolution::ReleaseHandle;
pub use respond::{respond_async, AsyncResponder, Respond};
pub use response::{GraphQlError, MockedResponse, ServerResponse};
pub use variables::Variables;
