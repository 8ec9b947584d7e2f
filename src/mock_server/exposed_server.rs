use crate::mock_server::hyper::{run_server, ServerState};
use crate::mock_server::MockServerBuilder;
use crate::query_mock::CallRecord;
use crate::request::BodyPrintLimit;
use crate::{Mock, QueryMock};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

/// An HTTP server running in the background, answering the GraphQL requests of your
/// application with the [`Mock`]s mounted on its [`QueryMock`].
///
/// Point the GraphQL client of your application to [`MockServer::url`].
///
/// Each instance of `MockServer` is fully isolated: [`start`] takes care of finding a
/// random port available on your local machine which is assigned to the new `MockServer`.
/// You should use one instance of `MockServer` for each test, to ensure full isolation
/// and no cross-test interference.
///
/// When a `MockServer` instance goes out of scope (e.g. the test finishes), the
/// corresponding HTTP server running in the background is shut down to free up the port
/// it was using.
///
/// ### Example:
/// ```rust
/// use graphql_query_mock::{Mock, MockServer};
/// use serde_json::{json, Value};
///
/// #[async_std::main]
/// async fn main() {
///     // Arrange
///     let mock_server = MockServer::start().await;
///     Mock::given("TestQuery")
///         .respond_with(json!({ "test": "data" }))
///         .mount(&mock_server)
///         .await;
///
///     // Act
///     let body: Value = reqwest::Client::new()
///         .post(mock_server.url())
///         .json(&json!({ "query": "query TestQuery { test }" }))
///         .send()
///         .await
///         .unwrap()
///         .json()
///         .await
///         .unwrap();
///
///     // Assert
///     assert_eq!(body, json!({ "data": { "test": "data" } }));
/// }
/// ```
///
/// [`start`]: MockServer::start
pub struct MockServer {
    query_mock: QueryMock,
    server_address: SocketAddr,
    path: String,
    // When `_shutdown_trigger` gets dropped the listening server terminates gracefully.
    _shutdown_trigger: tokio::sync::oneshot::Sender<()>,
}

impl MockServer {
    /// You can use `MockServer::builder` if you need to specify custom configuration - e.g.
    /// run on a specific port or serve a `QueryMock` you already have.
    ///
    /// If this is not your case, use [`MockServer::start`].
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::new()
    }

    /// Start a new instance of a `MockServer` listening on a random port, serving an
    /// empty [`QueryMock`] on `/graphql`.
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub(super) fn start_with(
        listener: TcpListener,
        query_mock: QueryMock,
        path: String,
        body_print_limit: BodyPrintLimit,
    ) -> Self {
        let (shutdown_trigger, shutdown_receiver) = tokio::sync::oneshot::channel();
        let server_address = listener
            .local_addr()
            .expect("Failed to get server address.");

        let server_state = Arc::new(ServerState {
            query_mock: query_mock.clone(),
            path: path.clone(),
            body_print_limit,
        });
        // The listener is already bound: connections attempted before the server loop
        // starts wait in the backlog.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Cannot build local tokio runtime");

            runtime.block_on(run_server(listener, server_state, shutdown_receiver))
        });

        Self {
            query_mock,
            server_address,
            path,
            _shutdown_trigger: shutdown_trigger,
        }
    }

    /// The [`QueryMock`] answering the requests received by this `MockServer`.
    pub fn query_mock(&self) -> &QueryMock {
        &self.query_mock
    }

    /// Register a [`Mock`] on the [`QueryMock`] of this `MockServer`.
    pub async fn register(&self, mock: Mock) {
        self.query_mock.register(mock).await
    }

    /// Drop all mounted [`Mock`]s and recorded calls.
    pub async fn reset(&self) {
        self.query_mock.reset().await
    }

    /// The operations answered so far, oldest first.
    pub async fn calls(&self) -> Vec<CallRecord> {
        self.query_mock.calls().await
    }

    /// Return the base uri of this running instance of `MockServer`, e.g. `http://127.0.0.1:4372`.
    pub fn uri(&self) -> String {
        format!("http://{}", self.server_address)
    }

    /// Return the url GraphQL requests should be sent to, e.g. `http://127.0.0.1:4372/graphql`.
    pub fn url(&self) -> String {
        format!("{}{}", self.uri(), self.path)
    }

    /// Return the socket address of this running instance of `MockServer`, e.g. `127.0.0.1:4372`.
    pub fn address(&self) -> &SocketAddr {
        &self.server_address
    }
}

impl AsRef<QueryMock> for MockServer {
    fn as_ref(&self) -> &QueryMock {
        &self.query_mock
    }
}
