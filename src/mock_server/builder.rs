use crate::mock_server::exposed_server::MockServer;
use crate::request::{BodyPrintLimit, BODY_PRINT_LIMIT};
use crate::QueryMock;
use std::env;
use std::net::TcpListener;

/// A builder providing a fluent API to assemble a [`MockServer`] step-by-step.
/// Use [`MockServer::builder`] to get started.
pub struct MockServerBuilder {
    listener: Option<TcpListener>,
    path: String,
    query_mock: Option<QueryMock>,
    body_print_limit: BodyPrintLimit,
}

impl MockServerBuilder {
    pub(super) fn new() -> Self {
        let body_print_limit = match env::var("GRAPHQL_QUERY_MOCK_BODY_PRINT_LIMIT")
            .ok()
            .and_then(|x| x.parse::<usize>().ok())
        {
            Some(limit) => BodyPrintLimit::Limited(limit),
            None => BodyPrintLimit::Limited(BODY_PRINT_LIMIT),
        };
        Self {
            listener: None,
            path: "/graphql".into(),
            query_mock: None,
            body_print_limit,
        }
    }

    /// Each instance of [`MockServer`] is, by default, running on a random
    /// port available on your local machine.
    /// With `MockServerBuilder::listener` you can choose to start the `MockServer`
    /// instance on a specific port you have already bound.
    ///
    /// ### Example:
    /// ```rust
    /// use graphql_query_mock::MockServer;
    ///
    /// #[async_std::main]
    /// async fn main() {
    ///     // Arrange
    ///     let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    ///     let expected_server_address = listener
    ///         .local_addr()
    ///         .expect("Failed to get server address.");
    ///
    ///     // Act
    ///     let mock_server = MockServer::builder().listener(listener).start().await;
    ///
    ///     // Assert
    ///     assert_eq!(&expected_server_address, mock_server.address());
    /// }
    /// ```
    pub fn listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// The path GraphQL requests are sent to. Defaults to `/graphql`.
    ///
    /// Requests to any other path get a `404`.
    pub fn path<T: Into<String>>(mut self, path: T) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    /// Serve an existing [`QueryMock`] instead of a new, empty, one.
    pub fn query_mock(mut self, query_mock: QueryMock) -> Self {
        self.query_mock = Some(query_mock);
        self
    }

    /// The mock server logs the requests it could not answer.
    /// By default, the size of the printed body is limited.
    ///
    /// You may want to change this if your operations carry very large variables.
    /// The default limit can also be set via the `GRAPHQL_QUERY_MOCK_BODY_PRINT_LIMIT`
    /// environment variable.
    pub fn body_print_limit(mut self, limit: BodyPrintLimit) -> Self {
        self.body_print_limit = limit;
        self
    }

    /// Finalise the builder and launch the [`MockServer`] instance!
    pub async fn start(self) -> MockServer {
        let listener = if let Some(listener) = self.listener {
            listener
        } else {
            TcpListener::bind("127.0.0.1:0").expect("Failed to bind an OS port for a mock server.")
        };
        MockServer::start_with(
            listener,
            self.query_mock.unwrap_or_default(),
            self.path,
            self.body_print_limit,
        )
    }
}
