use crate::error::{DispatchError, StatusFailure};
use crate::mock::ChangeServerResponseFn;
use crate::mock_set::MockSet;
use crate::mounted_mock::MountedMock;
use crate::operation;
use crate::request::{GraphQlRequestBody, OperationContext};
use crate::resolution::{ReleaseHandle, ResolutionSignal};
use crate::response::{MockedResponse, ServerResponse};
use crate::variables::{self, Variables};
use crate::{Mock, Request};
use http::HeaderMap;
use log::debug;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An operation that was answered by a [`QueryMock`], as returned by [`QueryMock::calls`].
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// The name of the operation, e.g. `TestQuery` for `query TestQuery { ... }`.
    pub id: String,
    /// The variables sent with the operation.
    pub variables: Variables,
    /// The headers of the intercepted request.
    pub headers: HeaderMap,
    /// The body of the response returned for this call.
    pub response: ServerResponse,
}

pub(crate) struct QueryMockState {
    pub(crate) mock_set: MockSet,
    pub(crate) calls: Vec<CallRecord>,
}

/// A registry of GraphQL operation mocks.
///
/// Mount [`Mock`]s on a `QueryMock` to describe which operations your application is
/// expected to execute and what they should return; route the requests of your
/// application to it - either via [`MockServer`] or by calling [`dispatch`] from your
/// own transport - and each of them will be answered by the matching mock.
///
/// Every `QueryMock` is isolated from the others: use one per test.
/// Cloning a `QueryMock` gives you another handle to the same registry.
///
/// ## Matching
///
/// Mocks are looked up by operation name first. Among the mocks for that operation:
/// 1. mocks with a [`MatchVariables`] predicate are tried, in mounting order;
/// 2. then mocks expecting specific variables, in mounting order;
/// 3. then mocks that do not match on variables, **most recently mounted first**.
///
/// That's how you can mount a catch-all mock that is only used when no mock with more
/// specific variables applies.
///
/// [`MockServer`]: crate::MockServer
/// [`dispatch`]: QueryMock::dispatch
/// [`MatchVariables`]: crate::MatchVariables
#[derive(Clone)]
pub struct QueryMock {
    state: Arc<RwLock<QueryMockState>>,
    change_server_response: Option<Arc<ChangeServerResponseFn>>,
}

/// A builder providing a fluent API to configure a [`QueryMock`].
/// Use [`QueryMock::builder`] to get started.
#[derive(Default)]
pub struct QueryMockBuilder {
    change_server_response: Option<Arc<ChangeServerResponseFn>>,
}

impl QueryMockBuilder {
    /// Alter the response of every mock that does not specify its own
    /// [`Mock::change_server_response`].
    pub fn change_server_response<F>(mut self, f: F) -> Self
    where
        F: Fn(&Mock, ServerResponse) -> ServerResponse + Send + Sync + 'static,
    {
        self.change_server_response = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> QueryMock {
        QueryMock {
            state: Arc::new(RwLock::new(QueryMockState {
                mock_set: MockSet::new(),
                calls: vec![],
            })),
            change_server_response: self.change_server_response,
        }
    }
}

impl Default for QueryMock {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for QueryMock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryMock").finish_non_exhaustive()
    }
}

impl AsRef<QueryMock> for QueryMock {
    fn as_ref(&self) -> &QueryMock {
        self
    }
}

impl QueryMock {
    /// An empty registry, with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> QueryMockBuilder {
        QueryMockBuilder::default()
    }

    /// Register a [`Mock`] on this `QueryMock`. Same as [`Mock::mount`].
    pub async fn register(&self, mock: Mock) {
        self.mount(MountedMock::new(mock, None)).await;
    }

    /// Register a [`Mock`] whose responses are held back until the returned
    /// [`ReleaseHandle`] is released. Same as [`Mock::mount_with_controlled_resolution`].
    pub async fn register_with_controlled_resolution(&self, mock: Mock) -> ReleaseHandle {
        let signal = ResolutionSignal::new();
        self.mount(MountedMock::new(mock, Some(signal.clone()))).await;
        ReleaseHandle::new(signal)
    }

    async fn mount(&self, mock: MountedMock) {
        debug!("Registering mock {}.", mock.id);
        self.state.write().await.mock_set.register(mock);
    }

    /// Drop all mounted [`Mock`]s and forget all recorded calls.
    ///
    /// It must not be called while a request is being dispatched.
    pub async fn reset(&self) {
        debug!("Dropping all mocks and recorded calls.");
        let mut state = self.state.write().await;
        state.mock_set.reset();
        state.calls.clear();
    }

    /// The operations answered so far, oldest first.
    ///
    /// Failed operations are not recorded.
    pub async fn calls(&self) -> Vec<CallRecord> {
        self.state.read().await.calls.clone()
    }

    /// The identities of the mocks currently mounted for an operation, in mounting order.
    ///
    /// Non-persistent mocks disappear from the list once they have been used.
    pub async fn mock_ids(&self, operation_name: &str) -> Vec<crate::MockId> {
        self.state.read().await.mock_set.ids(operation_name)
    }

    /// Answer a GraphQL operation as if it had been sent over HTTP with `headers`.
    pub async fn dispatch(
        &self,
        query: &str,
        variables: Option<Value>,
        headers: HeaderMap,
    ) -> Result<MockedResponse, DispatchError> {
        self.handle_request(Request::graphql(query, variables, headers)).await
    }

    /// Answer an intercepted GraphQL-over-HTTP request.
    ///
    /// The JSON body of the request must carry the `query` and, optionally, its
    /// `variables` and the `operationName` to execute when the document defines
    /// several operations.
    pub async fn handle_request(&self, request: Request) -> Result<MockedResponse, DispatchError> {
        let payload: GraphQlRequestBody = request
            .body_json()
            .map_err(|_| DispatchError::OperationNameMissing)?;
        let operation_name =
            operation::select_operation(&payload.query, payload.operation_name.as_deref())
                .ok_or(DispatchError::OperationNameMissing)?;
        let variables = variables::from_request_value(payload.variables);
        debug!("Handling operation {}.", operation_name);

        // A non-persistent mock is removed while we still hold the write lock.
        let mounted = self
            .state
            .write()
            .await
            .mock_set
            .select(&operation_name, &variables)?;
        let mock: &Mock = &mounted.specification;

        if mock.is_failure() {
            let status = mock.status.unwrap_or_default();
            let failure = match &mock.error {
                Some(error) => StatusFailure::CustomErrorValue {
                    value: error.clone(),
                    status,
                },
                None => StatusFailure::GeneratedMessage {
                    operation_name,
                    status,
                },
            };
            return Err(failure.into());
        }

        let mut response = ServerResponse::new(mock.data.clone());
        response.errors = mock.graphql_errors.clone();
        let response = match (&mock.change_server_response, &self.change_server_response) {
            (Some(changer), _) => (changer.0)(mock, response),
            (None, Some(changer)) => changer(mock, response),
            (None, None) => response,
        };
        let (status, body) = match &mock.custom_handler {
            Some(handler) => {
                let context = OperationContext {
                    query: payload.query,
                    operation_name: operation_name.clone(),
                    variables: variables.clone(),
                };
                handler.0.respond(&request, &context).await
            }
            None => (mock.status.unwrap_or(200), response),
        };

        self.state.write().await.calls.push(CallRecord {
            id: operation_name,
            variables,
            headers: request.headers,
            response: body.clone(),
        });

        if let Some(signal) = &mounted.resolution_signal {
            if !signal.is_released() {
                debug!(
                    "Holding back the response of mock {} until it is released.",
                    mounted.id
                );
            }
            signal.released().await;
        }

        Ok(MockedResponse { status, body })
    }
}
