use crate::request::OperationContext;
use crate::{Request, ServerResponse};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

/// Anything that implements `Respond` can compute the response to an operation matched
/// by a [`Mock`], in place of its static `data`.
///
/// Closures taking the intercepted [`Request`] and its [`OperationContext`] and returning
/// a `(status, body)` pair implement `Respond`:
///
/// ```rust
/// use graphql_query_mock::{Mock, OperationContext, QueryMock, Request, ServerResponse};
/// use serde_json::json;
///
/// #[async_std::main]
/// async fn main() {
///     let query_mock = QueryMock::new();
///
///     Mock::given("Echo")
///         .match_on_variables(false)
///         .respond_with(json!({}))
///         .with_custom_handler(|_request: &Request, context: &OperationContext| {
///             (200, ServerResponse::new(json!({ "echo": context.variables })))
///         })
///         .mount(&query_mock)
///         .await;
///
///     let response = query_mock
///         .dispatch("query Echo { echo }", Some(json!({ "a": 1 })), Default::default())
///         .await
///         .unwrap();
///     assert_eq!(response.body.data, json!({ "echo": { "a": 1 } }));
/// }
/// ```
///
/// Use [`respond_async`] when the response has to be computed asynchronously.
///
/// [`Mock`]: crate::Mock
pub trait Respond: Send + Sync {
    /// Given the intercepted [`Request`] and what we know about the operation it executes,
    /// return the status and the body of the response.
    fn respond(
        &self,
        request: &Request,
        context: &OperationContext,
    ) -> BoxFuture<'static, (u16, ServerResponse)>;
}

impl<F> Respond for F
where
    F: Send + Sync + Fn(&Request, &OperationContext) -> (u16, ServerResponse),
{
    fn respond(
        &self,
        request: &Request,
        context: &OperationContext,
    ) -> BoxFuture<'static, (u16, ServerResponse)> {
        futures::future::ready(self(request, context)).boxed()
    }
}

/// A [`Respond`] implementation wrapping an asynchronous closure - see [`respond_async`].
pub struct AsyncResponder<F>(F);

/// Build a [`Respond`] out of a closure returning a future.
///
/// The closure gets owned copies of the [`Request`] and of the [`OperationContext`].
///
/// ```rust
/// use graphql_query_mock::{respond_async, Mock, QueryMock, ServerResponse};
/// use serde_json::json;
///
/// #[async_std::main]
/// async fn main() {
///     let query_mock = QueryMock::new();
///
///     Mock::given("Slow")
///         .respond_with(json!({}))
///         .with_custom_handler(respond_async(|_request, context| async move {
///             (200, ServerResponse::new(json!({ "operation": context.operation_name })))
///         }))
///         .mount(&query_mock)
///         .await;
///
///     let response = query_mock
///         .dispatch("query Slow { id }", None, Default::default())
///         .await
///         .unwrap();
///     assert_eq!(response.body.data, json!({ "operation": "Slow" }));
/// }
/// ```
pub fn respond_async<F, Fut>(f: F) -> AsyncResponder<F>
where
    F: Fn(Request, OperationContext) -> Fut + Send + Sync,
    Fut: Future<Output = (u16, ServerResponse)> + Send + 'static,
{
    AsyncResponder(f)
}

impl<F, Fut> Respond for AsyncResponder<F>
where
    F: Fn(Request, OperationContext) -> Fut + Send + Sync,
    Fut: Future<Output = (u16, ServerResponse)> + Send + 'static,
{
    fn respond(
        &self,
        request: &Request,
        context: &OperationContext,
    ) -> BoxFuture<'static, (u16, ServerResponse)> {
        (self.0)(request.clone(), context.clone()).boxed()
    }
}
