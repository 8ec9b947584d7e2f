use crate::respond::Respond;
use crate::response::{GraphQlError, ServerResponse};
use crate::variables::Variables;
use crate::{QueryMock, ReleaseHandle};
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Anything that implements `MatchVariables` can be used to decide, dynamically, whether
/// a [`Mock`] applies to the variables of an incoming operation.
///
/// It comes in handy when exact matching is too strict, e.g. when your application sends
/// relative dates:
/// ```rust
/// use graphql_query_mock::{Mock, QueryMock, Variables};
/// use serde_json::json;
///
/// #[async_std::main]
/// async fn main() {
///     let query_mock = QueryMock::new();
///
///     Mock::given("TestQuery")
///         .match_variables(|variables: &Variables| variables.get("includeStuff") == Some(&json!(true)))
///         .respond_with(json!({ "some": "data" }))
///         .mount(&query_mock)
///         .await;
///
///     let response = query_mock
///         .dispatch(
///             "query TestQuery { id }",
///             Some(json!({ "includeStuff": true, "after": "cursor" })),
///             Default::default(),
///         )
///         .await
///         .unwrap();
///     assert_eq!(response.body.data, json!({ "some": "data" }));
/// }
/// ```
///
/// A predicate takes precedence over the variables specified with
/// [`MockBuilder::with_variables`].
pub trait MatchVariables: Send + Sync {
    fn matches(&self, variables: &Variables) -> bool;
}

impl<F> MatchVariables for F
where
    F: Send + Sync + Fn(&Variables) -> bool,
{
    fn matches(&self, variables: &Variables) -> bool {
        self(variables)
    }
}

/// Alter the response built for a matching [`Mock`] before it is returned.
///
/// It receives the [`Mock`] that matched and the default response (`data` and `errors`).
pub type ChangeServerResponseFn = dyn Fn(&Mock, ServerResponse) -> ServerResponse + Send + Sync;

pub(crate) struct VariablesPredicate(Box<dyn MatchVariables>);

impl Debug for VariablesPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Closures do not implement `Debug`.
        f.write_str("<matchVariables function>")
    }
}

pub(crate) struct CustomHandler(pub(crate) Box<dyn Respond>);

impl Debug for CustomHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<custom handler>")
    }
}

pub(crate) struct ResponseChanger(pub(crate) Arc<ChangeServerResponseFn>);

impl Debug for ResponseChanger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<changeServerResponse function>")
    }
}

/// The expectation for one GraphQL operation, together with the response to return
/// when it is met.
///
/// A `Mock` is built in two steps:
/// - [`Mock::given`] starts a [`MockBuilder`] to describe which requests should match
///   (operation name and variables);
/// - [`MockBuilder::respond_with`] sets the `data` to return and gives you back a `Mock`,
///   which can be further customised (status, errors, persistence, custom handlers).
///
/// A `Mock` has no effect until it is [`mount`]ed on a [`QueryMock`].
///
/// ```rust
/// use graphql_query_mock::{Mock, QueryMock};
/// use serde_json::json;
///
/// #[async_std::main]
/// async fn main() {
///     let query_mock = QueryMock::new();
///
///     Mock::given("TestQuery")
///         .with_variables(json!({ "id": "123" }))
///         .respond_with(json!({ "node": { "id": "123" } }))
///         .mount(&query_mock)
///         .await;
///
///     let response = query_mock
///         .dispatch("query TestQuery($id: ID!) { node(id: $id) { id } }", Some(json!({ "id": "123" })), Default::default())
///         .await
///         .unwrap();
///     assert_eq!(response.status, 200);
///     assert_eq!(response.body.data, json!({ "node": { "id": "123" } }));
/// }
/// ```
///
/// [`mount`]: Mock::mount
#[derive(Debug)]
pub struct Mock {
    pub(crate) name: String,
    pub(crate) variables: Variables,
    pub(crate) match_on_variables: bool,
    pub(crate) match_variables: Option<VariablesPredicate>,
    pub(crate) ignored_variables: Vec<String>,
    pub(crate) data: Value,
    pub(crate) graphql_errors: Option<Vec<GraphQlError>>,
    pub(crate) error: Option<Value>,
    pub(crate) status: Option<u16>,
    pub(crate) persist: bool,
    pub(crate) custom_handler: Option<CustomHandler>,
    pub(crate) change_server_response: Option<ResponseChanger>,
}

/// The first half of a [`Mock`]: which operation and which variables it matches.
#[derive(Debug)]
pub struct MockBuilder {
    name: String,
    variables: Variables,
    match_on_variables: bool,
    match_variables: Option<VariablesPredicate>,
    ignored_variables: Vec<String>,
}

impl Mock {
    /// Start building a `Mock` for the operation called `operation_name`,
    /// e.g. `TestQuery` for `query TestQuery { ... }`.
    ///
    /// By default the mock only matches requests without variables: use
    /// [`MockBuilder::with_variables`] or [`MockBuilder::match_on_variables`] to change that.
    pub fn given<T: Into<String>>(operation_name: T) -> MockBuilder {
        let name = operation_name.into();
        assert!(
            !name.is_empty(),
            "The name of the operation to mock must not be empty!"
        );
        MockBuilder {
            name,
            variables: Variables::new(),
            match_on_variables: true,
            match_variables: None,
            ignored_variables: vec![],
        }
    }

    /// Attach GraphQL errors to the response, next to `data`.
    pub fn with_graphql_errors(mut self, errors: Vec<GraphQlError>) -> Mock {
        self.graphql_errors = Some(errors);
        self
    }

    /// Set the status code of the response. Defaults to `200`.
    ///
    /// A status greater or equal than `400` makes the request fail with a
    /// [`DispatchError::ConfiguredStatusFailure`], without building a response.
    /// That's how you can exercise the error-handling code paths of your application.
    ///
    /// [`DispatchError::ConfiguredStatusFailure`]: crate::DispatchError::ConfiguredStatusFailure
    pub fn with_status(mut self, status: u16) -> Mock {
        assert!(
            (100..=999).contains(&status),
            "{} is not a valid status code!",
            status
        );
        self.status = Some(status);
        self
    }

    /// The error to fail with when the mock has a status greater or equal than `400`.
    ///
    /// It is surfaced as it is via [`DispatchError::custom_error_value`]. If it is not set,
    /// a generic error message mentioning the operation name and the status is used.
    ///
    /// [`DispatchError::custom_error_value`]: crate::DispatchError::custom_error_value
    pub fn with_error<T: Serialize>(mut self, error: T) -> Mock {
        let error = serde_json::to_value(error).expect("Failed to serialize the mocked error");
        self.error = Some(error);
        self
    }

    /// Whether the mock should keep matching after it has been used (the default) or
    /// whether it should be removed after its first match.
    ///
    /// Non-persistent mocks registered for the same operation are used in the order they
    /// were mounted: set `persist(false)` on all of them when your test issues the same
    /// operation several times and expects different responses.
    pub fn persist(mut self, persist: bool) -> Mock {
        self.persist = persist;
        self
    }

    /// Compute the response in a [`Respond`] implementation instead of returning `data`.
    ///
    /// The status and body returned by the handler are used as they are:
    /// `change_server_response` is not applied to them.
    pub fn with_custom_handler<R: Respond + 'static>(mut self, handler: R) -> Mock {
        self.custom_handler = Some(CustomHandler(Box::new(handler)));
        self
    }

    /// Alter the default response (`data` and `errors`) before it is returned.
    ///
    /// It takes precedence over the function set with
    /// [`QueryMockBuilder::change_server_response`].
    ///
    /// [`QueryMockBuilder::change_server_response`]: crate::QueryMockBuilder::change_server_response
    pub fn change_server_response<F>(mut self, f: F) -> Mock
    where
        F: Fn(&Mock, ServerResponse) -> ServerResponse + Send + Sync + 'static,
    {
        self.change_server_response = Some(ResponseChanger(Arc::new(f)));
        self
    }

    /// Mount the `Mock` on a [`QueryMock`] - it's now effective!
    ///
    /// Mocks for the same operation are evaluated in the order they were mounted.
    pub async fn mount<R: AsRef<QueryMock>>(self, query_mock: &R) {
        query_mock.as_ref().register(self).await;
    }

    /// Mount the `Mock` on a [`QueryMock`], holding back the responses it produces until
    /// [`ReleaseHandle::release`] is called.
    ///
    /// Use it to assert on the state of your application while a request is in flight
    /// (e.g. a loading indicator).
    pub async fn mount_with_controlled_resolution<R: AsRef<QueryMock>>(
        self,
        query_mock: &R,
    ) -> ReleaseHandle {
        query_mock
            .as_ref()
            .register_with_controlled_resolution(self)
            .await
    }

    /// The name of the operation this mock is for.
    pub fn operation_name(&self) -> &str {
        &self.name
    }

    /// The variables this mock expects.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// The `data` of the response.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub(crate) fn has_predicate(&self) -> bool {
        self.match_variables.is_some()
    }

    pub(crate) fn predicate_accepts(&self, variables: &Variables) -> bool {
        self.match_variables
            .as_ref()
            .is_some_and(|predicate| predicate.0.matches(variables))
    }

    pub(crate) fn is_failure(&self) -> bool {
        self.status.is_some_and(|status| status >= 400)
    }
}

impl MockBuilder {
    /// Only match requests sending exactly these variables.
    ///
    /// Objects are compared regardless of the order of their keys, arrays must have the
    /// same elements in the same order.
    pub fn with_variables<T: Serialize>(mut self, variables: T) -> Self {
        let variables =
            serde_json::to_value(variables).expect("Failed to serialize the mocked variables");
        self.variables = match variables {
            Value::Object(variables) => variables,
            Value::Null => Variables::new(),
            other => panic!("The variables of an operation must be an object, got {}", other),
        };
        self
    }

    /// Whether the variables of the request should be checked at all. Defaults to `true`.
    ///
    /// A mock that does not match on variables acts as a catch-all: it is only used when
    /// no other mock registered for the same operation matches the incoming variables.
    pub fn match_on_variables(mut self, match_on_variables: bool) -> Self {
        self.match_on_variables = match_on_variables;
        self
    }

    /// Decide if the mock matches using a [`MatchVariables`] predicate instead of comparing
    /// variables.
    pub fn match_variables<M: MatchVariables + 'static>(mut self, predicate: M) -> Self {
        self.match_variables = Some(VariablesPredicate(Box::new(predicate)));
        self
    }

    /// Leave these (top-level) properties out when comparing variables, both on the
    /// request and on the mock.
    pub fn ignore_variables<I, T>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for property in properties {
            let property = property.into();
            if !self.ignored_variables.contains(&property) {
                self.ignored_variables.push(property);
            }
        }
        self
    }

    /// Establish the `data` returned to requests matching this mock.
    ///
    /// `respond_with` finalises the `MockBuilder` and returns you a [`Mock`] instance,
    /// ready to be [`mount`]ed.
    ///
    /// [`mount`]: Mock::mount
    pub fn respond_with<T: Serialize>(self, data: T) -> Mock {
        let data = serde_json::to_value(data).expect("Failed to serialize the mocked data");
        Mock {
            name: self.name,
            variables: self.variables,
            match_on_variables: self.match_on_variables,
            match_variables: self.match_variables,
            ignored_variables: self.ignored_variables,
            data,
            graphql_errors: None,
            error: None,
            status: None,
            persist: true,
            custom_handler: None,
            change_server_response: None,
        }
    }
}
