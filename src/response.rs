use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The JSON envelope returned to the client for a mocked operation.
///
/// `data` and `errors` follow the GraphQL-over-HTTP response format. Any other top-level
/// field, e.g. added by a [`ChangeServerResponseFn`], is kept in `extensions` and
/// serialized next to them.
///
/// [`ChangeServerResponseFn`]: crate::ChangeServerResponseFn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ServerResponse {
    /// A response carrying `data` and nothing else.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            errors: None,
            extensions: Map::new(),
        }
    }

    /// Attach GraphQL errors to the response.
    pub fn with_errors(mut self, errors: Vec<GraphQlError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Add (or overwrite) a top-level field next to `data` and `errors`.
    pub fn insert_extension<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }
}

/// An error returned, alongside `data`, by a GraphQL server that answered with a 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQlError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }

    pub fn at_path(mut self, path: Vec<Value>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

/// What a [`QueryMock`] answers to a successfully dispatched operation.
///
/// [`QueryMock`]: crate::QueryMock
#[derive(Debug, Clone, PartialEq)]
pub struct MockedResponse {
    pub status: u16,
    pub body: ServerResponse,
}
