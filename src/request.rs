use std::fmt;

use http::{HeaderMap, Method};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::variables::Variables;

pub const BODY_PRINT_LIMIT: usize = 10_000;

/// Specifies limitations on printing request bodies when logging requests. For some test
/// suites the bodies may be too large to reasonably print and it may be desirable to
/// limit them.
#[derive(Debug, Copy, Clone)]
pub enum BodyPrintLimit {
    /// Maximum length of a body to print in bytes.
    Limited(usize),
    /// There is no limit to the size of a body that may be printed.
    Unlimited,
}

/// An intercepted GraphQL-over-HTTP request.
///
/// A custom handler (see [`Respond`]) gets an immutable reference to the `Request`
/// that triggered it, to build a response out of any detail of the call.
///
/// [`Respond`]: crate::Respond
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The JSON payload of a GraphQL-over-HTTP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphQlRequestBody {
    pub(crate) query: String,
    #[serde(default)]
    pub(crate) variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) operation_name: Option<String>,
}

/// What a custom handler knows about the operation it is responding to, on top of
/// the raw [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct OperationContext {
    pub query: String,
    pub operation_name: String,
    pub variables: Variables,
}

impl Request {
    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Build the request a GraphQL client would send to execute `query` with `variables`.
    pub(crate) fn graphql(query: &str, variables: Option<Value>, headers: HeaderMap) -> Request {
        let body = GraphQlRequestBody {
            query: query.to_owned(),
            variables,
            operation_name: None,
        };
        let mut headers = headers;
        headers
            .entry(http::header::CONTENT_TYPE)
            .or_insert(http::HeaderValue::from_static("application/json"));

        Self {
            url: Url::parse("http://localhost/graphql").expect("A valid hard-coded url"),
            method: Method::POST,
            headers,
            body: serde_json::to_vec(&body).expect("Failed to serialize a GraphQL request body"),
        }
    }

    pub(crate) async fn from_hyper(
        request: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Request, hyper::Error> {
        let (parts, body) = request.into_parts();
        let url = match parts.uri.authority() {
            Some(_) => parts.uri.to_string(),
            None => format!("http://localhost{}", parts.uri),
        };
        let url = url
            .parse()
            .unwrap_or_else(|_| Url::parse("http://localhost/").expect("A valid hard-coded url"));

        let body = body.collect().await?.to_bytes();

        Ok(Self {
            url,
            method: parts.method,
            headers: parts.headers,
            body: body.to_vec(),
        })
    }

    pub(crate) fn print_with_limit(
        &self,
        mut buffer: impl fmt::Write,
        body_print_limit: BodyPrintLimit,
    ) -> fmt::Result {
        writeln!(buffer, "{} {}", self.method, self.url)?;
        for name in self.headers.keys() {
            let values = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>();
            let values = values.join(",");
            writeln!(buffer, "{}: {}", name, values)?;
        }

        match body_print_limit {
            BodyPrintLimit::Limited(limit) if self.body.len() > limit => {
                // Back off to the closest char boundary below the limit.
                let mut end = limit;
                while end > 0 && std::str::from_utf8(&self.body[..end]).is_err() {
                    end -= 1;
                    if limit - end > 3 {
                        return writeln!(
                            buffer,
                            "Body is likely binary (invalid utf-8) size is {} bytes",
                            self.body.len()
                        );
                    }
                }
                let truncated = String::from_utf8_lossy(&self.body[..end]);
                writeln!(buffer, "{}", truncated)?;
                writeln!(
                    buffer,
                    "We truncated the body because it was too large: {} bytes (limit: {} bytes)",
                    self.body.len(),
                    limit
                )?;
                writeln!(
                    buffer,
                    "Increase this limit by setting `GRAPHQL_QUERY_MOCK_BODY_PRINT_LIMIT`, or calling `MockServerBuilder::body_print_limit` when building your MockServer instance"
                )
            }
            _ => {
                if let Ok(body) = std::str::from_utf8(&self.body) {
                    writeln!(buffer, "{}", body)
                } else {
                    writeln!(
                        buffer,
                        "Body is likely binary (invalid utf-8) size is {} bytes",
                        self.body.len()
                    )
                }
            }
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_with_limit(f, BodyPrintLimit::Unlimited)
    }
}
