use crate::request::BodyPrintLimit;
use crate::response::MockedResponse;
use crate::{QueryMock, Request};
use http::{HeaderValue, Method, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use log::{debug, warn};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;

/// What the background server needs to answer requests.
pub(super) struct ServerState {
    pub(super) query_mock: QueryMock,
    pub(super) path: String,
    pub(super) body_print_limit: BodyPrintLimit,
}

/// The actual HTTP server routing incoming requests to a `QueryMock`.
pub(super) async fn run_server(
    listener: std::net::TcpListener,
    server_state: Arc<ServerState>,
    mut shutdown_signal: tokio::sync::oneshot::Receiver<()>,
) {
    listener
        .set_nonblocking(true)
        .expect("Cannot set non-blocking mode on TcpListener");
    let listener = tokio::net::TcpListener::from_std(listener)
        .expect("Cannot upgrade TcpListener from std to tokio");

    loop {
        let (stream, _) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(connection) => connection,
                Err(e) => {
                    warn!("Failed to accept a connection: {}", e);
                    continue;
                }
            },
            // Resolves when either:
            // - the sender half of the channel gets dropped (i.e. MockServer is dropped)
            // - the sender is used, therefore sending a poison pill willingly as a shutdown signal
            _ = &mut shutdown_signal => break,
        };

        let server_state = server_state.clone();
        tokio::spawn(async move {
            let service = service_fn(move |request: hyper::Request<hyper::body::Incoming>| {
                let server_state = server_state.clone();
                async move { Ok::<_, Infallible>(handle(&server_state, request).await) }
            });
            if let Err(e) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("Connection closed with an error: {}", e);
            }
        });
    }
    debug!("Shutting down!");
}

async fn handle(
    server_state: &ServerState,
    request: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    if request.method() != Method::POST || request.uri().path() != server_state.path {
        debug!(
            "Got a {} request for {}, not a GraphQL request.",
            request.method(),
            request.uri()
        );
        return response(StatusCode::NOT_FOUND, Vec::new());
    }

    let request = match Request::from_hyper(request).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to read the body of a request: {}", e);
            return response(StatusCode::BAD_REQUEST, Vec::new());
        }
    };

    match server_state.query_mock.handle_request(request.clone()).await {
        Ok(MockedResponse { status, body }) => {
            let body = serde_json::to_vec(&body).expect("Failed to serialize a mocked response");
            response(status_code(status), body)
        }
        Err(error) => {
            let mut printed_request = String::new();
            if request
                .print_with_limit(&mut printed_request, server_state.body_print_limit)
                .is_err()
            {
                printed_request = "<could not print the request>".into();
            }
            warn!(
                "Failed to answer a GraphQL request:\n{}\n\nRequest:\n{}",
                error, printed_request
            );

            let body = match error.custom_error_value() {
                Some(value) => value.clone(),
                None => json!({ "errors": [{ "message": error.to_string() }] }),
            };
            let body = serde_json::to_vec(&body).expect("Failed to serialize an error response");
            response(status_code(error.status_code()), body)
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn response(status: StatusCode, body: Vec<u8>) -> hyper::Response<Full<Bytes>> {
    let has_body = !body.is_empty();
    let mut response = hyper::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    if has_body {
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    response
}
