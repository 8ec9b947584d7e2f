//! All bits and pieces concerning the HTTP front-end of a [`QueryMock`] are in this module.
//!
//! `exposed_server::MockServer` drives the `hyper` HTTP server running in the background,
//! defined in the `hyper` sub-module, which routes every intercepted GraphQL request to
//! the `QueryMock` it serves.
//!
//! [`QueryMock`]: crate::QueryMock
mod builder;
mod exposed_server;
mod hyper;

pub use builder::MockServerBuilder;
pub use exposed_server::MockServer;
