//! quire-server: HTTP front end for a quire article store
//!
//! Public readers get the published articles rendered from markdown.
//! The `/admin` tree sits behind HTTP basic auth and lets an editor create,
//! edit and delete articles through plain HTML forms.

pub mod auth;
pub mod http;
pub mod views;

pub use auth::{Authorizer, Credentials, DenyAll, StaticCredentials};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use views::{ViewError, Views};
