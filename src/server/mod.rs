//! The dispatch engine and its collaborators.
//!
//! - **`dispatch`**: per-connection read loop and the per-request path
//!   (error gate → normalise → redirects → auth → handler lookup)
//! - **`registry`**: longest-prefix resource-to-handler mapping
//! - **`redirect`**: resource-to-resource rewrites, chain-resolved by the
//!   dispatcher under a depth bound
//! - **`auth`**: pluggable authentication gate
//! - **`responders`**: default 400/403/404/405/500 pages
//! - **`listener`**: accept loop

pub mod auth;
pub mod dispatch;
pub mod listener;
pub mod redirect;
pub mod registry;
pub mod responders;

pub use auth::{Authenticator, HeaderAuthenticator};
pub use dispatch::{Server, DEFAULT_MAX_REDIRECTS};
pub use redirect::RedirectTable;
pub use registry::{RequestHandler, ResourceRegistry};
