//! Gatehouse - embeddable asynchronous HTTP/1.x server framework.
//!
//! The core is a request-dispatch engine: connections are read
//! incrementally under a deadline, requests resolved to registered
//! handlers by longest-prefix matching (after bounded redirect resolution
//! and an optional authentication gate), and responses driven back with
//! keep-alive aware lifecycle management.

pub mod config;
pub mod http;
pub mod server;
