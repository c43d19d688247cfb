use crate::http::parser::DEFAULT_MAX_CONTENT_LENGTH;
use crate::http::reader::DEFAULT_READ_TIMEOUT_SECS;
use crate::server::dispatch::DEFAULT_MAX_REDIRECTS;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Per-read deadline before a receive cycle terminates with a timeout.
    pub read_timeout_secs: u64,
    /// Request-body cap; over-size messages are rejected while parsing.
    pub max_content_length: usize,
    /// Redirect chain length bound.
    pub max_redirects: u32,
}

impl Config {
    pub fn load() -> Self {
        let listen_addr =
            std::env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let read_timeout_secs = std::env::var("READ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_READ_TIMEOUT_SECS);
        let max_content_length = std::env::var("MAX_CONTENT_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH);
        let max_redirects = std::env::var("MAX_REDIRECTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_REDIRECTS);
        Self {
            listen_addr,
            read_timeout_secs,
            max_content_length,
            max_redirects,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}
