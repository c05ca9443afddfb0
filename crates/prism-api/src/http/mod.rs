//! HTTP adapter for the dialogue runtime.
//!
//! One `POST /api/{tool}` route per tool category plus `GET /health`.
//! Responses use the tool envelope: `{"result": ...}` or `{"error": ...}`.

pub mod error;
pub mod handlers;
pub mod router;

use prism_types::config::ServerConfig;

/// Environment variable overriding the configured port.
pub const PORT_ENV: &str = "PORT";

/// Listen address. Port priority: explicit flag, then `PORT`, then config.
pub fn listen_addr(host: Option<String>, port: Option<u16>, server: &ServerConfig) -> String {
    let env_port = std::env::var(PORT_ENV).ok().and_then(|p| p.parse().ok());
    resolve_addr(host, port.or(env_port), server)
}

fn resolve_addr(host: Option<String>, port: Option<u16>, server: &ServerConfig) -> String {
    let host = host.unwrap_or_else(|| server.host.clone());
    let port = port.unwrap_or(server.port);
    format!("{host}:{port}")
}
