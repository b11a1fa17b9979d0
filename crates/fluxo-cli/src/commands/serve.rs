//! `fluxo serve` - start the web server

use anyhow::Result;

use fluxo_server::{serve, ServerConfig};

pub async fn cmd_serve(host: &str, port: u16, allow_origin: Vec<String>) -> Result<()> {
    let config = ServerConfig {
        allowed_origins: allow_origin,
    };
    serve(host, port, config).await
}
