use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::server::dispatch::Server;

/// Binds the listen address and accepts connections forever, spawning one
/// task per connection.
pub async fn run(server: Arc<Server>, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        debug!(peer = %peer, "accepted connection");

        let server = Arc::clone(&server);
        tokio::spawn(async move {
            server.handle_connection(socket).await;
        });
    }
}
