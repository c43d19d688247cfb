mod config;
mod http;
mod server;

use std::sync::Arc;

use config::Config;
use http::response::StatusCode;
use server::dispatch::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let cfg = Config::load();
    let srv = Arc::new(Server::new(&cfg));

    srv.add_resource(
        "/echo",
        Arc::new(|request, writer| {
            writer.response_mut().set_status(StatusCode::Ok);
            writer
                .response_mut()
                .set_header("Content-Type", "text/plain");
            writer.push(request.method);
            writer.write(b" ");
            writer.push(request.resource());
            writer.write(b"\n");
            if !request.body.is_empty() {
                writer.write(&request.body);
            }
            Ok(())
        }),
    );

    tokio::select! {
        res = server::listener::run(Arc::clone(&srv), &cfg.listen_addr) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
