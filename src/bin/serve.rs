use quiz_client::config::{get_config, init_config};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let app = quiz_client::hosting::router(&config.static_dir);

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        "Serving quiz bundle from {:?}, listening on {}",
        config.static_dir, addr
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
