use clap::Parser;

use folio_cli::{server, ConfigArgs};
use folio_core::logging::init_tracing;
use folio_core::traits::VectorIndex;
use folio_responder::AppContext;

#[derive(Parser, Debug)]
#[command(name = "folio-serve", about = "Serve résumé questions over HTTP")]
struct ServeCli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = ServeCli::parse();
    let config = cli.config.load()?;

    // Index before binding: no request can observe a partial index.
    let ctx = AppContext::bootstrap(&config)?;
    let chunks = ctx.index.len();
    let app = server::router(ctx.responder(), chunks);

    let host = cli.host.unwrap_or_else(|| ctx.settings.server.host.clone());
    let port = cli.port.unwrap_or(ctx.settings.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!(addr = %listener.local_addr()?, chunks, "folio-serve listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
