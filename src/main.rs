use anyhow::Context;
use rustydigest::{api, config, extraction::LopdfExtractor, logging, processing, summarization};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing(config.log_file.as_deref());

    tracing::info!(
        provider = ?config.summarization_provider,
        model = %config.summarization_model,
        "Initializing summarization client"
    );
    let summarizer = summarization::get_summarization_client(config)
        .context("failed to initialize summarization client")?;
    let service = processing::ProcessingService::new(
        Arc::new(LopdfExtractor::new()),
        summarizer,
        processing::ProcessingOptions::from(config),
    );
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
