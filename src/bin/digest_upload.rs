//! Command-line client that uploads a PDF to a running Rusty Digest server.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use reqwest::multipart::{Form, Part};
use rustydigest::api::UPLOAD_FIELD;
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "digest-upload",
    about = "Upload a PDF to a Rusty Digest server and print its summary"
)]
struct Cli {
    /// PDF file to summarize.
    path: PathBuf,
    /// Base URL of the server.
    #[arg(long, env = "RUSTY_DIGEST_URL", default_value = "http://127.0.0.1:3002")]
    server: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Summary { summary: String },
    Error { error: String },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();
    let summary = upload(&cli.server, &cli.path).await?;
    println!("{summary}");
    Ok(())
}

async fn upload(server: &str, path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/pdf")
        .context("invalid mime type")?;
    let form = Form::new().part(UPLOAD_FIELD, part);

    let endpoint = format!("{}/upload", server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&endpoint)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to reach {endpoint}"))?;

    let status = response.status();
    let body: UploadResponse = response
        .json()
        .await
        .with_context(|| format!("unexpected response from {endpoint} ({status})"))?;

    match body {
        UploadResponse::Summary { summary } if status.is_success() => Ok(summary),
        UploadResponse::Summary { .. } => bail!("server returned {status}"),
        UploadResponse::Error { error } => bail!("server returned {status}: {error}"),
    }
}
