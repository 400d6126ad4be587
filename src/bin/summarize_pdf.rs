//! Command-line entrypoint that summarizes a local PDF report.
//!
//! Runs the same staging, extraction, and summarization pipeline as `POST /upload_pdf` and
//! prints the summary to stdout. `--text-only` skips the model call and prints the extracted
//! text instead.
use anyhow::{Context, Result};
use clap::Parser;
use medbrief::{config, extraction, logging, report::ReportService, upload::UploadedFile};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "summarize-pdf",
    about = "Summarize a PDF medical report with the configured model"
)]
struct Cli {
    /// Path to the PDF report.
    path: PathBuf,
    /// Print the extracted text without calling the model.
    #[arg(long)]
    text_only: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.text_only {
        let extracted = extraction::extract_text(&cli.path)
            .with_context(|| format!("failed to extract text from {}", cli.path.display()))?;
        println!("{}", extracted.text);
        return Ok(());
    }

    config::init_config();
    logging::init_tracing();

    let data = tokio::fs::read(&cli.path)
        .await
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let file_name = cli
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let upload = UploadedFile::new(file_name, data)
        .with_context(|| format!("unusable file name for {}", cli.path.display()))?;

    let service = ReportService::new().context("failed to build summarization client")?;
    let outcome = service
        .summarize_upload(upload)
        .await
        .context("failed to summarize report")?;

    println!("{}", outcome.summary);
    Ok(())
}
