use anyhow::Context;
use clap::Parser;
use embassy_watch::core::cyber_index::{self, MONITORED_COUNTRIES};
use embassy_watch::utils::logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cyber-scores")]
#[command(about = "Write the ITU Global Cybersecurity Index snapshot for monitored countries")]
struct Args {
    /// Destination JSON file
    #[arg(short, long, default_value = "cyber_scores.json")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Building cyber score snapshot");
    let scores = cyber_index::snapshot(MONITORED_COUNTRIES.iter().copied());
    tracing::info!(
        "📊 {} of {} monitored countries have a score",
        scores.len(),
        MONITORED_COUNTRIES.len()
    );

    let json = serde_json::to_string_pretty(&scores).context("serializing cyber scores")?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(&args.output, json)
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!("📁 Cyber scores saved to: {}", args.output.display());
    println!("✅ Cyber scores saved to: {}", args.output.display());

    Ok(())
}
