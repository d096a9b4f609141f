//! `facelens` command-line client.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use facelens_client::{
    BlobStore, ClientConfig, ClientError, ComparisonWorkflow, DetectionWorkflow, TransferClient,
    UploadCandidate, SOURCE_SLOT, TARGET_SLOT,
};
use facelens_models::ValidationVerdict;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "facelens", version, about = "Detect and compare faces through the FaceLens gateway")]
struct Args {
    /// Base URL of the gateway.
    #[arg(long, env = "FACELENS_GATEWAY_URL", default_value = "http://localhost:8000")]
    gateway: String,

    /// Client-side file size limit in bytes.
    #[arg(long, env = "FACELENS_MAX_FILE_SIZE")]
    max_file_size: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect faces in one image and write an HTML report.
    Detect {
        image: PathBuf,
        #[arg(long, default_value = "detection.html")]
        out: PathBuf,
    },
    /// Compare the face in SOURCE with the faces in TARGET.
    Compare {
        source: PathBuf,
        target: PathBuf,
        #[arg(long, default_value = "comparison.html")]
        out: PathBuf,
    },
    /// Print the accepted formats and size limit.
    Policy,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("facelens=info,facelens_client=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
}

/// Print rejection messages; `true` when something was rejected.
fn report_verdicts(client: &TransferClient, verdicts: &[ValidationVerdict]) -> bool {
    let mut rejected = false;
    for verdict in verdicts.iter().filter(|v| !v.is_accepted()) {
        eprintln!("{}", verdict.message(client.policy()));
        rejected = true;
    }
    rejected
}

async fn write_report(out: &Path, html: Option<String>) -> anyhow::Result<()> {
    let html = html.ok_or_else(|| anyhow!("no result to render"))?;
    tokio::fs::write(out, html)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), "Report written");
    Ok(())
}

async fn load(path: &Path) -> anyhow::Result<UploadCandidate> {
    UploadCandidate::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Log the full error and print the single user-facing notice.
fn notify(err: ClientError) -> anyhow::Error {
    match &err {
        ClientError::Rejected { kind, .. } => warn!(kind = %kind, "Upload rejected"),
        other => error!(error = %other, "Upload failed"),
    }
    anyhow!(err.user_message())
}

async fn detect(client: &TransferClient, image: &Path, out: &Path) -> anyhow::Result<()> {
    let mut workflow = DetectionWorkflow::new(client, BlobStore::new());

    let verdicts = workflow.select(vec![load(image).await?]).map_err(notify)?;
    if report_verdicts(client, &verdicts) {
        return Err(anyhow!("{} was not accepted", image.display()));
    }

    let faces = workflow.submit(client).await.map_err(notify)?;
    println!("{} face(s) detected", faces.len());

    write_report(out, workflow.render_report()).await
}

async fn compare(client: &TransferClient, source: &Path, target: &Path, out: &Path) -> anyhow::Result<()> {
    let mut workflow = ComparisonWorkflow::new(client, BlobStore::new());

    for (slot, path) in [(SOURCE_SLOT, source), (TARGET_SLOT, target)] {
        let verdicts = workflow.select(slot, vec![load(path).await?]).map_err(notify)?;
        if report_verdicts(client, &verdicts) {
            return Err(anyhow!("{} was not accepted", path.display()));
        }
    }

    let result = workflow.submit(client).await.map_err(notify)?;
    println!(
        "{} matched, {} unmatched",
        result.face_matches.len(),
        result.unmatched_faces.len()
    );

    write_report(out, workflow.render_report()).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = ClientConfig {
        gateway_url: args.gateway,
        ..ClientConfig::from_env()
    };
    if let Some(max_file_size) = args.max_file_size {
        config.max_file_size = max_file_size;
    }

    let client = TransferClient::new(config).context("failed to create client")?;

    match args.command {
        Command::Detect { image, out } => detect(&client, &image, &out).await,
        Command::Compare { source, target, out } => compare(&client, &source, &target, &out).await,
        Command::Policy => {
            println!("{}", client.policy().describe());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider was already installed");
    }

    init_tracing();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
