use anyhow::Context;
use booking_pipeline::config::Config;
use booking_pipeline::infra::sqlite::SqliteStore;
use booking_pipeline::logging;
use booking_pipeline::pipeline::dispatch::NotificationDispatcher;
use booking_pipeline::pipeline::grouping::group;
use booking_pipeline::pipeline::normalize::normalize_submission;
use booking_pipeline::pipeline::submit::{render_document, BookingSubmissionOrchestrator};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Instrument};

#[derive(Parser)]
#[command(name = "booking_pipeline")]
#[command(about = "Restaurant booking submission pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a booking submission end to end: document, notifications, persistence
    Submit {
        /// Path to the JSON submission payload
        payload: PathBuf,
        /// TOML config file (defaults to booking.toml, then environment)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Render the preorder document only; nothing is sent or persisted
    Render {
        /// Path to the JSON submission payload
        payload: PathBuf,
        /// Where to write the rendered document
        #[arg(long, default_value = "preorder-summary.txt")]
        output: PathBuf,
        /// SQLite database used for menu item lookups
        #[arg(long, default_value = "bookings.db")]
        database: PathBuf,
    },
}

fn read_payload(path: &PathBuf) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("payload file '{}' is not valid JSON", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { payload, config } => {
            let config = Config::load(config.as_deref())?;
            let payload = read_payload(&payload)?;

            let store = Arc::new(SqliteStore::open(&config.database_path)?);
            let dispatcher = NotificationDispatcher::from_config(&config)?;
            let orchestrator = BookingSubmissionOrchestrator::new(
                store.clone(),
                store,
                dispatcher,
                config.restaurant_address.clone(),
            );

            let outcome = async {
                info!("running booking submission");
                orchestrator.submit(&payload).await
            }
            .instrument(tracing::info_span!("submission"))
            .await?;

            println!("\n📋 Booking {}", outcome.reference);
            match outcome.booking_id {
                Some(id) => println!("   Persisted with id {id}"),
                None => println!("   ⚠️  Not persisted (see logs)"),
            }
            for attempt in &outcome.attempts {
                let mark = if attempt.success { "✅" } else { "❌" };
                println!("   {mark} {}: {}", attempt.kind.as_str(), attempt.detail);
            }
        }
        Commands::Render { payload, output, database } => {
            let payload = read_payload(&payload)?;
            let (booking, preorder) = normalize_submission(&payload)?;
            if preorder.is_empty() {
                println!("⚠️  Payload has no preorder; rendering booking info only");
            }
            let store = SqliteStore::open(&database)?;
            let grouped = group(&preorder, booking.is_buffet(), &store).await;
            let artifact = render_document(&booking, &grouped);
            std::fs::write(&output, &artifact.bytes)
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            println!("📄 Wrote {} ({} bytes)", output.display(), artifact.bytes.len());
        }
    }

    Ok(())
}
