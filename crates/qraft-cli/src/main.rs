use clap::{Parser, Subcommand};

use qraft_pipeline::BrandQuery;

#[derive(Debug, Parser)]
#[command(name = "qraft-cli")]
#[command(about = "qraft command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full brand-to-QR-art pipeline once and print the report.
    Run {
        /// Brand name to research.
        #[arg(long)]
        brand: String,
        /// Data encoded into the QR code; defaults to QRAFT_DEFAULT_QR_PAYLOAD.
        #[arg(long)]
        qr_payload: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { brand, qr_payload } => {
            let config = qraft_core::load_app_config_from_env()?;
            let telemetry = qraft_pipeline::telemetry::sink_from_config(&config);
            let pipeline = qraft_pipeline::Pipeline::from_config(&config, telemetry)?;

            let query = BrandQuery {
                brand_name: brand,
                qr_payload: qr_payload.unwrap_or_else(|| config.default_qr_payload.clone()),
            };

            let report = pipeline.run(query).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
