use clap::{Parser, Subcommand};
use eyre::Result;
use log::info;

use mantis::bot;
use mantis::sync;
use mantis::utils::app_context::AppContext;
use mantis::utils::logger::setup_logger;

/// Command-line entrypoint.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Selected subcommand; the default runs the long-lived bot
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available run modes.
#[derive(Subcommand)]
enum Commands {
    /// Run a single scan batch and write the report
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logger()?;

    let ctx = AppContext::new().await?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scan) => {
            let count = sync::triangles::rebuild(&ctx).await?;
            info!("scan: index of {count} triangles ready");

            let report = bot::scan_once(&ctx).await?;
            println!(
                "Scanned {} candidates in {} ms, report written to {}",
                report.len(),
                report.total_ms,
                ctx.config.report_path
            );
        }
        None => {
            bot::start(ctx).await?;
        }
    }

    Ok(())
}
