mod catalog;
mod fetch;
mod filter;
mod naming;
mod parser;
mod pipeline;
mod settings;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fetch::HttpFetcher;
use pipeline::{RunError, RunOptions, RunReport};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "uber_vehicles",
    about = "Uber eligible vehicles for a given city",
    long_about = "Uber eligible vehicles for a given city. Visit the \"Uber Eligible Vehicles\" \
                  page for your location to see which categories exist there: \
                  https://www.uber.com/global/en/eligible-vehicles"
)]
struct Cli {
    /// Uber city
    #[arg(long, default_value = "porto")]
    city: String,
    /// Comma-separated categories that must be present (e.g. Comfort,Green)
    #[arg(long, default_value = "")]
    required_categories: String,
    /// Comma-separated categories that must NOT be present (e.g. Black,UberXL)
    #[arg(long, default_value = "")]
    excluded_categories: String,
    /// Comma-separated car brands to keep (e.g. Audi,BMW,Tesla)
    #[arg(long, default_value = "")]
    brands: String,
    /// Without --brands, keep every brand instead of the built-in list
    #[arg(long)]
    all_brands: bool,
    /// Where to write the JSON file (default: UBER_VEHICLES_OUTPUT_DIR or ".")
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| settings.output_dir.clone());
    let opts = RunOptions::from_raw(
        &cli.city,
        &cli.required_categories,
        &cli.excluded_categories,
        &cli.brands,
        !cli.all_brands,
        output_dir,
    );

    let fetcher = HttpFetcher::new(&settings).context("Failed to set up HTTP client")?;

    let result = pipeline::run(&fetcher, &settings, &opts, &mut io::stdout()).await;
    let code = outcome(result, &mut io::stderr())?;

    // stdout ends with the pipeline's own last line
    info!("Done in {}", format_duration(t0.elapsed()));

    Ok(code)
}

/// Maps a run result to an exit code. A failed fetch is a single line on
/// `err`; stdout is left alone so it ends with the save confirmation.
fn outcome<W: Write>(
    result: Result<RunReport, RunError>,
    err: &mut W,
) -> anyhow::Result<ExitCode> {
    match result {
        Ok(report) => {
            info!(
                "{} vehicles from {} brands saved to {} ({} page lines skipped)",
                report.total_records,
                report.brand_count,
                report.output_path.display(),
                report.skipped_lines
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ RunError::Fetch(_)) => {
            writeln!(err, "{e}")?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Run failed"),
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
