//! Load-test driver: times repeated known-positive and known-negative searches
//! against one LTU environment.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use ltu_loadtest::{ImagePayload, LtuClient, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// This tool tests image recognition queries.
///
/// Examples:
///   ltu-loadtest --target test
///   ltu-loadtest --target test --loop 50
#[derive(Debug, Parser)]
#[command(name = "ltu-loadtest", version, verbatim_doc_comment)]
struct Cli {
    /// Target environment: dev, test, labs, live, paris
    #[arg(long = "target", default_value = "test")]
    target: String,

    /// Loop count
    #[arg(long = "loop", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    loops: u32,

    /// JSON settings file with `url.<env>` / `appkey.<env>` entries
    /// (defaults to LTU_URL_<ENV> / LTU_APPKEY_<ENV> environment variables)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Image expected to match the database
    #[arg(long, default_value = "found.png")]
    found: PathBuf,

    /// Image expected to match nothing
    #[arg(long = "not-found", default_value = "not-found.png")]
    not_found: PathBuf,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Which search outcome an iteration expects.
#[derive(Clone, Copy, Debug)]
enum Expectation {
    Found,
    NotFound,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose);

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!("{err:#}");
            return ExitCode::from(1);
        }
    };

    match run(&cli, &client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn build_client(cli: &Cli) -> Result<LtuClient> {
    let settings = match &cli.settings {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::from_env(),
    };
    LtuClient::for_environment(&settings, &cli.target).context("invalid target environment")
}

async fn run(cli: &Cli, client: &LtuClient) -> Result<()> {
    let found = load_image(&cli.found)?;
    let not_found = load_image(&cli.not_found)?;

    tracing::info!("Env: {}, Loops: {}", cli.target.to_ascii_lowercase(), cli.loops);
    tracing::info!("Url: {}", client.config().base_url);

    let started = Instant::now();
    for iteration in 1..=cli.loops {
        search(client, &found, Expectation::Found, iteration, cli.loops).await;
        search(client, &not_found, Expectation::NotFound, iteration, cli.loops).await;
    }
    let total = started.elapsed();
    let average = total / cli.loops.saturating_mul(2);

    tracing::info!(
        "Total elapsed time: {}, Average: {}",
        format_elapsed(total),
        format_elapsed(average)
    );
    Ok(())
}

fn load_image(path: &Path) -> Result<ImagePayload> {
    ImagePayload::from_path(path).with_context(|| format!("reading image {}", path.display()))
}

async fn search(
    client: &LtuClient,
    image: &ImagePayload,
    expectation: Expectation,
    iteration: u32,
    loops: u32,
) {
    let started = Instant::now();
    let result = match client.search_by_upload(image).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Search failed: {err}");
            return;
        }
    };
    let elapsed = format_elapsed(started.elapsed());
    let found = result.result_count > 0;

    match (expectation, found) {
        (Expectation::Found, true) => tracing::info!(
            "Loop {iteration} of {loops}, Found: Yes, elapsed time: {elapsed}"
        ),
        (Expectation::Found, false) => tracing::warn!(
            "Loop {iteration} of {loops}, Found: No, elapsed time: {elapsed}"
        ),
        (Expectation::NotFound, false) => tracing::info!(
            "Loop {iteration} of {loops}, Found: No, elapsed time: {elapsed}"
        ),
        (Expectation::NotFound, true) => tracing::warn!(
            "Loop {iteration} of {loops}, Found: Yes, elapsed time: {elapsed}"
        ),
    }
}

/// `(1sec)`, `(2.35secs)` below a minute, otherwise `(1min 05secs)`.
fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    if seconds == 1.0 {
        return "(1sec)".to_owned();
    }
    if seconds < 60.0 {
        let rounded = format!("{seconds:.2}");
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        return format!("({trimmed}secs)");
    }

    let whole = elapsed.as_secs();
    let (minutes, secs) = ((whole / 60) % 60, whole % 60);
    let min_unit = if minutes == 1 { "min" } else { "mins" };
    let sec_unit = if secs == 1 { "sec" } else { "secs" };
    format!("({minutes}{min_unit} {secs:02}{sec_unit})")
}
