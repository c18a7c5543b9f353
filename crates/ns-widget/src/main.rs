//! ns-calendar: terminal calendar widget
//!
//! Usage:
//!   ns-calendar                          - Print the current month
//!   ns-calendar --month 2 --year 2024    - Print a given month
//!   ns-calendar --cli                    - Start the interactive month browser
//!   ns-calendar --help                   - Show help

mod cli;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use ns_calendar::{CalendarWidget, HttpEventSource};
use ns_core::{Time, WidgetConfig};
use tracing_subscriber::EnvFilter;

use crate::render::Renderer;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Print one month and exit
    Month,
    /// Interactive month browser
    Cli,
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
struct Args {
    mode: RunMode,
    month: Option<u32>,
    year: Option<i32>,
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    match args.mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("ns-calendar {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Logs go to stderr so the rendered month stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let config = match &args.config {
        Some(path) => WidgetConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => WidgetConfig::load().context("Failed to load configuration")?,
    };

    let source = HttpEventSource::new(&config)
        .map_err(|e| anyhow!("Failed to create event client: {}", e))?;

    let today = Time::today();
    let month = args.month.unwrap_or_else(|| today.month());
    let year = args.year.unwrap_or_else(|| today.year());

    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let renderer = Renderer::new(config.locale(), color);
    let widget = CalendarWidget::starting_at(config, source, month, year);

    tracing::info!("Starting ns-calendar at {}/{}", month, year);

    match args.mode {
        RunMode::Cli => cli::run_cli(widget, renderer).await,
        _ => {
            let grid = widget
                .current()
                .await
                .with_context(|| format!("Failed to load {}/{}", month, year))?
                .ok_or_else(|| anyhow!("Request for {}/{} was superseded", month, year))?;
            print!("{}", renderer.render_month(&grid, &today));
            Ok(())
        }
    }
}

/// Parse command line arguments (without the program name)
fn parse_args<I>(args: I) -> anyhow::Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args {
        mode: RunMode::Month,
        month: None,
        year: None,
        config: None,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cli" | "-c" => parsed.mode = RunMode::Cli,
            "--help" | "-h" => return Ok(Args { mode: RunMode::Help, ..parsed }),
            "--version" | "-v" => return Ok(Args { mode: RunMode::Version, ..parsed }),
            "--month" | "-m" => {
                let value = args.next().context("--month needs a value")?;
                parsed.month = Some(
                    value
                        .parse::<u32>()
                        .with_context(|| format!("Invalid month: {}", value))?,
                );
            }
            "--year" | "-y" => {
                let value = args.next().context("--year needs a value")?;
                parsed.year = Some(
                    value
                        .parse::<i32>()
                        .with_context(|| format!("Invalid year: {}", value))?,
                );
            }
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            other => bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(parsed)
}

/// Print help message
fn print_help() {
    println!("ns-calendar - Terminal calendar widget");
    println!();
    println!("Usage:");
    println!("  ns-calendar                       Print the current month");
    println!("  ns-calendar --month M --year Y    Print a given month");
    println!("  ns-calendar --config PATH         Read configuration from PATH");
    println!("  ns-calendar --cli                 Start the interactive month browser");
    println!("  ns-calendar --help                Show this help message");
    println!("  ns-calendar --version             Show version");
    println!();
    println!("Configuration file: ns-calendar.toml ([api] and [widget] sections)");
    println!();
    println!("Environment Variables:");
    println!("  NS_CALENDAR_URL           Base URL of the event API (required)");
    println!("  NS_CALENDAR_TIMEOUT_SECS  Request timeout in seconds (default: 30)");
    println!("  NS_CALENDAR_DAYS          Comma-separated weekday names, Monday first");
    println!("  NS_CALENDAR_MONTHS        Comma-separated month names");
    println!("  RUST_LOG                  Log filter (default: info)");
}
