//! `bizday` CLI: business-day counts and projections from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List every known calendar (built-in and override file)
//! bizday calendars
//!
//! # Count business days in (2024-10-14, 2024-10-18]
//! bizday between 2024-10-14 2024-10-18 --calendar US
//!
//! # Project 5 business days forward across a team's calendars
//! bizday project 2024-10-14 5 --calendar US --calendar GB
//!
//! # Is a date a working day?
//! bizday check 2024-02-04 --calendar CN
//!
//! # Evaluate a JSON request (stdin or file)
//! echo '{"operation":"days_between","start_date":"2024-10-14",
//!        "end_date":"2024-10-18","calendar_ids":["US"]}' | bizday calc
//!
//! # Write a starter override file
//! bizday --overrides custom_rules.json init-overrides
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use business_calendar::request::parse_date;
use business_calendar::{
    days_between, is_business_day, project_business_date, BuiltinProvider, CalculationRequest,
    CalendarResolver, CalendarRuleSet, OverrideSnapshot,
};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, trace};

#[derive(Parser)]
#[command(
    name = "bizday",
    version,
    about = "Business-day calculator across regional calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override file with custom weekends, holidays and makeup days
    #[arg(long, global = true, env = "BIZDAY_OVERRIDES", default_value = "custom_rules.json")]
    overrides: PathBuf,

    /// First year of built-in holiday data (defaults to the current year)
    #[arg(long, global = true)]
    from_year: Option<i32>,

    /// Last year of built-in holiday data (defaults to next year)
    #[arg(long, global = true)]
    to_year: Option<i32>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List known calendar identifiers and names
    Calendars,
    /// Show the resolved rules for one calendar
    Show {
        /// Calendar identifier, e.g. US or X-CORP
        id: String,
    },
    /// Count business days after START up to and including END
    Between {
        start: String,
        end: String,
        /// Calendar identifier (repeat to union several calendars)
        #[arg(short, long = "calendar", required = true)]
        calendars: Vec<String>,
    },
    /// Find the date COUNT business days after START
    Project {
        start: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
        /// Calendar identifier (repeat to union several calendars)
        #[arg(short, long = "calendar", required = true)]
        calendars: Vec<String>,
    },
    /// Report whether DATE is a business day
    Check {
        date: String,
        /// Calendar identifier (repeat to union several calendars)
        #[arg(short, long = "calendar", required = true)]
        calendars: Vec<String>,
    },
    /// Evaluate a JSON calculation request
    Calc {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Write the sample override file
    InitOverrides {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::InitOverrides { force } = cli.command {
        return init_overrides(&cli.overrides, force);
    }

    let provider = build_provider(cli.from_year, cli.to_year)?;
    let overrides = OverrideSnapshot::load_if_exists(&cli.overrides)
        .with_context(|| format!("Failed to load overrides: {}", cli.overrides.display()))?;
    let resolver = CalendarResolver::new(&provider, &overrides);

    let output = match cli.command {
        Commands::Calendars => serde_json::to_value(resolver.list_calendars())?,
        Commands::Show { id } => {
            let rules = resolver.resolve(&id)?;
            json!({ "id": id, "calendar_rules": rules })
        }
        Commands::Between {
            start,
            end,
            calendars,
        } => {
            let rules = resolve(&resolver, &calendars)?;
            let start = parse_date("start_date", &start)?;
            let end = parse_date("end_date", &end)?;
            json!({
                "business_days": days_between(start, end, &rules),
                "start_date": start,
                "end_date": end,
                "calendar_ids": calendars,
            })
        }
        Commands::Project {
            start,
            count,
            calendars,
        } => {
            let rules = resolve(&resolver, &calendars)?;
            let start = parse_date("start_date", &start)?;
            let future = project_business_date(start, count, &rules)?;
            json!({
                "future_date": future,
                "start_date": start,
                "business_days": count,
                "calendar_ids": calendars,
            })
        }
        Commands::Check { date, calendars } => {
            let rules = resolve(&resolver, &calendars)?;
            let date = parse_date("date", &date)?;
            json!({
                "date": date,
                "is_business_day": is_business_day(date, &rules),
                "calendar_ids": calendars,
            })
        }
        Commands::Calc { input } => {
            let raw = read_input(input.as_deref())?;
            let request =
                CalculationRequest::from_json_str(&raw).context("Failed to parse request")?;
            let response = request.evaluate(&resolver)?;
            serde_json::to_value(response)?
        }
        Commands::InitOverrides { .. } => unreachable!("handled before provider setup"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Map `-v` count onto a tracing filter and log to stderr.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(verbose >= 2)
        .with_writer(io::stderr)
        .init();

    debug!("bizday started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

fn build_provider(from_year: Option<i32>, to_year: Option<i32>) -> Result<BuiltinProvider> {
    let provider = match (from_year, to_year) {
        (None, None) => BuiltinProvider::current(),
        (from, to) => {
            let this_year = Local::now().date_naive().year();
            let first = from.unwrap_or(this_year);
            let last = to.unwrap_or_else(|| first.max(this_year) + 1);
            BuiltinProvider::new(first, last)
        }
    }
    .context("Invalid holiday year window")?;
    debug!("Built-in holiday years: {:?}", provider.years());
    Ok(provider)
}

fn resolve(
    resolver: &CalendarResolver<'_, BuiltinProvider, OverrideSnapshot>,
    ids: &[String],
) -> Result<CalendarRuleSet> {
    let rules = resolver.resolve_all(ids)?;
    debug!("Resolved {:?} to {}", ids, rules.summary());
    Ok(rules)
}

fn init_overrides(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Override file already exists: {} (use --force to replace it)",
            path.display()
        );
    }
    OverrideSnapshot::write_sample(path)
        .with_context(|| format!("Failed to write overrides: {}", path.display()))?;
    println!("Wrote sample overrides to {}", path.display());
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
