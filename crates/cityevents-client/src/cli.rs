//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cityevents_core::Query;

use crate::error::{ClientError, ClientResult};

/// Date formats accepted on the command line, tried in order.
const DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// cityevents - Events happening in a city, from several ticketing APIs
#[derive(Debug, Parser)]
#[command(name = "cityevents")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "CITYEVENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Fetch options when no subcommand is given
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch events and write them as JSON (the default)
    Fetch(FetchArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Check that the configuration and its credentials resolve
    Validate,
    /// Show the configuration file path
    Path,
}

/// What to fetch and where to write it.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// City to search (matched case-insensitively)
    #[arg(long)]
    pub city: Option<String>,

    /// First day of the range (dd-mm-yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the range, inclusive (dd-mm-yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub to: Option<String>,

    /// Country name, copied into records from sources that lack one
    #[arg(long)]
    pub country: Option<String>,

    /// ISO 3166-1 alpha-2 country code, e.g. IT
    #[arg(long)]
    pub country_code: Option<String>,

    /// File to write the JSON results to
    #[arg(long, short, default_value = "results.json")]
    pub output: PathBuf,

    /// Print the results to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Where fetched results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl FetchArgs {
    /// Builds the query, requiring every field.
    pub fn to_query(&self) -> ClientResult<Query> {
        let city = required(&self.city, "--city")?.trim().to_lowercase();
        let from = parse_date(required(&self.from, "--from")?)?;
        let to = parse_date(required(&self.to, "--to")?)?;
        let country = required(&self.country, "--country")?.trim();
        let country_code = required(&self.country_code, "--country-code")?
            .trim()
            .to_uppercase();

        Ok(Query::new(city, from, to, country, country_code)?)
    }

    pub fn destination(&self) -> Destination {
        if self.stdout {
            Destination::Stdout
        } else {
            Destination::File(self.output.clone())
        }
    }
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> ClientResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ClientError::Input(format!("{} is required", flag)))
}

/// Parses a command-line date in any of the accepted formats.
pub fn parse_date(text: &str) -> ClientResult<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| {
            ClientError::Input(format!(
                "invalid date '{}', expected dd-mm-yyyy or yyyy-mm-dd",
                text
            ))
        })
}
