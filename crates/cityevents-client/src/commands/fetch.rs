//! Fetch command: query every source and write the merged records as JSON.

use std::io::Write;
use std::path::Path;

use cityevents_core::{EventRecord, Query};
use cityevents_providers::EventAggregator;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::cli::{Destination, FetchArgs};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Runs the fetch command with the configured sources.
pub fn run(args: &FetchArgs, config: &ClientConfig) -> ClientResult<()> {
    let query = args.to_query()?;
    let aggregator = config.build_aggregator()?;
    execute(&aggregator, &query, &args.destination())?;
    Ok(())
}

/// Fetches events for `query` and writes them to `destination`.
///
/// Nothing is written unless every source succeeds. Returns the number of
/// records written.
pub fn execute(
    aggregator: &EventAggregator,
    query: &Query,
    destination: &Destination,
) -> ClientResult<usize> {
    let events = aggregator.get_events(query)?;
    let json = render_json(&events)?;

    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        Destination::File(path) => {
            write_file(path, &json)?;
            info!(path = %path.display(), records = events.len(), "wrote results");
        }
    }
    Ok(events.len())
}

/// Serializes records as a JSON array indented by four spaces.
pub fn render_json(events: &[EventRecord]) -> ClientResult<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    events
        .serialize(&mut serializer)
        .map_err(|e| ClientError::Output(format!("failed to serialize events: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| ClientError::Output(format!("serialized events are not UTF-8: {}", e)))
}

fn write_file(path: &Path, contents: &str) -> ClientResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        ClientError::Output(format!("failed to write {}: {}", path.display(), e))
    })
}
