//! `almanac` CLI: run occurrence queries, keyword search, and view-range
//! computation over a JSON dataset from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Occurrences in an explicit window (dataset from stdin)
//! almanac query --start 2024-06-09 --end 2024-06-16 < data.json
//!
//! # Occurrences for a view window
//! almanac query -i data.json --view month --date 2024-06-10
//!
//! # Override calendar visibility from the command line
//! almanac query -i data.json --start 2024-06-09 --end 2024-06-16 --calendars work
//!
//! # Keyword search over stored events
//! almanac search -i data.json roadmap
//!
//! # Show the window a view would query
//! almanac range --view week --date 2024-06-12 --week-start monday
//! ```
//!
//! The dataset is a JSON object with `calendars` and `events` arrays in the
//! calendar wire format. By default, visibility comes from the dataset's
//! calendar `visible` flags; events on calendars the dataset does not list
//! are treated as visible.

use std::collections::HashSet;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use almanac_engine::{
    parse_instant, query_occurrences, search_events, view_range, visible_calendar_ids, Calendar,
    Event, View, WeekStart,
};

#[derive(Parser)]
#[command(name = "almanac", version, about = "Calendar occurrence engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize the occurrences intersecting a query window
    Query {
        /// Input dataset file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Window start (RFC 3339 or YYYY-MM-DD); requires --end
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Window end (RFC 3339 or YYYY-MM-DD); requires --start
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Compute the window from a view instead of --start/--end
        #[arg(long, conflicts_with = "start")]
        view: Option<View>,
        /// Focus date for --view (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// First day of the week for --view windows
        #[arg(long, default_value = "sunday")]
        week_start: WeekStart,
        /// Comma-separated calendar ids to treat as visible, overriding the
        /// dataset's visibility flags
        #[arg(long)]
        calendars: Option<String>,
    },
    /// Keyword search over stored events (title, description, location)
    Search {
        /// Input dataset file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// The search text
        query: String,
    },
    /// Print the window a view would query
    Range {
        #[arg(long)]
        view: View,
        /// Focus date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "sunday")]
        week_start: WeekStart,
    },
}

/// The JSON dataset the CLI operates on.
#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    calendars: Vec<Calendar>,
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Serialize)]
struct RangeOutput {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            input,
            output,
            start,
            end,
            view,
            date,
            week_start,
            calendars,
        } => {
            let dataset = load_dataset(input.as_deref())?;
            let (range_start, range_end) =
                resolve_window(start.as_deref(), end.as_deref(), view, date, week_start)?;
            let visible = resolve_visibility(&dataset, calendars.as_deref());

            let occurrences =
                query_occurrences(&dataset.events, &visible, range_start, range_end);
            write_output(output.as_deref(), &to_pretty_json(&occurrences)?)
        }
        Commands::Search {
            input,
            output,
            query,
        } => {
            if query.trim().is_empty() {
                bail!("search query must not be empty");
            }
            let dataset = load_dataset(input.as_deref())?;
            let matches = search_events(&dataset.events, &query);
            write_output(output.as_deref(), &to_pretty_json(&matches)?)
        }
        Commands::Range {
            view,
            date,
            week_start,
        } => {
            let focus = date.unwrap_or_else(|| Utc::now().date_naive());
            let (start, end) = view_range(view, focus, week_start);
            write_output(None, &to_pretty_json(&RangeOutput { start, end })?)
        }
    }
}

/// Turn --start/--end or --view/--date into a concrete window.
fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    view: Option<View>,
    date: Option<NaiveDate>,
    week_start: WeekStart,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    match (start, end, view) {
        (Some(start), Some(end), None) => {
            let range_start =
                parse_instant("start", start).context("invalid --start value")?;
            let range_end = parse_instant("end", end).context("invalid --end value")?;
            if range_end < range_start {
                bail!("--end must not be before --start");
            }
            Ok((range_start, range_end))
        }
        (None, None, Some(view)) => {
            let focus = date.unwrap_or_else(|| Utc::now().date_naive());
            Ok(view_range(view, focus, week_start))
        }
        _ => bail!("specify either --start and --end, or --view"),
    }
}

/// Visibility set: an explicit --calendars list wins; otherwise the dataset's
/// calendar flags, with unlisted calendar ids treated as visible.
fn resolve_visibility(dataset: &Dataset, override_list: Option<&str>) -> HashSet<String> {
    if let Some(raw) = override_list {
        return raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    let listed: HashSet<String> = dataset.calendars.iter().map(|c| c.id.clone()).collect();
    let mut visible = visible_calendar_ids(&dataset.calendars);
    for event in &dataset.events {
        if !listed.contains(&event.calendar_id) {
            visible.insert(event.calendar_id.clone());
        }
    }
    visible
}

fn load_dataset(path: Option<&str>) -> Result<Dataset> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse dataset JSON")
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
