//! Table and JSON output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::{Table, Tabled};

use ntc_core::error::AppError;
use ntc_view::{SeatMap, SeatStatus};

/// Seats per grid row.
const SEATS_PER_ROW: u32 = 4;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item as JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Ask for confirmation unless `force` is set.
pub fn confirm(prompt: &str, force: bool) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}

/// Render one seat: `[ 5]` free, `[##]` booked, `[*5]` selected.
pub fn seat_cell(number: u32, status: SeatStatus) -> String {
    match status {
        SeatStatus::Free => format!("[{number:>2}]"),
        SeatStatus::Booked => "[##]".to_string(),
        SeatStatus::Selected => format!("[*{number}]"),
    }
}

/// Render the seat grid, two seats either side of the aisle.
pub fn render_seat_grid(map: &SeatMap) -> String {
    let mut out = String::new();
    let mut column = 0;
    for cell in map.cells() {
        if column == SEATS_PER_ROW / 2 {
            out.push_str("   ");
        } else if column > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:<5}", seat_cell(cell.number, cell.status));
        column += 1;
        if column == SEATS_PER_ROW {
            out.truncate(out.trim_end().len());
            out.push('\n');
            column = 0;
        }
    }
    if column > 0 {
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// Print the seat map with its trip header and legend.
pub fn print_seat_map(map: &SeatMap, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(map);
        return;
    }
    if let Some(trip) = &map.trip {
        print_kv("Trip", trip.trip_id.as_str());
        print_kv("Route", &format!("{} - {}", trip.start_point, trip.end_point));
        print_kv("Bus", &trip.bus_number);
        print_kv("Departure", &trip.departure_time.format("%Y-%m-%d %H:%M").to_string());
        print_kv("Arrival", &trip.arrival_time.format("%Y-%m-%d %H:%M").to_string());
        if let Some(stops) = trip.middle_stops.as_deref().filter(|s| !s.is_empty()) {
            print_kv("Stops", stops);
        }
        print_kv("Fare per seat", &format!("{:.2}", trip.fare));
    }
    println!();
    print!("{}", render_seat_grid(map));
    println!();
    print_kv("Free", &map.free_count().to_string());
    print_kv("Booked", &map.booked.len().to_string());
    if !map.selected.is_empty() {
        print_kv("Selected", &join(map.selected.iter()));
        print_kv("Total fare", &format!("{:.2}", map.selection_fare()));
    }
    println!("  legend: [ n] free  [##] booked  [*n] selected");
}

/// Comma-separated list.
pub fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
