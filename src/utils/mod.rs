use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::metrics::StatisticsReport;
use crate::orderbook::types::BookEntry;

pub mod time;

/// Format a decimal with exactly `dp` places, rounding half away from zero
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Render the book as a `side | price | quantity` table, one row per order
pub fn render_book(entries: &[BookEntry], dp: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:>14} {:>14}", "SIDE", "PRICE", "QUANTITY");

    for entry in entries {
        let _ = writeln!(
            out,
            "{:<6} {:>14} {:>14}",
            entry.side.to_string(),
            format_decimal(entry.price, dp),
            format_decimal(entry.quantity, dp)
        );
    }

    out
}

/// The two headline figures shown after each submission
pub fn format_report(report: &StatisticsReport) -> String {
    format!(
        "Matched Percentage: {:.2}%\nMatching Time: {:.2}ms",
        report.matched_percentage, report.average_matching_time_ms
    )
}
