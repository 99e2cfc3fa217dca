//! # Terminal Rendering
//!
//! Plain-text views of a [`Dashboard`] for the `watch` binary.
use std::fmt::Write;

use crate::{
    aggregate::Dashboard,
    countdown::Remaining,
    utils::{format_number, format_share},
};

pub const BAR_WIDTH: usize = 40;

const BAR: char = '█';

pub fn render_summary(dashboard: &Dashboard, countdown: &Remaining) -> String {
    let summary = &dashboard.summary;

    format!(
        "Total Entries: {}   Top Entrant: {}   Unique Wallets: {}   Time Left: {}",
        format_number(summary.total_entries),
        format_number(summary.top_entrant),
        format_number(summary.unique_wallets as u64),
        countdown
    )
}

/// Horizontal bar per chart entry, scaled against the rounded axis maximum.
pub fn render_chart(dashboard: &Dashboard, width: usize) -> String {
    let chart = dashboard.chart();
    let axis = dashboard.chart_max();
    let mut out = String::new();

    if chart.is_empty() {
        out.push_str("No entries yet.\n");
        return out;
    }

    for aggregate in chart {
        let filled = (aggregate.tickets as u128 * width as u128 / axis as u128) as usize;
        let bar: String = std::iter::repeat_n(BAR, filled).collect();

        let _ = writeln!(
            out,
            "{:<10} {:<width$} {}",
            aggregate.chart_label(),
            bar,
            format_number(aggregate.tickets)
        );
    }

    let _ = writeln!(out, "{:<10} 0{:>width$}", "", format_number(axis));

    out
}

pub fn render_table(dashboard: &Dashboard) -> String {
    let rows = dashboard.table();
    let wallet_width = rows
        .iter()
        .map(|row| row.wallet.chars().count())
        .max()
        .unwrap_or(0)
        .max("Wallet".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<wallet_width$}  {:>10}  {:>10}",
        "#", "Wallet", "Tickets", "% of Total"
    );

    for row in rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<wallet_width$}  {:>10}  {:>10}",
            row.rank,
            row.wallet,
            format_number(row.tickets),
            format_share(row.share)
        );
    }

    out
}
