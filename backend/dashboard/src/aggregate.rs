//! # Aggregation
//!
//! Turns validated entry rows into what the dashboard shows.
//!
//! - One [`WalletAggregate`] per row by default. Duplicate wallets are not merged
//!   unless [`MergeMode::PerWallet`] is asked for.
//! - Sorted by tickets, descending. Ties keep their input order.
//! - The chart only gets the first [`CHART_SIZE`] aggregates, the table gets all.
use std::{collections::HashMap, str::FromStr};

use serde::Serialize;

use crate::{
    models::EntryRow,
    utils::{chart_label, nice_max, short_wallet},
};

pub const CHART_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    PerRow,
    PerWallet,
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_row" | "false" | "0" | "no" => Ok(MergeMode::PerRow),
            "per_wallet" | "true" | "1" | "yes" => Ok(MergeMode::PerWallet),
            other => Err(format!("unknown merge mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletAggregate {
    pub wallet: String,
    pub short_wallet: String,
    pub tickets: u64,
}

impl WalletAggregate {
    fn new(wallet: &str, tickets: u64) -> Self {
        Self {
            wallet: wallet.to_string(),
            short_wallet: short_wallet(wallet),
            tickets,
        }
    }

    pub fn chart_label(&self) -> String {
        chart_label(&self.wallet)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStatistics {
    pub total_entries: u64,
    pub top_entrant: u64,
    pub unique_wallets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub rank: usize,
    pub wallet: String,
    pub short_wallet: String,
    pub tickets: u64,
    /// Percent of all tickets, `None` when nothing has been entered yet.
    pub share: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub entries: Vec<WalletAggregate>,
    pub summary: SummaryStatistics,
}

impl Dashboard {
    pub fn chart(&self) -> &[WalletAggregate] {
        &self.entries[..self.entries.len().min(CHART_SIZE)]
    }

    pub fn chart_max(&self) -> u64 {
        nice_max(self.chart().iter().map(|a| a.tickets).max().unwrap_or(0))
    }

    pub fn share(&self, tickets: u64) -> Option<f64> {
        (self.summary.total_entries > 0)
            .then(|| tickets as f64 / self.summary.total_entries as f64 * 100.0)
    }

    pub fn table(&self) -> Vec<TableRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, aggregate)| TableRow {
                rank: i + 1,
                wallet: aggregate.wallet.clone(),
                short_wallet: aggregate.short_wallet.clone(),
                tickets: aggregate.tickets,
                share: self.share(aggregate.tickets),
            })
            .collect()
    }
}

pub fn aggregate(rows: &[EntryRow], mode: MergeMode) -> Dashboard {
    let mut entries: Vec<WalletAggregate> = match mode {
        MergeMode::PerRow => rows
            .iter()
            .map(|row| WalletAggregate::new(&row.wallet, row.quantity))
            .collect(),
        MergeMode::PerWallet => merge_by_wallet(rows),
    };

    // stable, so equal counts stay in input order
    entries.sort_by(|a, b| b.tickets.cmp(&a.tickets));

    let summary = SummaryStatistics {
        total_entries: entries
            .iter()
            .fold(0u64, |sum, a| sum.saturating_add(a.tickets)),
        top_entrant: entries.first().map_or(0, |a| a.tickets),
        unique_wallets: entries.len(),
    };

    Dashboard { entries, summary }
}

fn merge_by_wallet(rows: &[EntryRow]) -> Vec<WalletAggregate> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<WalletAggregate> = Vec::new();

    for row in rows {
        match positions.get(row.wallet.as_str()) {
            Some(&i) => merged[i].tickets = merged[i].tickets.saturating_add(row.quantity),
            None => {
                positions.insert(&row.wallet, merged.len());
                merged.push(WalletAggregate::new(&row.wallet, row.quantity));
            }
        }
    }

    merged
}
