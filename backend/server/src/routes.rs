use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use dashboard::{
    MergeMode, Remaining, RejectedRow, SummaryStatistics, TableRow, WalletAggregate, aggregate,
    parse_rows,
};
use serde::Serialize;
use sheets::RawRow;
use tracing::{info, warn};

use crate::{error::AppError, state::AppState};

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: SummaryStatistics,
    pub chart: Vec<WalletAggregate>,
    pub chart_max: u64,
    pub entries: Vec<TableRow>,
    pub rejected: Vec<RejectedRow>,
    pub merge_mode: MergeMode,
    pub countdown: Remaining,
    pub time_left: String,
}

pub async fn sweepstakes_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RawRow>>, AppError> {
    let rows = state.fetcher.fetch_entries().await?;

    info!(rows = rows.len(), range = state.fetcher.range(), "Served entries");

    Ok(Json(rows))
}

pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse>, AppError> {
    let rows = state.fetcher.fetch_entries().await?;
    let parsed = parse_rows(&rows);

    if !parsed.rejected.is_empty() {
        warn!(
            rejected = parsed.rejected.len(),
            "Skipped malformed entry rows"
        );
    }

    let dashboard = aggregate(&parsed.rows, state.merge_mode);
    let countdown = Remaining::between(state.sweepstakes_end, Utc::now());

    info!(
        entries = dashboard.summary.total_entries,
        wallets = dashboard.summary.unique_wallets,
        "Served summary"
    );

    Ok(Json(SummaryResponse {
        summary: dashboard.summary,
        chart: dashboard.chart().to_vec(),
        chart_max: dashboard.chart_max(),
        entries: dashboard.table(),
        rejected: parsed.rejected,
        merge_mode: state.merge_mode,
        countdown,
        time_left: countdown.to_string(),
    }))
}
