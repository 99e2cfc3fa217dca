//! # Dashboard
//!
//! Everything between raw entry rows and what a viewer sees.
//!
//! ## Pipeline
//! 1. [`client::fetch_rows`] pulls the rows from the backend. Any failure reads as
//!    "Failed to load data".
//!
//! 2. [`models::parse_rows`] validates each `[wallet, token, quantity]` row. Rows with
//!    too few cells, an empty wallet or a quantity that is not a whole number are set
//!    aside with their index.
//!
//! 3. [`aggregate::aggregate`] builds one aggregate per row (or per wallet, if asked),
//!    sorts descending by tickets and derives the summary: total entries, top entrant,
//!    unique wallets.
//!
//! 4. [`render`] draws the summary strip, the top 10 chart and the full table.
//!
//! ## Timers
//! - [`countdown::CountdownDriver`]: time left until the draw, sampled every second
//! - [`loading::LoadingDriver`]: status phrases every 900 ms, shown for at least 3.5 s
//!
//! Both sit on [`schedule::ScheduledTask`], which aborts its timer when dropped.
pub mod aggregate;
pub mod client;
pub mod countdown;
pub mod loading;
pub mod models;
pub mod render;
pub mod schedule;
pub mod utils;

pub use aggregate::{
    CHART_SIZE, Dashboard, MergeMode, SummaryStatistics, TableRow, WalletAggregate, aggregate,
};
pub use client::{LOAD_FAILED, LoadError, fetch_rows};
pub use countdown::{CountdownDriver, Remaining};
pub use loading::LoadingDriver;
pub use models::{EntryRow, ParsedRows, RejectedRow, RowError, parse_rows};
