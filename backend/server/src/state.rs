use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard::MergeMode;
use sheets::EntryFetcher;

use super::config::Config;

pub struct AppState {
    pub fetcher: EntryFetcher,
    pub sweepstakes_end: DateTime<Utc>,
    pub merge_mode: MergeMode,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            fetcher: EntryFetcher::new(config.source),
            sweepstakes_end: config.sweepstakes_end,
            merge_mode: config.merge_mode,
        })
    }
}
