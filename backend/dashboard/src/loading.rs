use std::{future::Future, time::Duration};

use tokio::time::sleep;

use crate::schedule::ScheduledTask;

pub const LOADING_PHRASES: [&str; 3] = [
    "Loading sweepstakes...",
    "Loading entries...",
    "Almost there...",
];

pub const PHRASE_INTERVAL: Duration = Duration::from_millis(900);
pub const MIN_DISPLAY: Duration = Duration::from_millis(3500);

/// Loading screen while entries are in flight.
///
/// Cycles the status phrase every [`PHRASE_INTERVAL`] and keeps the screen up
/// for at least [`MIN_DISPLAY`] so a fast fetch does not flash.
#[derive(Debug, Clone, Copy)]
pub struct LoadingDriver {
    pub phrase_interval: Duration,
    pub min_display: Duration,
}

impl Default for LoadingDriver {
    fn default() -> Self {
        Self {
            phrase_interval: PHRASE_INTERVAL,
            min_display: MIN_DISPLAY,
        }
    }
}

impl LoadingDriver {
    /// Drives `work` to completion, success or not, while showing phrases
    /// through `show`. Both timers are gone once this returns, or once the
    /// returned future is dropped.
    pub async fn run<F, T, S>(&self, work: F, mut show: S) -> T
    where
        F: Future<Output = T>,
        S: FnMut(&'static str) + Send + 'static,
    {
        show(LOADING_PHRASES[0]);

        let mut step = 0;
        let cycle = ScheduledTask::every(self.phrase_interval, move || {
            step = (step + 1) % LOADING_PHRASES.len();
            show(LOADING_PHRASES[step]);
        });

        let (output, ()) = tokio::join!(work, sleep(self.min_display));

        cycle.cancel();
        output
    }
}
