use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

/// A periodic callback running on its own tokio task.
///
/// The task lives exactly as long as this handle. Dropping it, or calling
/// [`ScheduledTask::cancel`], aborts the timer, so early returns and `?` never
/// leave a callback dangling.
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Runs `tick` every `period`, starting one period from now.
    pub fn every<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tick();
            }
        });

        Self { handle }
    }

    pub fn cancel(self) {}
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_each_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let task = ScheduledTask::every(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        task.cancel();
        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        {
            let _task = ScheduledTask::every(Duration::from_millis(100), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(250)).await;
        }

        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
