use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::schedule::ScheduledTask;

pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_SECOND: i64 = 1_000;

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Time left until the draw, split into calendar-ish units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub expired: bool,
}

impl Remaining {
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let left = target - now;
        let ms = left.num_milliseconds().max(0);

        Self {
            days: ms / MS_PER_DAY,
            hours: ms % MS_PER_DAY / MS_PER_HOUR,
            minutes: ms % MS_PER_HOUR / MS_PER_MINUTE,
            seconds: ms % MS_PER_MINUTE / MS_PER_SECOND,
            expired: left <= chrono::Duration::zero(),
        }
    }

    pub fn as_millis(&self) -> i64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expired {
            return write!(f, "Ended");
        }

        write!(
            f,
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Re-samples the clock once a second and publishes the time left.
///
/// Keeps publishing after expiry; every sample past the target is just
/// `Ended`. Stops when dropped.
pub struct CountdownDriver {
    receiver: watch::Receiver<Remaining>,
    _task: ScheduledTask,
}

impl CountdownDriver {
    pub fn start(target: DateTime<Utc>) -> Self {
        Self::start_with_clock(target, COUNTDOWN_TICK, Utc::now)
    }

    pub fn start_with_clock<C>(target: DateTime<Utc>, tick: Duration, clock: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let (sender, receiver) = watch::channel(Remaining::between(target, clock()));

        let task = ScheduledTask::every(tick, move || {
            sender.send_replace(Remaining::between(target, clock()));
        });

        Self {
            receiver,
            _task: task,
        }
    }

    pub fn current(&self) -> Remaining {
        *self.receiver.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Remaining> {
        self.receiver.clone()
    }

    pub fn stop(self) {}
}
