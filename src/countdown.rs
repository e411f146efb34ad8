// File: ./src/countdown.rs
// Time left until the event starts, plus a background ticker that
// publishes it periodically.
use chrono::{Local, NaiveDateTime, TimeDelta};
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Whole seconds between `now` and `target`, split into d/h/m/s.
/// Clamped to zero once the target has passed.
pub fn countdown(target: NaiveDateTime, now: NaiveDateTime) -> Remaining {
    let delta = target - now;
    if delta <= TimeDelta::zero() {
        return Remaining::default();
    }
    let total = delta.num_seconds();
    Remaining {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
    }
}

/// Background task pushing a fresh `Remaining` every tick.
///
/// The task stops on its own once zero has been sent, or when the receiver
/// goes away. Dropping the ticker aborts it.
pub struct CountdownTicker {
    rx: mpsc::Receiver<Remaining>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Must be called from within a tokio runtime. The wall clock is read
    /// in local time, matching how event dates are entered.
    pub fn spawn(target: NaiveDateTime, tick: Duration) -> Self {
        Self::spawn_with_clock(target, tick, || Local::now().naive_local())
    }

    pub fn spawn_with_clock<C>(target: NaiveDateTime, tick: Duration, clock: C) -> Self
    where
        C: Fn() -> NaiveDateTime + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(4);
        // interval() panics on a zero period.
        let tick = tick.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let remaining = countdown(target, clock());
                if tx.send(remaining).await.is_err() {
                    log::debug!("Countdown receiver dropped, stopping ticker");
                    break;
                }
                if remaining.is_zero() {
                    break;
                }
            }
        });

        Self { rx, handle }
    }

    /// Next value, or `None` once the ticker has finished.
    pub async fn next(&mut self) -> Option<Remaining> {
        self.rx.recv().await
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
