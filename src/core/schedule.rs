use crate::core::engine::DigestEngine;
use crate::core::{DeliveryOutcome, Pipeline};
use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

pub const DEFAULT_SEND_AT: &str = "19:25";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Wall clock the daily trigger is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum LocalClock {
    System,
    Fixed(FixedOffset),
}

impl LocalClock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            LocalClock::System => Local::now().naive_local(),
            LocalClock::Fixed(offset) => Utc::now().with_timezone(offset).naive_local(),
        }
    }
}

pub fn tomorrow(now: NaiveDateTime) -> NaiveDate {
    now.date()
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
}

/// Fires once per calendar date, during the minute matching `send_at`.
#[derive(Debug, Clone)]
pub struct DailyTrigger {
    send_at: NaiveTime,
    last_fired: Option<NaiveDate>,
}

impl DailyTrigger {
    pub fn new(send_at: NaiveTime) -> Self {
        Self {
            send_at,
            last_fired: None,
        }
    }

    pub fn send_at(&self) -> NaiveTime {
        self.send_at
    }

    /// Returns the delivery target (tomorrow) when the trigger fires at `now`.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDate> {
        let due = now.hour() == self.send_at.hour() && now.minute() == self.send_at.minute();
        if !due || self.last_fired == Some(now.date()) {
            return None;
        }
        self.last_fired = Some(now.date());
        Some(tomorrow(now))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LastDelivery {
    pub finished_at: DateTime<Utc>,
    pub target: NaiveDate,
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Most recent delivery result, shared with the health endpoint.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLog {
    last: Arc<RwLock<Option<LastDelivery>>>,
}

impl DeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last(&self) -> Option<LastDelivery> {
        self.last.read().await.clone()
    }

    async fn record(&self, entry: LastDelivery) {
        *self.last.write().await = Some(entry);
    }
}

/// Runs one delivery for `target` and records its result. Errors are logged, never returned.
pub async fn deliver<P: Pipeline>(engine: &DigestEngine<P>, target: NaiveDate, log: &DeliveryLog) {
    let (status, detail) = match engine.run(target).await {
        Ok(DeliveryOutcome::Sent { .. }) => ("sent", None),
        Ok(DeliveryOutcome::Skipped { reason, .. }) => ("skipped", Some(reason.to_string())),
        Err(e) => {
            tracing::error!(
                "❌ Delivery for {} failed: {} (Category: {:?}, Severity: {:?})",
                target,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            ("failed", Some(e.to_string()))
        }
    };

    log.record(LastDelivery {
        finished_at: Utc::now(),
        target,
        status,
        detail,
    })
    .await;
}

pub struct Scheduler<P: Pipeline> {
    engine: Arc<DigestEngine<P>>,
    trigger: DailyTrigger,
    clock: LocalClock,
    poll_interval: Duration,
    log: DeliveryLog,
}

impl<P: Pipeline> Scheduler<P> {
    pub fn new(
        engine: Arc<DigestEngine<P>>,
        trigger: DailyTrigger,
        clock: LocalClock,
        poll_interval: Duration,
        log: DeliveryLog,
    ) -> Self {
        Self {
            engine,
            trigger,
            clock,
            poll_interval,
            log,
        }
    }

    /// Polls the clock until `shutdown` flips to `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "⏰ Daily delivery scheduled at {} (polling every {:?})",
            self.trigger.send_at().format("%H:%M"),
            self.poll_interval
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(target) = self.trigger.poll(self.clock.now()) {
                        deliver(&self.engine, target, &self.log).await;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Scheduler stopped");
                        return;
                    }
                }
            }
        }
    }
}
