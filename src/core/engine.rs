use crate::core::{DeliveryOutcome, Pipeline};
use crate::utils::error::Result;
use chrono::NaiveDate;

pub struct DigestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DigestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, target: NaiveDate) -> Result<DeliveryOutcome> {
        tracing::info!("Preparing prayer times for {}", target);

        // Extract
        let text = self.pipeline.extract(target).await?;
        tracing::debug!("Extracted {} characters of timetable text", text.len());

        // Transform
        let times = match self.pipeline.transform(text, target).await? {
            Ok(times) => times,
            Err(reason) => {
                tracing::warn!("Skipping delivery for {}: {}", target, reason);
                return Ok(DeliveryOutcome::Skipped {
                    date: target,
                    reason,
                });
            }
        };

        // Load
        let outcome = self.pipeline.load(times).await?;
        tracing::info!("Delivery for {} finished: {:?}", target, outcome);
        Ok(outcome)
    }
}
