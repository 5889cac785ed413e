use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::{debug, info, instrument};

use super::WearableSource;
use crate::activity::ActivityEntry;
use crate::error::CoreError;

pub const SYNCED_KINDS: [&str; 5] = ["Running", "Cycling", "Swimming", "HIIT", "Strength Training"];
pub const SYNCED_SUFFIX: &str = " (Synced)";

const KCAL_PER_MIN: u32 = 8;

/// Stand-in for a paired device: waits, then reports one or two workouts.
pub struct SimulatedWearable {
    delay: Duration,
    rng: Mutex<Pcg64>,
}

impl SimulatedWearable {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(Pcg64::from_entropy()),
        }
    }

    /// Deterministic batches for tests and demos.
    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(Pcg64::seed_from_u64(seed)),
        }
    }

    fn generate(&self) -> Vec<ActivityEntry> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now_ms = Utc::now().timestamp_millis();
        let count = rng.gen_range(1..=2);
        (0..count)
            .map(|_| {
                let kind = SYNCED_KINDS[rng.gen_range(0..SYNCED_KINDS.len())];
                let duration_min = rng.gen_range(15..60);
                ActivityEntry {
                    id: uuid::Uuid::new_v4().to_string(),
                    kind: format!("{kind}{SYNCED_SUFFIX}"),
                    duration_min,
                    calories: duration_min * KCAL_PER_MIN,
                    occurred_at_ms: now_ms,
                    avg_heart_rate: Some(rng.gen_range(120..160)),
                }
            })
            .collect()
    }
}

#[async_trait]
impl WearableSource for SimulatedWearable {
    #[instrument(skip(self), fields(delay_ms = self.delay.as_millis() as u64))]
    async fn sync(&self) -> Result<Vec<ActivityEntry>, CoreError> {
        if !self.delay.is_zero() {
            debug!("waiting for device");
            tokio::time::sleep(self.delay).await;
        }
        let batch = self.generate();
        info!(count = batch.len(), "wearable sync complete");
        Ok(batch)
    }
}
