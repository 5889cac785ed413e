//! Wearable device sync.
//!
//! A [`WearableSource`] yields activities recorded elsewhere. The dashboard
//! prepends them to its log and credits steps; it never needs to know
//! where they came from.

mod wearable;

use async_trait::async_trait;

use crate::activity::ActivityEntry;
use crate::error::CoreError;

pub use wearable::{SimulatedWearable, SYNCED_KINDS, SYNCED_SUFFIX};

#[async_trait]
pub trait WearableSource: Send + Sync {
    /// Fetch activities recorded since the last sync, newest first.
    async fn sync(&self) -> Result<Vec<ActivityEntry>, CoreError>;
}
