//! Fish catches, focus streak, accessory unlocks and the journal.

mod catalog;
mod engine;

pub use catalog::{
    accessory_by_id, accessory_for_streak, AccessoryReward, FishKind, Rarity, ACCESSORY_REWARDS,
    FISH_TYPES, MOTIVATIONAL_QUOTES, SCENE_EMOJIS,
};
pub use engine::{FocusReward, RewardLedger};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fish {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub emoji: String,
    pub caught_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub unlocked_at: DateTime<Utc>,
}

/// One page of the journal, written per completed focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub quote: String,
    pub scene: String,
    /// Emoji of the fish caught in that session.
    pub fish_caught: String,
    pub duration_min: u32,
}
