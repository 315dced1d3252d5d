//! Fixed reward tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishKind {
    pub name: &'static str,
    pub rarity: Rarity,
    pub emoji: &'static str,
}

/// Catalog drawn from uniformly on every completed focus session.
pub static FISH_TYPES: [FishKind; 10] = [
    FishKind { name: "Golden Koi", rarity: Rarity::Legendary, emoji: "🐟" },
    FishKind { name: "Rainbow Trout", rarity: Rarity::Rare, emoji: "🌈" },
    FishKind { name: "Zen Carp", rarity: Rarity::Common, emoji: "🐠" },
    FishKind { name: "Crystal Salmon", rarity: Rarity::Rare, emoji: "💎" },
    FishKind { name: "Moonfish", rarity: Rarity::Legendary, emoji: "🌙" },
    FishKind { name: "Sunset Bass", rarity: Rarity::Common, emoji: "🌅" },
    FishKind { name: "Lucky Catfish", rarity: Rarity::Common, emoji: "🍀" },
    FishKind { name: "Starfish Spirit", rarity: Rarity::Rare, emoji: "⭐" },
    FishKind { name: "Dream Guppy", rarity: Rarity::Common, emoji: "💭" },
    FishKind { name: "Phoenix Betta", rarity: Rarity::Legendary, emoji: "🔥" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryReward {
    pub streak: u32,
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

/// Ascending streak thresholds. Matched by exact equality.
pub static ACCESSORY_REWARDS: [AccessoryReward; 5] = [
    AccessoryReward { streak: 1, id: "sunglasses", name: "Cool Sunglasses", emoji: "🕶️" },
    AccessoryReward { streak: 3, id: "flower", name: "Pretty Flower", emoji: "🌸" },
    AccessoryReward { streak: 5, id: "orange", name: "Orange Hat", emoji: "🍊" },
    AccessoryReward { streak: 10, id: "crown", name: "Royal Crown", emoji: "👑" },
    AccessoryReward { streak: 25, id: "sparkle", name: "Sparkle Aura", emoji: "⭐" },
];

pub static MOTIVATIONAL_QUOTES: [&str; 8] = [
    "Mỗi bước nhỏ đều là tiến bộ lớn 🌟",
    "Tập trung là siêu năng lực của bạn 💪",
    "Hôm nay bạn đã làm tốt lắm rồi! 🎉",
    "Cá sẽ đến với người kiên nhẫn 🐟",
    "Thành công là tổng của những nỗ lực nhỏ 🏆",
    "Capybara tin tưởng bạn! 🦫",
    "Nghỉ ngơi cũng là một phần của thành công 🌙",
    "Bạn thật tuyệt vời! ⭐",
];

pub static SCENE_EMOJIS: [&str; 8] = ["🌅", "🌄", "🏞️", "🌊", "🌺", "🌸", "🍃", "🌿"];

pub fn accessory_for_streak(streak: u32) -> Option<&'static AccessoryReward> {
    ACCESSORY_REWARDS.iter().find(|r| r.streak == streak)
}

pub fn accessory_by_id(id: &str) -> Option<&'static AccessoryReward> {
    ACCESSORY_REWARDS.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ascending_and_unique() {
        let streaks: Vec<u32> = ACCESSORY_REWARDS.iter().map(|r| r.streak).collect();
        assert_eq!(streaks, vec![1, 3, 5, 10, 25]);
        let mut ids: Vec<&str> = ACCESSORY_REWARDS.iter().map(|r| r.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), ACCESSORY_REWARDS.len());
    }

    #[test]
    fn exact_threshold_lookup() {
        assert_eq!(accessory_for_streak(3).map(|r| r.id), Some("flower"));
        assert!(accessory_for_streak(4).is_none());
        assert_eq!(accessory_by_id("crown").map(|r| r.streak), Some(10));
    }

    #[test]
    fn every_rarity_is_represented() {
        for rarity in [Rarity::Common, Rarity::Rare, Rarity::Legendary] {
            assert!(FISH_TYPES.iter().any(|f| f.rarity == rarity));
        }
    }
}
