use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{accessory_for_streak, FISH_TYPES, MOTIVATIONAL_QUOTES, SCENE_EMOJIS};
use super::{Accessory, Fish, JournalEntry};
use crate::error::ValidationError;
use crate::history::{HistoryRecorder, HistoryUpdate};
use crate::random::RandomSource;

/// Everything handed out for one completed focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusReward {
    pub fish: Fish,
    pub streak: u32,
    pub accessory: Option<Accessory>,
    pub journal_entry: JournalEntry,
    pub history: HistoryUpdate,
}

/// Owned rewards state: catches, streak, accessories, journal.
///
/// Fields are only changed through the methods below so the
/// count/collection and ownership invariants hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    #[serde(default)]
    pub(crate) fish_caught_count: u32,
    #[serde(default)]
    pub(crate) fish_collection: Vec<Fish>,
    #[serde(default)]
    pub(crate) current_streak: u32,
    #[serde(default)]
    pub(crate) accessories: Vec<Accessory>,
    #[serde(default)]
    pub(crate) equipped_accessory: Option<String>,
    #[serde(default)]
    pub(crate) journal_entries: Vec<JournalEntry>,
    /// Catch waiting for the user to dismiss its announcement.
    #[serde(default)]
    pub(crate) pending_catch: Option<Fish>,
}

impl RewardLedger {
    pub fn fish_caught_count(&self) -> u32 {
        self.fish_caught_count
    }

    pub fn fish_collection(&self) -> &[Fish] {
        &self.fish_collection
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    pub fn equipped_accessory(&self) -> Option<&str> {
        self.equipped_accessory.as_deref()
    }

    pub fn owns_accessory(&self, id: &str) -> bool {
        self.accessories.iter().any(|a| a.id == id)
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }

    pub fn pending_catch(&self) -> Option<&Fish> {
        self.pending_catch.as_ref()
    }

    /// Hand out the rewards for one completed focus session.
    ///
    /// Order: fish, streak, accessory, journal entry, history.
    pub fn on_focus_complete(
        &mut self,
        history: &mut HistoryRecorder,
        duration_min: u32,
        rng: &mut dyn RandomSource,
        now: DateTime<FixedOffset>,
    ) -> FocusReward {
        let at = now.with_timezone(&Utc);

        let kind = &FISH_TYPES[rng.pick(FISH_TYPES.len())];
        let fish = Fish {
            id: rng.id().to_string(),
            name: kind.name.to_string(),
            rarity: kind.rarity,
            emoji: kind.emoji.to_string(),
            caught_at: at,
        };
        self.fish_collection.push(fish.clone());
        self.fish_caught_count = self.fish_caught_count.saturating_add(1);

        self.current_streak = self.current_streak.saturating_add(1);
        let accessory = self.unlock_for_streak(at);

        let quote = MOTIVATIONAL_QUOTES[rng.pick(MOTIVATIONAL_QUOTES.len())];
        let scene = SCENE_EMOJIS[rng.pick(SCENE_EMOJIS.len())];
        let journal_entry = JournalEntry {
            id: rng.id().to_string(),
            date: at,
            quote: quote.to_string(),
            scene: scene.to_string(),
            fish_caught: fish.emoji.clone(),
            duration_min,
        };
        self.journal_entries.push(journal_entry.clone());

        let history = history.record_session(now.date_naive());

        self.pending_catch = Some(fish.clone());
        info!(
            fish = %fish.name,
            streak = self.current_streak,
            accessory = accessory.as_ref().map(|a| a.id.as_str()),
            "focus rewards granted"
        );

        FocusReward {
            fish,
            streak: self.current_streak,
            accessory,
            journal_entry,
            history,
        }
    }

    /// Line-break penalty. Returns the streak that was lost.
    pub fn break_streak(&mut self) -> u32 {
        std::mem::take(&mut self.current_streak)
    }

    /// Clear the catch announcement; returns the fish that was shown.
    pub fn dismiss_catch(&mut self) -> Option<Fish> {
        self.pending_catch.take()
    }

    /// Equip an owned accessory, or take everything off with `None`.
    pub fn equip(&mut self, id: Option<&str>) -> Result<(), ValidationError> {
        match id {
            Some(id) if !self.owns_accessory(id) => {
                Err(ValidationError::UnknownAccessory(id.to_string()))
            }
            _ => {
                self.equipped_accessory = id.map(str::to_string);
                Ok(())
            }
        }
    }

    fn unlock_for_streak(&mut self, at: DateTime<Utc>) -> Option<Accessory> {
        let reward = accessory_for_streak(self.current_streak)?;
        if self.owns_accessory(reward.id) {
            return None;
        }
        let accessory = Accessory {
            id: reward.id.to_string(),
            name: reward.name.to_string(),
            emoji: reward.emoji.to_string(),
            unlocked_at: at,
        };
        self.accessories.push(accessory.clone());
        self.equipped_accessory = Some(accessory.id.clone());
        Some(accessory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::scripted::Scripted;
    use crate::rewards::Rarity;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T09:00:00+07:00").unwrap()
    }

    struct Fixture {
        ledger: RewardLedger,
        history: HistoryRecorder,
        rng: Scripted,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ledger: RewardLedger::default(),
                history: HistoryRecorder::default(),
                rng: Scripted::default(),
            }
        }

        fn complete(&mut self) -> FocusReward {
            self.ledger
                .on_focus_complete(&mut self.history, 25, &mut self.rng, now())
        }
    }

    #[test]
    fn grants_fish_streak_journal_and_history() {
        let mut ledger = RewardLedger::default();
        let mut history = HistoryRecorder::default();
        // fish #4 (Moonfish), quote #2, scene #3
        let mut rng = Scripted::picks(&[4, 2, 3]);
        let reward = ledger.on_focus_complete(&mut history, 25, &mut rng, now());

        assert_eq!(reward.fish.name, "Moonfish");
        assert_eq!(reward.fish.rarity, Rarity::Legendary);
        assert_eq!(ledger.fish_caught_count(), 1);
        assert_eq!(ledger.fish_collection().len(), 1);
        assert_eq!(ledger.current_streak(), 1);
        assert_eq!(reward.journal_entry.quote, MOTIVATIONAL_QUOTES[2]);
        assert_eq!(reward.journal_entry.scene, SCENE_EMOJIS[3]);
        assert_eq!(reward.journal_entry.fish_caught, "🌙");
        assert_eq!(reward.journal_entry.duration_min, 25);
        assert_eq!(reward.history.count, 1);
        assert_eq!(history.history.count_on(now().date_naive()), 1);
        assert_eq!(ledger.pending_catch().map(|f| f.id.as_str()), Some(reward.fish.id.as_str()));
    }

    #[test]
    fn first_streak_unlocks_and_equips_sunglasses() {
        let mut fx = Fixture::new();
        let reward = fx.complete();
        assert_eq!(reward.accessory.map(|a| a.id), Some("sunglasses".to_string()));
        assert_eq!(fx.ledger.equipped_accessory(), Some("sunglasses"));
    }

    #[test]
    fn reaching_threshold_again_does_not_duplicate() {
        let mut fx = Fixture::new();
        for _ in 0..3 {
            fx.complete();
        }
        assert_eq!(fx.ledger.accessories().len(), 2);
        assert_eq!(fx.ledger.equipped_accessory(), Some("flower"));

        assert_eq!(fx.ledger.break_streak(), 3);
        assert_eq!(fx.ledger.current_streak(), 0);
        let regranted: Vec<_> = (0..3).map(|_| fx.complete().accessory).collect();
        assert!(regranted.iter().all(Option::is_none));
        assert_eq!(fx.ledger.accessories().len(), 2);
        assert_eq!(fx.ledger.fish_caught_count(), 6);
    }

    #[test]
    fn non_threshold_streak_grants_nothing() {
        let mut fx = Fixture::new();
        fx.complete();
        let second = fx.complete();
        assert!(second.accessory.is_none());
        assert_eq!(fx.ledger.equipped_accessory(), Some("sunglasses"));
    }

    #[test]
    fn dismiss_clears_pending_catch_once() {
        let mut fx = Fixture::new();
        fx.complete();
        assert!(fx.ledger.dismiss_catch().is_some());
        assert!(fx.ledger.dismiss_catch().is_none());
        assert_eq!(fx.ledger.fish_collection().len(), 1);
    }

    #[test]
    fn equip_requires_ownership() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.ledger.equip(Some("crown")),
            Err(ValidationError::UnknownAccessory("crown".into()))
        );
        fx.complete();
        fx.ledger.equip(None).unwrap();
        assert_eq!(fx.ledger.equipped_accessory(), None);
        fx.ledger.equip(Some("sunglasses")).unwrap();
        assert_eq!(fx.ledger.equipped_accessory(), Some("sunglasses"));
    }

    #[test]
    fn journal_keeps_insertion_order() {
        let mut fx = Fixture::new();
        let a = fx.complete().journal_entry.id;
        let b = fx.complete().journal_entry.id;
        assert_ne!(a, b);
        let ids: Vec<&str> = fx.ledger.journal_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
    }
}
