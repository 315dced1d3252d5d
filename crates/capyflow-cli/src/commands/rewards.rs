use clap::Subcommand;
use serde::Serialize;

use capyflow_core::rewards::ACCESSORY_REWARDS;
use capyflow_core::Fish;

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum FishAction {
    /// Print the fish collection as JSON
    List,
    /// Dismiss the latest catch announcement
    Dismiss,
}

#[derive(Subcommand)]
pub enum AccessoryAction {
    /// Print every accessory with its unlock streak and ownership
    List,
    /// Wear an unlocked accessory
    Equip {
        /// Accessory id (e.g. "sunglasses")
        id: String,
    },
    /// Take the current accessory off
    Unequip,
}

#[derive(Subcommand)]
pub enum JournalAction {
    /// Print journal entries, newest first
    List {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct FishReport<'a> {
    fish_caught_count: u32,
    pending_catch: Option<&'a Fish>,
    collection: &'a [Fish],
}

#[derive(Serialize)]
struct AccessoryRow {
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    streak: u32,
    owned: bool,
    equipped: bool,
}

pub fn run_fish(action: FishAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        FishAction::List => {
            let rewards = session.state().rewards();
            print_json(&FishReport {
                fish_caught_count: rewards.fish_caught_count(),
                pending_catch: rewards.pending_catch(),
                collection: rewards.fish_collection(),
            })?;
            Ok(Vec::new())
        }
        FishAction::Dismiss => Ok(session.flow().dismiss_catch().into_iter().collect()),
    })
}

pub fn run_accessory(action: AccessoryAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        AccessoryAction::List => {
            let rewards = session.state().rewards();
            let rows: Vec<AccessoryRow> = ACCESSORY_REWARDS
                .iter()
                .map(|r| AccessoryRow {
                    id: r.id,
                    name: r.name,
                    emoji: r.emoji,
                    streak: r.streak,
                    owned: rewards.owns_accessory(r.id),
                    equipped: rewards.equipped_accessory() == Some(r.id),
                })
                .collect();
            print_json(&rows)?;
            Ok(Vec::new())
        }
        AccessoryAction::Equip { id } => Ok(vec![session.flow().equip(Some(&id))?]),
        AccessoryAction::Unequip => Ok(vec![session.flow().equip(None)?]),
    })
}

pub fn run_journal(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        JournalAction::List { limit } => {
            let entries = session.state().rewards().journal_entries();
            let newest: Vec<_> = entries.iter().rev().take(limit.unwrap_or(usize::MAX)).collect();
            print_json(&newest)?;
            Ok(Vec::new())
        }
    })
}
