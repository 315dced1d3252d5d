use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use capyflow_core::{Panel, Shortcut, Theme};

use crate::session::{print_json, with_session};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Choose sunny, rainy or night
    Set { theme: Theme },
    /// Turn automatic theme selection on or off
    Auto,
    /// Print the current theme as JSON
    Status,
}

#[derive(Subcommand)]
pub enum PanelAction {
    /// Open or close a panel (mood_picker, journal, chat, mini_mode)
    Toggle { panel: Panel },
    /// Print which panels are open
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Setting {
    Sound,
    Fog,
}

#[derive(Serialize)]
struct ThemeStatus {
    theme: Theme,
    auto_theme: bool,
}

pub fn run_theme(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| {
        let flow = session.flow();
        let events = match action {
            ThemeAction::Set { theme } => flow.set_theme(theme).into_iter().collect(),
            ThemeAction::Auto => flow.toggle_auto_theme(),
            ThemeAction::Status => {
                print_json(&ThemeStatus {
                    theme: flow.state().theme(),
                    auto_theme: flow.state().auto_theme(),
                })?;
                Vec::new()
            }
        };
        Ok(events)
    })
}

pub fn run_panel(action: PanelAction) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| match action {
        PanelAction::Toggle { panel } => Ok(vec![session.flow().toggle_panel(panel)]),
        PanelAction::List => {
            print_json(session.state().panels())?;
            Ok(Vec::new())
        }
    })
}

/// Feed one keyboard shortcut (space, m, c, /, j, h, t, esc).
pub fn run_key(key: Shortcut) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| Ok(session.flow().handle_shortcut(key)))
}

pub fn run_toggle(setting: Setting) -> Result<(), Box<dyn std::error::Error>> {
    with_session(|session| {
        let event = match setting {
            Setting::Sound => session.flow().toggle_sound(),
            Setting::Fog => session.flow().toggle_fog(),
        };
        Ok(vec![event])
    })
}
