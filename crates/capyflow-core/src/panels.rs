//! Overlay panels and the keyboard shortcut surface.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    MoodPicker,
    Journal,
    Chat,
    MiniMode,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::MoodPicker, Panel::Journal, Panel::Chat, Panel::MiniMode];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::MoodPicker => "mood_picker",
            Panel::Journal => "journal",
            Panel::Chat => "chat",
            Panel::MiniMode => "mini_mode",
        }
    }
}

impl FromStr for Panel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim().replace('-', "_"))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "panel".into(),
                message: format!("unknown panel '{s}'"),
            })
    }
}

/// Open/closed flags for the overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panels {
    #[serde(default)]
    pub mood_picker: bool,
    #[serde(default)]
    pub journal: bool,
    #[serde(default)]
    pub chat: bool,
    #[serde(default)]
    pub mini_mode: bool,
}

impl Panels {
    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::MoodPicker => self.mood_picker,
            Panel::Journal => self.journal,
            Panel::Chat => self.chat,
            Panel::MiniMode => self.mini_mode,
        }
    }

    pub fn set(&mut self, panel: Panel, open: bool) {
        let flag = match panel {
            Panel::MoodPicker => &mut self.mood_picker,
            Panel::Journal => &mut self.journal,
            Panel::Chat => &mut self.chat,
            Panel::MiniMode => &mut self.mini_mode,
        };
        *flag = open;
    }

    /// Flip a panel; returns the new state.
    pub fn toggle(&mut self, panel: Panel) -> bool {
        let open = !self.is_open(panel);
        self.set(panel, open);
        open
    }

    /// Topmost open overlay that Esc should close. The fish modal is owned
    /// by the reward ledger and checked by the caller first.
    pub fn topmost_closable(&self) -> Option<Panel> {
        [Panel::MoodPicker, Panel::Journal, Panel::Chat]
            .into_iter()
            .find(|p| self.is_open(*p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    /// Space: start, pause or resume.
    ToggleTimer,
    ToggleMute,
    Cast,
    MoodPicker,
    Journal,
    MiniMode,
    Chat,
    Escape,
}

impl Shortcut {
    /// Map a key name (`space`, `m`, `c`, `/`, `j`, `h`, `t`, `esc`).
    pub fn from_key(key: &str) -> Option<Self> {
        let key = if key == " " { "space" } else { key.trim() };
        let shortcut = match key.to_ascii_lowercase().as_str() {
            "space" => Shortcut::ToggleTimer,
            "m" => Shortcut::ToggleMute,
            "c" => Shortcut::Cast,
            "/" | "slash" => Shortcut::MoodPicker,
            "j" => Shortcut::Journal,
            "h" => Shortcut::MiniMode,
            "t" => Shortcut::Chat,
            "esc" | "escape" => Shortcut::Escape,
            _ => return None,
        };
        Some(shortcut)
    }
}

impl FromStr for Shortcut {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shortcut::from_key(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "key".into(),
            message: format!("no shortcut bound to '{s}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_shortcuts() {
        assert_eq!(Shortcut::from_key("space"), Some(Shortcut::ToggleTimer));
        assert_eq!(Shortcut::from_key("M"), Some(Shortcut::ToggleMute));
        assert_eq!(Shortcut::from_key("/"), Some(Shortcut::MoodPicker));
        assert_eq!(Shortcut::from_key("Escape"), Some(Shortcut::Escape));
        assert_eq!(Shortcut::from_key("x"), None);
        assert!("q".parse::<Shortcut>().is_err());
    }

    #[test]
    fn escape_priority_skips_mini_mode() {
        let mut panels = Panels::default();
        panels.toggle(Panel::MiniMode);
        assert_eq!(panels.topmost_closable(), None);
        panels.toggle(Panel::Chat);
        panels.toggle(Panel::Journal);
        assert_eq!(panels.topmost_closable(), Some(Panel::Journal));
        panels.toggle(Panel::MoodPicker);
        assert_eq!(panels.topmost_closable(), Some(Panel::MoodPicker));
    }

    #[test]
    fn panel_names_parse() {
        assert_eq!("mini-mode".parse::<Panel>().unwrap(), Panel::MiniMode);
        assert!("settings".parse::<Panel>().is_err());
    }
}
