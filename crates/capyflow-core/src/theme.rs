//! Scene theme and the time-of-day auto theme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::random::RandomSource;

/// Chance per evaluation that the auto theme picks rain.
pub const RAINY_CHANCE: f64 = 0.15;
/// First hour of the night theme (inclusive).
pub const NIGHT_STARTS_AT: u32 = 18;
/// First hour of daylight (inclusive).
pub const DAY_STARTS_AT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Sunny,
    Rainy,
    Night,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Rainy => "rainy",
            Theme::Night => "night",
        }
    }

    /// Theme for a local hour when it is not raining.
    pub fn for_hour(hour: u32) -> Self {
        if hour >= NIGHT_STARTS_AT || hour < DAY_STARTS_AT {
            Theme::Night
        } else {
            Theme::Sunny
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(Theme::Sunny),
            "rainy" => Ok(Theme::Rainy),
            "night" => Ok(Theme::Night),
            other => Err(ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{other}' (expected sunny, rainy or night)"),
            }),
        }
    }
}

/// One auto-theme evaluation: a rain roll first, then the hour.
pub fn auto_theme(hour: u32, rng: &mut dyn RandomSource) -> Theme {
    if rng.unit() < RAINY_CHANCE {
        Theme::Rainy
    } else {
        Theme::for_hour(hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::scripted::Scripted;

    #[test]
    fn hour_boundaries() {
        assert_eq!(Theme::for_hour(5), Theme::Night);
        assert_eq!(Theme::for_hour(6), Theme::Sunny);
        assert_eq!(Theme::for_hour(17), Theme::Sunny);
        assert_eq!(Theme::for_hour(18), Theme::Night);
        assert_eq!(Theme::for_hour(0), Theme::Night);
    }

    #[test]
    fn rain_roll_wins_over_hour() {
        let mut rng = Scripted::units(&[0.1, 0.15, 0.9]);
        assert_eq!(auto_theme(12, &mut rng), Theme::Rainy);
        assert_eq!(auto_theme(12, &mut rng), Theme::Sunny);
        assert_eq!(auto_theme(23, &mut rng), Theme::Night);
    }

    #[test]
    fn parses_names() {
        assert_eq!("Night".parse::<Theme>().unwrap(), Theme::Night);
        assert!("foggy".parse::<Theme>().is_err());
    }
}
