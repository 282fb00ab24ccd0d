//! Player preferences
//!
//! Read once at game start through the [`crate::persistence::ScoreStore`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ship color selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShipColor {
    #[default]
    Red,
    Purple,
    Yellow,
    Silver,
}

impl ShipColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipColor::Red => "red",
            ShipColor::Purple => "purple",
            ShipColor::Yellow => "yellow",
            ShipColor::Silver => "silver",
        }
    }

    /// Texture key the presentation layer loads for the player ship
    pub fn texture_key(&self) -> String {
        format!("ship_{}", self.as_str())
    }
}

impl FromStr for ShipColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(ShipColor::Red),
            "purple" => Ok(ShipColor::Purple),
            "yellow" => Ok(ShipColor::Yellow),
            "silver" | "grey" | "gray" => Ok(ShipColor::Silver),
            other => Err(format!(
                "unknown ship color '{other}' (expected red, purple, yellow or silver)"
            )),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Player ship color
    #[serde(rename = "selectedShipColor")]
    pub ship_color: ShipColor,

    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ship_color: ShipColor::Red,
            // Music sits well under the effects
            music_volume: 0.1,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Volumes clamped to the valid range
    pub fn clamped_volumes(&self) -> (f32, f32) {
        (
            self.music_volume.clamp(0.0, 1.0),
            self.sfx_volume.clamp(0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_color_round_trips_as_string_key() {
        let settings = Settings {
            ship_color: ShipColor::Purple,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""selectedShipColor":"purple""#));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ship_color.texture_key(), "ship_red");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Yellow".parse::<ShipColor>(), Ok(ShipColor::Yellow));
        assert!("teal".parse::<ShipColor>().is_err());
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings {
            music_volume: 3.0,
            sfx_volume: -1.0,
            ..Default::default()
        };
        assert_eq!(settings.clamped_volumes(), (1.0, 0.0));
    }
}
