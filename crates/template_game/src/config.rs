//! Game configuration

use serde::{Deserialize, Serialize};
use sprite_engine::config::{Config, ConfigError, EngineConfig};

/// Everything the sample game reads from its config file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Scripted run settings
    pub run: RunConfig,
}

impl Config for GameConfig {}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameplayConfig {
    /// Player ship speed in world units per second
    pub player_speed: f32,

    /// Seconds between planet shop refreshes
    pub shop_refresh_interval: f32,

    /// Items offered by each planet shop
    pub shop_size: usize,

    /// Delay before the start modal appears, in seconds
    pub start_modal_delay: f32,

    /// Nebula clouds kept around the player
    pub nebula_count: usize,

    /// Clouds further than this from the player are recycled
    pub nebula_field_radius: f32,

    /// Distance from a planet centre at which landing is offered
    pub landing_radius: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: 240.0,
            shop_refresh_interval: 180.0,
            shop_size: 6,
            start_modal_delay: 0.5,
            nebula_count: 64,
            nebula_field_radius: 1200.0,
            landing_radius: 64.0,
        }
    }
}

/// Scripted run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to simulate
    pub frames: u64,

    /// Milliseconds between frames
    pub frame_ms: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_ms: 16.0,
        }
    }
}

impl GameConfig {
    /// Load configuration from `path`, or the defaults when no path is given
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = GameConfig::load_or_default(None).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.run.frames, 600);
    }

    #[test]
    fn test_partial_toml() {
        let config: GameConfig = toml::from_str(
            r#"
            [gameplay]
            player_speed = 100.0

            [engine.window]
            width = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.gameplay.player_speed, 100.0);
        assert_eq!(config.gameplay.shop_size, 6);
        assert_eq!(config.engine.window.width, 1024);
        assert_eq!(config.engine.window.height, 600);
    }
}
