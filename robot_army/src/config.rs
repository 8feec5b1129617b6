//! Demo configuration

use std::path::PathBuf;

use scenegraph::config::{Config, ConfigError, Deserialize, SceneConfig, Serialize};

/// Settings for a headless robot army run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to simulate
    pub frames: u32,

    /// Seconds per frame; zero or less runs on wall-clock time
    pub fixed_step: f32,

    /// Grid coordinates run over `grid_min..grid_max` on both X and Z
    pub grid_min: i32,

    /// Exclusive upper grid coordinate
    pub grid_max: i32,

    /// Distance between neighbouring robots
    pub spacing: f32,

    /// Bounding sphere radius of one robot
    pub robot_radius: f32,

    /// Directory holding `body_s.obj`, `head_s.obj`, `limb_s.obj` and
    /// `eyeball_s.obj`; cubes are used when unset or when a file fails to load
    pub model_dir: Option<PathBuf>,

    /// Add the roller-coaster track next to the army
    pub coaster: bool,

    /// Camera and culling toggles
    pub scene: SceneConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            fixed_step: 1.0 / 60.0,
            grid_min: -5,
            grid_max: 5,
            spacing: 5.0,
            robot_radius: 2.2,
            model_dir: None,
            coaster: true,
            scene: SceneConfig::default(),
        }
    }
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()?;
        if self.grid_min >= self.grid_max {
            return Err(ConfigError::Invalid(format!(
                "empty robot grid {}..{}",
                self.grid_min, self.grid_max
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(ConfigError::Invalid(format!("spacing {} must be positive", self.spacing)));
        }
        if !(self.robot_radius.is_finite() && self.robot_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "robot radius {} must be positive",
                self.robot_radius
            )));
        }
        Ok(())
    }

    /// Number of robots the grid produces
    pub fn robot_count(&self) -> usize {
        let side = usize::try_from(self.grid_max - self.grid_min).unwrap_or(0);
        side * side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_one_hundred_robots() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.robot_count(), 100);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = DemoConfig::from_toml_str(
            r#"
            frames = 10
            coaster = false

            [scene.culling]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.frames, 10);
        assert!(!config.coaster);
        assert!(!config.scene.culling.enabled);
        assert_eq!(config.grid_max, 5);
    }

    #[test]
    fn test_invalid_grid_is_rejected() {
        let config = DemoConfig {
            grid_min: 3,
            grid_max: 3,
            ..DemoConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
