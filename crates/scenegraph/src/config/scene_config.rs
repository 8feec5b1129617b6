//! Scene-level settings: culling toggles and the initial camera

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;
use crate::scene::Camera;

/// Top-level scene configuration
///
/// ```toml
/// [culling]
/// enabled = true
/// freeze_frustum = false
/// show_bounds = false
///
/// [camera]
/// eye = [0.0, 0.0, 20.0]
/// target = [0.0, 0.0, 0.0]
/// up = [0.0, 1.0, 0.0]
/// fov_degrees = 60.0
/// near = 1.0
/// far = 1000.0
/// viewport = [640, 480]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    /// Frustum culling toggles
    pub culling: CullingConfig,
    /// Initial camera placement and projection
    pub camera: CameraConfig,
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Check that the configured camera describes a usable frustum
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera
            .to_camera()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Runtime culling toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Skip subtrees whose bounding sphere fails the frustum test
    pub enabled: bool,
    /// Start with the culling frustum frozen at the initial camera
    pub freeze_frustum: bool,
    /// Submit bounding-sphere wireframes for drawn groups
    pub show_bounds: bool,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            freeze_frustum: false,
            show_bounds: false,
        }
    }
}

/// Initial camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position
    pub eye: [f32; 3],
    /// Look-at point
    pub target: [f32; 3],
    /// Up direction
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
    /// Viewport size in pixels, used for the aspect ratio
    pub viewport: (u32, u32),
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 20.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 60.0,
            near: 1.0,
            far: 1000.0,
            viewport: (640, 480),
        }
    }
}

impl CameraConfig {
    /// Width / height of the configured viewport
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        let (width, height) = self.viewport;
        if height == 0 {
            0.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Build the camera described by this configuration
    pub fn to_camera(&self) -> Camera {
        let mut camera = Camera::perspective(
            Vec3::from(self.eye),
            self.fov_degrees,
            self.aspect(),
            self.near,
            self.far,
        );
        camera.look_at(Vec3::from(self.target), Vec3::from(self.up));
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_robot_army_setup() {
        let config = SceneConfig::default();
        assert!(config.culling.enabled);
        assert!(!config.culling.freeze_frustum);

        let camera = config.camera.to_camera();
        assert_relative_eq!(camera.position, Vec3::new(0.0, 0.0, 20.0));
        assert_relative_eq!(camera.fov_degrees(), 60.0, epsilon = 1e-4);
        assert_relative_eq!(camera.aspect, 640.0 / 480.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [culling]
            enabled = false

            [camera]
            fov_degrees = 45.0
            "#,
        )
        .unwrap();

        assert!(!config.culling.enabled);
        assert!(!config.culling.show_bounds);
        assert_relative_eq!(config.camera.fov_degrees, 45.0);
        assert_relative_eq!(config.camera.far, 1000.0);
    }

    #[test]
    fn test_ron_config_parses() {
        let config = SceneConfig::from_ron_str(
            "(culling: (show_bounds: true), camera: (eye: (1.0, 2.0, 3.0), near: 0.5))",
        )
        .unwrap();

        assert!(config.culling.show_bounds);
        assert!(config.culling.enabled);
        assert_eq!(config.camera.eye, [1.0, 2.0, 3.0]);
        assert_relative_eq!(config.camera.near, 0.5);
    }

    #[test]
    fn test_degenerate_camera_is_invalid() {
        let mut config = SceneConfig::default();
        config.camera.near = 2000.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SceneConfig::default();
        config.camera.target = config.camera.eye;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera.viewport = (640, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = SceneConfig::from_toml_str("[camera]\nnear = \"close\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
