use serde::{Deserialize, Serialize};

/// Fixed scene camera zoom level.
pub const SCENE_ZOOM: f64 = 12.0;
/// Scene camera tilt in degrees; 90 looks toward the horizon.
pub const SCENE_TILT_DEG: f64 = 90.0;
pub const SCENE_ROTATION_DEG: f64 = 0.0;
pub const SCENE_BASEMAP: &str = "satellite";
pub const SCENE_GROUND: &str = "world-elevation";
pub const SCENE_QUALITY_PROFILE: &str = "low";
pub const SCENE_CONTAINER_ID: &str = "view";

/// Compass needle tilt in degrees so it lies flat facing up.
pub const COMPASS_TILT_DEG: f64 = -90.0;
/// Pitch degrees per unit of horizon drop.
pub const HORIZON_PITCH_SCALE: f64 = 100.0;
/// Horizon indicator distance in front of the camera.
pub const HORIZON_DEPTH: f64 = -0.25;

pub const VR_RIG_ID: &str = "vr-rig";
pub const VR_CAMERA_ID: &str = "vr-camera";
pub const VR_COMPASS_ID: &str = "compass";
pub const VR_HORIZON_ID: &str = "horizon";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid presenter config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid presenter config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub basemap: String,
    pub ground: String,
    pub quality_profile: String,
    pub container: String,
    pub stars_enabled: bool,
    pub atmosphere_enabled: bool,
    pub zoom: f64,
    pub tilt: f64,
    pub rotation: f64,
    /// Pose updates cut instantly instead of animating.
    pub animate: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            basemap: SCENE_BASEMAP.to_string(),
            ground: SCENE_GROUND.to_string(),
            quality_profile: SCENE_QUALITY_PROFILE.to_string(),
            container: SCENE_CONTAINER_ID.to_string(),
            stars_enabled: false,
            atmosphere_enabled: true,
            zoom: SCENE_ZOOM,
            tilt: SCENE_TILT_DEG,
            rotation: SCENE_ROTATION_DEG,
            animate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrConfig {
    pub rig_id: String,
    pub camera_id: String,
    pub compass_id: String,
    pub horizon_id: String,
    pub compass_tilt: f64,
    pub horizon_pitch_scale: f64,
    pub horizon_depth: f64,
}

impl Default for VrConfig {
    fn default() -> Self {
        Self {
            rig_id: VR_RIG_ID.to_string(),
            camera_id: VR_CAMERA_ID.to_string(),
            compass_id: VR_COMPASS_ID.to_string(),
            horizon_id: VR_HORIZON_ID.to_string(),
            compass_tilt: COMPASS_TILT_DEG,
            horizon_pitch_scale: HORIZON_PITCH_SCALE,
            horizon_depth: HORIZON_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub scene: SceneConfig,
    pub vr: VrConfig,
}

impl PresenterConfig {
    /// Parses a (possibly partial) JSON document; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vr.horizon_pitch_scale == 0.0 || !self.vr.horizon_pitch_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "vr.horizon_pitch_scale must be finite and non-zero, got {}",
                self.vr.horizon_pitch_scale
            )));
        }
        let ids = [
            ("vr.rig_id", &self.vr.rig_id),
            ("vr.camera_id", &self.vr.camera_id),
            ("vr.compass_id", &self.vr.compass_id),
            ("vr.horizon_id", &self.vr.horizon_id),
            ("scene.container", &self.scene.container),
        ];
        for (key, id) in ids {
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}
