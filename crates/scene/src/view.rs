use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::input::InputBinding;

/// Geodetic camera position in the scene renderer's vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the ellipsoid.
    pub z: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiParams {
    pub components: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasemapParams {
    pub basemap: String,
    pub ground: String,
    pub ui: UiParams,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentParams {
    pub stars_enabled: bool,
    pub atmosphere_enabled: bool,
}

/// Everything a scene view needs at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneViewParams {
    pub map: BasemapParams,
    pub ui: UiParams,
    pub environment: EnvironmentParams,
    pub quality_profile: String,
    /// Id of the DOM container the view renders into.
    pub container: String,
    pub zoom: f64,
    /// Degrees; 90 looks at the horizon.
    pub tilt: f64,
    pub rotation: f64,
    pub center: GeoPosition,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoToTarget {
    pub position: GeoPosition,
    pub zoom: f64,
    pub heading: f64,
    pub tilt: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoToOptions {
    pub animate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    ModuleLoad(String),
    Construct(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::ModuleLoad(msg) => write!(f, "failed to load scene modules: {msg}"),
            SceneError::Construct(msg) => write!(f, "failed to construct scene view: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {}

/// How a go-to transition ended when it did not complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransitionErrorKind {
    /// Superseded by a newer transition.
    Aborted,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub kind: TransitionErrorKind,
    pub message: String,
}

impl TransitionError {
    /// Renderer error name used for superseded transitions.
    pub const ABORT_NAME: &'static str = "AbortError";

    pub fn aborted() -> Self {
        Self {
            kind: TransitionErrorKind::Aborted,
            message: "transition superseded".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            kind: TransitionErrorKind::Failed,
            message: message.into(),
        }
    }

    /// Classifies a renderer rejection by its structured error name.
    pub fn from_name(name: Option<&str>, message: impl Into<String>) -> Self {
        let kind = match name {
            Some(Self::ABORT_NAME) => TransitionErrorKind::Aborted,
            _ => TransitionErrorKind::Failed,
        };
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_abort(&self) -> bool {
        self.kind == TransitionErrorKind::Aborted
    }
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TransitionErrorKind::Aborted => write!(f, "go-to aborted: {}", self.message),
            TransitionErrorKind::Failed => write!(f, "go-to failed: {}", self.message),
        }
    }
}

impl std::error::Error for TransitionError {}

/// A constructed immersive scene view.
pub trait SceneView {
    /// Retargets the camera. A newer call may abort an older one still in flight.
    fn go_to(
        &self,
        target: &GoToTarget,
        options: GoToOptions,
    ) -> LocalBoxFuture<'static, Result<(), TransitionError>>;

    /// Stops `binding` from propagating past the view.
    fn stop_propagation(&self, binding: InputBinding);
}

/// Scene engine entry point. Construction may suspend for arbitrary time.
pub trait SceneRenderer {
    type View: SceneView + 'static;

    fn construct(
        &self,
        params: &SceneViewParams,
    ) -> LocalBoxFuture<'static, Result<Self::View, SceneError>>;
}

#[cfg(test)]
mod tests {
    use super::{
        BasemapParams, EnvironmentParams, GeoPosition, SceneViewParams, TransitionError,
        TransitionErrorKind, UiParams,
    };

    #[test]
    fn classifies_abort_by_name() {
        assert!(TransitionError::from_name(Some("AbortError"), "x").is_abort());
        let err = TransitionError::from_name(Some("TypeError"), "bad target");
        assert_eq!(err.kind, TransitionErrorKind::Failed);
        assert!(!TransitionError::from_name(None, "abort").is_abort());
    }

    #[test]
    fn params_serialize_in_engine_vocabulary() {
        let params = SceneViewParams {
            map: BasemapParams {
                basemap: "satellite".to_string(),
                ground: "world-elevation".to_string(),
                ui: UiParams::default(),
            },
            ui: UiParams::default(),
            environment: EnvironmentParams {
                stars_enabled: false,
                atmosphere_enabled: true,
            },
            quality_profile: "low".to_string(),
            container: "view".to_string(),
            zoom: 12.0,
            tilt: 90.0,
            rotation: 0.0,
            center: GeoPosition {
                latitude: 1.0,
                longitude: 2.0,
                z: 3.0,
            },
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["qualityProfile"], "low");
        assert_eq!(json["environment"]["starsEnabled"], false);
        assert_eq!(json["map"]["ground"], "world-elevation");
        assert_eq!(json["center"]["latitude"], 1.0);
        assert!(json["ui"]["components"].as_array().unwrap().is_empty());
    }
}
