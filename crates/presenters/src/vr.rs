use foundation::Pose;
use foundation::math::Vec3;
use scene::{NodeWriteError, SceneGraph, SceneGraphNode};
use tracing::debug;

use crate::config::VrConfig;

/// Pose in the VR rig's vocabulary: bearing becomes yaw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VrPose {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl From<&Pose> for VrPose {
    fn from(pose: &Pose) -> Self {
        Self {
            lat: pose.lat,
            lng: pose.lng,
            alt: pose.alt,
            pitch: pose.pitch,
            yaw: pose.bearing,
            roll: pose.roll,
        }
    }
}

/// Node attributes derived from one pose.
///
/// The renderer is right-handed with Y up: latitude runs along X, longitude
/// along -Z, altitude along Y. Bearing is clockwise from north, so yaw and
/// roll are negated on the rig.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VrTransforms {
    pub rig_position: Vec3,
    pub rig_rotation: Vec3,
    pub compass_rotation: Vec3,
    pub horizon_rotation: Vec3,
    pub horizon_position: Vec3,
}

impl VrTransforms {
    pub fn compute(pos: &VrPose, config: &VrConfig) -> Self {
        Self {
            rig_position: Vec3::new(pos.lat, pos.alt, -pos.lng),
            rig_rotation: Vec3::new(pos.pitch, -pos.yaw, -pos.roll),
            compass_rotation: Vec3::new(config.compass_tilt, pos.yaw, 0.0),
            horizon_rotation: Vec3::new(0.0, 0.0, pos.roll),
            // The horizon drops as the viewer pitches up.
            horizon_position: Vec3::new(
                0.0,
                -(pos.pitch / config.horizon_pitch_scale),
                config.horizon_depth,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VrError {
    MissingNode { role: &'static str, id: String },
    Write { role: &'static str, source: NodeWriteError },
}

impl VrError {
    /// Diagnostic tag the coordinator reports this under.
    pub fn kind(&self) -> &'static str {
        match self {
            VrError::MissingNode { .. } => "vr.mount",
            VrError::Write { .. } => "vr.set_attribute",
        }
    }
}

impl std::fmt::Display for VrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VrError::MissingNode { role, id } => {
                write!(f, "vr {role} node not found: #{id}")
            }
            VrError::Write { role, source } => write!(f, "vr {role} node: {source}"),
        }
    }
}

impl std::error::Error for VrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VrError::MissingNode { .. } => None,
            VrError::Write { source, .. } => Some(source),
        }
    }
}

/// Node handles captured at mount.
#[derive(Debug, Clone)]
pub struct VrCamera<N> {
    pub rig: N,
    pub camera: N,
    pub compass: N,
    pub horizon: N,
    /// Pose at mount time.
    pub pos: VrPose,
}

#[derive(Debug)]
pub struct VrState<N> {
    pub camera: Option<VrCamera<N>>,
    /// Pose most recently applied.
    pub pos: Option<VrPose>,
}

impl<N> Default for VrState<N> {
    fn default() -> Self {
        Self {
            camera: None,
            pos: None,
        }
    }
}

impl<N> VrState<N> {
    pub fn is_mounted(&self) -> bool {
        self.camera.is_some()
    }
}

#[derive(Debug)]
pub struct VrPresenter<G> {
    graph: G,
    config: VrConfig,
}

impl<G: SceneGraph> VrPresenter<G> {
    pub fn new(graph: G, config: VrConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Looks up the rig nodes and applies the initial pose.
    ///
    /// All four nodes must exist; otherwise the state is left unmounted. A
    /// failed initial write still leaves the rig mounted.
    pub fn mount(&self, state: &mut VrState<G::Node>, pose: &Pose) -> Result<(), VrError> {
        let camera = VrCamera {
            rig: self.lookup("rig", &self.config.rig_id)?,
            camera: self.lookup("camera", &self.config.camera_id)?,
            compass: self.lookup("compass", &self.config.compass_id)?,
            horizon: self.lookup("horizon", &self.config.horizon_id)?,
            pos: VrPose::from(pose),
        };
        state.camera = Some(camera);
        self.update(state, pose)
    }

    /// Applies `pose` to the rig. No-op until mounted.
    ///
    /// Every attribute is attempted even if an earlier one fails; the first
    /// failure is returned.
    pub fn update(&self, state: &mut VrState<G::Node>, pose: &Pose) -> Result<(), VrError> {
        let Some(camera) = state.camera.as_ref() else {
            debug!("vr rig not mounted; update skipped");
            return Ok(());
        };

        let pos = VrPose::from(pose);
        let t = VrTransforms::compute(&pos, &self.config);
        let writes = [
            ("rig", camera.rig.set_position(t.rig_position)),
            ("rig", camera.rig.set_rotation(t.rig_rotation)),
            ("compass", camera.compass.set_rotation(t.compass_rotation)),
            ("horizon", camera.horizon.set_rotation(t.horizon_rotation)),
            ("horizon", camera.horizon.set_position(t.horizon_position)),
        ];
        state.pos = Some(pos);
        writes
            .into_iter()
            .find_map(|(role, result)| result.err().map(|source| VrError::Write { role, source }))
            .map_or(Ok(()), Err)
    }

    fn lookup(&self, role: &'static str, id: &str) -> Result<G::Node, VrError> {
        self.graph.node(id).ok_or_else(|| VrError::MissingNode {
            role,
            id: id.to_string(),
        })
    }
}
