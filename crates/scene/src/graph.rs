use std::fmt;

use foundation::math::Vec3;

/// The host refused an attribute write on a scene-graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWriteError {
    pub attribute: &'static str,
    pub message: String,
}

impl NodeWriteError {
    pub fn new(attribute: &'static str, message: impl Into<String>) -> Self {
        Self {
            attribute,
            message: message.into(),
        }
    }
}

impl fmt::Display for NodeWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to set {}: {}", self.attribute, self.message)
    }
}

impl std::error::Error for NodeWriteError {}

/// A node of a declarative scene graph (rig, camera, indicator entity).
///
/// Nodes are shared handles into the host's scene graph, so setters take
/// `&self`.
pub trait SceneGraphNode {
    fn set_position(&self, position: Vec3) -> Result<(), NodeWriteError>;
    fn set_rotation(&self, rotation: Vec3) -> Result<(), NodeWriteError>;
}

/// Lookup of scene-graph nodes by their fixed identifiers.
pub trait SceneGraph {
    type Node: SceneGraphNode;

    fn node(&self, id: &str) -> Option<Self::Node>;
}
