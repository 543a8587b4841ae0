use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Position and Euler rotation (degrees) of a scene-graph node.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn same_bits(&self, other: &Self) -> bool {
        self.position.same_bits(other.position) && self.rotation.same_bits(other.rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
