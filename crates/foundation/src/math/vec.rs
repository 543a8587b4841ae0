use serde::{Deserialize, Serialize};

/// Three-component vector used for scene-graph position and rotation attributes.
///
/// Rotations are Euler angles in degrees, matching what scene-graph renderers
/// accept on their `rotation` attribute.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise equality that treats NaN as equal to NaN.
    pub fn same_bits(self, other: Self) -> bool {
        fn eq(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        eq(self.x, other.x) && eq(self.y, other.y) && eq(self.z, other.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Formats as the space-separated `"x y z"` triple scene-graph markup expects.
impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::Vec3;

    #[test]
    fn neg_flips_every_component() {
        assert_eq!(-Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 2.0, -0.5));
    }

    #[test]
    fn displays_as_attribute_triple() {
        assert_eq!(Vec3::new(40.0, 10.0, 74.0).to_string(), "40 10 74");
        assert_eq!(Vec3::new(0.0, -0.05, -0.25).to_string(), "0 -0.05 -0.25");
    }

    #[test]
    fn same_bits_matches_nan_with_nan() {
        let a = Vec3::new(f64::NAN, 1.0, 2.0);
        assert!(a.same_bits(Vec3::new(f64::NAN, 1.0, 2.0)));
        assert!(!a.same_bits(Vec3::new(0.0, 1.0, 2.0)));
        assert!(!a.is_finite());
    }
}
