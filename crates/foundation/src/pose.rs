use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeSource, float_attribute};

pub const ATTR_LAT: &str = "data-lat";
pub const ATTR_LNG: &str = "data-lng";
pub const ATTR_ALT: &str = "data-alt";
pub const ATTR_BEARING: &str = "data-bearing";
pub const ATTR_PITCH: &str = "data-pitch";
pub const ATTR_ROLL: &str = "data-roll";

/// Geodetic viewpoint: degrees for angles and coordinates, meters for altitude.
///
/// Any field may be `NaN` when the source attribute was missing or not numeric.
/// Ranges are not validated.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
    /// Clockwise from north.
    pub bearing: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Pose {
    pub fn new(lat: f64, lng: f64, alt: f64, bearing: f64, pitch: f64, roll: f64) -> Self {
        Self {
            lat,
            lng,
            alt,
            bearing,
            pitch,
            roll,
        }
    }

    pub fn nan() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    }

    /// Parses the six `data-*` pose attributes of `source`.
    pub fn extract(source: &impl AttributeSource) -> Self {
        Self {
            lat: float_attribute(source, ATTR_LAT),
            lng: float_attribute(source, ATTR_LNG),
            alt: float_attribute(source, ATTR_ALT),
            bearing: float_attribute(source, ATTR_BEARING),
            pitch: float_attribute(source, ATTR_PITCH),
            roll: float_attribute(source, ATTR_ROLL),
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.lat,
            self.lng,
            self.alt,
            self.bearing,
            self.pitch,
            self.roll,
        ]
    }

    /// True when at least one field failed to parse.
    pub fn is_degraded(&self) -> bool {
        self.as_array().iter().any(|v| v.is_nan())
    }

    /// Equality that treats matching `NaN` fields as equal.
    pub fn same_bits(&self, other: &Self) -> bool {
        self.as_array()
            .iter()
            .zip(other.as_array().iter())
            .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b)
    }
}

/// Shorthand for [`Pose::extract`].
pub fn extract_pose(source: &impl AttributeSource) -> Pose {
    Pose::extract(source)
}

#[cfg(test)]
mod tests {
    use super::{Pose, extract_pose};
    use std::collections::BTreeMap;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_all_six_fields() {
        let el = attrs(&[
            ("data-lat", "40.0"),
            ("data-lng", "-74.0"),
            ("data-alt", "10"),
            ("data-bearing", "90"),
            ("data-pitch", "5"),
            ("data-roll", "0"),
        ]);
        let pose = extract_pose(&el);
        assert_eq!(pose, Pose::new(40.0, -74.0, 10.0, 90.0, 5.0, 0.0));
        assert!(!pose.is_degraded());
    }

    #[test]
    fn missing_and_garbage_fields_become_nan() {
        let el = attrs(&[
            ("data-lat", "12.5"),
            ("data-lng", "west"),
            ("data-bearing", "270"),
        ]);
        let pose = extract_pose(&el);
        assert_eq!(pose.lat, 12.5);
        assert!(pose.lng.is_nan());
        assert!(pose.alt.is_nan());
        assert_eq!(pose.bearing, 270.0);
        assert!(pose.pitch.is_nan());
        assert!(pose.roll.is_nan());
        assert!(pose.is_degraded());
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let el = attrs(&[("data-lat", "123"), ("data-lng", "-540")]);
        let pose = extract_pose(&el);
        assert_eq!(pose.lat, 123.0);
        assert_eq!(pose.lng, -540.0);
    }

    #[test]
    fn same_bits_handles_nan() {
        assert!(Pose::nan().same_bits(&Pose::nan()));
        assert_ne!(Pose::nan(), Pose::nan());
    }

    #[test]
    fn serializes_with_field_names() {
        let pose = Pose::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let json = serde_json::to_string(&pose).unwrap();
        assert_eq!(
            json,
            r#"{"lat":1.0,"lng":2.0,"alt":3.0,"bearing":4.0,"pitch":5.0,"roll":6.0}"#
        );
    }
}
