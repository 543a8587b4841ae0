use serde::{Deserialize, Serialize};

/// Geographic map center in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
}

impl MapCenter {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    MissingContainer(String),
    Backend(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::MissingContainer(id) => write!(f, "map container not found: {id}"),
            MapError::Backend(msg) => write!(f, "map renderer error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {}

pub trait MapView {
    fn set_center(&mut self, center: MapCenter);
}

/// 2D/2.5D map library entry point.
pub trait MapRenderer {
    type View: MapView;

    fn create(&self, center: MapCenter) -> Result<Self::View, MapError>;
}
