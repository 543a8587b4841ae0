//! Presenters that keep the map, scene and VR renderers on one shared pose.
//!
//! Each presenter owns its renderer state and is driven by a
//! [`ViewCoordinator`], which parses the pose once per lifecycle event and fans
//! it out in a fixed order.

pub mod config;
pub mod coordinator;
pub mod map;
pub mod scene_view;
pub mod vr;

pub use config::*;
pub use coordinator::*;
pub use map::*;
pub use scene_view::*;
pub use vr::*;
