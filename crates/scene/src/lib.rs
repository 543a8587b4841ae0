//! Capability interfaces for the renderer back-ends.
//!
//! The engines themselves are opaque: a map that can be centered, a scene view
//! that can be constructed and retargeted, and a scene graph whose nodes take
//! position/rotation attributes. [`recording`] provides in-memory back-ends
//! that record every call.

pub mod components;
pub mod graph;
pub mod input;
pub mod map;
pub mod recording;
pub mod view;

pub use graph::*;
pub use input::*;
pub use map::*;
pub use view::*;
