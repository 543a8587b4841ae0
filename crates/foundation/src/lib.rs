pub mod attributes;
pub mod math;
pub mod pose;

// Foundation crate: small, well-tested primitives only.
pub use attributes::*;
pub use pose::*;
