pub mod event_bus;
pub mod report;
pub mod revision;
pub mod spawn;

pub use event_bus::*;
pub use report::*;
pub use revision::*;
pub use spawn::*;
