//! Spatial indexing.

pub mod strtree;
#[cfg(feature = "sync")]
pub mod sync;

pub use strtree::{DEFAULT_NODE_CAPACITY, StrTree};
#[cfg(feature = "sync")]
pub use sync::SyncStrTree;
