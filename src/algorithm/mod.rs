//! Geometric algorithms.
//!
//! Robust primitives (orientation, segment intersection, point location)
//! sit at the bottom; the measurement and construction routines exposed as
//! [`Geometry`](crate::geom::Geometry) methods are built on them.

pub mod centroid;
pub mod distance;
pub mod hull;
pub mod interior_point;
pub mod intersection;
pub mod locate;
pub mod measure;
pub mod minimum;
pub mod orientation;
pub mod simplify;
pub mod validity;

pub use locate::Location;
pub use orientation::Orientation;
