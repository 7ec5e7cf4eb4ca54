//! # planar-types
//!
//! Core value types for the planar geometry engine.
//!
//! This crate provides the building blocks every geometry is made of:
//!
//! - **Coordinates**: [`Coord`] (planar x/y used by the algorithms) and
//!   [`Coordinate`] (x/y with optional Z and M ordinates)
//! - **Dimensions**: [`Dimension`], the explicit XY / XYZ / XYM / XYZM tag
//!   carried by every coordinate sequence
//! - **Sequences**: [`CoordinateSequence`], flat ordinate storage with a fixed
//!   dimension
//! - **Envelopes**: [`Envelope`], axis-aligned bounding boxes
//!
//! All types are serializable with Serde and convert to and from the `geo`
//! crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use planar_types::{Coordinate, CoordinateSequence, Dimension, Envelope};
//!
//! let seq = CoordinateSequence::try_from_coordinates(&[
//!     Coordinate::xyz(0.0, 0.0, 5.0),
//!     Coordinate::xyz(10.0, 4.0, 7.0),
//! ])
//! .unwrap();
//! assert_eq!(seq.dimension(), Dimension::Xyz);
//! assert_eq!(seq.envelope(), Envelope::new(0.0, 10.0, 0.0, 4.0));
//! ```

pub mod coordinate;
pub mod dimension;
pub mod envelope;
pub mod sequence;

pub use coordinate::{Coord, Coordinate};
pub use dimension::{Dimension, Ordinate};
pub use envelope::Envelope;
pub use sequence::{CoordinateSequence, DimensionMismatch};
