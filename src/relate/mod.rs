//! Spatial relationships: the DE-9IM matrix and the named predicates.
//!
//! [`relate`] builds the same topology graph the overlay uses and reads the
//! matrix off it: every edge contributes its on-locations at dimension 1,
//! every edge side its area locations at dimension 2 and every node its
//! locations at dimension 0.
//!
//! # Examples
//!
//! ```
//! use planar::io::WktReader;
//! use planar::relate::{contains, covers, relate, touches};
//!
//! let reader = WktReader::new();
//! let square = reader.read("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
//! let inside = reader.read("POINT (0.5 0.5)").unwrap();
//! let on_edge = reader.read("POINT (1 0.5)").unwrap();
//!
//! assert!(contains(&square, &inside).unwrap());
//! assert!(!contains(&square, &on_edge).unwrap());
//! assert!(covers(&square, &on_edge).unwrap());
//! assert!(touches(&square, &on_edge).unwrap());
//! assert_eq!(relate(&square, &inside).unwrap().to_string(), "0F2FF1FF2");
//! ```

pub(crate) mod intersects;
mod matrix;

pub use matrix::IntersectionMatrix;

use crate::algorithm::locate::Location;
use crate::config::Config;
use crate::error::Result;
use crate::geom::{Dim, Geometry};
use crate::overlay::check_complexity;
use crate::overlay::graph::{GraphInput, TopologyGraph};
use crate::overlay::noding::Noder;
use intersects::FacetIndex;

/// Matrix of two geometries that share no point.
fn disjoint_matrix(a: &Geometry, b: &Geometry) -> IntersectionMatrix {
    let mut im = IntersectionMatrix::new();
    if !a.is_empty() {
        im.set(Location::Interior, Location::Exterior, a.dimension());
        im.set(
            Location::Boundary,
            Location::Exterior,
            a.boundary_dimension(),
        );
    }
    if !b.is_empty() {
        im.set(Location::Exterior, Location::Interior, b.dimension());
        im.set(
            Location::Exterior,
            Location::Boundary,
            b.boundary_dimension(),
        );
    }
    im.set(Location::Exterior, Location::Exterior, Dim::Two);
    im
}

/// DE-9IM matrix of `a` and `b` with the default [`Config`].
pub fn relate(a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix> {
    relate_with_config(a, b, &Config::default())
}

/// DE-9IM matrix of `a` and `b`.
///
/// # Errors
///
/// `ComplexityLimit` when the inputs together exceed
/// [`Config::max_coordinates`], `Topology` when noding does not converge.
pub fn relate_with_config(
    a: &Geometry,
    b: &Geometry,
    config: &Config,
) -> Result<IntersectionMatrix> {
    check_complexity(a.num_points() + b.num_points(), config)?;
    if a.is_empty() || b.is_empty() || !a.envelope().intersects(&b.envelope()) {
        return Ok(disjoint_matrix(a, b));
    }

    let mut input = GraphInput::new();
    input.add(a, 0);
    input.add(b, 1);
    let noder = Noder::new(
        input.scaled_tolerance(config.snap_tolerance),
        config.max_noding_iterations,
    );
    let graph = TopologyGraph::build(input, &noder, false)?;

    let mut im = IntersectionMatrix::new();
    im.set(Location::Exterior, Location::Exterior, Dim::Two);
    for e in &graph.edges {
        im.set_at_least(e.on[0], e.on[1], Dim::One);
        im.set_at_least(e.left[0], e.left[1], Dim::Two);
        im.set_at_least(e.right[0], e.right[1], Dim::Two);
    }
    for n in &graph.nodes {
        im.set_at_least(n.loc[0], n.loc[1], Dim::Zero);
    }
    Ok(im)
}

/// Test the relation of `a` and `b` against a DE-9IM pattern.
pub fn relate_pattern(a: &Geometry, b: &Geometry, pattern: &str) -> Result<bool> {
    relate(a, b)?.matches(pattern)
}

/// Every point of `b` lies in `a` and the interiors meet.
pub fn contains(a: &Geometry, b: &Geometry) -> Result<bool> {
    if b.is_empty() || !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_contains())
}

pub fn within(a: &Geometry, b: &Geometry) -> Result<bool> {
    contains(b, a)
}

/// Every point of `b` lies in `a`.
pub fn covers(a: &Geometry, b: &Geometry) -> Result<bool> {
    if b.is_empty() || !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_covers())
}

pub fn covered_by(a: &Geometry, b: &Geometry) -> Result<bool> {
    covers(b, a)
}

/// `b` lies in the interior of `a`, away from its boundary.
pub fn contains_properly(a: &Geometry, b: &Geometry) -> Result<bool> {
    if b.is_empty() || !a.envelope().contains(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_contains_properly())
}

pub fn touches(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_touches(a.dimension(), b.dimension()))
}

pub fn crosses(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_crosses(a.dimension(), b.dimension()))
}

pub fn overlaps(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_overlaps(a.dimension(), b.dimension()))
}

/// Shared-point test on segments and points, without building a matrix.
pub fn intersects(a: &Geometry, b: &Geometry) -> Result<bool> {
    if a.is_empty() || b.is_empty() || !a.envelope().intersects(&b.envelope()) {
        return Ok(false);
    }
    Ok(FacetIndex::new(a).intersects(b))
}

pub fn disjoint(a: &Geometry, b: &Geometry) -> Result<bool> {
    intersects(a, b).map(|hit| !hit)
}

/// Topological equality: same point set, regardless of vertex order or
/// repeated vertices. Two empty geometries are equal.
pub fn equals_topo(a: &Geometry, b: &Geometry) -> Result<bool> {
    if a.is_empty() && b.is_empty() {
        return Ok(true);
    }
    if a.is_empty() != b.is_empty() || a.envelope() != b.envelope() {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_equals(a.dimension(), b.dimension()))
}
