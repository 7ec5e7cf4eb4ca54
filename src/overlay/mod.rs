//! Boolean set operations.
//!
//! Every operation runs the same pipeline: the linework of both operands is
//! noded, the noded arrangement becomes a [`graph::TopologyGraph`] whose edges
//! and nodes are labeled with their location in each operand, and the edges
//! and nodes satisfying the operation are assembled into the result.
//!
//! # Examples
//!
//! ```
//! use planar::io::WktReader;
//! use planar::overlay::{intersection, union};
//! use planar::Config;
//!
//! let reader = WktReader::new();
//! let a = reader.read("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
//! let b = reader.read("POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1))").unwrap();
//!
//! let config = Config::default();
//! assert_eq!(intersection(&a, &b, &config).unwrap().area(), 1.0);
//! assert_eq!(union(&a, &b, &config).unwrap().area(), 7.0);
//! ```

mod cascaded;
mod extract;
pub(crate) mod graph;
pub(crate) mod noding;

pub use cascaded::CascadedPolygonUnion;

use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::geom::{Dim, Geometry, GeometryCollection};
use graph::{GraphInput, TopologyGraph};
use noding::Noder;
use serde::{Deserialize, Serialize};

/// The four boolean set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayOp {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

impl OverlayOp {
    /// Whether a point in `a` (or not) and in `b` (or not) is in the result.
    #[inline]
    pub(crate) fn is_in(self, in_a: bool, in_b: bool) -> bool {
        match self {
            OverlayOp::Intersection => in_a && in_b,
            OverlayOp::Union => in_a || in_b,
            OverlayOp::Difference => in_a && !in_b,
            OverlayOp::SymDifference => in_a != in_b,
        }
    }

    /// Dimension of the empty geometry returned when nothing survives.
    fn empty_dimension(self, a: Dim, b: Dim) -> Dim {
        match self {
            OverlayOp::Intersection => a.min(b),
            OverlayOp::Union | OverlayOp::SymDifference => a.max(b),
            OverlayOp::Difference => a,
        }
    }
}

pub(crate) fn check_complexity(count: usize, config: &Config) -> Result<()> {
    if count > config.max_coordinates {
        log::warn!(
            "Rejecting input with {} coordinates (limit {})",
            count,
            config.max_coordinates
        );
        return Err(GeometryError::ComplexityLimit {
            count,
            limit: config.max_coordinates,
        });
    }
    Ok(())
}

/// Node, label and extract without any shortcut.
pub(crate) fn overlay_graph(
    a: &Geometry,
    b: &Geometry,
    op: OverlayOp,
    config: &Config,
    empty_dim: Dim,
) -> Result<Geometry> {
    let mut input = GraphInput::new();
    input.add(a, 0);
    input.add(b, 1);
    let noder = Noder::new(
        input.scaled_tolerance(config.snap_tolerance),
        config.max_noding_iterations,
    );
    let graph = TopologyGraph::build(input, &noder, true)?;
    let out = extract::extract(&graph, op)?;
    Ok(Geometry::from_parts(
        out.polygons,
        out.lines,
        out.points,
        empty_dim,
    ))
}

/// Apply `op` to two geometries.
///
/// # Errors
///
/// `ComplexityLimit` when the inputs together exceed
/// [`Config::max_coordinates`]; `Topology` when the inputs cannot be noded
/// or are self-intersecting areas.
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOp, config: &Config) -> Result<Geometry> {
    check_complexity(a.num_points() + b.num_points(), config)?;
    let empty_dim = op.empty_dimension(a.dimension(), b.dimension());
    let empty_result = match op {
        OverlayOp::Intersection => {
            a.is_empty() || b.is_empty() || !a.envelope().intersects(&b.envelope())
        }
        OverlayOp::Difference => a.is_empty(),
        OverlayOp::Union | OverlayOp::SymDifference => a.is_empty() && b.is_empty(),
    };
    if empty_result {
        return Ok(Geometry::empty_of_dimension(empty_dim));
    }
    overlay_graph(a, b, op, config, empty_dim)
}

pub fn union(a: &Geometry, b: &Geometry, config: &Config) -> Result<Geometry> {
    overlay(a, b, OverlayOp::Union, config)
}

pub fn intersection(a: &Geometry, b: &Geometry, config: &Config) -> Result<Geometry> {
    overlay(a, b, OverlayOp::Intersection, config)
}

pub fn difference(a: &Geometry, b: &Geometry, config: &Config) -> Result<Geometry> {
    overlay(a, b, OverlayOp::Difference, config)
}

pub fn sym_difference(a: &Geometry, b: &Geometry, config: &Config) -> Result<Geometry> {
    overlay(a, b, OverlayOp::SymDifference, config)
}

/// Union of all components of a single geometry.
///
/// Polygons go through [`CascadedPolygonUnion`]; lines and points are noded
/// and merged against each other; the two results are then unioned, so
/// linework inside the area disappears.
pub fn unary_union(geometry: &Geometry, config: &Config) -> Result<Geometry> {
    check_complexity(geometry.num_points(), config)?;
    if geometry.is_empty() {
        return Ok(Geometry::empty_of_dimension(geometry.dimension()));
    }
    let parts = geometry.parts();
    let polygons: Vec<_> = parts.polygons.iter().map(|p| (*p).clone()).collect();
    let area = if polygons.is_empty() {
        None
    } else {
        Some(CascadedPolygonUnion::union_with_config(&polygons, config)?)
    };

    let mut linework: Vec<Geometry> = Vec::new();
    linework.extend(parts.lines.iter().map(|seq| {
        Geometry::LineString(crate::geom::LineString::from_sequence_unchecked((*seq).clone()))
    }));
    linework.extend(
        parts
            .points
            .iter()
            .map(|c| Geometry::Point(crate::geom::Point::from_coord_unchecked(*c))),
    );
    let linework = if linework.is_empty() {
        None
    } else {
        let gc = Geometry::GeometryCollection(GeometryCollection::new(linework));
        let dim = gc.dimension();
        Some(overlay_graph(
            &gc,
            &Geometry::empty_of_dimension(Dim::False),
            OverlayOp::Union,
            config,
            dim,
        )?)
    };

    match (area, linework) {
        (Some(area), Some(lines)) => {
            overlay_graph(&area, &lines, OverlayOp::Union, config, Dim::Two)
        }
        (Some(area), None) => Ok(area),
        (None, Some(lines)) => Ok(lines),
        (None, None) => Ok(Geometry::empty_of_dimension(geometry.dimension())),
    }
}
