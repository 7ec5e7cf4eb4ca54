//! Prepared geometries for repeated predicate evaluation.
//!
//! A [`PreparedGeometry`] borrows a geometry and precomputes a segment index,
//! an indexed point-in-area locator and an interior point. Predicates against
//! points and envelope-rejected inputs are answered from those structures;
//! everything else falls through to [`crate::relate`], so results always
//! agree with the unprepared predicates.
//!
//! # Examples
//!
//! ```
//! use planar::io::WktReader;
//! use planar::prepared::PreparedGeometryFactory;
//!
//! let reader = WktReader::new();
//! let square = reader.read("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
//! let prepared = PreparedGeometryFactory::prepare(&square);
//!
//! let boundary_point = reader.read("POINT (1 0.5)").unwrap();
//! assert!(!prepared.contains_properly(&boundary_point).unwrap());
//! assert!(prepared.covers(&boundary_point).unwrap());
//! assert!(prepared.intersects(&boundary_point).unwrap());
//! ```

use crate::algorithm::interior_point::interior_point_coord;
use crate::algorithm::locate::Location;
use crate::error::Result;
use crate::geom::{Dim, Geometry};
use crate::relate::intersects::FacetIndex;
use crate::relate::{self, IntersectionMatrix};
use planar_types::Coord;

/// A geometry with precomputed acceleration structures. The borrow ties the
/// prepared form to the geometry it was built from.
#[derive(Debug)]
pub struct PreparedGeometry<'a> {
    geometry: &'a Geometry,
    index: FacetIndex,
    interior_point: Option<Coord>,
}

/// Creates [`PreparedGeometry`] instances.
pub struct PreparedGeometryFactory;

impl PreparedGeometryFactory {
    pub fn prepare(geometry: &Geometry) -> PreparedGeometry<'_> {
        PreparedGeometry::new(geometry)
    }
}

/// Points of `g` when it is puntal and non-empty.
fn puntal_points(g: &Geometry) -> Option<Vec<Coord>> {
    match g {
        Geometry::Point(_) | Geometry::MultiPoint(_) if !g.is_empty() => Some(g.coords()),
        _ => None,
    }
}

impl<'a> PreparedGeometry<'a> {
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            index: FacetIndex::new(geometry),
            interior_point: interior_point_coord(geometry),
        }
    }

    pub fn geometry(&self) -> &'a Geometry {
        self.geometry
    }

    /// A point known to lie in the interior of the geometry, if it has one.
    pub fn interior_point(&self) -> Option<Coord> {
        self.interior_point
    }

    fn is_area(&self) -> bool {
        self.geometry.dimension() == Dim::Two && self.index.area_locator().is_some()
    }

    fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix> {
        relate::relate(self.geometry, other)
    }

    fn envelope_covers(&self, other: &Geometry) -> bool {
        !other.is_empty() && self.index.envelope().contains(&other.envelope())
    }

    /// Locations of `points` in this area, or `None` when the fast path does
    /// not apply.
    fn point_locations(&self, other: &Geometry) -> Option<Vec<Location>> {
        if !self.is_area() {
            return None;
        }
        let points = puntal_points(other)?;
        let locator = self.index.area_locator()?;
        Some(points.into_iter().map(|p| locator.locate(p)).collect())
    }

    pub fn intersects(&self, other: &Geometry) -> Result<bool> {
        if self.geometry.is_empty() || other.is_empty() {
            return Ok(false);
        }
        Ok(self.index.intersects(other))
    }

    pub fn disjoint(&self, other: &Geometry) -> Result<bool> {
        self.intersects(other).map(|hit| !hit)
    }

    pub fn contains(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope_covers(other) {
            return Ok(false);
        }
        if let Some(locs) = self.point_locations(other) {
            // every point in the closure, at least one in the interior
            return Ok(locs.iter().all(|l| *l != Location::Exterior)
                && locs.contains(&Location::Interior));
        }
        Ok(self.relate(other)?.is_contains())
    }

    pub fn contains_properly(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope_covers(other) {
            return Ok(false);
        }
        if let Some(locs) = self.point_locations(other) {
            return Ok(locs.iter().all(|l| *l == Location::Interior));
        }
        Ok(self.relate(other)?.is_contains_properly())
    }

    pub fn covers(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope_covers(other) {
            return Ok(false);
        }
        if let Some(locs) = self.point_locations(other) {
            return Ok(locs.iter().all(|l| *l != Location::Exterior));
        }
        Ok(self.relate(other)?.is_covers())
    }

    pub fn covered_by(&self, other: &Geometry) -> Result<bool> {
        if self.geometry.is_empty() || !other.envelope().contains(self.index.envelope()) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_covered_by())
    }

    pub fn within(&self, other: &Geometry) -> Result<bool> {
        if self.geometry.is_empty() || !other.envelope().contains(self.index.envelope()) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_within())
    }

    pub fn crosses(&self, other: &Geometry) -> Result<bool> {
        if !self.intersects(other)? {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_crosses(self.geometry.dimension(), other.dimension()))
    }

    pub fn overlaps(&self, other: &Geometry) -> Result<bool> {
        if !self.intersects(other)? {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_overlaps(self.geometry.dimension(), other.dimension()))
    }

    pub fn touches(&self, other: &Geometry) -> Result<bool> {
        if !self.intersects(other)? {
            return Ok(false);
        }
        if let Some(locs) = self.point_locations(other) {
            return Ok(!locs.contains(&Location::Interior));
        }
        Ok(self
            .relate(other)?
            .is_touches(self.geometry.dimension(), other.dimension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_point_fast_paths_match_relate() {
        let square = read("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))");
        let prepared = PreparedGeometry::new(&square);
        for wkt in [
            "POINT (2 2)",
            "POINT (4 2)",
            "POINT (5 5)",
            "MULTIPOINT ((1 1), (4 4))",
            "MULTIPOINT ((1 1), (9 9))",
        ] {
            let p = read(wkt);
            assert_eq!(
                prepared.contains(&p).unwrap(),
                relate::contains(&square, &p).unwrap(),
                "{wkt}"
            );
            assert_eq!(
                prepared.covers(&p).unwrap(),
                relate::covers(&square, &p).unwrap(),
                "{wkt}"
            );
            assert_eq!(
                prepared.contains_properly(&p).unwrap(),
                relate::contains_properly(&square, &p).unwrap(),
                "{wkt}"
            );
            assert_eq!(
                prepared.touches(&p).unwrap(),
                relate::touches(&square, &p).unwrap(),
                "{wkt}"
            );
            assert_eq!(
                prepared.intersects(&p).unwrap(),
                relate::intersects(&square, &p).unwrap(),
                "{wkt}"
            );
        }
    }

    #[test]
    fn test_general_predicates_delegate() {
        let square = read("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))");
        let prepared = PreparedGeometryFactory::prepare(&square);
        let line = read("LINESTRING (-1 2, 5 2)");
        let inner = read("POLYGON ((1 1, 2 1, 2 2, 1 2, 1 1))");
        let overlapping = read("POLYGON ((3 3, 5 3, 5 5, 3 5, 3 3))");
        assert!(prepared.crosses(&line).unwrap());
        assert!(prepared.contains(&inner).unwrap());
        assert!(prepared.contains_properly(&inner).unwrap());
        assert!(prepared.overlaps(&overlapping).unwrap());
        assert!(!prepared.within(&inner).unwrap());
        assert!(PreparedGeometry::new(&inner).within(&square).unwrap());
        assert!(PreparedGeometry::new(&inner).covered_by(&square).unwrap());
        assert!(prepared.disjoint(&read("POINT (10 10)")).unwrap());
    }

    #[test]
    fn test_interior_point_is_inside() {
        let square = read("POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))");
        let prepared = PreparedGeometry::new(&square);
        let p = prepared.interior_point().unwrap();
        assert!(p.x > 0.0 && p.x < 4.0 && p.y > 0.0 && p.y < 4.0);
    }
}
