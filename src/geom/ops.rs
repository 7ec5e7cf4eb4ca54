//! Operation methods on [`Geometry`].
//!
//! Thin wrappers over the free functions in [`crate::algorithm`],
//! [`crate::relate`], [`crate::overlay`] and [`crate::buffer`], run with
//! [`Config::default`]. Use [`crate::factory::GeometryFactory`] to run them
//! against another configuration.

use super::{Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, Point, Polygon};
use crate::algorithm::{
    centroid, distance, hull, interior_point, measure, minimum, simplify, validity,
};
use crate::buffer::{self, BufferParameters};
use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::overlay;
use crate::relate::{self, IntersectionMatrix};
use planar_types::{Coord, Dimension};
use rustc_hash::FxHashMap;

impl Geometry {
    /// Area of the polygonal components.
    pub fn area(&self) -> f64 {
        measure::area(self)
    }

    /// Length of the linear components and polygon rings.
    pub fn length(&self) -> f64 {
        measure::length(self)
    }

    /// Minimum distance to `other`; 0 when either is empty.
    pub fn distance(&self, other: &Geometry) -> f64 {
        distance::distance(self, other)
    }

    /// Closest pair of points, the first on `self`.
    pub fn nearest_points(&self, other: &Geometry) -> Option<(Coord, Coord)> {
        distance::nearest_points(self, other)
    }

    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix> {
        relate::relate(self, other)
    }

    pub fn relate_pattern(&self, other: &Geometry, pattern: &str) -> Result<bool> {
        relate::relate_pattern(self, other, pattern)
    }

    pub fn contains(&self, other: &Geometry) -> Result<bool> {
        relate::contains(self, other)
    }

    pub fn within(&self, other: &Geometry) -> Result<bool> {
        relate::within(self, other)
    }

    pub fn covers(&self, other: &Geometry) -> Result<bool> {
        relate::covers(self, other)
    }

    pub fn covered_by(&self, other: &Geometry) -> Result<bool> {
        relate::covered_by(self, other)
    }

    pub fn contains_properly(&self, other: &Geometry) -> Result<bool> {
        relate::contains_properly(self, other)
    }

    pub fn touches(&self, other: &Geometry) -> Result<bool> {
        relate::touches(self, other)
    }

    pub fn crosses(&self, other: &Geometry) -> Result<bool> {
        relate::crosses(self, other)
    }

    pub fn overlaps(&self, other: &Geometry) -> Result<bool> {
        relate::overlaps(self, other)
    }

    pub fn intersects(&self, other: &Geometry) -> Result<bool> {
        relate::intersects(self, other)
    }

    pub fn disjoint(&self, other: &Geometry) -> Result<bool> {
        relate::disjoint(self, other)
    }

    /// Same point set; see [`relate::equals_topo`].
    pub fn equals_topo(&self, other: &Geometry) -> Result<bool> {
        relate::equals_topo(self, other)
    }

    pub fn union(&self, other: &Geometry) -> Result<Geometry> {
        overlay::union(self, other, &Config::default())
    }

    pub fn intersection(&self, other: &Geometry) -> Result<Geometry> {
        overlay::intersection(self, other, &Config::default())
    }

    pub fn difference(&self, other: &Geometry) -> Result<Geometry> {
        overlay::difference(self, other, &Config::default())
    }

    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry> {
        overlay::sym_difference(self, other, &Config::default())
    }

    pub fn unary_union(&self) -> Result<Geometry> {
        overlay::unary_union(self, &Config::default())
    }

    /// Buffer with round caps and joins.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar::io::WktReader;
    ///
    /// let p = WktReader::new().read("POINT (0 0)").unwrap();
    /// let disc = p.buffer(1.0).unwrap();
    /// assert!((disc.area() - std::f64::consts::PI).abs() < 0.03);
    /// ```
    pub fn buffer(&self, distance: f64) -> Result<Geometry> {
        self.buffer_with_params(distance, &BufferParameters::default())
    }

    pub fn buffer_with_params(&self, distance: f64, params: &BufferParameters) -> Result<Geometry> {
        buffer::buffer(self, distance, params, &Config::default())
    }

    /// Offset line on the right-hand side for positive distances.
    pub fn offset_curve(&self, distance: f64) -> Result<Geometry> {
        buffer::offset_curve(self, distance, &BufferParameters::default())
    }

    pub fn convex_hull(&self) -> Geometry {
        hull::convex_hull(self)
    }

    /// Douglas-Peucker simplification.
    pub fn simplify(&self, tolerance: f64) -> Result<Geometry> {
        simplify::simplify(self, tolerance, &Config::default())
    }

    pub fn centroid(&self) -> Geometry {
        centroid::centroid(self)
    }

    pub fn interior_point(&self) -> Geometry {
        interior_point::interior_point(self)
    }

    /// Canonical form; see [`super::normalize`].
    pub fn normalize(&self) -> Geometry {
        super::normalize::normalize(self)
    }

    pub fn is_valid(&self) -> bool {
        validity::is_valid(self)
    }

    pub fn is_simple(&self) -> bool {
        validity::is_simple(self)
    }

    /// Why the geometry is invalid, or `None`.
    pub fn validation_error(&self) -> Option<String> {
        validity::validation_error(self)
    }

    /// Polygon approximating the smallest enclosing circle. A single point
    /// gives that point; empty input gives an empty polygon.
    pub fn minimum_bounding_circle(&self) -> Geometry {
        match minimum::minimum_bounding_circle(self) {
            Some(circle) => circle.to_geometry(Config::default().buffer.quadrant_segments),
            None => Geometry::Polygon(Polygon::empty(Dimension::Xy)),
        }
    }

    /// Segment spanning the minimum width of the geometry.
    pub fn minimum_diameter(&self) -> Geometry {
        minimum::minimum_diameter(self)
    }

    /// Smallest-area rectangle, in any orientation, enclosing the geometry.
    pub fn minimum_area_rectangle(&self) -> Geometry {
        minimum::minimum_area_rectangle(self)
    }

    /// Topological boundary.
    ///
    /// Lines give their endpoints under the mod-2 rule, areas their rings,
    /// points an empty collection.
    ///
    /// # Errors
    ///
    /// `Type` for a GeometryCollection, whose boundary is undefined.
    pub fn boundary(&self) -> Result<Geometry> {
        let empty_points = || Geometry::MultiPoint(MultiPoint::new(Vec::new()));
        Ok(match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {
                Geometry::GeometryCollection(GeometryCollection::new(Vec::new()))
            }
            Geometry::LinearRing(_) => empty_points(),
            Geometry::LineString(l) => {
                if l.is_empty() || l.is_closed() {
                    empty_points()
                } else {
                    line_boundary(std::slice::from_ref(l))
                }
            }
            Geometry::MultiLineString(m) => line_boundary(m.lines()),
            Geometry::Polygon(p) => {
                if p.is_empty() {
                    Geometry::MultiLineString(MultiLineString::new(Vec::new()))
                } else if p.num_interior_rings() == 0 {
                    Geometry::LinearRing(p.exterior().clone())
                } else {
                    Geometry::MultiLineString(MultiLineString::new(
                        p.rings().map(|r| r.to_line_string()).collect(),
                    ))
                }
            }
            Geometry::MultiPolygon(m) => Geometry::MultiLineString(MultiLineString::new(
                m.polygons()
                    .iter()
                    .flat_map(|p| p.rings())
                    .filter(|r| !r.is_empty())
                    .map(|r| r.to_line_string())
                    .collect(),
            )),
            Geometry::GeometryCollection(_) => {
                return Err(GeometryError::Type {
                    expected: "a non-collection geometry",
                    found: "GeometryCollection",
                });
            }
        })
    }
}

/// Endpoints that occur an odd number of times, in first-seen order.
fn line_boundary(lines: &[LineString]) -> Geometry {
    let mut counts: FxHashMap<(u64, u64), (usize, usize, Point)> = FxHashMap::default();
    let mut order = 0;
    for line in lines.iter().filter(|l| !l.is_empty() && !l.is_closed()) {
        for index in [0, line.num_points() - 1] {
            if let Ok(point) = line.point_n(index) {
                let key = point.coord().map(Coord::key).unwrap_or_default();
                let entry = counts.entry(key).or_insert_with(|| {
                    order += 1;
                    (order, 0, point)
                });
                entry.1 += 1;
            }
        }
    }
    let mut odd: Vec<(usize, Point)> = counts
        .into_values()
        .filter(|(_, n, _)| n % 2 == 1)
        .map(|(seen, _, p)| (seen, p))
        .collect();
    odd.sort_by_key(|(seen, _)| *seen);
    Geometry::MultiPoint(MultiPoint::new(odd.into_iter().map(|(_, p)| p).collect()))
}
