//! The intersects test, evaluated directly on segments and points.
//!
//! Both [`crate::prepared::PreparedGeometry`] and the plain `intersects`
//! predicate go through [`FacetIndex`], so the two can never disagree.

use crate::algorithm::intersection::{point_on_segment, segments_intersect};
use crate::algorithm::locate::{IndexedPointInAreaLocator, Location, locate};
use crate::geom::Geometry;
use crate::index::StrTree;
use planar_types::{Coord, Envelope};

/// Indexed segments, points and area of one geometry.
#[derive(Debug)]
pub(crate) struct FacetIndex {
    envelope: Envelope,
    segments: StrTree<(Coord, Coord)>,
    points: Vec<Coord>,
    /// First coordinate of every line and polygon component.
    representatives: Vec<Coord>,
    area: Option<IndexedPointInAreaLocator>,
}

/// Segments, isolated points and representative coordinates of a geometry.
fn facets(geometry: &Geometry) -> (Vec<(Coord, Coord)>, Vec<Coord>, Vec<Coord>) {
    let parts = geometry.parts();
    let mut segments = Vec::new();
    let mut points = parts.points.clone();
    let mut representatives = Vec::new();
    let mut push_path = |coords: Vec<Coord>, points: &mut Vec<Coord>, reps: &mut Vec<Coord>| {
        if let Some(&first) = coords.first() {
            reps.push(first);
        }
        if coords.len() == 1 {
            points.push(coords[0]);
        }
        segments.extend(coords.windows(2).filter(|w| w[0] != w[1]).map(|w| (w[0], w[1])));
    };
    for seq in &parts.lines {
        push_path(seq.to_coords(), &mut points, &mut representatives);
    }
    for poly in &parts.polygons {
        for ring in poly.rings() {
            push_path(ring.coords().collect(), &mut points, &mut representatives);
        }
    }
    (segments, points, representatives)
}

impl FacetIndex {
    pub fn new(geometry: &Geometry) -> Self {
        let (segments, points, representatives) = facets(geometry);
        let area = geometry
            .parts()
            .has_area()
            .then(|| IndexedPointInAreaLocator::new(geometry));
        Self {
            envelope: geometry.envelope(),
            segments: StrTree::bulk_load(
                segments
                    .into_iter()
                    .map(|(a, b)| (Envelope::of_segment(a, b), (a, b)))
                    .collect(),
            ),
            points,
            representatives,
            area,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn area_locator(&self) -> Option<&IndexedPointInAreaLocator> {
        self.area.as_ref()
    }

    /// Location of `p` in the indexed geometry.
    pub fn locate(&self, p: Coord) -> Location {
        if !self.envelope.contains_coord(p) {
            return Location::Exterior;
        }
        if let Some(area) = &self.area {
            let loc = area.locate(p);
            if loc != Location::Exterior {
                return loc;
            }
        }
        let probe = Envelope::of_coord(p);
        let mut on_linework = false;
        self.segments.query_visit(&probe, |&(a, b)| {
            on_linework |= point_on_segment(p, a, b);
        });
        if on_linework || self.points.contains(&p) {
            // not distinguishing line boundary from interior here
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn covers_point(&self, p: Coord) -> bool {
        self.locate(p) != Location::Exterior
    }

    /// True when `other` shares at least one point with the indexed geometry.
    pub fn intersects(&self, other: &Geometry) -> bool {
        if other.is_empty() || !self.envelope.intersects(&other.envelope()) {
            return false;
        }
        let (segments, points, representatives) = facets(other);

        if points.iter().any(|&p| self.covers_point(p)) {
            return true;
        }
        for &(a, b) in &segments {
            let env = Envelope::of_segment(a, b);
            if !env.intersects(&self.envelope) {
                continue;
            }
            let mut hit = false;
            self.segments.query_visit(&env, |&(c, d)| {
                hit = hit || segments_intersect(a, b, c, d);
            });
            if hit || self.points.iter().any(|&p| point_on_segment(p, a, b)) {
                return true;
            }
        }
        // no boundary contact: one may lie inside the other's area
        if self.area.is_some() && representatives.iter().any(|&p| self.covers_point(p)) {
            return true;
        }
        if other.parts().has_area() {
            return self
                .points
                .iter()
                .chain(self.representatives.iter())
                .any(|&p| locate(p, other) != Location::Exterior);
        }
        false
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
    fn test_nested_polygons_intersect() {
        let outer = FacetIndex::new(&read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))"));
        assert!(outer.intersects(&read("POLYGON ((4 4, 6 4, 6 6, 4 6, 4 4))")));
        let inner = FacetIndex::new(&read("POLYGON ((4 4, 6 4, 6 6, 4 6, 4 4))"));
        assert!(inner.intersects(&read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")));
    }

    #[test]
    fn test_polygon_hole_excludes() {
        let donut = FacetIndex::new(&read(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 8 2, 8 8, 2 8, 2 2))",
        ));
        assert!(!donut.intersects(&read("POINT (5 5)")));
        assert!(!donut.intersects(&read("LINESTRING (4 4, 6 6)")));
        assert!(donut.intersects(&read("POINT (1 1)")));
        assert!(donut.intersects(&read("POINT (2 5)")));
    }

    #[test]
    fn test_lines_and_points() {
        let line = FacetIndex::new(&read("LINESTRING (0 0, 10 10)"));
        assert!(line.intersects(&read("LINESTRING (0 10, 10 0)")));
        assert!(line.intersects(&read("POINT (5 5)")));
        assert!(!line.intersects(&read("POINT (5 6)")));
        assert!(!line.intersects(&read("LINESTRING (0 1, 9 10)")));
        let point = FacetIndex::new(&read("POINT (5 5)"));
        assert!(point.intersects(&read("LINESTRING (0 0, 10 10)")));
        assert!(point.intersects(&read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")));
    }
}
