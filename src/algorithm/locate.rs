//! Point location against rings, areas and arbitrary geometries.

use super::intersection::point_on_segment;
use super::orientation::orientation_index;
use crate::geom::{Geometry, Polygon};
use crate::index::StrTree;
use planar_types::{Coord, Envelope};

/// Position of a point relative to a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Row/column index in an intersection matrix.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}

/// Counts crossings of the ray from a point towards +x with ring segments.
///
/// Segments are fed one at a time; a point lying on any segment is reported
/// as [`Location::Boundary`] immediately.
#[derive(Debug, Clone, Copy)]
pub struct RayCrossingCounter {
    p: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    pub fn new(p: Coord) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    pub fn count_segment(&mut self, p1: Coord, p2: Coord) {
        let p = self.p;
        // entirely left of the point
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_segment = true;
            return;
        }
        // horizontal segment at the point's height
        if p1.y == p.y && p2.y == p.y {
            let (min, max) = if p1.x <= p2.x { (p1.x, p2.x) } else { (p2.x, p1.x) };
            if p.x >= min && p.x <= max {
                self.on_segment = true;
            }
            return;
        }
        // half-open rule: count segments that straddle the ray's line,
        // including the upper endpoint and excluding the lower one
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, p);
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossings += 1;
            }
        }
    }

    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    /// Location under the odd-even rule.
    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locate `p` relative to the area enclosed by a closed ring.
pub fn locate_in_ring<I>(p: Coord, ring: I) -> Location
where
    I: IntoIterator<Item = Coord>,
{
    let mut counter = RayCrossingCounter::new(p);
    let mut iter = ring.into_iter();
    let Some(mut prev) = iter.next() else {
        return Location::Exterior;
    };
    for c in iter {
        counter.count_segment(c, prev);
        if counter.is_on_segment() {
            return Location::Boundary;
        }
        prev = c;
    }
    counter.location()
}

/// Locate `p` relative to a polygon (shell minus holes).
pub fn locate_in_polygon(p: Coord, polygon: &Polygon) -> Location {
    if polygon.is_empty() || !polygon.envelope().contains_coord(p) {
        return Location::Exterior;
    }
    match locate_in_ring(p, polygon.exterior().coords()) {
        Location::Interior => {}
        other => return other,
    }
    for hole in polygon.interiors() {
        match locate_in_ring(p, hole.coords()) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// Locate `p` relative to the areal components of a set of polygons, using
/// the odd-even rule over all of their rings.
fn locate_in_polygons(p: Coord, polygons: &[&Polygon]) -> Location {
    let mut counter = RayCrossingCounter::new(p);
    for poly in polygons {
        if !poly.envelope().contains_coord(p) {
            continue;
        }
        for ring in poly.rings() {
            let coords: Vec<Coord> = ring.coords().collect();
            for w in coords.windows(2) {
                counter.count_segment(w[1], w[0]);
                if counter.is_on_segment() {
                    return Location::Boundary;
                }
            }
        }
    }
    counter.location()
}

/// Locate a point relative to any geometry.
///
/// Boundaries follow the OGC mod-2 rule: a line endpoint shared by an even
/// number of line ends is interior.
///
/// # Examples
///
/// ```
/// use planar::algorithm::locate::{locate, Location};
/// use planar::io::WktReader;
/// use planar_types::Coord;
///
/// let square = WktReader::new().read("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
/// assert_eq!(locate(Coord::new(1.0, 1.0), &square), Location::Interior);
/// assert_eq!(locate(Coord::new(2.0, 1.0), &square), Location::Boundary);
/// assert_eq!(locate(Coord::new(3.0, 1.0), &square), Location::Exterior);
/// ```
pub fn locate(p: Coord, geometry: &Geometry) -> Location {
    if geometry.is_empty() || !geometry.envelope().contains_coord(p) {
        return Location::Exterior;
    }
    let parts = geometry.parts();
    if parts.has_area() {
        match locate_in_polygons(p, &parts.polygons) {
            Location::Exterior => {}
            other => return other,
        }
    }
    let mut end_count = 0usize;
    let mut on_line = false;
    for seq in &parts.lines {
        let closed = seq.is_closed();
        if !closed && (seq.first() == Some(p) || seq.last() == Some(p)) {
            end_count += usize::from(seq.first() == Some(p)) + usize::from(seq.last() == Some(p));
            continue;
        }
        let coords = seq.to_coords();
        if coords.windows(2).any(|w| point_on_segment(p, w[0], w[1])) {
            on_line = true;
        }
    }
    if end_count % 2 == 1 {
        return Location::Boundary;
    }
    if on_line || end_count > 0 || parts.points.contains(&p) {
        return Location::Interior;
    }
    Location::Exterior
}

/// Point-in-area locator over a fixed set of boundary segments, indexed by
/// an [`StrTree`] so each query only touches segments near the ray.
#[derive(Debug)]
pub struct IndexedPointInAreaLocator {
    segments: StrTree<(Coord, Coord)>,
    extent: Envelope,
}

impl IndexedPointInAreaLocator {
    /// Index every ring of the polygonal components of `geometry`.
    pub fn new(geometry: &Geometry) -> Self {
        let parts = geometry.parts();
        let mut segments = Vec::new();
        for poly in &parts.polygons {
            for ring in poly.rings() {
                let coords: Vec<Coord> = ring.coords().collect();
                segments.extend(coords.windows(2).map(|w| (w[0], w[1])));
            }
        }
        Self::from_segments(segments)
    }

    /// Index an explicit list of boundary segments.
    pub fn from_segments(segments: Vec<(Coord, Coord)>) -> Self {
        let mut extent = Envelope::null();
        let entries: Vec<(Envelope, (Coord, Coord))> = segments
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| {
                let env = Envelope::of_segment(a, b);
                extent.expand_to_include(&env);
                (env, (a, b))
            })
            .collect();
        Self {
            segments: StrTree::bulk_load(entries),
            extent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn locate(&self, p: Coord) -> Location {
        if !self.extent.contains_coord(p) {
            return Location::Exterior;
        }
        let mut counter = RayCrossingCounter::new(p);
        let ray = Envelope::new(p.x, self.extent.max_x(), p.y, p.y);
        self.segments.query_visit(&ray, |&(a, b)| {
            counter.count_segment(b, a);
        });
        counter.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{LinearRing, LineString};

    fn square_with_hole() -> Polygon {
        let shell = LinearRing::from_coords([
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 10.0),
            Coord::new(0.0, 0.0),
        ])
        .unwrap();
        let hole = LinearRing::from_coords([
            Coord::new(4.0, 4.0),
            Coord::new(4.0, 6.0),
            Coord::new(6.0, 6.0),
            Coord::new(6.0, 4.0),
            Coord::new(4.0, 4.0),
        ])
        .unwrap();
        Polygon::new(shell, vec![hole]).unwrap()
    }

    #[test]
    fn test_polygon_with_hole() {
        let poly = square_with_hole();
        assert_eq!(
            locate_in_polygon(Coord::new(1.0, 1.0), &poly),
            Location::Interior
        );
        assert_eq!(
            locate_in_polygon(Coord::new(5.0, 5.0), &poly),
            Location::Exterior
        );
        assert_eq!(
            locate_in_polygon(Coord::new(4.0, 5.0), &poly),
            Location::Boundary
        );
        assert_eq!(
            locate_in_polygon(Coord::new(0.0, 0.0), &poly),
            Location::Boundary
        );
        // ray passes exactly through vertices
        assert_eq!(
            locate_in_polygon(Coord::new(2.0, 4.0), &poly),
            Location::Interior
        );
    }

    #[test]
    fn test_indexed_locator_agrees() {
        let poly = square_with_hole();
        let g = Geometry::Polygon(poly.clone());
        let locator = IndexedPointInAreaLocator::new(&g);
        for x in 0..=22 {
            for y in 0..=22 {
                let p = Coord::new(x as f64 * 0.5 - 0.5, y as f64 * 0.5 - 0.5);
                assert_eq!(locator.locate(p), locate_in_polygon(p, &poly), "at {:?}", p);
            }
        }
    }

    #[test]
    fn test_line_boundary_mod2() {
        let a = LineString::from_coords([Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]).unwrap();
        let b = LineString::from_coords([Coord::new(1.0, 0.0), Coord::new(2.0, 0.0)]).unwrap();
        let g = Geometry::MultiLineString(crate::geom::MultiLineString::new(vec![a, b]));
        assert_eq!(locate(Coord::new(1.0, 0.0), &g), Location::Interior);
        assert_eq!(locate(Coord::new(0.0, 0.0), &g), Location::Boundary);
        assert_eq!(locate(Coord::new(0.5, 0.0), &g), Location::Interior);
        assert_eq!(locate(Coord::new(0.5, 1.0), &g), Location::Exterior);
    }
}
