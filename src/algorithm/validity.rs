//! OGC validity and simplicity checks.

use super::intersection::{LineIntersection, intersect_segments};
use super::locate::{Location, locate_in_polygon, locate_in_ring};
use crate::geom::{Geometry, LinearRing, Polygon};
use crate::index::StrTree;
use planar_types::{Coord, CoordinateSequence, Envelope};
use rustc_hash::FxHashSet;

/// First reason a geometry is invalid, or `None` when it is valid.
///
/// # Examples
///
/// ```
/// use planar::algorithm::validity::validation_error;
/// use planar::io::WktReader;
///
/// let bowtie = WktReader::new().read("POLYGON ((0 0, 2 2, 2 0, 0 2, 0 0))").unwrap();
/// assert!(validation_error(&bowtie).unwrap().contains("Self-intersection"));
/// ```
pub fn validation_error(geometry: &Geometry) -> Option<String> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => None,
        Geometry::LineString(l) => check_line(l.sequence()),
        Geometry::LinearRing(r) => check_ring(r),
        Geometry::MultiLineString(m) => m.lines().iter().find_map(|l| check_line(l.sequence())),
        Geometry::Polygon(p) => check_polygon(p),
        Geometry::MultiPolygon(m) => {
            for p in m.polygons() {
                if let Some(err) = check_polygon(p) {
                    return Some(err);
                }
            }
            check_polygon_set(&m.polygons().iter().collect::<Vec<_>>())
        }
        Geometry::GeometryCollection(gc) => gc.geometries().iter().find_map(validation_error),
    }
}

pub fn is_valid(geometry: &Geometry) -> bool {
    validation_error(geometry).is_none()
}

const TOO_FEW_POINTS: &str = "Too few distinct points in geometry component";

fn check_line(seq: &CoordinateSequence) -> Option<String> {
    if seq.count_distinct() >= 2 {
        return None;
    }
    seq.first().map(|c| format!("{} at {}", TOO_FEW_POINTS, c))
}

fn check_ring(ring: &LinearRing) -> Option<String> {
    if ring.is_empty() {
        return None;
    }
    let coords: Vec<Coord> = ring.sequence().remove_repeated_points().to_coords();
    if coords.len() < 4 {
        let at = coords.first().map(Coord::to_string).unwrap_or_default();
        return Some(format!("{} at {}", TOO_FEW_POINTS, at));
    }
    ring_self_intersection(&coords).map(|p| format!("Ring Self-intersection at {}", p))
}

/// Any intersection between ring segments other than the shared vertex of
/// neighbouring segments.
fn ring_self_intersection(coords: &[Coord]) -> Option<Coord> {
    let n = coords.len() - 1;
    let tree = StrTree::bulk_load(
        (0..n)
            .map(|i| (Envelope::of_segment(coords[i], coords[i + 1]), i))
            .collect(),
    );
    for i in 0..n {
        let (a, b) = (coords[i], coords[i + 1]);
        let mut found = None;
        tree.query_visit(&Envelope::of_segment(a, b), |&j| {
            if found.is_some() || j <= i {
                return;
            }
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match intersect_segments(a, b, coords[j], coords[j + 1]) {
                LineIntersection::None => {}
                LineIntersection::Collinear { start, .. } => found = Some(start),
                LineIntersection::Point { at, .. } => {
                    if !adjacent {
                        found = Some(at);
                    }
                }
            }
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

struct RingSegment {
    ring: usize,
    a: Coord,
    b: Coord,
}

/// Intersections between different rings: crossings and overlaps are
/// invalid and touch points are allowed. Within one polygon two rings
/// touching twice disconnect the interior; shells of separate polygons may
/// touch at any number of points.
fn check_ring_interactions(rings: &[&LinearRing], same_polygon: bool) -> Option<String> {
    let mut entries = Vec::new();
    for (r, ring) in rings.iter().enumerate() {
        let coords: Vec<Coord> = ring.coords().collect();
        for w in coords.windows(2) {
            if w[0] != w[1] {
                entries.push((
                    Envelope::of_segment(w[0], w[1]),
                    RingSegment {
                        ring: r,
                        a: w[0],
                        b: w[1],
                    },
                ));
            }
        }
    }
    let segments: Vec<(Coord, Coord, usize)> =
        entries.iter().map(|(_, s)| (s.a, s.b, s.ring)).collect();
    let tree = StrTree::bulk_load(entries);
    let mut touches: FxHashSet<(usize, usize, (u64, u64))> = FxHashSet::default();
    for (a, b, ring) in segments {
        let mut error = None;
        tree.query_visit(&Envelope::of_segment(a, b), |other| {
            if error.is_some() || other.ring <= ring {
                return;
            }
            match intersect_segments(a, b, other.a, other.b) {
                LineIntersection::None => {}
                LineIntersection::Collinear { start, .. } => {
                    error = Some(format!("Self-intersection at {}", start));
                }
                LineIntersection::Point { at, proper } => {
                    let at_vertex = at == a || at == b || at == other.a || at == other.b;
                    if proper || !at_vertex {
                        error = Some(format!("Self-intersection at {}", at));
                    } else {
                        touches.insert((ring, other.ring, at.key()));
                    }
                }
            }
        });
        if error.is_some() {
            return error;
        }
    }
    if !same_polygon {
        return None;
    }
    let mut per_pair: FxHashSet<(usize, usize)> = FxHashSet::default();
    for &(r1, r2, _) in &touches {
        if !per_pair.insert((r1, r2)) {
            return Some("Interior is disconnected".to_string());
        }
    }
    None
}

/// A vertex of `ring` not lying on `other`, for containment tests.
fn free_vertex(ring: &LinearRing, other: &LinearRing) -> Option<Coord> {
    ring.coords()
        .find(|&c| locate_in_ring(c, other.coords()) != Location::Boundary)
}

fn check_polygon(poly: &Polygon) -> Option<String> {
    if poly.is_empty() {
        return None;
    }
    for ring in poly.rings() {
        if let Some(err) = check_ring(ring) {
            return Some(err);
        }
    }
    let rings: Vec<&LinearRing> = poly.rings().collect();
    if let Some(err) = check_ring_interactions(&rings, true) {
        return Some(err);
    }
    let shell = poly.exterior();
    for hole in poly.interiors() {
        if let Some(p) = free_vertex(hole, shell) {
            if locate_in_ring(p, shell.coords()) != Location::Interior {
                return Some(format!("Hole lies outside shell at {}", p));
            }
        }
    }
    let holes = poly.interiors();
    for (i, inner) in holes.iter().enumerate() {
        for (j, outer) in holes.iter().enumerate() {
            if i == j || !outer.envelope().contains(&inner.envelope()) {
                continue;
            }
            if let Some(p) = free_vertex(inner, outer) {
                if locate_in_ring(p, outer.coords()) == Location::Interior {
                    return Some(format!("Holes are nested at {}", p));
                }
            }
        }
    }
    None
}

fn check_polygon_set(polygons: &[&Polygon]) -> Option<String> {
    let shells: Vec<&LinearRing> = polygons
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.exterior())
        .collect();
    if let Some(err) = check_ring_interactions(&shells, false) {
        return Some(err);
    }
    for (i, a) in polygons.iter().enumerate() {
        for (j, b) in polygons.iter().enumerate() {
            if i == j || a.is_empty() || b.is_empty() {
                continue;
            }
            if let Some(p) = free_vertex(a.exterior(), b.exterior()) {
                if locate_in_polygon(p, b) == Location::Interior {
                    return Some(format!("Nested shells at {}", p));
                }
            }
        }
    }
    None
}

/// OGC simplicity: lines do not self-intersect except at boundary points,
/// multipoints have no repeated points, areas have simple rings.
pub fn is_simple(geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Point(_) => true,
        Geometry::MultiPoint(m) => {
            let mut seen = FxHashSet::default();
            m.points()
                .iter()
                .filter_map(|p| p.coord())
                .all(|c| seen.insert(c.key()))
        }
        Geometry::LineString(l) => lines_simple(&[l.sequence()]),
        Geometry::LinearRing(r) => lines_simple(&[r.sequence()]),
        Geometry::MultiLineString(m) => {
            let seqs: Vec<&CoordinateSequence> = m.lines().iter().map(|l| l.sequence()).collect();
            lines_simple(&seqs)
        }
        Geometry::Polygon(p) => p.rings().all(|r| lines_simple(&[r.sequence()])),
        Geometry::MultiPolygon(m) => m
            .polygons()
            .iter()
            .all(|p| p.rings().all(|r| lines_simple(&[r.sequence()]))),
        Geometry::GeometryCollection(gc) => gc.geometries().iter().all(is_simple),
    }
}

/// True when the only intersections between line segments are shared
/// vertices of consecutive segments, or endpoints of open lines.
fn lines_simple(seqs: &[&CoordinateSequence]) -> bool {
    // (line, index, a, b, is_last)
    let mut segments = Vec::new();
    let mut boundary: FxHashSet<(u64, u64)> = FxHashSet::default();
    for (l, seq) in seqs.iter().enumerate() {
        let coords = seq.remove_repeated_points().to_coords();
        if !seq.is_closed() {
            if let (Some(f), Some(t)) = (coords.first(), coords.last()) {
                boundary.insert(f.key());
                boundary.insert(t.key());
            }
        }
        let n = coords.len().saturating_sub(1);
        for i in 0..n {
            segments.push((l, i, coords[i], coords[i + 1], n, seq.is_closed()));
        }
    }
    let tree = StrTree::bulk_load(
        segments
            .iter()
            .enumerate()
            .map(|(k, s)| (Envelope::of_segment(s.2, s.3), k))
            .collect(),
    );
    for (k, &(l, i, a, b, n, closed)) in segments.iter().enumerate() {
        let mut simple = true;
        tree.query_visit(&Envelope::of_segment(a, b), |&m| {
            if !simple || m <= k {
                return;
            }
            let (l2, j, c, d, _, _) = segments[m];
            match intersect_segments(a, b, c, d) {
                LineIntersection::None => {}
                LineIntersection::Collinear { .. } => simple = false,
                LineIntersection::Point { at, .. } => {
                    let adjacent = l == l2
                        && ((j == i + 1 && at == b) || (closed && i == 0 && j == n - 1 && at == a));
                    let on_boundary = l != l2 && boundary.contains(&at.key());
                    if !adjacent && !on_boundary {
                        simple = false;
                    }
                }
            }
        });
        if !simple {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_valid_polygon_with_hole() {
        let g = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2, 2 2))");
        assert!(is_valid(&g));
    }

    #[test]
    fn test_hole_outside_shell() {
        let g = read(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (20 20, 20 24, 24 24, 24 20, 20 20))",
        );
        assert!(validation_error(&g).unwrap().starts_with("Hole lies outside shell"));
    }

    #[test]
    fn test_hole_touching_shell_once_is_valid() {
        let g = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (0 5, 3 7, 3 3, 0 5))");
        assert!(is_valid(&g));
    }

    #[test]
    fn test_overlapping_multipolygon() {
        let g = read("MULTIPOLYGON (((0 0, 4 0, 4 4, 0 4, 0 0)), ((2 2, 6 2, 6 6, 2 6, 2 2)))");
        assert!(!is_valid(&g));
        let nested =
            read("MULTIPOLYGON (((0 0, 10 0, 10 10, 0 10, 0 0)), ((2 2, 4 2, 4 4, 2 4, 2 2)))");
        assert_eq!(validation_error(&nested).unwrap(), "Nested shells at (2 2)");
    }

    #[test]
    fn test_multipolygon_shells_touching_twice_are_valid() {
        let g = read(
            "MULTIPOLYGON (((0 0, 10 0, 10 5, 5 5, 5 10, 0 10, 0 0)), \
             ((10 10, 10 5, 15 5, 15 15, 5 15, 5 10, 10 10)))",
        );
        assert_eq!(validation_error(&g), None);
    }

    #[test]
    fn test_hole_touching_shell_twice_disconnects() {
        let g = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (0 5, 5 10, 5 5, 0 5))");
        assert_eq!(
            validation_error(&g).as_deref(),
            Some("Interior is disconnected")
        );
    }

    #[test]
    fn test_simplicity() {
        assert!(is_simple(&read("LINESTRING (0 0, 2 0, 2 2)")));
        assert!(!is_simple(&read("LINESTRING (0 0, 2 2, 2 0, 0 2)")));
        assert!(is_simple(&read("LINESTRING (0 0, 2 0, 2 2, 0 0)")));
        assert!(is_simple(&read("MULTILINESTRING ((0 0, 1 0), (1 0, 2 0))")));
        assert!(!is_simple(&read("MULTILINESTRING ((0 0, 2 0), (1 -1, 1 1))")));
        assert!(!is_simple(&read("MULTIPOINT ((1 1), (1 1))")));
    }
}
