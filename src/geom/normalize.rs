//! Canonical form of a geometry.
//!
//! Two geometries covering the same point set with the same vertices
//! normalize to structurally equal values:
//!
//! - rings start at their lexicographically smallest vertex, shells run
//!   counter-clockwise and holes clockwise, holes are sorted by their first
//!   vertex;
//! - a LineString is reversed when it reads smaller backwards;
//! - collection members are normalized and sorted by type, then by
//!   coordinates.

use super::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use crate::algorithm::orientation::is_ccw;
use planar_types::{Coord, CoordinateSequence};
use std::cmp::Ordering;

/// Canonical copy of `geometry`.
///
/// # Examples
///
/// ```
/// use planar::geom::normalize::normalize;
/// use planar::io::{WktReader, WktWriter};
///
/// let g = WktReader::new().read("POLYGON ((1 1, 0 1, 0 0, 1 0, 1 1))").unwrap();
/// assert_eq!(
///     WktWriter::new().write(&normalize(&g)),
///     "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))"
/// );
/// ```
pub fn normalize(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Point(_) => geometry.clone(),
        Geometry::LineString(l) => Geometry::LineString(normalize_line(l)),
        Geometry::LinearRing(r) => Geometry::LinearRing(LinearRing::from_sequence_unchecked(
            ring_sequence(r.sequence(), true),
        )),
        Geometry::Polygon(p) => Geometry::Polygon(normalize_polygon(p)),
        Geometry::MultiPoint(m) => {
            let mut points: Vec<Point> = m.points().to_vec();
            points.sort_by(|a, b| {
                compare_coords(&a.sequence().to_coords(), &b.sequence().to_coords())
            });
            Geometry::MultiPoint(MultiPoint::new(points))
        }
        Geometry::MultiLineString(m) => {
            let mut lines: Vec<LineString> = m.lines().iter().map(normalize_line).collect();
            lines.sort_by(|a, b| {
                compare_coords(&a.sequence().to_coords(), &b.sequence().to_coords())
            });
            Geometry::MultiLineString(MultiLineString::new(lines))
        }
        Geometry::MultiPolygon(m) => {
            let mut polygons: Vec<Polygon> = m.polygons().iter().map(normalize_polygon).collect();
            polygons.sort_by(|a, b| compare_polygons(a, b));
            Geometry::MultiPolygon(MultiPolygon::new(polygons))
        }
        Geometry::GeometryCollection(gc) => {
            let mut members: Vec<Geometry> = gc.geometries().iter().map(normalize).collect();
            members.sort_by(compare_geometries);
            Geometry::GeometryCollection(GeometryCollection::new(members))
        }
    }
}

/// Lexicographic order on coordinate lists; a prefix sorts first.
fn compare_coords(a: &[Coord], b: &[Coord]) -> Ordering {
    for (p, q) in a.iter().zip(b) {
        let ord = p.lex_cmp(q);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_polygons(a: &Polygon, b: &Polygon) -> Ordering {
    compare_coords(
        &a.exterior().sequence().to_coords(),
        &b.exterior().sequence().to_coords(),
    )
}

fn compare_geometries(a: &Geometry, b: &Geometry) -> Ordering {
    a.geometry_type()
        .rank()
        .cmp(&b.geometry_type().rank())
        .then_with(|| compare_coords(&a.coords(), &b.coords()))
}

fn normalize_line(line: &LineString) -> LineString {
    let coords = line.sequence().to_coords();
    let n = coords.len();
    for i in 0..n / 2 {
        match coords[i].lex_cmp(&coords[n - 1 - i]) {
            Ordering::Greater => {
                return LineString::from_sequence_unchecked(line.sequence().reversed());
            }
            Ordering::Less => break,
            Ordering::Equal => {}
        }
    }
    line.clone()
}

/// Rotate a closed sequence to start at its smallest vertex and orient it.
fn ring_sequence(seq: &CoordinateSequence, ccw: bool) -> CoordinateSequence {
    if seq.len() < 4 {
        return seq.clone();
    }
    let coords = seq.to_coords();
    let n = coords.len() - 1;
    let start = (1..n).fold(0, |best, i| {
        if coords[i].lex_cmp(&coords[best]) == Ordering::Less { i } else { best }
    });

    let mut rotated = seq.slice(start, n);
    rotated.extend_from(&seq.slice(0, start));
    rotated.extend_from(&seq.slice(start, start + 1));

    if is_ccw(&rotated.to_coords()) == ccw {
        rotated
    } else {
        // reversing keeps the first vertex in place
        rotated.reversed()
    }
}

fn normalize_polygon(polygon: &Polygon) -> Polygon {
    if polygon.is_empty() {
        return polygon.clone();
    }
    let shell =
        LinearRing::from_sequence_unchecked(ring_sequence(polygon.exterior().sequence(), true));
    let mut holes: Vec<LinearRing> = polygon
        .interiors()
        .iter()
        .map(|h| LinearRing::from_sequence_unchecked(ring_sequence(h.sequence(), false)))
        .collect();
    holes.sort_by(|a, b| compare_coords(&a.sequence().to_coords(), &b.sequence().to_coords()));
    Polygon::from_rings_unchecked(shell, holes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{WktReader, WktWriter};

    fn norm(wkt: &str) -> String {
        WktWriter::new().write(&normalize(&WktReader::new().read(wkt).unwrap()))
    }

    #[test]
    fn test_polygon_shell_and_holes() {
        assert_eq!(
            norm(
                "POLYGON ((10 10, 10 0, 0 0, 0 10, 10 10), (6 6, 8 6, 8 8, 6 6), \
                 (1 1, 3 1, 3 3, 1 1))"
            ),
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (1 1, 3 3, 3 1, 1 1), (6 6, 8 8, 8 6, 6 6))"
        );
    }

    #[test]
    fn test_line_direction() {
        assert_eq!(norm("LINESTRING (5 5, 0 0)"), "LINESTRING (0 0, 5 5)");
        assert_eq!(norm("LINESTRING (0 0, 5 5)"), "LINESTRING (0 0, 5 5)");
        // closed line: compared against its reverse
        assert_eq!(
            norm("LINESTRING (0 0, 0 1, 1 1, 0 0)"),
            "LINESTRING (0 0, 0 1, 1 1, 0 0)"
        );
        assert_eq!(
            norm("LINESTRING (0 0, 1 1, 0 1, 0 0)"),
            "LINESTRING (0 0, 0 1, 1 1, 0 0)"
        );
    }

    #[test]
    fn test_collection_order() {
        assert_eq!(
            norm(
                "GEOMETRYCOLLECTION (POLYGON ((0 0, 1 0, 1 1, 0 0)), LINESTRING (3 3, 2 2), \
                 POINT (9 9), POINT (1 1))"
            ),
            "GEOMETRYCOLLECTION (POINT (1 1), POINT (9 9), LINESTRING (2 2, 3 3), \
             POLYGON ((0 0, 1 0, 1 1, 0 0)))"
        );
        assert_eq!(
            norm("MULTIPOINT ((3 1), (1 2), (1 1))"),
            "MULTIPOINT ((1 1), (1 2), (3 1))"
        );
    }

    #[test]
    fn test_idempotent_and_keeps_z() {
        let inputs = [
            "POLYGON Z ((1 1 5, 0 1 6, 0 0 7, 1 0 8, 1 1 5))",
            "MULTILINESTRING ((9 9, 1 1), (0 5, 0 0))",
            "MULTIPOLYGON (((5 5, 6 5, 6 6, 5 5)), ((0 0, 0 1, 1 1, 0 0)))",
        ];
        for wkt in inputs {
            let once = normalize(&WktReader::new().read(wkt).unwrap());
            assert_eq!(normalize(&once), once, "{wkt}");
        }
        assert_eq!(
            norm("POLYGON Z ((1 1 5, 0 1 6, 0 0 7, 1 0 8, 1 1 5))"),
            "POLYGON Z ((0 0 7, 1 0 8, 1 1 5, 0 1 6, 0 0 7))"
        );
    }
}
