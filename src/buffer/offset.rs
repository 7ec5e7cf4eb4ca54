//! Offset curves: a line drawn at a fixed distance to one side of the input.

use super::check_arguments;
use super::curve::{Path, Seg, Turn, join, turn};
use super::params::BufferParameters;
use crate::algorithm::intersection::{LineIntersection, intersect_segments};
use crate::error::Result;
use crate::geom::{Geometry, LineString, MultiLineString};
use planar_types::{Coord, Dimension};

fn push(out: &mut Vec<Coord>, c: Coord) {
    if out.last() != Some(&c) {
        out.push(c);
    }
}

/// Points where the offset of `incoming` hands over to the offset of
/// `outgoing` at their shared vertex.
fn corner(
    incoming: &Seg,
    outgoing: &Seg,
    offset: f64,
    params: &BufferParameters,
    out: &mut Vec<Coord>,
) {
    let v = incoming.b;
    let s = incoming.normal * offset;
    let e = outgoing.normal * offset;
    let t = turn(incoming, outgoing);
    if t == Turn::Straight {
        push(out, v + s);
        push(out, v + e);
    } else if t.is_outer(offset) {
        for c in join(v, s, e, incoming.dir, params) {
            push(out, c);
        }
    } else {
        match intersect_segments(incoming.a + s, v + s, v + e, outgoing.b + e) {
            LineIntersection::Point { at, .. } => push(out, at),
            _ => {
                push(out, v + s);
                push(out, v + e);
            }
        }
    }
}

/// Offset of one path, or `None` when it has no segments.
fn offset_path(path: &Path, offset: f64, params: &BufferParameters) -> Option<Vec<Coord>> {
    let segments = path.segments();
    let first = segments.first()?;
    let last = segments.last()?;
    let mut out = Vec::with_capacity(segments.len() * 2);
    if path.closed {
        corner(last, first, offset, params, &mut out);
    } else {
        push(&mut out, first.a + first.normal * offset);
    }
    for w in segments.windows(2) {
        corner(&w[0], &w[1], offset, params, &mut out);
    }
    if path.closed {
        let start = out[0];
        push(&mut out, start);
    } else {
        push(&mut out, last.b + last.normal * offset);
    }
    (out.len() >= 2).then_some(out)
}

/// Line at `distance` from `geometry`; positive distances lie on the
/// right-hand side of each component, negative ones on the left.
///
/// Closed lines and polygon rings give closed curves. Points give an empty
/// LineString; several components give a MultiLineString.
///
/// # Examples
///
/// ```
/// use planar::buffer::{offset_curve, BufferParameters};
/// use planar::io::{WktReader, WktWriter};
///
/// let line = WktReader::new().read("LINESTRING (0 0, 10 0)").unwrap();
/// let right = offset_curve(&line, 1.0, &BufferParameters::default()).unwrap();
/// assert_eq!(WktWriter::new().write(&right), "LINESTRING (0 -1, 10 -1)");
/// ```
pub fn offset_curve(
    geometry: &Geometry,
    distance: f64,
    params: &BufferParameters,
) -> Result<Geometry> {
    check_arguments(distance, params)?;
    let parts = geometry.parts();
    let mut paths: Vec<Path> = parts.lines.iter().map(|seq| Path::from_sequence(seq)).collect();
    for polygon in &parts.polygons {
        paths.extend(polygon.rings().map(|r| Path::from_sequence(r.sequence())));
    }

    // left normals are positive
    let offset = -distance;
    let mut lines = Vec::with_capacity(paths.len());
    for path in &paths {
        let coords = if offset == 0.0 {
            let mut c = path.vertices.clone();
            if path.closed {
                c.extend(path.vertices.first().copied());
            }
            (c.len() >= 2).then_some(c)
        } else {
            offset_path(path, offset, params)
        };
        if let Some(coords) = coords {
            lines.push(LineString::from_coords(coords)?);
        }
    }

    Ok(match lines.len() {
        0 => Geometry::LineString(LineString::empty(Dimension::Xy)),
        1 if !matches!(
            geometry,
            Geometry::MultiLineString(_)
                | Geometry::MultiPolygon(_)
                | Geometry::GeometryCollection(_)
        ) =>
        {
            Geometry::LineString(lines.remove(0))
        }
        _ => Geometry::MultiLineString(MultiLineString::new(lines)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::JoinStyle;
    use crate::io::WktReader;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    fn coords(g: &Geometry) -> Vec<(f64, f64)> {
        g.coords().into_iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_straight_line_both_sides() {
        let line = read("LINESTRING (0 0, 10 0)");
        let params = BufferParameters::default();
        assert_eq!(
            coords(&offset_curve(&line, 1.0, &params).unwrap()),
            vec![(0.0, -1.0), (10.0, -1.0)]
        );
        assert_eq!(
            coords(&offset_curve(&line, -1.0, &params).unwrap()),
            vec![(0.0, 1.0), (10.0, 1.0)]
        );
    }

    #[test]
    fn test_outer_mitre_and_inner_trim() {
        let line = read("LINESTRING (0 0, 10 0, 10 10)");
        let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
        assert_eq!(
            coords(&offset_curve(&line, 1.0, &params).unwrap()),
            vec![(0.0, -1.0), (10.0, -1.0), (11.0, -1.0), (11.0, 0.0), (11.0, 10.0)]
        );
        assert_eq!(
            coords(&offset_curve(&line, -1.0, &params).unwrap()),
            vec![(0.0, 1.0), (9.0, 1.0), (9.0, 10.0)]
        );
    }

    #[test]
    fn test_round_join_stays_at_distance() {
        let line = read("LINESTRING (0 0, 10 0, 10 10)");
        let curve = offset_curve(&line, 2.0, &BufferParameters::default()).unwrap();
        let corner = Coord::new(10.0, 0.0);
        for c in curve.coords() {
            if c.x > 10.0 && c.y < 0.0 {
                assert!((c.distance(corner) - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_polygon_shell_is_closed() {
        let square = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
        let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
        let outside = offset_curve(&square, 1.0, &params).unwrap();
        match &outside {
            Geometry::LineString(l) => {
                assert!(l.is_closed());
                assert_eq!(
                    l.envelope(),
                    planar_types::Envelope::new(-1.0, 11.0, -1.0, 11.0)
                );
            }
            other => panic!("expected a LineString, got {:?}", other),
        }
        let inside = offset_curve(&square, -1.0, &params).unwrap();
        assert_eq!(
            inside.envelope(),
            planar_types::Envelope::new(1.0, 9.0, 1.0, 9.0)
        );
    }

    #[test]
    fn test_points_and_collections() {
        let point = offset_curve(&read("POINT (1 1)"), 1.0, &BufferParameters::default()).unwrap();
        assert!(point.is_empty());
        assert_eq!(point.geometry_type().name(), "LineString");
        let multi = offset_curve(
            &read("MULTILINESTRING ((0 0, 1 0), (0 5, 1 5))"),
            1.0,
            &BufferParameters::default(),
        )
        .unwrap();
        assert_eq!(multi.geometry_type().name(), "MultiLineString");
        assert_eq!(multi.num_geometries(), 2);
    }
}
