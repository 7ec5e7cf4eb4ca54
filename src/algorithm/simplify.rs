//! Douglas-Peucker simplification.
//!
//! Lines keep their endpoints. Rings are simplified as closed paths and
//! dropped when they collapse below four points; a collapsed shell drops the
//! whole polygon. Polygonal results are passed through a unary union so
//! simplification never returns self-intersecting areas.

use super::intersection::point_segment_distance;
use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::geom::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPolygon, Polygon,
};
use crate::overlay;
use planar_types::{Coord, CoordinateSequence};

/// Indices of the vertices Douglas-Peucker keeps.
fn keep_indices(coords: &[Coord], tolerance: f64) -> Vec<usize> {
    let n = coords.len();
    if n < 3 {
        return (0..n).collect();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (coords[start], coords[end]);
        let mut max_dist = -1.0;
        let mut max_index = start;
        for (i, &c) in coords.iter().enumerate().take(end).skip(start + 1) {
            let d = point_segment_distance(c, a, b);
            if d > max_dist {
                max_dist = d;
                max_index = i;
            }
        }
        if max_dist > tolerance {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }
    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// Simplify a sequence, carrying Z/M of the surviving vertices.
fn simplify_sequence(seq: &CoordinateSequence, tolerance: f64) -> CoordinateSequence {
    let coords = seq.to_coords();
    let mut out = CoordinateSequence::with_capacity(seq.dimension(), coords.len());
    for i in keep_indices(&coords, tolerance) {
        if let Some(c) = seq.get(i) {
            out.push(c);
        }
    }
    out
}

fn simplify_line(line: &LineString, tolerance: f64) -> LineString {
    let seq = simplify_sequence(line.sequence(), tolerance);
    // a closed line that collapses keeps two distinct points
    if seq.len() == 2 && seq.first() == seq.last() && line.num_points() > 2 {
        return line.clone();
    }
    LineString::from_sequence_unchecked(seq)
}

fn simplify_ring(ring: &LinearRing, tolerance: f64) -> Option<LinearRing> {
    let seq = simplify_sequence(ring.sequence(), tolerance);
    if seq.len() < 4 {
        return None;
    }
    Some(LinearRing::from_sequence_unchecked(seq))
}

fn simplify_polygon(poly: &Polygon, tolerance: f64) -> Option<Polygon> {
    if poly.is_empty() {
        return None;
    }
    let shell = simplify_ring(poly.exterior(), tolerance)?;
    let holes = poly
        .interiors()
        .iter()
        .filter_map(|h| simplify_ring(h, tolerance))
        .collect();
    Some(Polygon::from_rings_unchecked(shell, holes))
}

fn simplify_components(geometry: &Geometry, tolerance: f64) -> Geometry {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
        Geometry::LineString(l) => Geometry::LineString(simplify_line(l, tolerance)),
        Geometry::LinearRing(r) => match simplify_ring(r, tolerance) {
            Some(r) => Geometry::LinearRing(r),
            None => Geometry::LineString(LineString::empty(r.sequence().dimension())),
        },
        Geometry::MultiLineString(m) => Geometry::MultiLineString(MultiLineString::new(
            m.lines().iter().map(|l| simplify_line(l, tolerance)).collect(),
        )),
        Geometry::Polygon(p) => match simplify_polygon(p, tolerance) {
            Some(p) => Geometry::Polygon(p),
            None => Geometry::Polygon(Polygon::empty(p.exterior().sequence().dimension())),
        },
        Geometry::MultiPolygon(m) => Geometry::MultiPolygon(MultiPolygon::new(
            m.polygons()
                .iter()
                .filter_map(|p| simplify_polygon(p, tolerance))
                .collect(),
        )),
        Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(GeometryCollection::new(
            gc.geometries()
                .iter()
                .map(|g| simplify_components(g, tolerance))
                .collect(),
        )),
    }
}

/// Douglas-Peucker simplification with distance `tolerance`.
///
/// # Errors
///
/// `InvalidInput` for a negative or non-finite tolerance; overlay errors from
/// cleaning polygonal results.
pub fn simplify(geometry: &Geometry, tolerance: f64, config: &Config) -> Result<Geometry> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(GeometryError::InvalidInput(format!(
            "simplify tolerance must be finite and non-negative, got {}",
            tolerance
        )));
    }
    let simplified = simplify_components(geometry, tolerance);
    match simplified {
        Geometry::Polygon(ref p) if p.is_empty() => Ok(simplified),
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
            overlay::unary_union(&simplified, config)
        }
        other => Ok(other),
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
    fn test_line_simplification() {
        let g = read("LINESTRING (0 0, 1 0.1, 2 -0.1, 3 0.05, 4 0)");
        let s = simplify(&g, 0.5, &Config::default()).unwrap();
        assert_eq!(s.num_points(), 2);
        let kept = simplify(&g, 0.0, &Config::default()).unwrap();
        assert_eq!(kept.num_points(), 5);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let g = read("LINESTRING (0 0, 1 1)");
        assert!(matches!(
            simplify(&g, -1.0, &Config::default()),
            Err(GeometryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_polygon_collapse_is_empty() {
        let g = read("POLYGON ((0 0, 10 0, 10 0.1, 0 0.1, 0 0))");
        let s = simplify(&g, 1.0, &Config::default()).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_keeps_z() {
        let g = read("LINESTRING Z (0 0 1, 5 5 2, 10 0 3)");
        let s = simplify(&g, 0.1, &Config::default()).unwrap();
        assert_eq!(s.coordinates()[1].z, Some(2.0));
    }
}
