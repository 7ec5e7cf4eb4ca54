//! Minimum distance and nearest points between geometries.

use super::intersection::{closest_point_on_segment, closest_points_segments};
use super::locate::{Location, locate};
use crate::geom::Geometry;
use planar_types::{Coord, Envelope};

/// Flattened primitives of one geometry: isolated points and segments.
struct Facets {
    points: Vec<Coord>,
    segments: Vec<(Coord, Coord)>,
}

impl Facets {
    fn of(geometry: &Geometry) -> Self {
        let parts = geometry.parts();
        let mut segments = Vec::new();
        let mut points = parts.points.clone();
        let mut push_path = |coords: Vec<Coord>, points: &mut Vec<Coord>| {
            if coords.len() == 1 {
                points.push(coords[0]);
            }
            segments.extend(coords.windows(2).map(|w| (w[0], w[1])));
        };
        for seq in &parts.lines {
            push_path(seq.to_coords(), &mut points);
        }
        for poly in &parts.polygons {
            for ring in poly.rings() {
                push_path(ring.coords().collect(), &mut points);
            }
        }
        Self { points, segments }
    }

    /// One vertex per component, used for containment checks.
    fn representatives(&self) -> impl Iterator<Item = Coord> + '_ {
        self.points
            .iter()
            .copied()
            .chain(self.segments.iter().map(|(a, _)| *a))
    }
}

/// Closest pair between the facets of two geometries.
fn closest_pair(a: &Facets, b: &Facets) -> Option<(Coord, Coord)> {
    fn consider(best: &mut Option<(f64, Coord, Coord)>, p: Coord, q: Coord) {
        let d = p.distance_sq(q);
        if best.is_none_or(|(bd, _, _)| d < bd) {
            *best = Some((d, p, q));
        }
    }

    let mut best: Option<(f64, Coord, Coord)> = None;
    for &p in &a.points {
        for &q in &b.points {
            consider(&mut best, p, q);
        }
        for &(s, t) in &b.segments {
            consider(&mut best, p, closest_point_on_segment(p, s, t));
        }
    }
    for &(s, t) in &a.segments {
        let env = Envelope::of_segment(s, t);
        for &q in &b.points {
            consider(&mut best, closest_point_on_segment(q, s, t), q);
        }
        for &(u, v) in &b.segments {
            // prune pairs whose boxes are farther than the best so far
            if let Some((bd, _, _)) = best {
                let gap = env.distance(&Envelope::of_segment(u, v));
                if gap * gap > bd {
                    continue;
                }
            }
            let (p, q) = closest_points_segments(s, t, u, v);
            consider(&mut best, p, q);
        }
    }
    best.map(|(_, p, q)| (p, q))
}

/// A point of one geometry inside the area of the other, if any.
fn containment(a: &Geometry, fa: &Facets, b: &Geometry, fb: &Facets) -> Option<Coord> {
    if b.parts().has_area() {
        for p in fa.representatives() {
            if locate(p, b) != Location::Exterior {
                return Some(p);
            }
        }
    }
    if a.parts().has_area() {
        for p in fb.representatives() {
            if locate(p, a) != Location::Exterior {
                return Some(p);
            }
        }
    }
    None
}

/// The pair of points, one on each geometry, at minimum distance. `None` if
/// either geometry is empty.
pub fn nearest_points(a: &Geometry, b: &Geometry) -> Option<(Coord, Coord)> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let fa = Facets::of(a);
    let fb = Facets::of(b);
    if let Some(p) = containment(a, &fa, b, &fb) {
        return Some((p, p));
    }
    closest_pair(&fa, &fb)
}

/// Minimum Euclidean distance; 0 when either geometry is empty.
///
/// # Examples
///
/// ```
/// use planar::algorithm::distance::distance;
/// use planar::io::WktReader;
///
/// let reader = WktReader::new();
/// let a = reader.read("POINT (0 0)").unwrap();
/// let b = reader.read("LINESTRING (3 -1, 3 4)").unwrap();
/// assert_eq!(distance(&a, &b), 3.0);
/// ```
pub fn distance(a: &Geometry, b: &Geometry) -> f64 {
    nearest_points(a, b)
        .map(|(p, q)| p.distance(q))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_point_inside_polygon_is_zero() {
        let poly = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
        let p = read("POINT (5 5)");
        assert_eq!(distance(&poly, &p), 0.0);
        assert_eq!(
            nearest_points(&poly, &p),
            Some((Coord::new(5.0, 5.0), Coord::new(5.0, 5.0)))
        );
    }

    #[test]
    fn test_polygon_to_polygon() {
        let a = read("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = read("POLYGON ((4 5, 5 5, 5 6, 4 6, 4 5))");
        assert_eq!(distance(&a, &b), 5.0);
        let (p, q) = nearest_points(&a, &b).unwrap();
        assert_eq!(p, Coord::new(1.0, 1.0));
        assert_eq!(q, Coord::new(4.0, 5.0));
    }

    #[test]
    fn test_empty_operand() {
        let a = read("POINT EMPTY");
        let b = read("POINT (1 1)");
        assert_eq!(distance(&a, &b), 0.0);
        assert!(nearest_points(&a, &b).is_none());
    }
}
