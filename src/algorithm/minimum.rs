//! Minimum enclosing shapes: bounding circle, minimum width and the
//! minimum-area rectangle, all computed on the convex hull.

use super::hull::hull_coords;
use crate::geom::{Geometry, LineString, Point, Polygon};
use crate::geom::LinearRing;
use planar_types::{Coord, CoordinateSequence, Dimension};
use std::f64::consts::PI;

/// Smallest circle containing every vertex of a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    pub centre: Coord,
    pub radius: f64,
}

impl BoundingCircle {
    fn contains(&self, p: Coord) -> bool {
        // relative slack absorbs rounding in the circumcircle
        self.centre.distance(p) <= self.radius * (1.0 + 1e-12) + 1e-12
    }

    fn from_two(a: Coord, b: Coord) -> Self {
        Self {
            centre: a.midpoint(b),
            radius: a.distance(b) / 2.0,
        }
    }

    fn from_three(a: Coord, b: Coord, c: Coord) -> Self {
        let bx = b.x - a.x;
        let by = b.y - a.y;
        let cx = c.x - a.x;
        let cy = c.y - a.y;
        let d = 2.0 * (bx * cy - by * cx);
        if d == 0.0 {
            // collinear: the widest pair spans the circle
            let pairs = [(a, b), (a, c), (b, c)];
            let (p, q) = pairs
                .iter()
                .copied()
                .max_by(|x, y| x.0.distance(x.1).total_cmp(&y.0.distance(y.1)))
                .unwrap_or((a, b));
            return Self::from_two(p, q);
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let centre = Coord::new(a.x + ux, a.y + uy);
        Self {
            centre,
            radius: centre.distance(a),
        }
    }

    /// Polygon approximating the circle with `4 * quadrant_segments` sides.
    pub fn to_geometry(&self, quadrant_segments: usize) -> Geometry {
        if self.radius == 0.0 {
            return Geometry::Point(Point::from_coord_unchecked(self.centre));
        }
        let n = 4 * quadrant_segments.max(1);
        let mut coords: Vec<Coord> = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                Coord::new(
                    self.centre.x + self.radius * angle.cos(),
                    self.centre.y + self.radius * angle.sin(),
                )
            })
            .collect();
        coords.push(coords[0]);
        Geometry::Polygon(Polygon::from_rings_unchecked(
            LinearRing::from_sequence_unchecked(coords.into_iter().collect()),
            Vec::new(),
        ))
    }
}

/// Welzl's algorithm in its iterative form over the hull vertices.
pub fn minimum_bounding_circle(geometry: &Geometry) -> Option<BoundingCircle> {
    let pts = hull_coords(&geometry.coords());
    let first = *pts.first()?;
    let mut circle = BoundingCircle {
        centre: first,
        radius: 0.0,
    };
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = BoundingCircle::from_two(pts[0], pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = BoundingCircle::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = BoundingCircle::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(circle)
}

/// Minimum width of a geometry and the segment realising it: one end on a
/// hull vertex, the other its foot on the opposite supporting edge.
pub fn minimum_diameter(geometry: &Geometry) -> Geometry {
    let hull = hull_coords(&geometry.coords());
    match hull.len() {
        0 => return Geometry::LineString(LineString::empty(Dimension::Xy)),
        1 => return Geometry::Point(Point::from_coord_unchecked(hull[0])),
        2 => {
            return Geometry::LineString(LineString::from_sequence_unchecked(
                CoordinateSequence::from_coords([hull[0], hull[0]]),
            ));
        }
        _ => {}
    }
    let n = hull.len();
    let mut best: Option<(f64, Coord, Coord)> = None;
    for i in 0..n {
        let a = hull[i];
        let b = hull[(i + 1) % n];
        let dir = b - a;
        let len = dir.length();
        if len == 0.0 {
            continue;
        }
        // farthest vertex from this edge
        let (far, width) = hull
            .iter()
            .map(|&p| (p, dir.cross(p - a).abs() / len))
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .unwrap_or((a, 0.0));
        if best.is_none_or(|(w, _, _)| width < w) {
            let t = (far - a).dot(dir) / (len * len);
            best = Some((width, far, a + dir * t));
        }
    }
    match best {
        Some((_, p, q)) => Geometry::LineString(LineString::from_sequence_unchecked(
            CoordinateSequence::from_coords([p, q]),
        )),
        None => Geometry::LineString(LineString::empty(Dimension::Xy)),
    }
}

/// Rectangle of least area enclosing the geometry. One side is always
/// collinear with a hull edge.
pub fn minimum_area_rectangle(geometry: &Geometry) -> Geometry {
    let hull = hull_coords(&geometry.coords());
    match hull.len() {
        0 => return Geometry::Polygon(Polygon::empty(Dimension::Xy)),
        1 => return Geometry::Point(Point::from_coord_unchecked(hull[0])),
        2 => {
            return Geometry::LineString(LineString::from_sequence_unchecked(
                CoordinateSequence::from_coords(hull),
            ));
        }
        _ => {}
    }
    let n = hull.len();
    let mut best: Option<(f64, [Coord; 4])> = None;
    for i in 0..n {
        let a = hull[i];
        let Some(u) = (hull[(i + 1) % n] - a).normalized() else {
            continue;
        };
        let v = u.perp();
        let (mut min_u, mut max_u, mut min_v, mut max_v) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for &p in &hull {
            let d = p - a;
            let pu = d.dot(u);
            let pv = d.dot(v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }
        let area = (max_u - min_u) * (max_v - min_v);
        if best.is_none_or(|(best_area, _)| area < best_area) {
            let corner = |s: f64, t: f64| a + u * s + v * t;
            best = Some((
                area,
                [
                    corner(min_u, min_v),
                    corner(max_u, min_v),
                    corner(max_u, max_v),
                    corner(min_u, max_v),
                ],
            ));
        }
    }
    match best {
        Some((_, c)) => Geometry::Polygon(Polygon::from_rings_unchecked(
            LinearRing::from_sequence_unchecked(CoordinateSequence::from_coords([
                c[0], c[1], c[2], c[3], c[0],
            ])),
            Vec::new(),
        )),
        None => Geometry::Polygon(Polygon::empty(Dimension::Xy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::measure::{area, length};
    use crate::io::WktReader;
    use approx::assert_relative_eq;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_bounding_circle_of_square() {
        let g = read("POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))");
        let c = minimum_bounding_circle(&g).unwrap();
        assert_relative_eq!(c.centre.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.centre.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.radius, 2f64.sqrt(), epsilon = 1e-12);
        assert!(minimum_bounding_circle(&read("POINT EMPTY")).is_none());
    }

    #[test]
    fn test_bounding_circle_triangle() {
        let g = read("MULTIPOINT ((0 0), (4 0), (2 1))");
        let c = minimum_bounding_circle(&g).unwrap();
        // obtuse triangle: the long side is the diameter
        assert_relative_eq!(c.radius, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minimum_diameter_of_rectangle() {
        let g = read("POLYGON ((0 0, 10 0, 10 3, 0 3, 0 0))");
        assert_relative_eq!(length(&minimum_diameter(&g)), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_minimum_rectangle_of_rotated_square() {
        let g = read("POLYGON ((1 0, 2 1, 1 2, 0 1, 1 0))");
        let r = minimum_area_rectangle(&g);
        assert_relative_eq!(area(&r), 2.0, epsilon = 1e-12);
    }
}
