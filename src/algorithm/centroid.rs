//! Centroid of the highest-dimension components.

use crate::geom::{Geometry, Point};
use planar_types::{Coord, Dimension};

/// Centroid as a point geometry; empty input gives an empty point.
///
/// Areas dominate lines and lines dominate points, matching the usual
/// definition for mixed collections.
pub fn centroid(geometry: &Geometry) -> Geometry {
    match centroid_coord(geometry) {
        Some(c) => Geometry::Point(Point::from_coord_unchecked(c)),
        None => Geometry::Point(Point::empty(Dimension::Xy)),
    }
}

pub fn centroid_coord(geometry: &Geometry) -> Option<Coord> {
    let parts = geometry.parts();

    let mut area_sum = 0.0;
    let mut area_x = 0.0;
    let mut area_y = 0.0;
    for poly in &parts.polygons {
        for (i, ring) in poly.rings().enumerate() {
            let coords: Vec<Coord> = ring.coords().collect();
            if coords.len() < 4 {
                continue;
            }
            // shell counts positive, holes negative, whatever their winding
            let sign = if i == 0 { 1.0 } else { -1.0 };
            let orient = if ring.is_ccw() { 1.0 } else { -1.0 };
            let base = coords[0];
            for w in coords.windows(2) {
                let a = w[0] - base;
                let b = w[1] - base;
                let cross = a.cross(b) * orient * sign;
                area_sum += cross;
                area_x += cross * (a.x + b.x);
                area_y += cross * (a.y + b.y);
            }
            // translate the ring's moment back from `base`
            let ring_area: f64 = coords
                .windows(2)
                .map(|w| (w[0] - base).cross(w[1] - base) * orient * sign)
                .sum();
            area_x += ring_area * 3.0 * base.x;
            area_y += ring_area * 3.0 * base.y;
        }
    }
    if area_sum != 0.0 {
        return Some(Coord::new(area_x / (3.0 * area_sum), area_y / (3.0 * area_sum)));
    }

    let mut len_sum = 0.0;
    let mut len_x = 0.0;
    let mut len_y = 0.0;
    let mut segments: Vec<(Coord, Coord)> = Vec::new();
    for seq in &parts.lines {
        let coords = seq.to_coords();
        segments.extend(coords.windows(2).map(|w| (w[0], w[1])));
    }
    for poly in &parts.polygons {
        for ring in poly.rings() {
            let coords: Vec<Coord> = ring.coords().collect();
            segments.extend(coords.windows(2).map(|w| (w[0], w[1])));
        }
    }
    for (a, b) in &segments {
        let len = a.distance(*b);
        let mid = a.midpoint(*b);
        len_sum += len;
        len_x += len * mid.x;
        len_y += len * mid.y;
    }
    if len_sum > 0.0 {
        return Some(Coord::new(len_x / len_sum, len_y / len_sum));
    }

    // zero-length lines count as points
    let mut pts: Vec<Coord> = parts.points.clone();
    pts.extend(segments.iter().map(|(a, _)| *a));
    if pts.is_empty() {
        return None;
    }
    let n = pts.len() as f64;
    let sum = pts.iter().fold(Coord::new(0.0, 0.0), |acc, c| acc + *c);
    Some(Coord::new(sum.x / n, sum.y / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;
    use approx::assert_relative_eq;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_polygon_centroid_with_hole() {
        let g = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (0 0, 0 5, 5 5, 5 0, 0 0))");
        let c = centroid_coord(&g).unwrap();
        // L-shape: 100 - 25 = 75, moment from the removed quadrant
        assert_relative_eq!(c.x, (100.0 * 5.0 - 25.0 * 2.5) / 75.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, (100.0 * 5.0 - 25.0 * 2.5) / 75.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_shell_same_centroid() {
        let ccw = read("POLYGON ((10 10, 14 10, 14 12, 10 12, 10 10))");
        let cw = read("POLYGON ((10 10, 10 12, 14 12, 14 10, 10 10))");
        assert_eq!(centroid_coord(&ccw), Some(Coord::new(12.0, 11.0)));
        assert_eq!(centroid_coord(&cw), Some(Coord::new(12.0, 11.0)));
    }

    #[test]
    fn test_line_and_points() {
        let line = read("LINESTRING (0 0, 10 0, 10 10)");
        assert_eq!(centroid_coord(&line), Some(Coord::new(7.5, 2.5)));
        let pts = read("MULTIPOINT ((0 0), (2 0), (4 3))");
        assert_eq!(centroid_coord(&pts), Some(Coord::new(2.0, 1.0)));
        assert!(centroid(&read("POINT EMPTY")).is_empty());
    }
}
