//! Convex hull (Andrew's monotone chain with exact orientation).

use super::orientation::{Orientation, orientation};
use crate::geom::{Geometry, GeometryCollection, LineString, Point, Polygon};
use crate::geom::LinearRing;
use planar_types::{Coord, CoordinateSequence};

/// Hull vertices in counter-clockwise order, starting at the
/// lexicographically smallest point, without the closing repeat. Collinear
/// points are dropped.
pub fn hull_coords(points: &[Coord]) -> Vec<Coord> {
    let mut pts: Vec<Coord> = points.to_vec();
    pts.sort_by(Coord::lex_cmp);
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<Coord> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2
            && orientation(lower[lower.len() - 2], lower[lower.len() - 1], p)
                != Orientation::CounterClockwise
        {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Coord> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2
            && orientation(upper[upper.len() - 2], upper[upper.len() - 1], p)
                != Orientation::CounterClockwise
        {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Smallest convex geometry containing the input: a polygon, or a line or
/// point when the input is degenerate. Empty input gives an empty
/// collection.
///
/// # Examples
///
/// ```
/// use planar::algorithm::hull::convex_hull;
/// use planar::io::WktReader;
///
/// let g = WktReader::new().read("MULTIPOINT ((0 0), (4 0), (2 1), (4 4), (0 4))").unwrap();
/// let hull = convex_hull(&g);
/// assert_eq!(hull.num_points(), 5);
/// ```
pub fn convex_hull(geometry: &Geometry) -> Geometry {
    let hull = hull_coords(&geometry.coords());
    match hull.len() {
        0 => Geometry::GeometryCollection(GeometryCollection::new(Vec::new())),
        1 => Geometry::Point(Point::from_coord_unchecked(hull[0])),
        2 => Geometry::LineString(LineString::from_sequence_unchecked(
            CoordinateSequence::from_coords(hull),
        )),
        _ => {
            let first = hull[0];
            let ring = LinearRing::from_sequence_unchecked(
                hull.into_iter().chain(std::iter::once(first)).collect(),
            );
            Geometry::Polygon(Polygon::from_rings_unchecked(ring, Vec::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear_input_gives_line() {
        let pts = [Coord::new(0.0, 0.0), Coord::new(1.0, 1.0), Coord::new(3.0, 3.0)];
        let hull = hull_coords(&pts);
        assert_eq!(hull, vec![Coord::new(0.0, 0.0), Coord::new(3.0, 3.0)]);
    }

    #[test]
    fn test_square_hull_drops_inner_and_edge_points() {
        let pts = [
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 4.0),
        ];
        let hull = hull_coords(&pts);
        assert_eq!(
            hull,
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(4.0, 4.0),
                Coord::new(0.0, 4.0)
            ]
        );
        let g = convex_hull(&Geometry::MultiPoint(crate::geom::MultiPoint::new(
            pts.iter()
                .map(|c| Point::from_coord(*c).unwrap())
                .collect(),
        )));
        assert_eq!(crate::algorithm::measure::area(&g), 16.0);
    }
}
