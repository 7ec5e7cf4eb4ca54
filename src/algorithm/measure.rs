//! Area and length.

use crate::geom::Geometry;
use planar_types::Coord;

/// Total area of the polygonal components; zero for points and lines.
///
/// # Examples
///
/// ```
/// use planar::algorithm::measure::area;
/// use planar::io::WktReader;
///
/// let g = WktReader::new().read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))").unwrap();
/// assert_eq!(area(&g), 100.0);
/// ```
pub fn area(geometry: &Geometry) -> f64 {
    geometry.parts().polygons.iter().map(|p| p.area()).sum()
}

/// Total length of lines plus the perimeter of every ring.
pub fn length(geometry: &Geometry) -> f64 {
    let parts = geometry.parts();
    let lines: f64 = parts.lines.iter().map(|s| path_length(s.coords())).sum();
    let rings: f64 = parts
        .polygons
        .iter()
        .flat_map(|p| p.rings())
        .map(|r| path_length(r.coords()))
        .sum();
    lines + rings
}

pub(crate) fn path_length<I: IntoIterator<Item = Coord>>(coords: I) -> f64 {
    let mut iter = coords.into_iter();
    let Some(mut prev) = iter.next() else {
        return 0.0;
    };
    let mut total = 0.0;
    for c in iter {
        total += prev.distance(c);
        prev = c;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{LineString, Polygon};
    use approx::assert_relative_eq;

    #[test]
    fn test_length_of_line_and_polygon() {
        let line = Geometry::LineString(
            LineString::from_coords([
                Coord::new(0.0, 0.0),
                Coord::new(3.0, 4.0),
                Coord::new(3.0, 10.0),
            ])
            .unwrap(),
        );
        assert_relative_eq!(length(&line), 11.0);
        assert_eq!(area(&line), 0.0);

        let square = Geometry::Polygon(
            Polygon::from_coords([
                Coord::new(0.0, 0.0),
                Coord::new(2.0, 0.0),
                Coord::new(2.0, 2.0),
                Coord::new(0.0, 2.0),
                Coord::new(0.0, 0.0),
            ])
            .unwrap(),
        );
        assert_relative_eq!(length(&square), 8.0);
        assert_relative_eq!(area(&square), 4.0);
    }
}
