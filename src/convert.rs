//! Conversions to and from the [`geo`] crate's types.
//!
//! `geo` geometries are 2D only, so Z and M are dropped on the way out.
//! `geo` has no empty point; an empty [`Point`] becomes an empty
//! `MultiPoint`.

use crate::error::{GeometryError, Result};
use crate::geom::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use planar_types::Coord;

fn line_from_geo(line: &geo::LineString<f64>) -> Result<LineString> {
    LineString::from_coords(line.coords().map(|c| Coord::from(*c)))
}

/// Ring from a `geo` line string, closing it when the first and last
/// coordinates differ.
fn ring_from_geo(line: &geo::LineString<f64>) -> Result<LinearRing> {
    let mut coords: Vec<Coord> = line.coords().map(|c| Coord::from(*c)).collect();
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last())
        && first != last
    {
        coords.push(first);
    }
    LinearRing::from_coords(coords)
}

fn polygon_from_geo(polygon: &geo::Polygon<f64>) -> Result<Polygon> {
    let shell = ring_from_geo(polygon.exterior())?;
    let holes = polygon
        .interiors()
        .iter()
        .map(ring_from_geo)
        .collect::<Result<Vec<_>>>()?;
    Polygon::new(shell, holes)
}

fn point_from_geo(point: &geo::Point<f64>) -> Result<Point> {
    Point::from_coord(Coord::from(point.0))
}

impl TryFrom<geo::Geometry<f64>> for Geometry {
    type Error = GeometryError;

    fn try_from(geometry: geo::Geometry<f64>) -> Result<Self> {
        Geometry::try_from(&geometry)
    }
}

impl TryFrom<&geo::Geometry<f64>> for Geometry {
    type Error = GeometryError;

    /// Fails when a ring has fewer than four points after closing or an
    /// ordinate is not finite.
    fn try_from(geometry: &geo::Geometry<f64>) -> Result<Self> {
        Ok(match geometry {
            geo::Geometry::Point(p) => Geometry::Point(point_from_geo(p)?),
            geo::Geometry::Line(l) => Geometry::LineString(LineString::from_coords([
                Coord::from(l.start),
                Coord::from(l.end),
            ])?),
            geo::Geometry::LineString(l) => Geometry::LineString(line_from_geo(l)?),
            geo::Geometry::Polygon(p) => Geometry::Polygon(polygon_from_geo(p)?),
            geo::Geometry::MultiPoint(m) => Geometry::MultiPoint(MultiPoint::new(
                m.iter().map(point_from_geo).collect::<Result<_>>()?,
            )),
            geo::Geometry::MultiLineString(m) => Geometry::MultiLineString(MultiLineString::new(
                m.iter().map(line_from_geo).collect::<Result<_>>()?,
            )),
            geo::Geometry::MultiPolygon(m) => Geometry::MultiPolygon(MultiPolygon::new(
                m.iter().map(polygon_from_geo).collect::<Result<_>>()?,
            )),
            geo::Geometry::GeometryCollection(gc) => {
                Geometry::GeometryCollection(GeometryCollection::new(
                    gc.iter().map(Geometry::try_from).collect::<Result<_>>()?,
                ))
            }
            geo::Geometry::Rect(r) => Geometry::Polygon(polygon_from_geo(&r.to_polygon())?),
            geo::Geometry::Triangle(t) => Geometry::Polygon(polygon_from_geo(&t.to_polygon())?),
        })
    }
}

fn line_to_geo(coords: impl Iterator<Item = Coord>) -> geo::LineString<f64> {
    geo::LineString::new(coords.map(geo::Coord::from).collect())
}

fn polygon_to_geo(polygon: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        line_to_geo(polygon.exterior().coords()),
        polygon.interiors().iter().map(|h| line_to_geo(h.coords())).collect(),
    )
}

impl From<&Geometry> for geo::Geometry<f64> {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(p) => match p.coord() {
                Some(c) => geo::Geometry::Point(geo::Point(c.into())),
                None => geo::Geometry::MultiPoint(geo::MultiPoint::new(Vec::new())),
            },
            Geometry::LineString(l) => geo::Geometry::LineString(line_to_geo(l.coords())),
            Geometry::LinearRing(r) => geo::Geometry::LineString(line_to_geo(r.coords())),
            Geometry::Polygon(p) => geo::Geometry::Polygon(polygon_to_geo(p)),
            Geometry::MultiPoint(m) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                m.points()
                    .iter()
                    .filter_map(Point::coord)
                    .map(|c| geo::Point(c.into()))
                    .collect(),
            )),
            Geometry::MultiLineString(m) => {
                geo::Geometry::MultiLineString(geo::MultiLineString::new(
                    m.lines().iter().map(|l| line_to_geo(l.coords())).collect(),
                ))
            }
            Geometry::MultiPolygon(m) => geo::Geometry::MultiPolygon(geo::MultiPolygon::new(
                m.polygons().iter().map(polygon_to_geo).collect(),
            )),
            Geometry::GeometryCollection(gc) => {
                geo::Geometry::GeometryCollection(geo::GeometryCollection::from(
                    gc.geometries()
                        .iter()
                        .map(geo::Geometry::from)
                        .collect::<Vec<_>>(),
                ))
            }
        }
    }
}

impl From<Geometry> for geo::Geometry<f64> {
    fn from(geometry: Geometry) -> Self {
        geo::Geometry::from(&geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{WktReader, WktWriter};
    use approx::assert_relative_eq;
    use geo::{Area, Euclidean, Length};

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    #[test]
    fn test_round_trip_through_geo() {
        for wkt in [
            "POINT (1 2)",
            "LINESTRING (0 0, 1 1, 2 0)",
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2, 2 2))",
            "MULTIPOINT ((1 1), (2 2))",
            "MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))",
            "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6, 5 5)))",
            "GEOMETRYCOLLECTION (POINT (1 1), LINESTRING (0 0, 1 0))",
        ] {
            let g = read(wkt);
            let back = Geometry::try_from(geo::Geometry::from(&g)).unwrap();
            assert_eq!(WktWriter::new().write(&back), wkt);
        }
    }

    #[test]
    fn test_measures_agree_with_geo() {
        let g = read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 2 4, 4 4, 4 2, 2 2))");
        let geo_g = geo::Geometry::from(&g);
        assert_relative_eq!(g.area(), geo_g.unsigned_area());

        let line = read("LINESTRING (0 0, 3 4, 3 10)");
        let geo::Geometry::LineString(geo_line) = geo::Geometry::from(&line) else {
            panic!("expected a line string");
        };
        assert_relative_eq!(line.length(), Euclidean.length(&geo_line));
    }

    #[test]
    fn test_from_geo_closes_rings_and_expands_shapes() {
        let open = geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]),
            Vec::new(),
        );
        let g = Geometry::try_from(geo::Geometry::Polygon(open)).unwrap();
        assert_eq!(g.num_points(), 4);

        let rect = geo::Rect::new(
            geo::coord! { x: 0.0, y: 0.0 },
            geo::coord! { x: 2.0, y: 3.0 },
        );
        let g = Geometry::try_from(geo::Geometry::Rect(rect)).unwrap();
        assert_eq!(g.area(), 6.0);

        let line = geo::Line::new(
            geo::coord! { x: 0.0, y: 0.0 },
            geo::coord! { x: 3.0, y: 4.0 },
        );
        assert_eq!(
            Geometry::try_from(geo::Geometry::Line(line)).unwrap().length(),
            5.0
        );
    }

    #[test]
    fn test_from_geo_rejects_degenerate_ring() {
        let thin = geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            Vec::new(),
        );
        assert!(Geometry::try_from(geo::Geometry::Polygon(thin)).is_err());
    }

    #[test]
    fn test_to_geo_drops_z_and_empty_point() {
        let g = read("POINT Z (1 2 3)");
        assert_eq!(
            geo::Geometry::from(&g),
            geo::Geometry::Point(geo::Point::new(1.0, 2.0))
        );
        let empty = read("POINT EMPTY");
        assert_eq!(
            geo::Geometry::from(&empty),
            geo::Geometry::MultiPoint(geo::MultiPoint::new(Vec::new()))
        );
    }
}
