//! Geometry creation and configured operations.
//!
//! ```rust
//! use planar::{FactoryBuilder, Coordinate};
//!
//! let factory = FactoryBuilder::new().snap_tolerance(1e-9).build()?;
//! let a = factory.create_point(0.0, 0.0)?;
//! let disc = factory.buffer(&a.into(), 1.0)?;
//! assert!(disc.area() > 3.1);
//!
//! let line = factory.create_line_string(&[Coordinate::xy(0.0, 0.0), Coordinate::xy(1.0, 1.0)])?;
//! assert_eq!(line.num_points(), 2);
//! # Ok::<(), planar::GeometryError>(())
//! ```

use crate::algorithm::simplify;
use crate::buffer::{self, BufferParameters};
use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::geom::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use crate::index::StrTree;
use crate::io::WktWriter;
use crate::overlay;
use crate::relate::{self, IntersectionMatrix};
use planar_types::{Coordinate, CoordinateSequence, Envelope};

/// Creates geometries and runs operations against one [`Config`].
///
/// The plain [`Geometry`] methods use `Config::default()`; a factory carries
/// its own limits, snap tolerance, buffer parameters and WKT precision.
#[derive(Debug, Clone, Default)]
pub struct GeometryFactory {
    config: Config,
}

impl GeometryFactory {
    /// Factory with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with a checked configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(GeometryError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create_point(&self, x: f64, y: f64) -> Result<Point> {
        Point::new(Coordinate::xy(x, y))
    }

    pub fn create_point_z(&self, x: f64, y: f64, z: f64) -> Result<Point> {
        Point::new(Coordinate::xyz(x, y, z))
    }

    pub fn create_point_zm(&self, x: f64, y: f64, z: f64, m: f64) -> Result<Point> {
        Point::new(Coordinate::xyzm(x, y, z, m))
    }

    /// LineString through `coords`; all coordinates must share one dimension.
    pub fn create_line_string(&self, coords: &[Coordinate]) -> Result<LineString> {
        LineString::new(self.sequence(coords)?)
    }

    pub fn create_linear_ring(&self, coords: &[Coordinate]) -> Result<LinearRing> {
        LinearRing::new(self.sequence(coords)?)
    }

    pub fn create_polygon(&self, shell: LinearRing, holes: Vec<LinearRing>) -> Result<Polygon> {
        Polygon::new(shell, holes)
    }

    pub fn create_multi_point(&self, points: Vec<Point>) -> MultiPoint {
        MultiPoint::new(points)
    }

    pub fn create_multi_line_string(&self, lines: Vec<LineString>) -> MultiLineString {
        MultiLineString::new(lines)
    }

    pub fn create_multi_polygon(&self, polygons: Vec<Polygon>) -> MultiPolygon {
        MultiPolygon::new(polygons)
    }

    pub fn create_geometry_collection(&self, geometries: Vec<Geometry>) -> GeometryCollection {
        GeometryCollection::new(geometries)
    }

    /// Envelope from its bounds, in either order.
    pub fn create_envelope(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Envelope {
        Envelope::new(min_x, max_x, min_y, max_y)
    }

    /// Smallest geometry covering `envelope`: an empty point for a null
    /// envelope, a point or line when it is degenerate, else a rectangle.
    pub fn to_geometry(&self, envelope: &Envelope) -> Geometry {
        Geometry::of_envelope(envelope)
    }

    fn sequence(&self, coords: &[Coordinate]) -> Result<CoordinateSequence> {
        overlay::check_complexity(coords.len(), &self.config)?;
        Ok(CoordinateSequence::try_from_coordinates(coords)?)
    }

    pub fn relate(&self, a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix> {
        relate::relate_with_config(a, b, &self.config)
    }

    pub fn union(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        overlay::union(a, b, &self.config)
    }

    pub fn intersection(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        overlay::intersection(a, b, &self.config)
    }

    pub fn difference(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        overlay::difference(a, b, &self.config)
    }

    pub fn sym_difference(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        overlay::sym_difference(a, b, &self.config)
    }

    pub fn unary_union(&self, geometry: &Geometry) -> Result<Geometry> {
        overlay::unary_union(geometry, &self.config)
    }

    /// Buffer with the configured [`BufferParameters`].
    pub fn buffer(&self, geometry: &Geometry, distance: f64) -> Result<Geometry> {
        buffer::buffer(geometry, distance, &self.config.buffer, &self.config)
    }

    pub fn buffer_with_params(
        &self,
        geometry: &Geometry,
        distance: f64,
        params: &BufferParameters,
    ) -> Result<Geometry> {
        buffer::buffer(geometry, distance, params, &self.config)
    }

    pub fn offset_curve(&self, geometry: &Geometry, distance: f64) -> Result<Geometry> {
        buffer::offset_curve(geometry, distance, &self.config.buffer)
    }

    pub fn simplify(&self, geometry: &Geometry, tolerance: f64) -> Result<Geometry> {
        simplify::simplify(geometry, tolerance, &self.config)
    }

    /// Empty tree with the configured node capacity.
    pub fn create_strtree<T>(&self) -> StrTree<T> {
        StrTree::with_node_capacity(self.config.strtree_node_capacity)
    }

    /// WKT writer honouring the configured precision.
    pub fn wkt_writer(&self) -> WktWriter {
        match self.config.wkt_precision {
            Some(decimals) => WktWriter::new().with_precision(decimals),
            None => WktWriter::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FactoryBuilder;
    use crate::io::WktReader;
    use planar_types::Dimension;

    fn ring(factory: &GeometryFactory, xy: &[(f64, f64)]) -> LinearRing {
        let coords: Vec<Coordinate> = xy.iter().map(|&c| c.into()).collect();
        factory.create_linear_ring(&coords).unwrap()
    }

    #[test]
    fn test_create_points() {
        let factory = GeometryFactory::new();
        let p = factory.create_point(1.0, 2.0).unwrap();
        assert_eq!(p.coordinate(), Some(Coordinate::xy(1.0, 2.0)));
        let z = factory.create_point_z(1.0, 2.0, 3.0).unwrap();
        assert_eq!(z.sequence().dimension(), Dimension::Xyz);
        let zm = factory.create_point_zm(1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(zm.coordinate().and_then(|c| c.m), Some(4.0));
        assert!(factory.create_point(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_create_polygon_with_hole() {
        let factory = GeometryFactory::new();
        let shell = ring(
            &factory,
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
        );
        let hole = ring(
            &factory,
            &[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)],
        );
        let polygon = factory.create_polygon(shell, vec![hole]).unwrap();
        assert_eq!(Geometry::from(polygon).area(), 96.0);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let factory = GeometryFactory::new();
        let open = [
            Coordinate::xy(0.0, 0.0),
            Coordinate::xy(1.0, 0.0),
            Coordinate::xy(1.0, 1.0),
            Coordinate::xy(0.0, 1.0),
        ];
        assert!(matches!(
            factory.create_linear_ring(&open),
            Err(GeometryError::InvalidGeometry(_))
        ));
        let mixed = [Coordinate::xy(0.0, 0.0), Coordinate::xyz(1.0, 0.0, 1.0)];
        assert!(factory.create_line_string(&mixed).is_err());
    }

    #[test]
    fn test_complexity_limit() {
        let factory = FactoryBuilder::new().max_coordinates(3).build().unwrap();
        let coords: Vec<Coordinate> = (0..4).map(|i| Coordinate::xy(i as f64, 0.0)).collect();
        assert_eq!(
            factory.create_line_string(&coords),
            Err(GeometryError::ComplexityLimit { count: 4, limit: 3 })
        );
    }

    #[test]
    fn test_envelope_to_geometry() {
        let factory = GeometryFactory::new();
        let env = factory.create_envelope(4.0, 0.0, 0.0, 2.0);
        assert_eq!(env.min_x(), 0.0);
        assert!(factory.to_geometry(&env).is_rectangle());
        let point = factory.create_envelope(1.0, 1.0, 1.0, 1.0);
        assert!(matches!(factory.to_geometry(&point), Geometry::Point(_)));
        let flat = factory.create_envelope(0.0, 3.0, 1.0, 1.0);
        assert!(matches!(factory.to_geometry(&flat), Geometry::LineString(_)));
        assert!(factory.to_geometry(&Envelope::null()).is_empty());
    }

    #[test]
    fn test_configured_operations() {
        let params = BufferParameters::default().with_quadrant_segments(1);
        let factory = FactoryBuilder::new()
            .buffer_parameters(params)
            .wkt_precision(1)
            .build()
            .unwrap();
        let point: Geometry = factory.create_point(0.0, 0.0).unwrap().into();
        // one segment per quadrant: a diamond
        assert!((factory.buffer(&point, 1.0).unwrap().area() - 2.0).abs() < 1e-12);

        let g = WktReader::new().read("POINT (1.26 2)").unwrap();
        assert_eq!(factory.wkt_writer().write(&g), "POINT (1.3 2)");

        let mut tree = factory.create_strtree();
        tree.insert(point.envelope(), 1);
        assert_eq!(tree.size(), 1);
    }
}
