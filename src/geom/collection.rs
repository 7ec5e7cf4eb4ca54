use super::{Geometry, LineString, Point, Polygon};
use once_cell::sync::OnceCell;
use planar_types::Envelope;

/// A set of points.
#[derive(Debug, Clone)]
pub struct MultiPoint {
    points: Vec<Point>,
    envelope: OnceCell<Envelope>,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            envelope: OnceCell::new(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Point::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| {
            let mut env = Envelope::null();
            for p in &self.points {
                env.expand_to_include(&p.envelope());
            }
            env
        })
    }
}

impl PartialEq for MultiPoint {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

/// A set of line strings.
#[derive(Debug, Clone)]
pub struct MultiLineString {
    lines: Vec<LineString>,
    envelope: OnceCell<Envelope>,
}

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        Self {
            lines,
            envelope: OnceCell::new(),
        }
    }

    pub fn lines(&self) -> &[LineString] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(LineString::is_empty)
    }

    /// True when every component is closed.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.lines.iter().all(LineString::is_closed)
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| {
            let mut env = Envelope::null();
            for l in &self.lines {
                env.expand_to_include(&l.envelope());
            }
            env
        })
    }
}

impl PartialEq for MultiLineString {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

/// A set of polygons.
#[derive(Debug, Clone)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    envelope: OnceCell<Envelope>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            envelope: OnceCell::new(),
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(Polygon::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| {
            let mut env = Envelope::null();
            for p in &self.polygons {
                env.expand_to_include(&p.envelope());
            }
            env
        })
    }
}

impl PartialEq for MultiPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.polygons == other.polygons
    }
}

/// A heterogeneous collection of geometries.
#[derive(Debug, Clone)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    envelope: OnceCell<Envelope>,
}

impl GeometryCollection {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            envelope: OnceCell::new(),
        }
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.iter().all(Geometry::is_empty)
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| {
            let mut env = Envelope::null();
            for g in &self.geometries {
                env.expand_to_include(&g.envelope());
            }
            env
        })
    }
}

impl PartialEq for GeometryCollection {
    fn eq(&self, other: &Self) -> bool {
        self.geometries == other.geometries
    }
}
