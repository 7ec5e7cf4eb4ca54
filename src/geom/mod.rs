//! The geometry model.
//!
//! [`Geometry`] is a sum type over the eight OGC simple-feature kinds. Every
//! variant owns its coordinate sequences; collections own their components.
//! Geometries are immutable from the outside: operations that "change" a
//! geometry (`reverse`, `normalize`, `map_sequences`) return a new value.

mod collection;
mod line_string;
pub mod normalize;
mod ops;
mod point;
mod polygon;

pub use collection::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
pub use line_string::{LineString, LinearRing};
pub use point::Point;
pub use polygon::Polygon;

use crate::error::{GeometryError, Result};
use planar_types::{Coord, Coordinate, CoordinateSequence, Dimension, Envelope};
use std::fmt;

/// Topological dimension of a point set, also used for DE-9IM cells.
///
/// `False` is the dimension of the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    False,
    Zero,
    One,
    Two,
}

impl Dim {
    /// Numeric form: -1, 0, 1 or 2.
    pub fn as_i32(self) -> i32 {
        match self {
            Dim::False => -1,
            Dim::Zero => 0,
            Dim::One => 1,
            Dim::Two => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Dim::False => 'F',
            Dim::Zero => '0',
            Dim::One => '1',
            Dim::Two => '2',
        }
    }
}

/// Kind tag of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::LinearRing => "LinearRing",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Rank used when ordering components of a normalized collection.
    pub(crate) fn rank(self) -> u8 {
        match self {
            GeometryType::Point => 0,
            GeometryType::MultiPoint => 1,
            GeometryType::LineString => 2,
            GeometryType::LinearRing => 3,
            GeometryType::MultiLineString => 4,
            GeometryType::Polygon => 5,
            GeometryType::MultiPolygon => 6,
            GeometryType::GeometryCollection => 7,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any simple-feature geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

/// Components of a geometry flattened by topological dimension.
pub(crate) struct Parts<'a> {
    pub points: Vec<Coord>,
    pub lines: Vec<&'a CoordinateSequence>,
    pub polygons: Vec<&'a Polygon>,
}

impl Parts<'_> {
    pub fn has_area(&self) -> bool {
        self.polygons.iter().any(|p| !p.is_empty())
    }
}

pub(crate) fn check_finite(seq: &CoordinateSequence) -> Result<()> {
    if seq.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::invalid("coordinates must be finite"))
    }
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::LinearRing(_) => GeometryType::LinearRing,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::LinearRing(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// Topological dimension. Collections report their largest component;
    /// an empty collection reports [`Dim::False`].
    pub fn dimension(&self) -> Dim {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Dim::Zero,
            Geometry::LineString(_) | Geometry::LinearRing(_) | Geometry::MultiLineString(_) => {
                Dim::One
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Dim::Two,
            Geometry::GeometryCollection(gc) => gc
                .geometries()
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(Dim::False),
        }
    }

    /// Dimension of the boundary: points have none, closed lines have none,
    /// open lines have 0, areas have 1.
    pub fn boundary_dimension(&self) -> Dim {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Dim::False,
            Geometry::LinearRing(_) => Dim::False,
            Geometry::LineString(l) => {
                if l.is_closed() || l.is_empty() {
                    Dim::False
                } else {
                    Dim::Zero
                }
            }
            Geometry::MultiLineString(m) => {
                if m.is_closed() || m.is_empty() {
                    Dim::False
                } else {
                    Dim::Zero
                }
            }
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Dim::One,
            Geometry::GeometryCollection(gc) => gc
                .geometries()
                .iter()
                .map(Geometry::boundary_dimension)
                .max()
                .unwrap_or(Dim::False),
        }
    }

    /// Ordinate layout of the geometry: the dimension of its first non-empty
    /// coordinate sequence, or XY when there is none.
    pub fn coordinate_dimension(&self) -> Dimension {
        let mut found = None;
        self.for_each_sequence(&mut |seq| {
            if found.is_none() && !seq.is_empty() {
                found = Some(seq.dimension());
            }
        });
        found.unwrap_or_default()
    }

    pub fn envelope(&self) -> Envelope {
        match self {
            Geometry::Point(g) => g.envelope(),
            Geometry::LineString(g) => g.envelope(),
            Geometry::LinearRing(g) => g.envelope(),
            Geometry::Polygon(g) => g.envelope(),
            Geometry::MultiPoint(g) => g.envelope(),
            Geometry::MultiLineString(g) => g.envelope(),
            Geometry::MultiPolygon(g) => g.envelope(),
            Geometry::GeometryCollection(g) => g.envelope(),
        }
    }

    pub fn num_points(&self) -> usize {
        let mut count = 0;
        self.for_each_sequence(&mut |seq| count += seq.len());
        count
    }

    /// Every coordinate, shells before holes and components in order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(self.num_points());
        self.for_each_sequence(&mut |seq| out.extend(seq.iter()));
        out
    }

    /// Planar positions in the same order as [`Geometry::coordinates`].
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.num_points());
        self.for_each_sequence(&mut |seq| out.extend(seq.coords()));
        out
    }

    /// First coordinate, if any.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let mut found = None;
        self.for_each_sequence(&mut |seq| {
            if found.is_none() {
                found = seq.get(0);
            }
        });
        found
    }

    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(g) => g.points().len(),
            Geometry::MultiLineString(g) => g.lines().len(),
            Geometry::MultiPolygon(g) => g.polygons().len(),
            Geometry::GeometryCollection(g) => g.geometries().len(),
            _ => 1,
        }
    }

    /// Component `index`. Non-collections are their own single component.
    pub fn geometry_n(&self, index: usize) -> Result<Geometry> {
        let len = self.num_geometries();
        let out_of_range = GeometryError::IndexOutOfRange { index, len };
        match self {
            Geometry::MultiPoint(g) => g
                .points()
                .get(index)
                .map(|p| Geometry::Point(p.clone()))
                .ok_or(out_of_range),
            Geometry::MultiLineString(g) => g
                .lines()
                .get(index)
                .map(|l| Geometry::LineString(l.clone()))
                .ok_or(out_of_range),
            Geometry::MultiPolygon(g) => g
                .polygons()
                .get(index)
                .map(|p| Geometry::Polygon(p.clone()))
                .ok_or(out_of_range),
            Geometry::GeometryCollection(g) => {
                g.geometries().get(index).cloned().ok_or(out_of_range)
            }
            other if index == 0 => Ok(other.clone()),
            _ => Err(out_of_range),
        }
    }

    fn as_polygon(&self) -> Result<&Polygon> {
        match self {
            Geometry::Polygon(p) => Ok(p),
            other => Err(GeometryError::Type {
                expected: "Polygon",
                found: other.geometry_type().name(),
            }),
        }
    }

    pub fn exterior_ring(&self) -> Result<&LinearRing> {
        Ok(self.as_polygon()?.exterior())
    }

    pub fn num_interior_rings(&self) -> Result<usize> {
        Ok(self.as_polygon()?.num_interior_rings())
    }

    pub fn interior_ring_n(&self, index: usize) -> Result<&LinearRing> {
        self.as_polygon()?.interior_ring_n(index)
    }

    /// Visit every coordinate sequence in traversal order.
    pub fn for_each_sequence<F: FnMut(&CoordinateSequence)>(&self, f: &mut F) {
        match self {
            Geometry::Point(p) => f(p.sequence()),
            Geometry::LineString(l) => f(l.sequence()),
            Geometry::LinearRing(r) => f(r.sequence()),
            Geometry::Polygon(p) => {
                for ring in p.rings() {
                    f(ring.sequence());
                }
            }
            Geometry::MultiPoint(m) => {
                for p in m.points() {
                    f(p.sequence());
                }
            }
            Geometry::MultiLineString(m) => {
                for l in m.lines() {
                    f(l.sequence());
                }
            }
            Geometry::MultiPolygon(m) => {
                for p in m.polygons() {
                    for ring in p.rings() {
                        f(ring.sequence());
                    }
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc.geometries() {
                    g.for_each_sequence(f);
                }
            }
        }
    }

    /// Clone the geometry, hand every coordinate sequence to `f` for in-place
    /// editing, then revalidate and return the edited copy.
    ///
    /// The sequences are only reachable inside the callback; the receiver is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar::io::WktReader;
    /// use planar_types::{Coord, Ordinate};
    ///
    /// let line = WktReader::new().read("LINESTRING (0 0, 1 1)").unwrap();
    /// let shifted = line
    ///     .map_sequences(|seq| {
    ///         for i in 0..seq.len() {
    ///             let c = seq.coord(i);
    ///             seq.set_ordinate(i, Ordinate::X, c.x + 10.0);
    ///         }
    ///     })
    ///     .unwrap();
    /// assert_eq!(shifted.coords()[0], Coord::new(10.0, 0.0));
    /// assert_eq!(line.coords()[0], Coord::new(0.0, 0.0));
    /// ```
    pub fn map_sequences<F>(&self, mut f: F) -> Result<Geometry>
    where
        F: FnMut(&mut CoordinateSequence),
    {
        self.rebuild_with(&mut |seq: &CoordinateSequence| {
            let mut edited = seq.clone();
            f(&mut edited);
            edited
        })
    }

    /// Rebuild every component from transformed sequences, running the
    /// checking constructors.
    fn rebuild_with(
        &self,
        f: &mut dyn FnMut(&CoordinateSequence) -> CoordinateSequence,
    ) -> Result<Geometry> {
        fn polygon(
            p: &Polygon,
            f: &mut dyn FnMut(&CoordinateSequence) -> CoordinateSequence,
        ) -> Result<Polygon> {
            let shell = LinearRing::new(f(p.exterior().sequence()))?;
            let holes = p
                .interiors()
                .iter()
                .map(|h| LinearRing::new(f(h.sequence())))
                .collect::<Result<Vec<_>>>()?;
            Polygon::new(shell, holes)
        }

        Ok(match self {
            Geometry::Point(p) => Geometry::Point(Point::from_sequence(f(p.sequence()))?),
            Geometry::LineString(l) => Geometry::LineString(LineString::new(f(l.sequence()))?),
            Geometry::LinearRing(r) => Geometry::LinearRing(LinearRing::new(f(r.sequence()))?),
            Geometry::Polygon(p) => Geometry::Polygon(polygon(p, f)?),
            Geometry::MultiPoint(m) => Geometry::MultiPoint(MultiPoint::new(
                m.points()
                    .iter()
                    .map(|p| Point::from_sequence(f(p.sequence())))
                    .collect::<Result<_>>()?,
            )),
            Geometry::MultiLineString(m) => Geometry::MultiLineString(MultiLineString::new(
                m.lines()
                    .iter()
                    .map(|l| LineString::new(f(l.sequence())))
                    .collect::<Result<_>>()?,
            )),
            Geometry::MultiPolygon(m) => Geometry::MultiPolygon(MultiPolygon::new(
                m.polygons()
                    .iter()
                    .map(|p| polygon(p, f))
                    .collect::<Result<_>>()?,
            )),
            Geometry::GeometryCollection(gc) => {
                Geometry::GeometryCollection(GeometryCollection::new(
                    gc.geometries()
                        .iter()
                        .map(|g| g.rebuild_with(f))
                        .collect::<Result<_>>()?,
                ))
            }
        })
    }

    /// Deep structural copy.
    pub fn copy(&self) -> Geometry {
        self.clone()
    }

    /// Reverse the point order of every component, keeping the type.
    pub fn reverse(&self) -> Geometry {
        fn polygon(p: &Polygon) -> Polygon {
            Polygon::from_rings_unchecked(
                p.exterior().reversed(),
                p.interiors().iter().map(LinearRing::reversed).collect(),
            )
        }

        match self {
            Geometry::Point(p) => Geometry::Point(p.clone()),
            Geometry::LineString(l) => Geometry::LineString(l.reversed()),
            Geometry::LinearRing(r) => Geometry::LinearRing(r.reversed()),
            Geometry::Polygon(p) => Geometry::Polygon(polygon(p)),
            Geometry::MultiPoint(m) => Geometry::MultiPoint(m.clone()),
            Geometry::MultiLineString(m) => Geometry::MultiLineString(MultiLineString::new(
                m.lines().iter().map(LineString::reversed).collect(),
            )),
            Geometry::MultiPolygon(m) => Geometry::MultiPolygon(MultiPolygon::new(
                m.polygons().iter().map(polygon).collect(),
            )),
            Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(
                GeometryCollection::new(gc.geometries().iter().map(Geometry::reverse).collect()),
            ),
        }
    }

    /// Structural equality with a per-ordinate tolerance on x and y.
    pub fn equals_exact(&self, other: &Geometry, tolerance: f64) -> bool {
        if self.geometry_type() != other.geometry_type()
            || self.num_geometries() != other.num_geometries()
        {
            return false;
        }
        let mut a = Vec::new();
        let mut b = Vec::new();
        self.for_each_sequence(&mut |s| a.push(s.to_coords()));
        other.for_each_sequence(&mut |s| b.push(s.to_coords()));
        a.len() == b.len()
            && a.iter().zip(&b).all(|(sa, sb)| {
                sa.len() == sb.len()
                    && sa.iter().zip(sb).all(|(p, q)| {
                        (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance
                    })
            })
    }

    /// The envelope as a geometry: an empty point for an empty geometry, a
    /// point or line for degenerate boxes, otherwise a rectangle polygon.
    pub fn envelope_geometry(&self) -> Geometry {
        Geometry::of_envelope(&self.envelope())
    }

    /// Geometry covering `env`, degenerating the way
    /// [`envelope_geometry`](Self::envelope_geometry) does.
    pub(crate) fn of_envelope(env: &Envelope) -> Geometry {
        if env.is_null() {
            return Geometry::Point(Point::empty(Dimension::Xy));
        }
        let min = Coord::new(env.min_x(), env.min_y());
        let max = Coord::new(env.max_x(), env.max_y());
        if env.width() == 0.0 && env.height() == 0.0 {
            return Geometry::Point(Point::from_coord_unchecked(min));
        }
        if env.width() == 0.0 || env.height() == 0.0 {
            return Geometry::LineString(LineString::from_sequence_unchecked(
                CoordinateSequence::from_coords([min, max]),
            ));
        }
        Geometry::Polygon(Polygon::from_envelope(env))
    }

    /// True for a polygon whose shell is exactly its axis-aligned envelope.
    pub fn is_rectangle(&self) -> bool {
        let Geometry::Polygon(p) = self else {
            return false;
        };
        if p.is_empty() || p.num_interior_rings() != 0 || p.exterior().num_points() != 5 {
            return false;
        }
        let env = p.envelope();
        if env.width() == 0.0 || env.height() == 0.0 {
            return false;
        }
        let coords: Vec<Coord> = p.exterior().coords().collect();
        let on_corner = |c: &Coord| {
            (c.x == env.min_x() || c.x == env.max_x()) && (c.y == env.min_y() || c.y == env.max_y())
        };
        if !coords.iter().all(on_corner) {
            return false;
        }
        for i in 0..4 {
            for j in i + 1..4 {
                if coords[i] == coords[j] {
                    return false;
                }
            }
        }
        // consecutive corners must differ in exactly one ordinate
        coords
            .windows(2)
            .all(|w| (w[0].x == w[1].x) != (w[0].y == w[1].y))
    }

    /// Flatten into points, line sequences (including rings) and polygons.
    pub(crate) fn parts(&self) -> Parts<'_> {
        let mut parts = Parts {
            points: Vec::new(),
            lines: Vec::new(),
            polygons: Vec::new(),
        };
        self.collect_parts(&mut parts);
        parts
    }

    fn collect_parts<'a>(&'a self, parts: &mut Parts<'a>) {
        match self {
            Geometry::Point(p) => parts.points.extend(p.coord()),
            Geometry::LineString(l) => {
                if !l.is_empty() {
                    parts.lines.push(l.sequence());
                }
            }
            Geometry::LinearRing(r) => {
                if !r.is_empty() {
                    parts.lines.push(r.sequence());
                }
            }
            Geometry::Polygon(p) => {
                if !p.is_empty() {
                    parts.polygons.push(p);
                }
            }
            Geometry::MultiPoint(m) => {
                parts.points.extend(m.points().iter().filter_map(Point::coord))
            }
            Geometry::MultiLineString(m) => parts.lines.extend(
                m.lines()
                    .iter()
                    .filter(|l| !l.is_empty())
                    .map(LineString::sequence),
            ),
            Geometry::MultiPolygon(m) => {
                parts
                    .polygons
                    .extend(m.polygons().iter().filter(|p| !p.is_empty()));
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc.geometries() {
                    g.collect_parts(parts);
                }
            }
        }
    }

    /// Empty geometry of the given topological dimension.
    pub(crate) fn empty_of_dimension(dim: Dim) -> Geometry {
        match dim {
            Dim::Zero => Geometry::Point(Point::empty(Dimension::Xy)),
            Dim::One => Geometry::LineString(LineString::empty(Dimension::Xy)),
            Dim::Two => Geometry::Polygon(Polygon::empty(Dimension::Xy)),
            Dim::False => Geometry::GeometryCollection(GeometryCollection::new(Vec::new())),
        }
    }

    /// Assemble polygons, lines and points into the simplest geometry that
    /// holds them: a single component, a homogeneous multi-geometry, or a
    /// collection ordered polygons, lines, points.
    pub(crate) fn from_parts(
        polygons: Vec<Polygon>,
        lines: Vec<LineString>,
        points: Vec<Point>,
        empty_dim: Dim,
    ) -> Geometry {
        let kinds = usize::from(!polygons.is_empty())
            + usize::from(!lines.is_empty())
            + usize::from(!points.is_empty());
        match kinds {
            0 => Geometry::empty_of_dimension(empty_dim),
            1 => {
                if !polygons.is_empty() {
                    Geometry::from_polygons(polygons)
                } else if !lines.is_empty() {
                    Geometry::from_lines(lines)
                } else {
                    Geometry::from_points(points)
                }
            }
            _ => {
                let mut all: Vec<Geometry> = Vec::new();
                all.extend(polygons.into_iter().map(Geometry::Polygon));
                all.extend(lines.into_iter().map(Geometry::LineString));
                all.extend(points.into_iter().map(Geometry::Point));
                Geometry::GeometryCollection(GeometryCollection::new(all))
            }
        }
    }

    pub(crate) fn from_polygons(mut polygons: Vec<Polygon>) -> Geometry {
        match polygons.len() {
            0 => Geometry::Polygon(Polygon::empty(Dimension::Xy)),
            1 => Geometry::Polygon(polygons.remove(0)),
            _ => Geometry::MultiPolygon(MultiPolygon::new(polygons)),
        }
    }

    pub(crate) fn from_lines(mut lines: Vec<LineString>) -> Geometry {
        match lines.len() {
            0 => Geometry::LineString(LineString::empty(Dimension::Xy)),
            1 => Geometry::LineString(lines.remove(0)),
            _ => Geometry::MultiLineString(MultiLineString::new(lines)),
        }
    }

    pub(crate) fn from_points(mut points: Vec<Point>) -> Geometry {
        match points.len() {
            0 => Geometry::Point(Point::empty(Dimension::Xy)),
            1 => Geometry::Point(points.remove(0)),
            _ => Geometry::MultiPoint(MultiPoint::new(points)),
        }
    }
}

impl From<Point> for Geometry {
    fn from(g: Point) -> Self {
        Geometry::Point(g)
    }
}

impl From<LineString> for Geometry {
    fn from(g: LineString) -> Self {
        Geometry::LineString(g)
    }
}

impl From<LinearRing> for Geometry {
    fn from(g: LinearRing) -> Self {
        Geometry::LinearRing(g)
    }
}

impl From<Polygon> for Geometry {
    fn from(g: Polygon) -> Self {
        Geometry::Polygon(g)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(g: MultiPoint) -> Self {
        Geometry::MultiPoint(g)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(g: MultiLineString) -> Self {
        Geometry::MultiLineString(g)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(g: MultiPolygon) -> Self {
        Geometry::MultiPolygon(g)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(g: GeometryCollection) -> Self {
        Geometry::GeometryCollection(g)
    }
}
