use super::check_finite;
use crate::error::{GeometryError, Result};
use planar_types::{Coord, Coordinate, CoordinateSequence, Dimension, Envelope};

/// A single position, or the empty point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    seq: CoordinateSequence,
}

impl Point {
    /// Create a point from a full coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar::geom::Point;
    /// use planar_types::Coordinate;
    ///
    /// let p = Point::new(Coordinate::xyz(1.0, 2.0, 3.0)).unwrap();
    /// assert_eq!(p.coordinate().unwrap().z, Some(3.0));
    /// ```
    pub fn new(c: Coordinate) -> Result<Self> {
        let mut seq = CoordinateSequence::with_capacity(c.dimension(), 1);
        seq.push(c);
        Self::from_sequence(seq)
    }

    pub fn from_xy(x: f64, y: f64) -> Result<Self> {
        Self::new(Coordinate::xy(x, y))
    }

    pub fn from_coord(c: Coord) -> Result<Self> {
        Self::new(Coordinate::from(c))
    }

    /// Create a point from a sequence holding zero or one coordinate.
    pub fn from_sequence(seq: CoordinateSequence) -> Result<Self> {
        if seq.len() > 1 {
            return Err(GeometryError::invalid(format!(
                "Point requires 0 or 1 coordinates, got {}",
                seq.len()
            )));
        }
        check_finite(&seq)?;
        Ok(Self { seq })
    }

    pub fn empty(dimension: Dimension) -> Self {
        Self {
            seq: CoordinateSequence::new(dimension),
        }
    }

    /// Infallible constructor for positions produced by the engine itself.
    pub(crate) fn from_coord_unchecked(c: Coord) -> Self {
        Self {
            seq: CoordinateSequence::from_coords([c]),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn coord(&self) -> Option<Coord> {
        self.seq.first()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.seq.get(0)
    }

    pub fn x(&self) -> Option<f64> {
        self.coord().map(|c| c.x)
    }

    pub fn y(&self) -> Option<f64> {
        self.coord().map(|c| c.y)
    }

    pub fn sequence(&self) -> &CoordinateSequence {
        &self.seq
    }

    pub fn envelope(&self) -> Envelope {
        self.seq.envelope()
    }
}
