use super::{Point, check_finite};
use crate::algorithm::orientation;
use crate::error::{GeometryError, Result};
use once_cell::sync::OnceCell;
use planar_types::{Coord, CoordinateSequence, Dimension, Envelope};

/// An open or closed polyline with zero or at least two points.
#[derive(Debug, Clone)]
pub struct LineString {
    seq: CoordinateSequence,
    envelope: OnceCell<Envelope>,
}

impl LineString {
    pub fn new(seq: CoordinateSequence) -> Result<Self> {
        if seq.len() == 1 {
            return Err(GeometryError::invalid(
                "LineString requires 0 or at least 2 points",
            ));
        }
        check_finite(&seq)?;
        Ok(Self {
            seq,
            envelope: OnceCell::new(),
        })
    }

    /// Build an XY line from planar positions.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Result<Self> {
        Self::new(CoordinateSequence::from_coords(coords))
    }

    pub fn empty(dimension: Dimension) -> Self {
        Self {
            seq: CoordinateSequence::new(dimension),
            envelope: OnceCell::new(),
        }
    }

    /// Constructor for sequences the engine already knows to be well formed.
    pub(crate) fn from_sequence_unchecked(seq: CoordinateSequence) -> Self {
        Self {
            seq,
            envelope: OnceCell::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn sequence(&self) -> &CoordinateSequence {
        &self.seq
    }

    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    pub fn coords(&self) -> impl DoubleEndedIterator<Item = Coord> + '_ {
        self.seq.coords()
    }

    pub fn point_n(&self, index: usize) -> Result<Point> {
        match self.seq.get(index) {
            Some(c) => Point::new(c),
            None => Err(GeometryError::IndexOutOfRange {
                index,
                len: self.seq.len(),
            }),
        }
    }

    pub fn start_point(&self) -> Option<Coord> {
        self.seq.first()
    }

    pub fn end_point(&self) -> Option<Coord> {
        self.seq.last()
    }

    pub fn is_closed(&self) -> bool {
        self.seq.is_closed()
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| self.seq.envelope())
    }

    pub fn reversed(&self) -> Self {
        Self::from_sequence_unchecked(self.seq.reversed())
    }
}

impl PartialEq for LineString {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

/// A closed, simple polyline: first and last positions are equal and it has
/// either no points or at least four.
#[derive(Debug, Clone)]
pub struct LinearRing {
    seq: CoordinateSequence,
    envelope: OnceCell<Envelope>,
}

impl LinearRing {
    /// Create a ring, checking closure and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar::geom::LinearRing;
    /// use planar_types::Coord;
    ///
    /// let open = LinearRing::from_coords([
    ///     Coord::new(0.0, 0.0),
    ///     Coord::new(1.0, 0.0),
    ///     Coord::new(1.0, 1.0),
    ///     Coord::new(0.0, 1.0),
    /// ]);
    /// assert!(open.is_err());
    /// ```
    pub fn new(seq: CoordinateSequence) -> Result<Self> {
        if !seq.is_empty() {
            if !seq.is_closed() {
                return Err(GeometryError::invalid(
                    "LinearRing points do not form a closed linestring",
                ));
            }
            if seq.len() < 4 {
                return Err(GeometryError::invalid(format!(
                    "LinearRing requires 0 or at least 4 points, got {}",
                    seq.len()
                )));
            }
        }
        check_finite(&seq)?;
        Ok(Self {
            seq,
            envelope: OnceCell::new(),
        })
    }

    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Result<Self> {
        Self::new(CoordinateSequence::from_coords(coords))
    }

    pub fn empty(dimension: Dimension) -> Self {
        Self {
            seq: CoordinateSequence::new(dimension),
            envelope: OnceCell::new(),
        }
    }

    pub(crate) fn from_sequence_unchecked(seq: CoordinateSequence) -> Self {
        Self {
            seq,
            envelope: OnceCell::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn sequence(&self) -> &CoordinateSequence {
        &self.seq
    }

    pub fn num_points(&self) -> usize {
        self.seq.len()
    }

    pub fn coords(&self) -> impl DoubleEndedIterator<Item = Coord> + '_ {
        self.seq.coords()
    }

    pub fn envelope(&self) -> Envelope {
        *self.envelope.get_or_init(|| self.seq.envelope())
    }

    /// True when the ring runs counter-clockwise (robust signed-area test).
    pub fn is_ccw(&self) -> bool {
        orientation::is_ccw(&self.seq.to_coords())
    }

    /// Enclosed area, always non-negative.
    pub fn area(&self) -> f64 {
        orientation::signed_area(&self.seq.to_coords()).abs()
    }

    pub fn reversed(&self) -> Self {
        Self::from_sequence_unchecked(self.seq.reversed())
    }

    /// View this ring as an ordinary line string.
    pub fn to_line_string(&self) -> LineString {
        LineString::from_sequence_unchecked(self.seq.clone())
    }
}

impl PartialEq for LinearRing {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 10.0),
            Coord::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_single_point_line_rejected() {
        assert!(LineString::from_coords([Coord::new(0.0, 0.0)]).is_err());
        assert!(LineString::from_coords(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_ring_validation() {
        assert!(LinearRing::from_coords(square()).is_ok());
        let short = vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(0.0, 0.0),
        ];
        assert!(matches!(
            LinearRing::from_coords(short),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let line = LineString::from_coords([Coord::new(0.0, f64::NAN), Coord::new(1.0, 1.0)]);
        assert!(line.is_err());
    }

    #[test]
    fn test_ring_orientation_and_area() {
        let ring = LinearRing::from_coords(square()).unwrap();
        assert!(ring.is_ccw());
        assert!(!ring.reversed().is_ccw());
        assert_eq!(ring.area(), 100.0);
    }

    #[test]
    fn test_envelope_cached_value() {
        let line = LineString::from_coords(square()).unwrap();
        assert_eq!(line.envelope(), Envelope::new(0.0, 10.0, 0.0, 10.0));
        assert_eq!(line.clone(), line);
    }
}
