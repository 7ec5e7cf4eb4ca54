use super::LinearRing;
use crate::error::{GeometryError, Result};
use planar_types::{Coord, Dimension, Envelope};

/// An area bounded by one shell and zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    /// Create a polygon. An empty shell may not carry non-empty holes.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar::geom::{LinearRing, Polygon};
    /// use planar_types::Coord;
    ///
    /// let shell = LinearRing::from_coords([
    ///     Coord::new(0.0, 0.0),
    ///     Coord::new(4.0, 0.0),
    ///     Coord::new(4.0, 4.0),
    ///     Coord::new(0.0, 4.0),
    ///     Coord::new(0.0, 0.0),
    /// ])
    /// .unwrap();
    /// let polygon = Polygon::new(shell, vec![]).unwrap();
    /// assert_eq!(polygon.num_interior_rings(), 0);
    /// ```
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Result<Self> {
        if shell.is_empty() && holes.iter().any(|h| !h.is_empty()) {
            return Err(GeometryError::invalid("shell is empty but holes are not"));
        }
        Ok(Self { shell, holes })
    }

    /// Polygon without holes from planar shell positions.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(shell: I) -> Result<Self> {
        Self::new(LinearRing::from_coords(shell)?, Vec::new())
    }

    pub fn empty(dimension: Dimension) -> Self {
        Self {
            shell: LinearRing::empty(dimension),
            holes: Vec::new(),
        }
    }

    /// Axis-aligned rectangle covering an envelope.
    pub fn from_envelope(env: &Envelope) -> Self {
        if env.is_null() {
            return Self::empty(Dimension::Xy);
        }
        let ring = [
            Coord::new(env.min_x(), env.min_y()),
            Coord::new(env.max_x(), env.min_y()),
            Coord::new(env.max_x(), env.max_y()),
            Coord::new(env.min_x(), env.max_y()),
            Coord::new(env.min_x(), env.min_y()),
        ];
        Self {
            shell: LinearRing::from_sequence_unchecked(ring.into_iter().collect()),
            holes: Vec::new(),
        }
    }

    pub(crate) fn from_rings_unchecked(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    pub fn exterior(&self) -> &LinearRing {
        &self.shell
    }

    pub fn interiors(&self) -> &[LinearRing] {
        &self.holes
    }

    pub fn num_interior_rings(&self) -> usize {
        self.holes.len()
    }

    pub fn interior_ring_n(&self, index: usize) -> Result<&LinearRing> {
        self.holes
            .get(index)
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: self.holes.len(),
            })
    }

    /// Shell first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    pub fn envelope(&self) -> Envelope {
        self.shell.envelope()
    }

    pub fn num_points(&self) -> usize {
        self.rings().map(LinearRing::num_points).sum()
    }

    /// Shell area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(LinearRing::area).sum();
        self.shell.area() - holes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> LinearRing {
        LinearRing::from_coords(coords.iter().map(|&(x, y)| Coord::new(x, y))).unwrap()
    }

    #[test]
    fn test_area_with_hole() {
        let shell = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let hole = ring(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)]);
        let polygon = Polygon::new(shell, vec![hole]).unwrap();
        assert_eq!(polygon.area(), 96.0);
        assert_eq!(polygon.num_points(), 10);
        assert!(polygon.interior_ring_n(0).is_ok());
        assert!(matches!(
            polygon.interior_ring_n(1),
            Err(GeometryError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_empty_shell_with_hole_rejected() {
        let hole = ring(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)]);
        assert!(Polygon::new(LinearRing::empty(Dimension::Xy), vec![hole]).is_err());
    }

    #[test]
    fn test_from_envelope() {
        let polygon = Polygon::from_envelope(&Envelope::new(0.0, 2.0, 0.0, 3.0));
        assert_eq!(polygon.area(), 6.0);
        assert!(Polygon::from_envelope(&Envelope::null()).is_empty());
    }
}
