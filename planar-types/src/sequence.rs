use crate::coordinate::{Coord, Coordinate};
use crate::dimension::{Dimension, Ordinate};
use crate::envelope::Envelope;
use serde::{Deserialize, Serialize};

/// Error returned when coordinates of different dimensions are mixed in one
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("coordinate {index} has dimension {found:?}, expected {expected:?}")]
pub struct DimensionMismatch {
    pub index: usize,
    pub expected: Dimension,
    pub found: Dimension,
}

/// An ordered sequence of coordinates sharing one [`Dimension`].
///
/// Ordinates are stored flat (`x y [z] [m]` per coordinate), so changing an
/// ordinate in place never reallocates.
///
/// # Examples
///
/// ```
/// use planar_types::{Coord, CoordinateSequence, Dimension, Ordinate};
///
/// let mut seq = CoordinateSequence::from_coords([Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);
/// assert_eq!(seq.dimension(), Dimension::Xy);
/// assert!(seq.set_ordinate(1, Ordinate::Y, 5.0));
/// assert_eq!(seq.coord(1), Coord::new(1.0, 5.0));
/// assert!(!seq.set_ordinate(1, Ordinate::Z, 5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateSequence {
    dimension: Dimension,
    ordinates: Vec<f64>,
}

impl CoordinateSequence {
    /// Create an empty sequence.
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            ordinates: Vec::new(),
        }
    }

    pub fn with_capacity(dimension: Dimension, capacity: usize) -> Self {
        Self {
            dimension,
            ordinates: Vec::with_capacity(capacity * dimension.ordinates()),
        }
    }

    /// Build an XY sequence from planar positions.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Self {
        let iter = coords.into_iter();
        let mut ordinates = Vec::with_capacity(iter.size_hint().0 * 2);
        for c in iter {
            ordinates.push(c.x);
            ordinates.push(c.y);
        }
        Self {
            dimension: Dimension::Xy,
            ordinates,
        }
    }

    /// Build a sequence from full coordinates.
    ///
    /// The first coordinate fixes the dimension; every other coordinate must
    /// carry exactly the same ordinates.
    pub fn try_from_coordinates(coords: &[Coordinate]) -> Result<Self, DimensionMismatch> {
        let dimension = coords.first().map(Coordinate::dimension).unwrap_or_default();
        let mut seq = Self::with_capacity(dimension, coords.len());
        for (index, c) in coords.iter().enumerate() {
            let found = c.dimension();
            if found != dimension {
                return Err(DimensionMismatch {
                    index,
                    expected: dimension,
                    found,
                });
            }
            seq.push(*c);
        }
        Ok(seq)
    }

    /// Build a sequence from a flat ordinate buffer; `None` if the buffer length
    /// is not a multiple of the dimension's stride.
    pub fn from_ordinates(dimension: Dimension, ordinates: Vec<f64>) -> Option<Self> {
        if ordinates.len() % dimension.ordinates() != 0 {
            return None;
        }
        Some(Self {
            dimension,
            ordinates,
        })
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    pub fn has_z(&self) -> bool {
        self.dimension.has_z()
    }

    #[inline]
    pub fn has_m(&self) -> bool {
        self.dimension.has_m()
    }

    #[inline]
    fn stride(&self) -> usize {
        self.dimension.ordinates()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ordinates.len() / self.stride()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ordinates.is_empty()
    }

    /// Flat view of the stored ordinates.
    pub fn as_ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    /// Planar position at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like slice indexing.
    #[inline]
    pub fn coord(&self, index: usize) -> Coord {
        let base = index * self.stride();
        Coord::new(self.ordinates[base], self.ordinates[base + 1])
    }

    /// Full coordinate at `index`, `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        if index >= self.len() {
            return None;
        }
        let base = index * self.stride();
        let z = self
            .dimension
            .offset(Ordinate::Z)
            .map(|o| self.ordinates[base + o]);
        let m = self
            .dimension
            .offset(Ordinate::M)
            .map(|o| self.ordinates[base + o]);
        Some(Coordinate {
            x: self.ordinates[base],
            y: self.ordinates[base + 1],
            z,
            m,
        })
    }

    /// Read one ordinate; `None` if the index is out of bounds or the sequence
    /// does not store that ordinate.
    pub fn ordinate(&self, index: usize, ordinate: Ordinate) -> Option<f64> {
        if index >= self.len() {
            return None;
        }
        let offset = self.dimension.offset(ordinate)?;
        Some(self.ordinates[index * self.stride() + offset])
    }

    /// Overwrite one ordinate in place. Returns `false` if the index is out of
    /// bounds or the ordinate is not stored.
    pub fn set_ordinate(&mut self, index: usize, ordinate: Ordinate, value: f64) -> bool {
        if index >= self.len() {
            return false;
        }
        match self.dimension.offset(ordinate) {
            Some(offset) => {
                let stride = self.stride();
                self.ordinates[index * stride + offset] = value;
                true
            }
            None => false,
        }
    }

    /// Overwrite the planar position at `index`, keeping Z and M.
    pub fn set_coord(&mut self, index: usize, c: Coord) -> bool {
        self.set_ordinate(index, Ordinate::X, c.x) && self.set_ordinate(index, Ordinate::Y, c.y)
    }

    /// Append a coordinate. Ordinates the sequence stores but the coordinate
    /// lacks are written as 0.
    pub fn push(&mut self, c: Coordinate) {
        self.ordinates.push(c.x);
        self.ordinates.push(c.y);
        if self.dimension.has_z() {
            self.ordinates.push(c.z.unwrap_or(0.0));
        }
        if self.dimension.has_m() {
            self.ordinates.push(c.m.unwrap_or(0.0));
        }
    }

    pub fn push_coord(&mut self, c: Coord) {
        self.push(Coordinate::xy(c.x, c.y));
    }

    /// Iterate planar positions.
    pub fn coords(&self) -> impl DoubleEndedIterator<Item = Coord> + ExactSizeIterator + '_ {
        self.ordinates
            .chunks_exact(self.stride())
            .map(|o| Coord::new(o[0], o[1]))
    }

    /// Iterate full coordinates.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn to_coords(&self) -> Vec<Coord> {
        self.coords().collect()
    }

    pub fn to_coordinates(&self) -> Vec<Coordinate> {
        self.iter().collect()
    }

    pub fn first(&self) -> Option<Coord> {
        if self.is_empty() {
            None
        } else {
            Some(self.coord(0))
        }
    }

    pub fn last(&self) -> Option<Coord> {
        if self.is_empty() {
            None
        } else {
            Some(self.coord(self.len() - 1))
        }
    }

    /// True when the first and last positions coincide in x/y.
    pub fn is_closed(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_coords(self.coords())
    }

    /// The same coordinates in reverse order.
    pub fn reversed(&self) -> Self {
        let stride = self.stride();
        let mut ordinates = Vec::with_capacity(self.ordinates.len());
        for chunk in self.ordinates.chunks_exact(stride).rev() {
            ordinates.extend_from_slice(chunk);
        }
        Self {
            dimension: self.dimension,
            ordinates,
        }
    }

    /// Coordinates `start..end` as a new sequence.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let stride = self.stride();
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            dimension: self.dimension,
            ordinates: self.ordinates[start * stride..end * stride].to_vec(),
        }
    }

    /// Append every coordinate of `other`, converting to this dimension.
    pub fn extend_from(&mut self, other: &CoordinateSequence) {
        if other.dimension == self.dimension {
            self.ordinates.extend_from_slice(&other.ordinates);
        } else {
            for c in other.iter() {
                self.push(c);
            }
        }
    }

    /// Copy with Z and M dropped.
    pub fn to_xy(&self) -> Self {
        Self::from_coords(self.coords())
    }

    /// Copy with consecutive duplicate positions (in x/y) collapsed.
    pub fn remove_repeated_points(&self) -> Self {
        let mut out = Self::with_capacity(self.dimension, self.len());
        let stride = self.stride();
        let mut last: Option<Coord> = None;
        for chunk in self.ordinates.chunks_exact(stride) {
            let c = Coord::new(chunk[0], chunk[1]);
            if last != Some(c) {
                out.ordinates.extend_from_slice(chunk);
                last = Some(c);
            }
        }
        out
    }

    /// Number of distinct consecutive positions.
    pub fn count_distinct(&self) -> usize {
        let mut count = 0;
        let mut last: Option<Coord> = None;
        for c in self.coords() {
            if last != Some(c) {
                count += 1;
                last = Some(c);
            }
        }
        count
    }

    /// True when every stored ordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords().all(Coord::is_finite)
    }
}

impl FromIterator<Coord> for CoordinateSequence {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self::from_coords(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_coordinates_dimension() {
        let seq = CoordinateSequence::try_from_coordinates(&[
            Coordinate::xyzm(0.0, 0.0, 1.0, 2.0),
            Coordinate::xyzm(1.0, 1.0, 3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(seq.dimension(), Dimension::Xyzm);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1), Some(Coordinate::xyzm(1.0, 1.0, 3.0, 4.0)));
        assert_eq!(seq.ordinate(0, Ordinate::M), Some(2.0));
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let err = CoordinateSequence::try_from_coordinates(&[
            Coordinate::xyz(0.0, 0.0, 1.0),
            Coordinate::xy(1.0, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.expected, Dimension::Xyz);
    }

    #[test]
    fn test_reversed_keeps_ordinates_together() {
        let seq = CoordinateSequence::try_from_coordinates(&[
            Coordinate::xym(0.0, 0.0, 10.0),
            Coordinate::xym(1.0, 2.0, 20.0),
        ])
        .unwrap();
        let rev = seq.reversed();
        assert_eq!(rev.get(0), Some(Coordinate::xym(1.0, 2.0, 20.0)));
        assert_eq!(rev.get(1), Some(Coordinate::xym(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_closed_and_repeated() {
        let seq = CoordinateSequence::from_coords([
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(0.0, 0.0),
        ]);
        assert!(seq.is_closed());
        assert_eq!(seq.remove_repeated_points().len(), 3);
        assert_eq!(seq.count_distinct(), 3);
    }

    #[test]
    fn test_from_ordinates_stride_check() {
        assert!(CoordinateSequence::from_ordinates(Dimension::Xyz, vec![1.0, 2.0]).is_none());
        let seq = CoordinateSequence::from_ordinates(Dimension::Xyz, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(seq.ordinate(0, Ordinate::Z), Some(3.0));
    }

    #[test]
    fn test_slice_and_extend() {
        let seq: CoordinateSequence = (0..5).map(|i| Coord::new(i as f64, 0.0)).collect();
        let part = seq.slice(1, 3);
        assert_eq!(
            part.to_coords(),
            vec![Coord::new(1.0, 0.0), Coord::new(2.0, 0.0)]
        );

        let mut zseq = CoordinateSequence::new(Dimension::Xyz);
        zseq.extend_from(&part);
        assert_eq!(zseq.get(0), Some(Coordinate::xyz(1.0, 0.0, 0.0)));
    }
}
