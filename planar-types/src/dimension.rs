use serde::{Deserialize, Serialize};

/// Ordinate layout of a coordinate sequence.
///
/// The tag replaces NaN sentinels: a sequence either stores a Z (or M)
/// ordinate for every coordinate or for none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Planar x/y only.
    #[default]
    Xy,
    /// x/y plus elevation.
    Xyz,
    /// x/y plus measure.
    Xym,
    /// x/y plus elevation and measure.
    Xyzm,
}

impl Dimension {
    /// Build a dimension from Z/M presence flags.
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::Xy,
            (true, false) => Dimension::Xyz,
            (false, true) => Dimension::Xym,
            (true, true) => Dimension::Xyzm,
        }
    }

    #[inline]
    pub fn has_z(self) -> bool {
        matches!(self, Dimension::Xyz | Dimension::Xyzm)
    }

    #[inline]
    pub fn has_m(self) -> bool {
        matches!(self, Dimension::Xym | Dimension::Xyzm)
    }

    /// Number of stored ordinates per coordinate (2, 3 or 4).
    #[inline]
    pub fn ordinates(self) -> usize {
        2 + self.has_z() as usize + self.has_m() as usize
    }

    /// Number of measure ordinates (0 or 1).
    #[inline]
    pub fn measures(self) -> usize {
        self.has_m() as usize
    }

    /// Offset of the given ordinate inside one stored coordinate.
    pub(crate) fn offset(self, ordinate: Ordinate) -> Option<usize> {
        match ordinate {
            Ordinate::X => Some(0),
            Ordinate::Y => Some(1),
            Ordinate::Z if self.has_z() => Some(2),
            Ordinate::M if self.has_m() => Some(if self.has_z() { 3 } else { 2 }),
            _ => None,
        }
    }

    /// The smallest dimension holding every ordinate of both inputs.
    pub fn union(self, other: Dimension) -> Dimension {
        Dimension::from_flags(self.has_z() || other.has_z(), self.has_m() || other.has_m())
    }
}

/// Addressable ordinates of a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ordinate {
    X,
    Y,
    Z,
    M,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_round_trip() {
        for dim in [
            Dimension::Xy,
            Dimension::Xyz,
            Dimension::Xym,
            Dimension::Xyzm,
        ] {
            assert_eq!(Dimension::from_flags(dim.has_z(), dim.has_m()), dim);
        }
    }

    #[test]
    fn test_ordinate_offsets() {
        assert_eq!(Dimension::Xym.offset(Ordinate::M), Some(2));
        assert_eq!(Dimension::Xyzm.offset(Ordinate::M), Some(3));
        assert_eq!(Dimension::Xy.offset(Ordinate::Z), None);
        assert_eq!(Dimension::Xyzm.ordinates(), 4);
        assert_eq!(Dimension::Xym.measures(), 1);
    }
}
