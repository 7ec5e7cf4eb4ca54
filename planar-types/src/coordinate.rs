use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A planar position.
///
/// This is the working type of every algorithm in the engine: orientation
/// tests, noding, buffering and measurement only look at x and y.
///
/// # Examples
///
/// ```
/// use planar_types::Coord;
///
/// let a = Coord::new(0.0, 0.0);
/// let b = Coord::new(3.0, 4.0);
/// assert_eq!(a.distance(b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn distance_sq(self, other: Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn dot(self, other: Coord) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of the two vectors.
    #[inline]
    pub fn cross(self, other: Coord) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Coord> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Coord::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// The vector rotated by +90 degrees (the left-hand normal of a direction).
    #[inline]
    pub fn perp(self) -> Coord {
        Coord::new(-self.y, self.x)
    }

    #[inline]
    pub fn midpoint(self, other: Coord) -> Coord {
        Coord::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Total lexicographic order on (x, y).
    pub fn lex_cmp(&self, other: &Coord) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Bit-exact hash key; `-0.0` and `0.0` map to the same key.
    #[inline]
    pub fn key(self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

/// Formats as `(x y)`, the way positions appear in WKT.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.x, self.y)
    }
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;

    #[inline]
    fn mul(self, rhs: f64) -> Coord {
        Coord::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (f64, f64) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

impl From<geo::Coord<f64>> for Coord {
    fn from(c: geo::Coord<f64>) -> Self {
        Coord::new(c.x, c.y)
    }
}

impl From<Coord> for geo::Coord<f64> {
    fn from(c: Coord) -> Self {
        geo::coord! { x: c.x, y: c.y }
    }
}

/// A full coordinate with optional elevation (Z) and measure (M).
///
/// Absence is explicit: `z` and `m` are `None` rather than NaN.
///
/// # Examples
///
/// ```
/// use planar_types::Coordinate;
///
/// let c = Coordinate::xyzm(1.0, 2.0, 3.0, 4.0);
/// assert_eq!(c.z, Some(3.0));
/// assert!(Coordinate::xy(1.0, 2.0).m.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl Coordinate {
    #[inline]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    #[inline]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    #[inline]
    pub const fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: Some(m),
        }
    }

    #[inline]
    pub const fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }

    /// The planar part of the coordinate.
    #[inline]
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// The dimension this coordinate naturally belongs to.
    pub fn dimension(&self) -> crate::Dimension {
        crate::Dimension::from_flags(self.z.is_some(), self.m.is_some())
    }

    /// Planar equality, ignoring Z and M.
    #[inline]
    pub fn equals_2d(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<Coord> for Coordinate {
    fn from(c: Coord) -> Self {
        Coordinate::xy(c.x, c.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::xy(x, y)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Coordinate::xyz(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_arithmetic() {
        let a = Coord::new(1.0, 2.0);
        let b = Coord::new(4.0, 6.0);
        assert_eq!(b - a, Coord::new(3.0, 4.0));
        assert_eq!((b - a).length(), 5.0);
        assert_eq!(a + b, Coord::new(5.0, 8.0));
        assert_eq!(a * 2.0, Coord::new(2.0, 4.0));
        assert_eq!(Coord::new(1.0, 0.0).perp(), Coord::new(0.0, 1.0));
        assert_eq!(Coord::new(1.0, 0.0).cross(Coord::new(0.0, 1.0)), 1.0);
    }

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new(2.0, -0.5).to_string(), "(2 -0.5)");
    }

    #[test]
    fn test_negative_zero_key() {
        assert_eq!(Coord::new(-0.0, 1.0).key(), Coord::new(0.0, 1.0).key());
    }

    #[test]
    fn test_lex_order() {
        let a = Coord::new(0.0, 5.0);
        let b = Coord::new(1.0, 0.0);
        let c = Coord::new(0.0, 6.0);
        assert_eq!(a.lex_cmp(&b), Ordering::Less);
        assert_eq!(a.lex_cmp(&c), Ordering::Less);
        assert_eq!(b.lex_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn test_coordinate_dimension() {
        use crate::Dimension;
        assert_eq!(Coordinate::xy(0.0, 0.0).dimension(), Dimension::Xy);
        assert_eq!(Coordinate::xym(0.0, 0.0, 1.0).dimension(), Dimension::Xym);
        assert_eq!(
            Coordinate::xyzm(0.0, 0.0, 1.0, 2.0).dimension(),
            Dimension::Xyzm
        );
    }

    #[test]
    fn test_geo_conversion() {
        let c: geo::Coord<f64> = Coord::new(1.5, -2.5).into();
        assert_eq!(c.x, 1.5);
        assert_eq!(Coord::from(c), Coord::new(1.5, -2.5));
    }
}
