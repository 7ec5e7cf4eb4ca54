use crate::coordinate::Coord;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// The null envelope (the envelope of an empty geometry) is represented by
/// `min_x > max_x`; every query on it behaves as for the empty set.
///
/// # Examples
///
/// ```
/// use planar_types::{Coord, Envelope};
///
/// let env = Envelope::new(10.0, 0.0, 0.0, 5.0); // x bounds are normalized
/// assert_eq!(env.min_x(), 0.0);
/// assert!(env.contains_coord(Coord::new(10.0, 5.0)));
/// assert!(Envelope::null().is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Envelope {
    /// Create an envelope from two x bounds and two y bounds, in any order.
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            max_x: x1.max(x2),
            min_y: y1.min(y2),
            max_y: y1.max(y2),
        }
    }

    /// The envelope of the empty set.
    pub const fn null() -> Self {
        Self {
            min_x: 0.0,
            max_x: -1.0,
            min_y: 0.0,
            max_y: -1.0,
        }
    }

    /// Envelope of a single position.
    pub fn of_coord(c: Coord) -> Self {
        Self {
            min_x: c.x,
            max_x: c.x,
            min_y: c.y,
            max_y: c.y,
        }
    }

    /// Envelope spanned by two positions.
    pub fn of_segment(a: Coord, b: Coord) -> Self {
        Self::new(a.x, b.x, a.y, b.y)
    }

    /// Envelope of a set of positions (null when the iterator is empty).
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Self {
        let mut env = Self::null();
        for c in coords {
            env.expand_to_include_coord(c);
        }
        env
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Length of the shorter side.
    pub fn min_extent(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Length of the longer side.
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Centre of the box, `None` for the null envelope.
    pub fn centre(&self) -> Option<Coord> {
        if self.is_null() {
            None
        } else {
            Some(Coord::new(
                (self.min_x + self.max_x) / 2.0,
                (self.min_y + self.max_y) / 2.0,
            ))
        }
    }

    pub fn expand_to_include_coord(&mut self, c: Coord) {
        if self.is_null() {
            *self = Self::of_coord(c);
        } else {
            self.min_x = self.min_x.min(c.x);
            self.max_x = self.max_x.max(c.x);
            self.min_y = self.min_y.min(c.y);
            self.max_y = self.max_y.max(c.y);
        }
    }

    pub fn expand_to_include(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        if self.is_null() {
            *self = *other;
        } else {
            self.min_x = self.min_x.min(other.min_x);
            self.max_x = self.max_x.max(other.max_x);
            self.min_y = self.min_y.min(other.min_y);
            self.max_y = self.max_y.max(other.max_y);
        }
    }

    /// Grow (or shrink, for negative values) the box on every side.
    ///
    /// Shrinking past the centre yields the null envelope.
    pub fn expand_by(&self, distance: f64) -> Self {
        if self.is_null() {
            return *self;
        }
        let expanded = Self {
            min_x: self.min_x - distance,
            max_x: self.max_x + distance,
            min_y: self.min_y - distance,
            max_y: self.max_y + distance,
        };
        if expanded.min_x > expanded.max_x || expanded.min_y > expanded.max_y {
            Self::null()
        } else {
            expanded
        }
    }

    /// Check if this envelope intersects another (boundaries included).
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    pub fn intersects_coord(&self, c: Coord) -> bool {
        self.contains_coord(c)
    }

    /// Check if `other` lies inside this envelope (boundaries included).
    pub fn contains(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn contains_coord(&self, c: Coord) -> bool {
        !self.is_null()
            && c.x >= self.min_x
            && c.x <= self.max_x
            && c.y >= self.min_y
            && c.y <= self.max_y
    }

    /// The common part of two envelopes (null when they do not intersect).
    pub fn intersection(&self, other: &Envelope) -> Envelope {
        if !self.intersects(other) {
            return Self::null();
        }
        Self {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Euclidean distance between the boxes; 0 when they intersect.
    pub fn distance(&self, other: &Envelope) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        let dx = if self.max_x < other.min_x {
            other.min_x - self.max_x
        } else if self.min_x > other.max_x {
            self.min_x - other.max_x
        } else {
            0.0
        };
        let dy = if self.max_y < other.min_y {
            other.min_y - self.max_y
        } else if self.min_y > other.max_y {
            self.min_y - other.max_y
        } else {
            0.0
        };
        dx.hypot(dy)
    }

    /// Largest absolute ordinate value, used to scale tolerances.
    pub fn magnitude(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.min_x
            .abs()
            .max(self.max_x.abs())
            .max(self.min_y.abs())
            .max(self.max_y.abs())
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    /// Convert to a `geo::Rect`, `None` for the null envelope.
    pub fn to_rect(&self) -> Option<geo::Rect<f64>> {
        if self.is_null() {
            return None;
        }
        Some(geo::Rect::new(
            geo::coord! { x: self.min_x, y: self.min_y },
            geo::coord! { x: self.max_x, y: self.max_y },
        ))
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl From<geo::Rect<f64>> for Envelope {
    fn from(rect: geo::Rect<f64>) -> Self {
        Envelope::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_envelope() {
        let null = Envelope::null();
        assert!(null.is_null());
        assert_eq!(null.area(), 0.0);
        assert!(!null.intersects(&Envelope::new(0.0, 1.0, 0.0, 1.0)));
        assert!(null.centre().is_none());
    }

    #[test]
    fn test_expand_to_include() {
        let mut env = Envelope::null();
        env.expand_to_include_coord(Coord::new(1.0, 1.0));
        env.expand_to_include_coord(Coord::new(-1.0, 3.0));
        assert_eq!(env, Envelope::new(-1.0, 1.0, 1.0, 3.0));

        env.expand_to_include(&Envelope::new(5.0, 6.0, 0.0, 0.5));
        assert_eq!(env, Envelope::new(-1.0, 6.0, 0.0, 3.0));
    }

    #[test]
    fn test_intersects_and_contains() {
        let a = Envelope::new(0.0, 10.0, 0.0, 10.0);
        let b = Envelope::new(10.0, 20.0, 5.0, 6.0);
        let c = Envelope::new(2.0, 3.0, 2.0, 3.0);
        assert!(a.intersects(&b));
        assert!(a.contains(&c));
        assert!(!c.contains(&a));
        assert_eq!(a.intersection(&b), Envelope::new(10.0, 10.0, 5.0, 6.0));
    }

    #[test]
    fn test_distance() {
        let a = Envelope::new(0.0, 1.0, 0.0, 1.0);
        let b = Envelope::new(4.0, 5.0, 5.0, 6.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_expand_by_collapse() {
        let a = Envelope::new(0.0, 2.0, 0.0, 10.0);
        assert!(a.expand_by(-1.5).is_null());
        assert_eq!(a.expand_by(1.0), Envelope::new(-1.0, 3.0, -1.0, 11.0));
    }

    #[test]
    fn test_rect_conversion() {
        let env = Envelope::new(1.0, 2.0, 3.0, 4.0);
        let rect = env.to_rect().unwrap();
        assert_eq!(Envelope::from(rect), env);
    }
}
