//! Robust orientation tests.
//!
//! Every topological decision in the engine (noding, point location, ring
//! orientation, edge ordering around nodes) goes through [`orient2d`], which
//! uses adaptive exact arithmetic and therefore never disagrees with itself
//! for nearly collinear inputs.

use planar_types::Coord;
use std::cmp::Ordering;

/// Turn direction of three points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Exact sign of the turn `a -> b -> c`, positive when counter-clockwise.
#[inline]
pub fn orient2d(a: Coord, b: Coord, c: Coord) -> f64 {
    robust::orient2d(
        robust::Coord { x: a.x, y: a.y },
        robust::Coord { x: b.x, y: b.y },
        robust::Coord { x: c.x, y: c.y },
    )
}

/// Classify the turn `a -> b -> c`.
///
/// # Examples
///
/// ```
/// use planar::algorithm::orientation::{orientation, Orientation};
/// use planar_types::Coord;
///
/// let o = orientation(Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(1.0, 1.0));
/// assert_eq!(o, Orientation::CounterClockwise);
/// ```
#[inline]
pub fn orientation(a: Coord, b: Coord, c: Coord) -> Orientation {
    let det = orient2d(a, b, c);
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Sign of the turn as -1, 0 or 1.
#[inline]
pub(crate) fn orientation_index(a: Coord, b: Coord, c: Coord) -> i8 {
    match orientation(a, b, c) {
        Orientation::CounterClockwise => 1,
        Orientation::Clockwise => -1,
        Orientation::Collinear => 0,
    }
}

/// Shoelace area of a closed ring, positive when counter-clockwise.
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    // shift to the first vertex to keep products small
    let origin = ring[0];
    let mut sum = 0.0;
    for w in ring.windows(2) {
        let p = w[0] - origin;
        let q = w[1] - origin;
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

/// Counter-clockwise test for a closed ring.
///
/// Looks at the turn at the lowest-leftmost vertex, which is always convex,
/// so the answer is exact even for rings with tiny area.
pub fn is_ccw(ring: &[Coord]) -> bool {
    // closing point is a duplicate of the first
    let n = ring.len().saturating_sub(1);
    if n < 3 {
        return false;
    }
    let mut low = 0;
    for i in 1..n {
        let c = ring[i];
        let l = ring[low];
        if c.y < l.y || (c.y == l.y && c.x < l.x) {
            low = i;
        }
    }
    let pivot = ring[low];
    let mut prev = (low + n - 1) % n;
    while ring[prev] == pivot && prev != low {
        prev = (prev + n - 1) % n;
    }
    let mut next = (low + 1) % n;
    while ring[next] == pivot && next != low {
        next = (next + 1) % n;
    }
    if ring[prev] == pivot || ring[next] == pivot || ring[prev] == ring[next] {
        return false;
    }
    match orientation(ring[prev], pivot, ring[next]) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        // flat spike at the pivot: fall back to the area sign
        Orientation::Collinear => signed_area(ring) > 0.0,
    }
}

/// Quadrant of a direction vector, counter-clockwise from +x: 0 NE, 1 NW,
/// 2 SW, 3 SE.
fn quadrant(d: Coord) -> u8 {
    match (d.x >= 0.0, d.y >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// Order the directions `origin -> p` and `origin -> q` by angle measured
/// counter-clockwise from the positive x axis.
pub(crate) fn compare_direction(origin: Coord, p: Coord, q: Coord) -> Ordering {
    let qp = quadrant(p - origin);
    let qq = quadrant(q - origin);
    if qp != qq {
        return qp.cmp(&qq);
    }
    // same quadrant: q counter-clockwise of p means p comes first
    match orientation(origin, p, q) {
        Orientation::CounterClockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
        Orientation::Collinear => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_nearly_collinear_is_consistent() {
        let a = Coord::new(0.5, 0.5);
        let b = Coord::new(12.0, 12.0);
        let c = Coord::new(24.0, 24.0);
        assert_eq!(orientation(a, b, c), Orientation::Collinear);
        let nudged = Coord::new(24.0, 24.000000000000004);
        assert_eq!(orientation(a, b, nudged), Orientation::CounterClockwise);
        assert_eq!(orientation(b, a, nudged), Orientation::Clockwise);
    }

    #[test]
    fn test_ring_orientation() {
        let ring = square();
        assert!(is_ccw(&ring));
        let rev: Vec<Coord> = ring.iter().rev().copied().collect();
        assert!(!is_ccw(&rev));
        assert_eq!(signed_area(&ring), 1.0);
        assert_eq!(signed_area(&rev), -1.0);
    }

    #[test]
    fn test_compare_direction_quadrants() {
        let o = Coord::new(0.0, 0.0);
        let east = Coord::new(1.0, 0.0);
        let north = Coord::new(0.0, 1.0);
        let south_east = Coord::new(1.0, -1.0);
        assert_eq!(compare_direction(o, east, north), Ordering::Less);
        assert_eq!(compare_direction(o, south_east, north), Ordering::Greater);
        assert_eq!(
            compare_direction(o, Coord::new(1.0, 1.0), Coord::new(2.0, 2.0)),
            Ordering::Equal
        );
    }
}
