//! Segment intersection.

use super::orientation::orientation_index;
use planar_types::{Coord, Envelope};

/// Result of intersecting two closed segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection {
    None,
    /// A single shared point. `proper` is set when it lies in the interior
    /// of both segments.
    Point { at: Coord, proper: bool },
    /// The segments overlap along `start..end`.
    Collinear { start: Coord, end: Coord },
}

impl LineIntersection {
    pub fn is_none(&self) -> bool {
        matches!(self, LineIntersection::None)
    }
}

/// True when `p` lies within the closed bounding box of segment `a-b`.
#[inline]
pub(crate) fn in_segment_box(p: Coord, a: Coord, b: Coord) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// True when `p` lies on the closed segment `a-b` (exact).
#[inline]
pub fn point_on_segment(p: Coord, a: Coord, b: Coord) -> bool {
    in_segment_box(p, a, b) && orientation_index(a, b, p) == 0
}

/// Exact intersection test for closed segments.
pub fn segments_intersect(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> bool {
    if !Envelope::of_segment(p1, p2).intersects(&Envelope::of_segment(q1, q2)) {
        return false;
    }
    let o1 = orientation_index(p1, p2, q1);
    let o2 = orientation_index(p1, p2, q2);
    if o1 != 0 && o1 == o2 {
        return false;
    }
    let o3 = orientation_index(q1, q2, p1);
    let o4 = orientation_index(q1, q2, p2);
    // collinear segments reach here only when their boxes overlap
    !(o3 != 0 && o3 == o4)
}

/// Intersect segments `p1-p2` and `q1-q2`.
///
/// The classification is exact; a computed crossing point is rounded to the
/// nearest double and clamped into the overlap of both segment boxes.
///
/// # Examples
///
/// ```
/// use planar::algorithm::intersection::{intersect_segments, LineIntersection};
/// use planar_types::Coord;
///
/// let r = intersect_segments(
///     Coord::new(0.0, 0.0),
///     Coord::new(2.0, 2.0),
///     Coord::new(0.0, 2.0),
///     Coord::new(2.0, 0.0),
/// );
/// assert_eq!(r, LineIntersection::Point { at: Coord::new(1.0, 1.0), proper: true });
/// ```
pub fn intersect_segments(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> LineIntersection {
    if !Envelope::of_segment(p1, p2).intersects(&Envelope::of_segment(q1, q2)) {
        return LineIntersection::None;
    }
    let o1 = orientation_index(p1, p2, q1);
    let o2 = orientation_index(p1, p2, q2);
    if o1 != 0 && o1 == o2 {
        return LineIntersection::None;
    }
    let o3 = orientation_index(q1, q2, p1);
    let o4 = orientation_index(q1, q2, p2);
    if o3 != 0 && o3 == o4 {
        return LineIntersection::None;
    }
    if o1 == 0 && o2 == 0 && o3 == 0 && o4 == 0 {
        return collinear_overlap(p1, p2, q1, q2);
    }
    // an endpoint touching the other segment is exact
    if o1 == 0 || o2 == 0 || o3 == 0 || o4 == 0 {
        let at = if p1 == q1 || p1 == q2 {
            p1
        } else if p2 == q1 || p2 == q2 {
            p2
        } else if o1 == 0 {
            q1
        } else if o2 == 0 {
            q2
        } else if o3 == 0 {
            p1
        } else {
            p2
        };
        return LineIntersection::Point { at, proper: false };
    }
    LineIntersection::Point {
        at: crossing_point(p1, p2, q1, q2),
        proper: true,
    }
}

fn collinear_overlap(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> LineIntersection {
    let mut inside: Vec<Coord> = Vec::with_capacity(4);
    for c in [p1, p2] {
        if in_segment_box(c, q1, q2) {
            inside.push(c);
        }
    }
    for c in [q1, q2] {
        if in_segment_box(c, p1, p2) && !inside.contains(&c) {
            inside.push(c);
        }
    }
    match inside.len() {
        0 => LineIntersection::None,
        1 => LineIntersection::Point {
            at: inside[0],
            proper: false,
        },
        _ => {
            let dir = p2 - p1;
            inside.sort_by(|a, b| (*a - p1).dot(dir).total_cmp(&(*b - p1).dot(dir)));
            let start = inside[0];
            let end = inside[inside.len() - 1];
            if start == end {
                LineIntersection::Point {
                    at: start,
                    proper: false,
                }
            } else {
                LineIntersection::Collinear { start, end }
            }
        }
    }
}

/// Crossing point of two properly intersecting segments, computed around
/// the midpoint of the overlap box for conditioning.
pub(crate) fn crossing_point(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Coord {
    let overlap = Envelope::of_segment(p1, p2).intersection(&Envelope::of_segment(q1, q2));
    let origin = overlap.centre().unwrap_or(p1);
    let a = p1 - origin;
    let b = p2 - origin;
    let c = q1 - origin;
    let d = q2 - origin;
    let r = b - a;
    let s = d - c;
    let denom = r.cross(s);
    let candidate = if denom == 0.0 {
        origin
    } else {
        let t = (c - a).cross(s) / denom;
        a + r * t + origin
    };
    if candidate.is_finite() && !overlap.is_null() {
        Coord::new(
            candidate.x.clamp(overlap.min_x(), overlap.max_x()),
            candidate.y.clamp(overlap.min_y(), overlap.max_y()),
        )
    } else {
        origin
    }
}

/// Distance from `p` to the closed segment `a-b`.
pub fn point_segment_distance(p: Coord, a: Coord, b: Coord) -> f64 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// The point of segment `a-b` closest to `p`.
pub fn closest_point_on_segment(p: Coord, a: Coord, b: Coord) -> Coord {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return a;
    }
    let t = (p - a).dot(ab) / len2;
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + ab * t
    }
}

/// Closest pair of points between two segments; first belongs to `p1-p2`.
pub fn closest_points_segments(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> (Coord, Coord) {
    match intersect_segments(p1, p2, q1, q2) {
        LineIntersection::Point { at, .. } => return (at, at),
        LineIntersection::Collinear { start, .. } => return (start, start),
        LineIntersection::None => {}
    }
    let candidates = [
        (p1, closest_point_on_segment(p1, q1, q2)),
        (p2, closest_point_on_segment(p2, q1, q2)),
        (closest_point_on_segment(q1, p1, p2), q1),
        (closest_point_on_segment(q2, p1, p2), q2),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0.distance_sq(c.1) < best.0.distance_sq(best.1) {
            best = *c;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_touching_endpoint_is_exact() {
        let r = intersect_segments(c(0.0, 0.0), c(4.0, 0.0), c(2.0, 0.0), c(2.0, 3.0));
        assert_eq!(
            r,
            LineIntersection::Point {
                at: c(2.0, 0.0),
                proper: false
            }
        );
    }

    #[test]
    fn test_collinear_overlap() {
        let r = intersect_segments(c(0.0, 0.0), c(4.0, 0.0), c(6.0, 0.0), c(2.0, 0.0));
        assert_eq!(
            r,
            LineIntersection::Collinear {
                start: c(2.0, 0.0),
                end: c(4.0, 0.0)
            }
        );
        let touch = intersect_segments(c(0.0, 0.0), c(4.0, 0.0), c(4.0, 0.0), c(6.0, 0.0));
        assert_eq!(
            touch,
            LineIntersection::Point {
                at: c(4.0, 0.0),
                proper: false
            }
        );
    }

    #[test]
    fn test_parallel_disjoint() {
        assert!(intersect_segments(c(0.0, 0.0), c(4.0, 0.0), c(0.0, 1.0), c(4.0, 1.0)).is_none());
        assert!(!segments_intersect(c(0.0, 0.0), c(4.0, 0.0), c(0.0, 1.0), c(4.0, 1.0)));
    }

    #[test]
    fn test_segment_distance() {
        assert_eq!(
            point_segment_distance(c(2.0, 3.0), c(0.0, 0.0), c(4.0, 0.0)),
            3.0
        );
        let (a, b) = closest_points_segments(c(0.0, 0.0), c(4.0, 0.0), c(6.0, 1.0), c(6.0, 5.0));
        assert_eq!(a, c(4.0, 0.0));
        assert_eq!(b, c(6.0, 1.0));
    }
}
