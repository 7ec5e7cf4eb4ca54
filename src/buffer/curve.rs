//! Arc, join and cap construction shared by buffering and offset curves.

use super::params::{BufferParameters, EndCapStyle, JoinStyle};
use crate::algorithm::orientation::signed_area;
use crate::geom::Polygon;
use planar_types::{Coord, CoordinateSequence};
use std::f64::consts::{FRAC_PI_2, PI};

/// Relative tolerance under which two segment directions count as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// A polyline with repeated vertices removed. Closed paths list each vertex
/// once; the closing segment is implied.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    pub vertices: Vec<Coord>,
    pub closed: bool,
}

/// One directed segment with its unit direction and left normal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Seg {
    pub a: Coord,
    pub b: Coord,
    pub dir: Coord,
    pub normal: Coord,
}

impl Path {
    pub fn from_sequence(seq: &CoordinateSequence) -> Self {
        let mut vertices = seq.remove_repeated_points().to_coords();
        let closed = vertices.len() >= 4 && vertices.first() == vertices.last();
        if closed {
            vertices.pop();
        }
        Self { vertices, closed }
    }

    /// A path whose vertices all coincide.
    pub fn is_point(&self) -> bool {
        self.vertices.len() == 1
    }

    pub fn segments(&self) -> Vec<Seg> {
        let n = self.vertices.len();
        let count = if self.closed { n } else { n.saturating_sub(1) };
        (0..count)
            .filter_map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                let dir = (b - a).normalized()?;
                Some(Seg {
                    a,
                    b,
                    dir,
                    normal: dir.perp(),
                })
            })
            .collect()
    }
}

/// How the outside of a buffered path turns at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Turn {
    Straight,
    Left,
    Right,
    Reversal,
}

pub(crate) fn turn(incoming: &Seg, outgoing: &Seg) -> Turn {
    let cross = incoming.dir.cross(outgoing.dir);
    if cross.abs() <= PARALLEL_EPS {
        if incoming.dir.dot(outgoing.dir) > 0.0 {
            Turn::Straight
        } else {
            Turn::Reversal
        }
    } else if cross > 0.0 {
        Turn::Left
    } else {
        Turn::Right
    }
}

impl Turn {
    /// Whether the side with sign `side` (+1 left, -1 right) is on the
    /// outside of the bend.
    pub fn is_outer(self, side: f64) -> bool {
        match self {
            Turn::Straight => false,
            Turn::Reversal => true,
            Turn::Left => side < 0.0,
            Turn::Right => side > 0.0,
        }
    }
}

/// Signed angle from `s` to `e`. A half turn is resolved towards `through`.
fn sweep(s: Coord, e: Coord, through: Coord) -> f64 {
    let angle = s.cross(e).atan2(s.dot(e));
    if PI - angle.abs() < PARALLEL_EPS {
        let sign = s.cross(through);
        if sign < 0.0 { -PI } else { PI }
    } else {
        angle
    }
}

/// Points on the arc around `center` from `center + s` to `center + e`,
/// both included, sweeping `angle` radians.
pub(crate) fn arc(
    center: Coord,
    s: Coord,
    e: Coord,
    angle: f64,
    quadrant_segments: usize,
) -> Vec<Coord> {
    let step = FRAC_PI_2 / quadrant_segments as f64;
    let n = ((angle.abs() / step).ceil() as usize).max(1);
    let radius = s.length();
    let start = s.y.atan2(s.x);
    let mut out = Vec::with_capacity(n + 1);
    out.push(center + s);
    for i in 1..n {
        let a = start + angle * i as f64 / n as f64;
        out.push(Coord::new(center.x + radius * a.cos(), center.y + radius * a.sin()));
    }
    out.push(center + e);
    out
}

/// Closed circle of `4 * quadrant_segments` segments.
pub(crate) fn circle(center: Coord, radius: f64, quadrant_segments: usize) -> Vec<Coord> {
    let n = 4 * quadrant_segments;
    let step = 2.0 * PI / n as f64;
    let mut out: Vec<Coord> = (0..n)
        .map(|i| {
            let a = step * i as f64;
            Coord::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect();
    out.push(out[0]);
    out
}

/// Outer corner at `v` from `v + s` to `v + e`, both included.
///
/// `through` is the incoming direction, used to pick the side of a half
/// turn.
pub(crate) fn join(
    v: Coord,
    s: Coord,
    e: Coord,
    through: Coord,
    params: &BufferParameters,
) -> Vec<Coord> {
    match params.join_style {
        JoinStyle::Round => arc(v, s, e, sweep(s, e, through), params.quadrant_segments),
        JoinStyle::Mitre => {
            // cosine of the turn angle; the mitre tip is (s + e) / (1 + cos)
            let cos = s.dot(e) / s.dot(s);
            let ratio = (2.0 / (1.0 + cos)).sqrt();
            if cos > PARALLEL_EPS - 1.0 && ratio <= params.mitre_limit {
                vec![v + s, v + (s + e) * (1.0 / (1.0 + cos)), v + e]
            } else {
                vec![v + s, v + e]
            }
        }
        JoinStyle::Bevel => vec![v + s, v + e],
    }
}

/// End cap polygon ring at `p` for a segment with unit direction `dir`
/// pointing away from the path.
pub(crate) fn cap(
    p: Coord,
    dir: Coord,
    distance: f64,
    params: &BufferParameters,
) -> Option<Vec<Coord>> {
    let n = dir.perp() * distance;
    match params.end_cap_style {
        EndCapStyle::Flat => None,
        EndCapStyle::Round => {
            let mut ring = arc(
                p,
                n,
                n * -1.0,
                sweep(n, n * -1.0, dir),
                params.quadrant_segments,
            );
            ring.push(ring[0]);
            Some(ring)
        }
        EndCapStyle::Square => {
            let t = dir * distance;
            Some(vec![p + n, p + n + t, p - n + t, p - n, p + n])
        }
    }
}

/// Square of side `2 * distance` around `p`.
pub(crate) fn square(p: Coord, distance: f64) -> Vec<Coord> {
    vec![
        Coord::new(p.x - distance, p.y - distance),
        Coord::new(p.x + distance, p.y - distance),
        Coord::new(p.x + distance, p.y + distance),
        Coord::new(p.x - distance, p.y + distance),
        Coord::new(p.x - distance, p.y - distance),
    ]
}

/// Closes and orients a ring counter-clockwise. Rings without area give
/// `None`.
pub(crate) fn piece(mut ring: Vec<Coord>) -> Option<Polygon> {
    if ring.first() != ring.last() {
        ring.push(*ring.first()?);
    }
    ring.dedup();
    if ring.len() < 4 {
        return None;
    }
    let area = signed_area(&ring);
    if !area.is_finite() || area == 0.0 {
        return None;
    }
    if area < 0.0 {
        ring.reverse();
    }
    Polygon::from_coords(ring).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arc_endpoints_are_exact() {
        let v = Coord::new(1.0, 1.0);
        let s = Coord::new(0.0, -2.0);
        let e = Coord::new(2.0, 0.0);
        let points = arc(v, s, e, FRAC_PI_2, 8);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], v + s);
        assert_eq!(points[8], v + e);
        for p in &points {
            assert_relative_eq!(p.distance(v), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mitre_join_and_bevel_fallback() {
        let v = Coord::new(10.0, 0.0);
        let s = Coord::new(0.0, -1.0);
        let e = Coord::new(1.0, 0.0);
        let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
        let corner = join(v, s, e, Coord::new(1.0, 0.0), &params);
        assert_eq!(corner.len(), 3);
        assert_relative_eq!(corner[1].x, 11.0, epsilon = 1e-12);
        assert_relative_eq!(corner[1].y, -1.0, epsilon = 1e-12);

        let tight = params.with_mitre_limit(1.2);
        assert_eq!(join(v, s, e, Coord::new(1.0, 0.0), &tight).len(), 2);
    }

    #[test]
    fn test_piece_orients_and_rejects_degenerate() {
        let cw = vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 1.0),
            Coord::new(1.0, 1.0),
            Coord::new(1.0, 0.0),
        ];
        let polygon = piece(cw).unwrap();
        assert!(polygon.exterior().is_ccw());
        let flat = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(2.0, 0.0)];
        assert!(piece(flat).is_none());
    }

    #[test]
    fn test_path_drops_closing_vertex() {
        let seq = CoordinateSequence::from_coords([
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 0.0),
        ]);
        let path = Path::from_sequence(&seq);
        assert!(path.closed);
        assert_eq!(path.vertices.len(), 3);
        assert_eq!(path.segments().len(), 3);
    }
}
