//! A point guaranteed to lie in the interior of a geometry.
//!
//! Areas use a horizontal scan line through the middle of each polygon,
//! placed between vertex heights so it never passes through a vertex; the
//! midpoint of the widest interior section wins. Lines prefer interior
//! vertices near the centroid; points take the one nearest the centroid.

use super::centroid::centroid_coord;
use crate::geom::{Geometry, Point, Polygon};
use planar_types::{Coord, Dimension};

pub fn interior_point(geometry: &Geometry) -> Geometry {
    match interior_point_coord(geometry) {
        Some(c) => Geometry::Point(Point::from_coord_unchecked(c)),
        None => Geometry::Point(Point::empty(Dimension::Xy)),
    }
}

pub fn interior_point_coord(geometry: &Geometry) -> Option<Coord> {
    if geometry.is_empty() {
        return None;
    }
    let parts = geometry.parts();
    if parts.has_area() {
        let mut best: Option<(f64, Coord)> = None;
        for poly in &parts.polygons {
            if let Some((width, c)) = polygon_interior_point(poly) {
                if best.is_none_or(|(w, _)| width > w) {
                    best = Some((width, c));
                }
            }
        }
        if let Some((_, c)) = best {
            return Some(c);
        }
    }

    let centre = centroid_coord(geometry)?;
    let closest = |candidates: &mut dyn Iterator<Item = Coord>| {
        candidates.min_by(|a, b| a.distance_sq(centre).total_cmp(&b.distance_sq(centre)))
    };

    if !parts.lines.is_empty() {
        let mut interior = parts.lines.iter().flat_map(|s| {
            let n = s.len();
            s.coords().skip(1).take(n.saturating_sub(2))
        });
        if let Some(c) = closest(&mut interior) {
            return Some(c);
        }
        let mut ends = parts
            .lines
            .iter()
            .flat_map(|s| s.first().into_iter().chain(s.last()));
        if let Some(c) = closest(&mut ends) {
            return Some(c);
        }
    }
    closest(&mut parts.points.iter().copied())
}

/// Widest scan-line section inside one polygon, as (width, midpoint).
fn polygon_interior_point(poly: &Polygon) -> Option<(f64, Coord)> {
    let env = poly.envelope();
    if env.is_null() {
        return None;
    }
    let scan_y = scan_line_y(poly, (env.min_y() + env.max_y()) / 2.0);

    let mut crossings: Vec<f64> = Vec::new();
    for ring in poly.rings() {
        let coords: Vec<Coord> = ring.coords().collect();
        for w in coords.windows(2) {
            let (a, b) = (w[0], w[1]);
            if (a.y > scan_y) == (b.y > scan_y) {
                continue;
            }
            let t = (scan_y - a.y) / (b.y - a.y);
            crossings.push(a.x + t * (b.x - a.x));
        }
    }
    if crossings.len() < 2 {
        // zero-height polygon: fall back to its first vertex
        return poly.exterior().coords().next().map(|c| (0.0, c));
    }
    crossings.sort_by(f64::total_cmp);
    let mut best: Option<(f64, Coord)> = None;
    for pair in crossings.chunks_exact(2) {
        let width = pair[1] - pair[0];
        if best.is_none_or(|(w, _)| width > w) {
            best = Some((width, Coord::new((pair[0] + pair[1]) / 2.0, scan_y)));
        }
    }
    best
}

/// A y near `centre_y` strictly between vertex heights.
fn scan_line_y(poly: &Polygon, centre_y: f64) -> f64 {
    let mut below = f64::NEG_INFINITY;
    let mut above = f64::INFINITY;
    let mut exact = false;
    for ring in poly.rings() {
        for c in ring.coords() {
            if c.y == centre_y {
                exact = true;
            } else if c.y < centre_y {
                below = below.max(c.y);
            } else {
                above = above.min(c.y);
            }
        }
    }
    if !exact {
        return centre_y;
    }
    // a vertex sits on the centre line: move halfway to the next height
    if above.is_finite() {
        (centre_y + above) / 2.0
    } else if below.is_finite() {
        (centre_y + below) / 2.0
    } else {
        centre_y
    }
}
