//! Buffering and offset curves.
//!
//! A buffer is assembled from simple convex pieces: one rectangle per
//! segment, a wedge at the outside of every bend, caps at the ends of open
//! lines and discs (or squares) for points. The pieces are merged with
//! [`CascadedPolygonUnion`]. Negative distances erode areas by subtracting
//! the pieces built along their rings.
//!
//! # Examples
//!
//! ```
//! use planar::buffer::{buffer, BufferParameters, EndCapStyle};
//! use planar::io::WktReader;
//! use planar::Config;
//!
//! let line = WktReader::new().read("LINESTRING (0 0, 10 0)").unwrap();
//! let params = BufferParameters::default().with_end_cap_style(EndCapStyle::Flat);
//! let strip = buffer(&line, 1.0, &params, &Config::default()).unwrap();
//! assert!((strip.area() - 20.0).abs() < 1e-9);
//! ```

mod curve;
mod offset;
mod params;

pub use offset::offset_curve;
pub use params::{BufferParameters, EndCapStyle, JoinStyle};

use crate::config::Config;
use crate::error::{GeometryError, Result};
use crate::geom::{Geometry, Polygon};
use crate::overlay::{CascadedPolygonUnion, check_complexity, difference};
use curve::{Path, Turn, cap, circle, join, piece, square};
use planar_types::{Coord, Dimension};

fn empty_polygon() -> Geometry {
    Geometry::Polygon(Polygon::empty(Dimension::Xy))
}

pub(crate) fn check_arguments(distance: f64, params: &BufferParameters) -> Result<()> {
    if !distance.is_finite() {
        return Err(GeometryError::InvalidInput(format!(
            "buffer distance must be finite, got {}",
            distance
        )));
    }
    params.validate().map_err(GeometryError::InvalidInput)
}

/// Pieces covering everything within `distance` of a single point.
fn point_pieces(p: Coord, distance: f64, params: &BufferParameters, out: &mut Vec<Polygon>) {
    let ring = match params.end_cap_style {
        EndCapStyle::Round => circle(p, distance, params.quadrant_segments),
        EndCapStyle::Square => square(p, distance),
        EndCapStyle::Flat => return,
    };
    out.extend(piece(ring));
}

/// Pieces covering everything within `distance` of a path.
fn path_pieces(path: &Path, distance: f64, params: &BufferParameters, out: &mut Vec<Polygon>) {
    if path.is_point() {
        point_pieces(path.vertices[0], distance, params, out);
        return;
    }
    let segments = path.segments();
    if segments.is_empty() {
        return;
    }

    for s in &segments {
        let n = s.normal * distance;
        out.extend(piece(vec![s.a - n, s.b - n, s.b + n, s.a + n]));
    }

    let bends = if path.closed { segments.len() } else { segments.len() - 1 };
    for i in 0..bends {
        let incoming = &segments[i];
        let outgoing = &segments[(i + 1) % segments.len()];
        let t = curve::turn(incoming, outgoing);
        let v = incoming.b;
        for side in [1.0, -1.0] {
            if t.is_outer(side) {
                let mut wedge = vec![v];
                wedge.extend(join(
                    v,
                    incoming.normal * (side * distance),
                    outgoing.normal * (side * distance),
                    incoming.dir,
                    params,
                ));
                out.extend(piece(wedge));
            }
            if t == Turn::Reversal {
                // both sides of a half turn share one wedge
                break;
            }
        }
    }

    if !path.closed {
        let first = &segments[0];
        let last = &segments[segments.len() - 1];
        out.extend(cap(first.a, first.dir * -1.0, distance, params).and_then(piece));
        out.extend(cap(last.b, last.dir, distance, params).and_then(piece));
    }
}

/// Pieces along every ring of `polygons`, with no end caps.
fn ring_pieces(polygons: &[&Polygon], distance: f64, params: &BufferParameters) -> Vec<Polygon> {
    let mut out = Vec::new();
    for polygon in polygons {
        for ring in polygon.rings() {
            path_pieces(
                &Path::from_sequence(ring.sequence()),
                distance,
                params,
                &mut out,
            );
        }
    }
    out
}

/// Area within `distance` of `geometry`.
///
/// Points and lines with a zero or negative distance give an empty polygon;
/// areas with a zero distance give their self-union; areas eroded past
/// collapse give an empty polygon.
///
/// # Errors
///
/// `InvalidInput` for a non-finite distance or invalid parameters,
/// `ComplexityLimit` and `Topology` from the overlay.
pub fn buffer(
    geometry: &Geometry,
    distance: f64,
    params: &BufferParameters,
    config: &Config,
) -> Result<Geometry> {
    check_arguments(distance, params)?;
    check_complexity(geometry.num_points(), config)?;
    if geometry.is_empty() {
        return Ok(empty_polygon());
    }

    let parts = geometry.parts();
    if distance <= 0.0 {
        if !parts.has_area() {
            return Ok(empty_polygon());
        }
        let polygons: Vec<Polygon> = parts.polygons.iter().map(|p| (*p).clone()).collect();
        let area = CascadedPolygonUnion::union_with_config(&polygons, config)?;
        if distance == 0.0 {
            return Ok(area);
        }
        return erode(&area, -distance, params, config);
    }

    let mut pieces: Vec<Polygon> = parts.polygons.iter().map(|p| (*p).clone()).collect();
    pieces.extend(ring_pieces(&parts.polygons, distance, params));
    for seq in &parts.lines {
        path_pieces(&Path::from_sequence(seq), distance, params, &mut pieces);
    }
    for &p in &parts.points {
        point_pieces(p, distance, params, &mut pieces);
    }
    log::debug!(
        "Buffer of {} at distance {} decomposed into {} pieces",
        geometry.geometry_type(),
        distance,
        pieces.len()
    );
    if pieces.is_empty() {
        return Ok(empty_polygon());
    }
    CascadedPolygonUnion::union_with_config(&pieces, config)
}

/// Removes everything within `depth` of the boundary of a polygonal area.
fn erode(
    area: &Geometry,
    depth: f64,
    params: &BufferParameters,
    config: &Config,
) -> Result<Geometry> {
    let parts = area.parts();
    // a polygon narrower than twice the depth vanishes entirely
    let survivors: Vec<&Polygon> = parts
        .polygons
        .iter()
        .copied()
        .filter(|p| {
            let env = p.envelope();
            env.width().min(env.height()) > 2.0 * depth
        })
        .collect();
    if survivors.is_empty() {
        return Ok(empty_polygon());
    }
    let strips = ring_pieces(&survivors, depth, params);
    let kept = Geometry::from_polygons(survivors.into_iter().cloned().collect());
    if strips.is_empty() {
        return Ok(kept);
    }
    log::debug!(
        "Eroding {} polygons with {} pieces",
        kept.num_geometries(),
        strips.len()
    );
    let band = CascadedPolygonUnion::union_with_config(&strips, config)?;
    let eroded = difference(&kept, &band, config)?;
    if eroded.is_empty() {
        return Ok(empty_polygon());
    }
    Ok(eroded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn read(wkt: &str) -> Geometry {
        WktReader::new().read(wkt).unwrap()
    }

    fn buffered(wkt: &str, distance: f64, params: BufferParameters) -> Geometry {
        buffer(&read(wkt), distance, &params, &Config::default()).unwrap()
    }

    #[test]
    fn test_point_buffer_is_disc() {
        let disc = buffered("POINT (5 5)", 2.0, BufferParameters::default());
        assert_eq!(disc.geometry_type().name(), "Polygon");
        // 32-gon inscribed in the circle
        let expected = 0.5 * 32.0 * 4.0 * (2.0 * PI / 32.0).sin();
        assert_relative_eq!(disc.area(), expected, epsilon = 1e-9);
        assert!(disc.area() < PI * 4.0);
    }

    #[test]
    fn test_line_cap_styles() {
        let base = BufferParameters::default();
        let flat = buffered(
            "LINESTRING (0 0, 10 0)",
            1.0,
            base.with_end_cap_style(EndCapStyle::Flat),
        );
        assert_relative_eq!(flat.area(), 20.0, epsilon = 1e-9);
        let square = buffered(
            "LINESTRING (0 0, 10 0)",
            1.0,
            base.with_end_cap_style(EndCapStyle::Square),
        );
        assert_relative_eq!(square.area(), 24.0, epsilon = 1e-9);
        let round = buffered("LINESTRING (0 0, 10 0)", 1.0, base);
        assert!(round.area() > 23.0 && round.area() < 20.0 + PI);
    }

    #[test]
    fn test_polygon_mitre_buffer_is_square() {
        let params = BufferParameters::default().with_join_style(JoinStyle::Mitre);
        let grown = buffered("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))", 1.0, params);
        assert_relative_eq!(grown.area(), 144.0, epsilon = 1e-9);
        assert_eq!(
            grown.envelope(),
            planar_types::Envelope::new(-1.0, 11.0, -1.0, 11.0)
        );
    }

    #[test]
    fn test_negative_buffer_erodes_and_collapses() {
        let shrunk = buffered(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))",
            -1.0,
            BufferParameters::default(),
        );
        assert_relative_eq!(shrunk.area(), 64.0, epsilon = 1e-9);
        let gone = buffered(
            "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))",
            -1.0,
            BufferParameters::default(),
        );
        assert!(gone.is_empty());
        assert_eq!(gone.geometry_type().name(), "Polygon");
    }

    #[test]
    fn test_zero_and_negative_on_lines() {
        assert!(buffered("LINESTRING (0 0, 1 1)", 0.0, BufferParameters::default()).is_empty());
        assert!(buffered("POINT (0 0)", -1.0, BufferParameters::default()).is_empty());
        let same = buffered(
            "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))",
            0.0,
            BufferParameters::default(),
        );
        assert_relative_eq!(same.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bent_line_is_single_polygon() {
        let bent = buffered(
            "LINESTRING (0 0, 10 0, 10 10)",
            1.0,
            BufferParameters::default(),
        );
        assert_eq!(bent.geometry_type().name(), "Polygon");
        assert_eq!(bent.num_interior_rings().unwrap(), 0);
        assert!(bent.area() > 40.0);
    }

    fn assert_single_valid_polygon(g: &Geometry) {
        assert!(matches!(g, Geometry::Polygon(_)), "got {:?}", g.geometry_type());
        assert_eq!(g.validation_error(), None);
    }

    #[test]
    fn test_closed_line_buffer_is_polygon_with_hole() {
        let ring = buffered(
            "LINESTRING (0 0, 10 0, 10 10, 0 10, 0 0)",
            1.0,
            BufferParameters::default(),
        );
        assert_single_valid_polygon(&ring);
        assert_eq!(ring.num_interior_rings().unwrap(), 1);
        // 12 x 12 with rounded corners, less the 8 x 8 hole
        assert!((ring.area() - (80.0 - 4.0 + PI)).abs() < 0.1);
    }

    #[test]
    fn test_hole_eroded_away_by_buffer() {
        let grown = buffered(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))",
            1.5,
            BufferParameters::default(),
        );
        assert_single_valid_polygon(&grown);
        assert_eq!(grown.num_interior_rings().unwrap(), 0);
        let expected = 169.0 - 4.0 * 2.25 * (1.0 - PI / 4.0);
        assert!((grown.area() - expected).abs() < 0.1);
    }

    #[test]
    fn test_u_shaped_line_with_flat_caps_and_mitre_joins() {
        let params = BufferParameters::default()
            .with_end_cap_style(EndCapStyle::Flat)
            .with_join_style(JoinStyle::Mitre);
        let u = buffered("LINESTRING (0 0, 0 10, 10 10, 10 0)", 1.0, params);
        assert_single_valid_polygon(&u);
        assert_eq!(u.num_interior_rings().unwrap(), 0);
        // 12 x 11 block less the 8 x 9 gap
        assert_relative_eq!(u.area(), 60.0, epsilon = 1e-6);
        let round = buffered(
            "LINESTRING (0 0, 0 10, 10 10, 10 0)",
            1.0,
            BufferParameters::default(),
        );
        assert_single_valid_polygon(&round);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let point = read("POINT (0 0)");
        let config = Config::default();
        assert!(buffer(&point, f64::NAN, &BufferParameters::default(), &config).is_err());
        let bad = BufferParameters::default().with_quadrant_segments(0);
        assert!(matches!(
            buffer(&point, 1.0, &bad, &config),
            Err(GeometryError::InvalidInput(_))
        ));
    }
}
