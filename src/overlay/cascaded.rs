//! Union of many polygons by pairwise reduction over a spatial ordering.
//!
//! Polygons are packed into an [`StrTree`] and read back in leaf order, so
//! neighbours in the list are neighbours in the plane. The list is then
//! reduced pairwise: each round unions items `2i` and `2i + 1`, which keeps
//! the intermediate results small and the number of overlay calls at
//! `n - 1`.

use super::{OverlayOp, check_complexity, overlay_graph};
use crate::config::Config;
use crate::error::Result;
use crate::geom::{Dim, Geometry, Polygon};
use crate::index::StrTree;

/// Unions a set of polygons.
///
/// # Examples
///
/// ```
/// use planar::geom::{Geometry, Polygon};
/// use planar::overlay::CascadedPolygonUnion;
/// use planar_types::Envelope;
///
/// let squares: Vec<Polygon> = (0..4)
///     .map(|i| {
///         let o = i as f64 * 0.5;
///         Polygon::from_envelope(&Envelope::new(o, o + 1.0, 0.0, 1.0))
///     })
///     .collect();
/// let union = CascadedPolygonUnion::union(&squares).unwrap();
/// assert!(matches!(union, Geometry::Polygon(_)));
/// assert!((union.area() - 2.5).abs() < 1e-9);
/// ```
pub struct CascadedPolygonUnion;

impl CascadedPolygonUnion {
    /// Union with the default [`Config`].
    pub fn union(polygons: &[Polygon]) -> Result<Geometry> {
        Self::union_with_config(polygons, &Config::default())
    }

    pub fn union_with_config(polygons: &[Polygon], config: &Config) -> Result<Geometry> {
        let polygons: Vec<&Polygon> = polygons.iter().filter(|p| !p.is_empty()).collect();
        check_complexity(polygons.iter().map(|p| p.num_points()).sum(), config)?;
        if polygons.is_empty() {
            return Ok(Geometry::empty_of_dimension(Dim::Two));
        }

        let tree = StrTree::bulk_load_with_node_capacity(
            polygons
                .iter()
                .map(|p| (p.envelope(), Geometry::Polygon((*p).clone())))
                .collect(),
            config.strtree_node_capacity,
        );
        let mut items = tree.into_items_in_order();
        log::debug!("Cascaded union of {} polygons", items.len());

        while items.len() > 1 {
            let mut next = Vec::with_capacity(items.len().div_ceil(2));
            let mut iter = items.into_iter();
            while let Some(a) = iter.next() {
                match iter.next() {
                    Some(b) => next.push(union_pair(&a, &b, config)?),
                    None => next.push(a),
                }
            }
            items = next;
        }
        match items.pop() {
            // a lone input polygon still goes through the overlay to be cleaned
            Some(g @ Geometry::Polygon(_)) if polygons.len() == 1 => {
                union_pair(&g, &empty(), config)
            }
            Some(g) => Ok(g),
            None => Ok(empty()),
        }
    }
}

fn empty() -> Geometry {
    Geometry::empty_of_dimension(Dim::Two)
}

/// Union two polygonal geometries; envelope-disjoint inputs are combined
/// without an overlay.
fn union_pair(a: &Geometry, b: &Geometry, config: &Config) -> Result<Geometry> {
    if !a.is_empty() && !b.is_empty() && !a.envelope().intersects(&b.envelope()) {
        let mut polygons = polygons_of(a);
        polygons.extend(polygons_of(b));
        return Ok(Geometry::from_polygons(polygons));
    }
    overlay_graph(a, b, OverlayOp::Union, config, Dim::Two)
}

fn polygons_of(g: &Geometry) -> Vec<Polygon> {
    g.parts().polygons.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_types::Envelope;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from_envelope(&Envelope::new(x, x + size, y, y + size))
    }

    #[test]
    fn test_overlapping_squares_merge() {
        let squares = vec![
            square(0.0, 0.0, 1.0),
            square(0.5, 0.0, 1.0),
            square(0.0, 0.5, 1.0),
            square(0.5, 0.5, 1.0),
        ];
        let union = CascadedPolygonUnion::union(&squares).unwrap();
        assert!(matches!(union, Geometry::Polygon(_)));
        let area = union.area();
        assert!((area - 2.25).abs() < 1e-9);
        assert!(area < 4.0);
        assert!(area > 1.0);
    }

    #[test]
    fn test_disjoint_squares_stay_apart() {
        let squares = vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)];
        let union = CascadedPolygonUnion::union(&squares).unwrap();
        assert_eq!(union.num_geometries(), 2);
    }

    #[test]
    fn test_empty_input() {
        let union = CascadedPolygonUnion::union(&[]).unwrap();
        assert!(union.is_empty());
        assert_eq!(union.dimension(), Dim::Two);
    }

    #[test]
    fn test_many_squares_in_a_row() {
        let squares: Vec<Polygon> = (0..25).map(|i| square(i as f64 * 0.5, 0.0, 1.0)).collect();
        let union = CascadedPolygonUnion::union(&squares).unwrap();
        assert!(matches!(union, Geometry::Polygon(_)));
        assert!((union.area() - 13.0).abs() < 1e-9);
    }
}
