//! Noding: split segments at every mutual intersection.
//!
//! Candidate pairs come from an `rstar` R-tree over segment envelopes.
//! Touches and collinear overlaps split at existing vertices, so they are
//! exact; proper crossings produce a computed point, which is snapped to a
//! nearby segment endpoint or an already computed node when it lies within
//! the snap tolerance. Passes repeat until a pass finds nothing to split.

use crate::algorithm::intersection::{crossing_point, in_segment_box};
use crate::algorithm::orientation::orientation_index;
use crate::error::{GeometryError, Result};
use planar_types::{Coord, Envelope};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A directed segment tagged with the input component it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub a: Coord,
    pub b: Coord,
    pub source: u32,
}

type SegmentRect = GeomWithData<Rectangle<[f64; 2]>, usize>;

fn rect(a: Coord, b: Coord) -> SegmentRect {
    let env = Envelope::of_segment(a, b);
    GeomWithData::new(
        Rectangle::from_corners([env.min_x(), env.min_y()], [env.max_x(), env.max_y()]),
        0,
    )
}

/// Lookup of computed intersection points on a uniform grid.
struct NodeSnapper {
    tolerance: f64,
    cells: FxHashMap<(i64, i64), SmallVec<[Coord; 2]>>,
}

impl NodeSnapper {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: FxHashMap::default(),
        }
    }

    fn cell(&self, c: Coord) -> (i64, i64) {
        (
            (c.x / self.tolerance).floor() as i64,
            (c.y / self.tolerance).floor() as i64,
        )
    }

    /// Return an existing node within tolerance, or register `c`.
    fn snap(&mut self, c: Coord) -> Coord {
        if self.tolerance <= 0.0 {
            return c;
        }
        let (cx, cy) = self.cell(c);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(nodes) = self.cells.get(&(cx + dx, cy + dy)) {
                    if let Some(n) = nodes.iter().find(|n| n.distance(c) <= self.tolerance) {
                        return *n;
                    }
                }
            }
        }
        self.cells.entry((cx, cy)).or_default().push(c);
        c
    }
}

pub(crate) struct Noder {
    tolerance: f64,
    max_iterations: usize,
}

impl Noder {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Node `segments` against each other and against isolated `points`.
    ///
    /// Zero-length segments are dropped. Fails with a topology error when
    /// the configured number of passes does not reach a fully noded set.
    pub fn node(&self, segments: Vec<Segment>, points: &[Coord]) -> Result<Vec<Segment>> {
        let mut current: Vec<Segment> = segments.into_iter().filter(|s| s.a != s.b).collect();
        let mut snapper = NodeSnapper::new(self.tolerance);
        for iteration in 0..self.max_iterations {
            let splits = self.find_splits(&current, points, &mut snapper);
            let split_count: usize = splits.iter().map(SmallVec::len).sum();
            if split_count == 0 {
                log::debug!(
                    "Noded {} segments in {} pass(es)",
                    current.len(),
                    iteration + 1
                );
                return Ok(current);
            }
            if iteration > 0 {
                log::debug!(
                    "Noding pass {} found {} new split points",
                    iteration + 1,
                    split_count
                );
            }
            current = apply_splits(&current, splits);
        }
        log::warn!(
            "Noding did not converge after {} passes",
            self.max_iterations
        );
        Err(GeometryError::topology(format!(
            "noding did not converge after {} passes",
            self.max_iterations
        )))
    }

    fn snap_to_endpoints(&self, p: Coord, s: &Segment, t: &Segment) -> Option<Coord> {
        if self.tolerance <= 0.0 {
            return None;
        }
        [s.a, s.b, t.a, t.b]
            .into_iter()
            .filter(|e| e.distance(p) <= self.tolerance)
            .min_by(|x, y| x.distance(p).total_cmp(&y.distance(p)))
    }

    fn find_splits(
        &self,
        segs: &[Segment],
        points: &[Coord],
        snapper: &mut NodeSnapper,
    ) -> Vec<SmallVec<[Coord; 2]>> {
        let mut splits: Vec<SmallVec<[Coord; 2]>> = vec![SmallVec::new(); segs.len()];
        let tree: RTree<SegmentRect> = RTree::bulk_load(
            segs.iter()
                .enumerate()
                .map(|(i, s)| {
                    let mut r = rect(s.a, s.b);
                    r.data = i;
                    r
                })
                .collect(),
        );

        for (i, s) in segs.iter().enumerate() {
            let env = Envelope::of_segment(s.a, s.b);
            let query = AABB::from_corners([env.min_x(), env.min_y()], [env.max_x(), env.max_y()]);
            for cand in tree.locate_in_envelope_intersecting(&query) {
                let j = cand.data;
                if j <= i {
                    continue;
                }
                let t = &segs[j];
                self.intersect_pair(s, t, i, j, &mut splits, snapper);
            }
        }

        for &p in points {
            let query = AABB::from_corners([p.x, p.y], [p.x, p.y]);
            for cand in tree.locate_in_envelope_intersecting(&query) {
                let s = &segs[cand.data];
                if p != s.a && p != s.b && orientation_index(s.a, s.b, p) == 0 {
                    splits[cand.data].push(p);
                }
            }
        }
        splits
    }

    fn intersect_pair(
        &self,
        s: &Segment,
        t: &Segment,
        i: usize,
        j: usize,
        splits: &mut [SmallVec<[Coord; 2]>],
        snapper: &mut NodeSnapper,
    ) {
        let o1 = orientation_index(s.a, s.b, t.a);
        let o2 = orientation_index(s.a, s.b, t.b);
        if o1 != 0 && o1 == o2 {
            return;
        }
        let o3 = orientation_index(t.a, t.b, s.a);
        let o4 = orientation_index(t.a, t.b, s.b);
        if o3 != 0 && o3 == o4 {
            return;
        }

        // an endpoint of one segment on the interior of the other
        let mut touched = false;
        for (o, p) in [(o1, t.a), (o2, t.b)] {
            if o == 0 && p != s.a && p != s.b && in_segment_box(p, s.a, s.b) {
                splits[i].push(p);
                touched = true;
            }
        }
        for (o, p) in [(o3, s.a), (o4, s.b)] {
            if o == 0 && p != t.a && p != t.b && in_segment_box(p, t.a, t.b) {
                splits[j].push(p);
                touched = true;
            }
        }
        if touched || o1 == 0 || o2 == 0 || o3 == 0 || o4 == 0 {
            return;
        }

        // proper crossing
        let raw = crossing_point(s.a, s.b, t.a, t.b);
        let p = match self.snap_to_endpoints(raw, s, t) {
            Some(e) => e,
            None => snapper.snap(raw),
        };
        if p != s.a && p != s.b {
            splits[i].push(p);
        }
        if p != t.a && p != t.b {
            splits[j].push(p);
        }
    }
}

/// Cut every segment at its split points, ordered along the segment.
fn apply_splits(segs: &[Segment], splits: Vec<SmallVec<[Coord; 2]>>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segs.len() + splits.iter().map(SmallVec::len).sum::<usize>());
    for (s, mut pts) in segs.iter().zip(splits) {
        if pts.is_empty() {
            out.push(*s);
            continue;
        }
        let dir = s.b - s.a;
        pts.sort_by(|p, q| (*p - s.a).dot(dir).total_cmp(&(*q - s.a).dot(dir)));
        pts.dedup();
        let mut prev = s.a;
        for p in pts {
            if p != prev && p != s.b {
                out.push(Segment {
                    a: prev,
                    b: p,
                    source: s.source,
                });
                prev = p;
            }
        }
        if prev != s.b {
            out.push(Segment {
                a: prev,
                b: s.b,
                source: s.source,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64, source: u32) -> Segment {
        Segment {
            a: Coord::new(ax, ay),
            b: Coord::new(bx, by),
            source,
        }
    }

    #[test]
    fn test_crossing_segments_split_in_four() {
        let noder = Noder::new(1e-12, 6);
        let out = noder
            .node(
                vec![seg(0.0, 0.0, 2.0, 2.0, 0), seg(0.0, 2.0, 2.0, 0.0, 1)],
                &[],
            )
            .unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|s| s.a == Coord::new(1.0, 1.0) || s.b == Coord::new(1.0, 1.0)));
    }

    #[test]
    fn test_collinear_overlap_splits_at_endpoints() {
        let noder = Noder::new(0.0, 6);
        let out = noder
            .node(
                vec![seg(0.0, 0.0, 4.0, 0.0, 0), seg(2.0, 0.0, 6.0, 0.0, 1)],
                &[],
            )
            .unwrap();
        // 0-2, 2-4 from the first; 2-4, 4-6 from the second
        assert_eq!(out.len(), 4);
        let shared: Vec<_> = out
            .iter()
            .filter(|s| s.a == Coord::new(2.0, 0.0) && s.b == Coord::new(4.0, 0.0))
            .collect();
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn test_point_splits_segment() {
        let noder = Noder::new(0.0, 6);
        let out = noder
            .node(vec![seg(0.0, 0.0, 4.0, 0.0, 0)], &[Coord::new(1.0, 0.0)])
            .unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_degenerate_segments_dropped() {
        let noder = Noder::new(0.0, 6);
        let out = noder.node(vec![seg(1.0, 1.0, 1.0, 1.0, 0)], &[]).unwrap();
        assert!(out.is_empty());
    }
}
