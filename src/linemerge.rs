//! Sewing linework into maximal LineStrings.
//!
//! Lines are joined end to end wherever exactly two of them meet, so the
//! output changes only at true junctions (degree other than two) and at free
//! ends. Closed chains whose every node has degree two come out as closed
//! LineStrings. Each merged line keeps the direction most of its pieces had.

use crate::geom::{Geometry, LineString};
use planar_types::{Coord, CoordinateSequence};
use rustc_hash::FxHashMap;

/// Merges the linear components of added geometries.
///
/// # Examples
///
/// ```
/// use planar::io::WktReader;
/// use planar::linemerge::LineMerger;
///
/// let reader = WktReader::new();
/// let mut merger = LineMerger::new();
/// merger.add(&reader.read("LINESTRING (0 0, 5 0)").unwrap());
/// merger.add(&reader.read("LINESTRING (5 0, 10 0)").unwrap());
/// merger.add(&reader.read("LINESTRING (20 20, 25 25)").unwrap());
/// assert_eq!(merger.merged_line_strings().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineMerger {
    edges: Vec<CoordinateSequence>,
}

/// One end of an edge incident to a node.
#[derive(Debug, Clone, Copy)]
struct End {
    edge: usize,
    at_start: bool,
}

impl LineMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every LineString and LinearRing found in `geometry`. Other
    /// components are ignored.
    pub fn add(&mut self, geometry: &Geometry) {
        for seq in geometry.parts().lines {
            let cleaned = seq.remove_repeated_points();
            if cleaned.len() >= 2 {
                self.edges.push(cleaned);
            }
        }
    }

    pub(crate) fn add_sequence(&mut self, seq: CoordinateSequence) {
        let cleaned = seq.remove_repeated_points();
        if cleaned.len() >= 2 {
            self.edges.push(cleaned);
        }
    }

    /// The merged lines, in the order their first edge was added.
    pub fn merged_line_strings(&self) -> Vec<LineString> {
        let mut nodes: FxHashMap<(u64, u64), Vec<End>> = FxHashMap::default();
        for (i, e) in self.edges.iter().enumerate() {
            for (at_start, c) in [(true, e.first()), (false, e.last())] {
                if let Some(c) = c {
                    nodes.entry(c.key()).or_default().push(End { edge: i, at_start });
                }
            }
        }
        let degree = |c: Option<Coord>| c.and_then(|c| nodes.get(&c.key())).map_or(0, Vec::len);

        let mut visited = vec![false; self.edges.len()];
        let mut merged = Vec::new();

        // chains start at free ends and junctions
        for (i, e) in self.edges.iter().enumerate() {
            for c in [e.first(), e.last()] {
                if visited[i] || degree(c) == 2 {
                    continue;
                }
                let Some(ends) = c.and_then(|c| nodes.get(&c.key())) else {
                    continue;
                };
                for &end in ends {
                    if !visited[end.edge] {
                        merged.push(self.trace(end, &nodes, &mut visited));
                    }
                }
            }
        }
        // whatever is left forms closed loops
        for i in 0..self.edges.len() {
            if !visited[i] {
                merged.push(self.trace(
                    End {
                        edge: i,
                        at_start: true,
                    },
                    &nodes,
                    &mut visited,
                ));
            }
        }
        log::debug!(
            "Merged {} edges into {} lines",
            self.edges.len(),
            merged.len()
        );
        merged
    }

    fn trace(
        &self,
        start: End,
        nodes: &FxHashMap<(u64, u64), Vec<End>>,
        visited: &mut [bool],
    ) -> LineString {
        let mut seq = CoordinateSequence::new(self.edges[start.edge].dimension());
        let mut forward = 0usize;
        let mut backward = 0usize;
        let mut current = start;
        loop {
            visited[current.edge] = true;
            let edge = &self.edges[current.edge];
            let piece = if current.at_start {
                forward += 1;
                edge.clone()
            } else {
                backward += 1;
                edge.reversed()
            };
            if seq.is_empty() {
                seq.extend_from(&piece);
            } else {
                seq.extend_from(&piece.slice(1, piece.len()));
            }
            let Some(end) = piece.last() else {
                break;
            };
            let next = nodes.get(&end.key()).and_then(|ends| {
                if ends.len() != 2 {
                    return None;
                }
                ends.iter().copied().find(|e| !visited[e.edge])
            });
            match next {
                Some(n) => current = n,
                None => break,
            }
        }
        if backward > forward {
            seq = seq.reversed();
        }
        LineString::from_sequence_unchecked(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;

    fn merge(wkts: &[&str]) -> Vec<LineString> {
        let reader = WktReader::new();
        let mut merger = LineMerger::new();
        for w in wkts {
            merger.add(&reader.read(w).unwrap());
        }
        merger.merged_line_strings()
    }

    #[test]
    fn test_contiguous_segments_and_disjoint_line() {
        let lines = merge(&[
            "LINESTRING (0 0, 5 0)",
            "LINESTRING (5 0, 10 0)",
            "LINESTRING (10 0, 10 5)",
            "LINESTRING (20 20, 25 25)",
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].num_points(), 4);
        assert_eq!(lines[0].start_point(), Some(Coord::new(0.0, 0.0)));
        assert_eq!(lines[0].end_point(), Some(Coord::new(10.0, 5.0)));
    }

    #[test]
    fn test_junction_stops_merging() {
        let lines = merge(&[
            "LINESTRING (0 0, 1 0)",
            "LINESTRING (1 0, 2 0)",
            "LINESTRING (1 0, 1 1)",
        ]);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_reversed_pieces_are_joined() {
        let lines = merge(&["LINESTRING (0 0, 1 0)", "LINESTRING (2 0, 1 0)"]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].num_points(), 3);
    }

    #[test]
    fn test_closed_loop() {
        let lines = merge(&[
            "LINESTRING (0 0, 1 0, 1 1)",
            "LINESTRING (1 1, 0 1, 0 0)",
        ]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_closed());
        assert_eq!(lines[0].num_points(), 5);
    }

    #[test]
    fn test_keeps_z() {
        let lines = merge(&["LINESTRING Z (0 0 1, 1 0 2)", "LINESTRING Z (1 0 2, 2 0 3)"]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].sequence().get(2).unwrap().z, Some(3.0));
    }
}
