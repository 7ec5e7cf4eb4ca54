//! Topology graph over the noded arrangement of one or two geometries.
//!
//! The graph is shared by overlay and relate. Every noded segment becomes an
//! edge between two nodes; coincident segments merge into one edge carrying
//! the union of their labels. After labeling, each edge knows, per operand,
//! where its interior lies (`on`) and which area location is found on its
//! left and right, and each node knows its location in both operands.

use super::noding::{Noder, Segment};
use crate::algorithm::locate::{IndexedPointInAreaLocator, Location};
use crate::algorithm::orientation::{compare_direction, is_ccw};
use crate::error::{GeometryError, Result};
use crate::geom::Geometry;
use planar_types::{Coord, Envelope};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
enum SourceKind {
    Line,
    Ring { interior_left: bool },
}

#[derive(Debug, Clone, Copy)]
struct Source {
    operand: usize,
    kind: SourceKind,
}

/// Area location on both sides of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sides {
    pub left: Location,
    pub right: Location,
}

impl Sides {
    fn of_ring(interior_left: bool) -> Self {
        if interior_left {
            Sides {
                left: Location::Interior,
                right: Location::Exterior,
            }
        } else {
            Sides {
                left: Location::Exterior,
                right: Location::Interior,
            }
        }
    }

    fn flipped(self) -> Self {
        Sides {
            left: self.right,
            right: self.left,
        }
    }

    /// Combine two rings of the same operand running along one edge.
    fn merge(self, other: Sides) -> Self {
        let pick = |a: Location, b: Location| {
            if a == Location::Interior || b == Location::Interior {
                Location::Interior
            } else {
                Location::Exterior
            }
        };
        Sides {
            left: pick(self.left, other.left),
            right: pick(self.right, other.right),
        }
    }

    fn is_dissolved(self) -> bool {
        self.left == self.right
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub from: usize,
    pub to: usize,
    line: [bool; 2],
    area: [Option<Sides>; 2],
    pub on: [Location; 2],
    pub left: [Location; 2],
    pub right: [Location; 2],
}

impl Edge {
    pub fn is_line(&self, operand: usize) -> bool {
        self.line[operand]
    }

    pub fn has_area_label(&self, operand: usize) -> bool {
        self.area[operand].is_some()
    }

    /// True when the edge lies on the boundary of the operand's area.
    pub fn is_area_boundary(&self, operand: usize) -> bool {
        matches!(self.area[operand], Some(s) if !s.is_dissolved())
    }

    /// Left and right locations as seen leaving `node`.
    fn sides_leaving(&self, node: usize, operand: usize) -> (Location, Location) {
        if node == self.from {
            (self.left[operand], self.right[operand])
        } else {
            (self.right[operand], self.left[operand])
        }
    }

    pub fn other_end(&self, node: usize) -> usize {
        if node == self.from { self.to } else { self.from }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub coord: Coord,
    point: [bool; 2],
    line_ends: [u32; 2],
    /// Location in each operand, counting points, lines and areas.
    pub loc: [Location; 2],
    /// Location relative to each operand's area only.
    pub area_loc: [Location; 2],
    /// Incident edges sorted counter-clockwise by direction.
    pub star: Vec<usize>,
}

impl Node {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            point: [false; 2],
            line_ends: [0; 2],
            loc: [Location::Exterior; 2],
            area_loc: [Location::Exterior; 2],
            star: Vec::new(),
        }
    }
}

/// Linework of up to two operands, ready for noding.
#[derive(Debug, Default)]
pub(crate) struct GraphInput {
    segments: Vec<Segment>,
    sources: Vec<Source>,
    points: Vec<(Coord, usize)>,
    line_ends: Vec<(Coord, usize)>,
    has_area: [bool; 2],
    envelope: Envelope,
}

impl GraphInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_path(&mut self, coords: &[Coord], source: Source) {
        let id = self.sources.len() as u32;
        self.sources.push(source);
        self.segments.extend(coords.windows(2).map(|w| Segment {
            a: w[0],
            b: w[1],
            source: id,
        }));
    }

    /// Add every component of `geometry` as operand `operand` (0 or 1).
    pub fn add(&mut self, geometry: &Geometry, operand: usize) {
        self.envelope.expand_to_include(&geometry.envelope());
        let parts = geometry.parts();
        for p in &parts.points {
            self.points.push((*p, operand));
        }
        for seq in &parts.lines {
            let mut coords = seq.to_coords();
            coords.dedup();
            if coords.len() == 1 {
                self.points.push((coords[0], operand));
                continue;
            }
            if coords.first() != coords.last() {
                if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
                    self.line_ends.push((first, operand));
                    self.line_ends.push((last, operand));
                }
            }
            self.push_path(
                &coords,
                Source {
                    operand,
                    kind: SourceKind::Line,
                },
            );
        }
        for poly in &parts.polygons {
            self.has_area[operand] = true;
            for (i, ring) in poly.rings().enumerate() {
                let mut coords: Vec<Coord> = ring.coords().collect();
                coords.dedup();
                if coords.len() < 4 {
                    continue;
                }
                let ccw = is_ccw(&coords);
                let interior_left = if i == 0 { ccw } else { !ccw };
                self.push_path(
                    &coords,
                    Source {
                        operand,
                        kind: SourceKind::Ring { interior_left },
                    },
                );
            }
        }
    }

    /// Snap tolerance scaled to the magnitude of the input coordinates.
    pub fn scaled_tolerance(&self, snap_tolerance: f64) -> f64 {
        snap_tolerance * self.envelope.magnitude().max(1.0)
    }
}

#[derive(Debug)]
pub(crate) struct TopologyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    has_area: [bool; 2],
}

impl TopologyGraph {
    /// Node the input and build the labeled graph.
    ///
    /// With `strict` set, inconsistent side labels around a node fail with
    /// `Topology`; otherwise the first consistent reading wins.
    pub fn build(input: GraphInput, noder: &Noder, strict: bool) -> Result<Self> {
        let split_points: Vec<Coord> = input.points.iter().map(|(c, _)| *c).collect();
        let noded = noder.node(input.segments, &split_points)?;

        let mut graph = TopologyGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            has_area: input.has_area,
        };
        let mut node_index: FxHashMap<(u64, u64), usize> = FxHashMap::default();
        let mut edge_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();

        for seg in &noded {
            let a = graph.node_for(&mut node_index, seg.a);
            let b = graph.node_for(&mut node_index, seg.b);
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            let e = *edge_index.entry(key).or_insert_with(|| {
                graph.edges.push(Edge {
                    from: a,
                    to: b,
                    line: [false; 2],
                    area: [None; 2],
                    on: [Location::Exterior; 2],
                    left: [Location::Exterior; 2],
                    right: [Location::Exterior; 2],
                });
                graph.edges.len() - 1
            });
            let source = input.sources[seg.source as usize];
            let edge = &mut graph.edges[e];
            match source.kind {
                SourceKind::Line => edge.line[source.operand] = true,
                SourceKind::Ring { interior_left } => {
                    let mut sides = Sides::of_ring(interior_left);
                    if edge.from != a {
                        sides = sides.flipped();
                    }
                    edge.area[source.operand] = Some(match edge.area[source.operand] {
                        Some(existing) => existing.merge(sides),
                        None => sides,
                    });
                }
            }
        }

        for &(c, operand) in &input.points {
            let n = graph.node_for(&mut node_index, c);
            graph.nodes[n].point[operand] = true;
        }
        for &(c, operand) in &input.line_ends {
            let n = graph.node_for(&mut node_index, c);
            graph.nodes[n].line_ends[operand] += 1;
        }

        for (i, edge) in graph.edges.iter().enumerate() {
            graph.nodes[edge.from].star.push(i);
            graph.nodes[edge.to].star.push(i);
        }
        for n in 0..graph.nodes.len() {
            let origin = graph.nodes[n].coord;
            let mut star = std::mem::take(&mut graph.nodes[n].star);
            star.sort_by(|&x, &y| {
                let px = graph.nodes[graph.edges[x].other_end(n)].coord;
                let py = graph.nodes[graph.edges[y].other_end(n)].coord;
                compare_direction(origin, px, py)
            });
            graph.nodes[n].star = star;
        }

        log::debug!(
            "Topology graph: {} nodes, {} edges from {} noded segments",
            graph.nodes.len(),
            graph.edges.len(),
            noded.len()
        );

        for operand in 0..2 {
            graph.label_operand(operand, strict)?;
        }
        Ok(graph)
    }

    fn node_for(&mut self, index: &mut FxHashMap<(u64, u64), usize>, c: Coord) -> usize {
        *index.entry(c.key()).or_insert_with(|| {
            self.nodes.push(Node::new(c));
            self.nodes.len() - 1
        })
    }

    fn label_operand(&mut self, operand: usize, strict: bool) -> Result<()> {
        let locator = self.has_area[operand].then(|| {
            IndexedPointInAreaLocator::from_segments(
                self.edges
                    .iter()
                    .filter(|e| e.is_area_boundary(operand))
                    .map(|e| (self.nodes[e.from].coord, self.nodes[e.to].coord))
                    .collect(),
            )
        });
        let locate_area = |p: Coord| -> Location {
            match &locator {
                Some(l) => match l.locate(p) {
                    Location::Boundary => Location::Interior,
                    loc => loc,
                },
                None => Location::Exterior,
            }
        };

        // edges: stored sides for area edges, midpoint location otherwise
        for edge in &mut self.edges {
            match edge.area[operand] {
                Some(s) if !s.is_dissolved() => {
                    edge.on[operand] = Location::Boundary;
                    edge.left[operand] = s.left;
                    edge.right[operand] = s.right;
                }
                Some(_) => {
                    edge.on[operand] = Location::Interior;
                    edge.left[operand] = Location::Interior;
                    edge.right[operand] = Location::Interior;
                }
                None => {
                    let mid = self.nodes[edge.from].coord.midpoint(self.nodes[edge.to].coord);
                    let loc = locate_area(mid);
                    edge.left[operand] = loc;
                    edge.right[operand] = loc;
                    edge.on[operand] = if edge.line[operand] {
                        Location::Interior
                    } else {
                        loc
                    };
                }
            }
        }

        // propagate side locations around nodes and check consistency
        for n in 0..self.nodes.len() {
            let star = std::mem::take(&mut self.nodes[n].star);
            let result = self.propagate_sides(n, &star, operand);
            self.nodes[n].star = star;
            if let Err(err) = result {
                if strict {
                    return Err(err);
                }
                log::debug!("Ignoring side label conflict: {}", err);
            }
        }

        // nodes
        for n in 0..self.nodes.len() {
            let node = &self.nodes[n];
            let on_area_boundary = node
                .star
                .iter()
                .any(|&e| self.edges[e].is_area_boundary(operand));
            let area_loc = if on_area_boundary {
                Location::Boundary
            } else if let Some(&e) = node.star.first() {
                self.edges[e].left[operand]
            } else {
                locate_area(node.coord)
            };
            let on_linework = node.point[operand]
                || node.line_ends[operand] > 0
                || node.star.iter().any(|&e| self.edges[e].is_line(operand));
            let loc = if on_area_boundary || node.line_ends[operand] % 2 == 1 {
                Location::Boundary
            } else if on_linework || area_loc == Location::Interior {
                Location::Interior
            } else {
                Location::Exterior
            };
            let node = &mut self.nodes[n];
            node.area_loc[operand] = area_loc;
            node.loc[operand] = loc;
        }
        Ok(())
    }

    /// Walk the star of node `n` counter-clockwise. Area-labeled edges must
    /// agree on the region between them; other edges take that region.
    fn propagate_sides(&mut self, n: usize, star: &[usize], operand: usize) -> Result<()> {
        let Some(start) = star
            .iter()
            .position(|&e| self.edges[e].has_area_label(operand))
        else {
            return Ok(());
        };
        let (mut region, _) = self.edges[star[start]].sides_leaving(n, operand);
        for step in 1..=star.len() {
            let e = star[(start + step) % star.len()];
            if self.edges[e].has_area_label(operand) {
                let (left, right) = self.edges[e].sides_leaving(n, operand);
                if right != region {
                    let c = self.nodes[n].coord;
                    return Err(GeometryError::topology(format!(
                        "side location conflict at ({} {})",
                        c.x, c.y
                    )));
                }
                region = left;
            } else {
                let edge = &mut self.edges[e];
                edge.left[operand] = region;
                edge.right[operand] = region;
                edge.on[operand] = if edge.line[operand] {
                    Location::Interior
                } else {
                    region
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::WktReader;

    fn graph(a: &str, b: &str) -> TopologyGraph {
        let reader = WktReader::new();
        let mut input = GraphInput::new();
        input.add(&reader.read(a).unwrap(), 0);
        input.add(&reader.read(b).unwrap(), 1);
        TopologyGraph::build(input, &Noder::new(1e-12, 6), true).unwrap()
    }

    #[test]
    fn test_overlapping_squares_labels() {
        let g = graph(
            "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))",
            "POLYGON ((1 1, 3 1, 3 3, 1 3, 1 1))",
        );
        // both crossing points become nodes
        let crossing = g
            .nodes
            .iter()
            .find(|n| n.coord == Coord::new(2.0, 1.0))
            .unwrap();
        assert_eq!(crossing.loc, [Location::Boundary, Location::Boundary]);
        let inner = g
            .nodes
            .iter()
            .find(|n| n.coord == Coord::new(1.0, 1.0))
            .unwrap();
        assert_eq!(inner.loc, [Location::Interior, Location::Boundary]);
        // every A edge inside B has B interior on both sides
        for e in &g.edges {
            if e.is_area_boundary(0) && !e.is_area_boundary(1) {
                assert_eq!(e.left[1], e.right[1]);
            }
        }
    }

    #[test]
    fn test_shared_edge_is_merged() {
        let g = graph(
            "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))",
            "POLYGON ((1 0, 2 0, 2 1, 1 1, 1 0))",
        );
        let shared: Vec<_> = g
            .edges
            .iter()
            .filter(|e| e.is_area_boundary(0) && e.is_area_boundary(1))
            .collect();
        assert_eq!(shared.len(), 1);
        let e = shared[0];
        // interiors lie on opposite sides
        assert_ne!(e.left[0], e.left[1]);
    }

    #[test]
    fn test_line_end_is_boundary() {
        let g = graph("LINESTRING (0 0, 2 0)", "POINT (5 5)");
        let end = g
            .nodes
            .iter()
            .find(|n| n.coord == Coord::new(0.0, 0.0))
            .unwrap();
        assert_eq!(end.loc[0], Location::Boundary);
        assert_eq!(end.loc[1], Location::Exterior);
    }

    #[test]
    fn test_bow_tie_is_rejected_when_strict() {
        let reader = WktReader::new();
        let mut input = GraphInput::new();
        input.add(
            &reader.read("POLYGON ((0 0, 2 2, 2 0, 0 2, 0 0))").unwrap(),
            0,
        );
        let result = TopologyGraph::build(input, &Noder::new(1e-12, 6), true);
        assert!(matches!(result, Err(GeometryError::Topology(_))));
    }
}
