//! Result extraction from a labeled topology graph: result area edges are
//! traced into rings, result line edges are merged, and isolated nodes
//! become points.

use super::OverlayOp;
use super::graph::TopologyGraph;
use crate::algorithm::locate::{Location, locate_in_ring};
use crate::algorithm::orientation::{is_ccw, signed_area};
use crate::error::{GeometryError, Result};
use crate::geom::{LineString, LinearRing, Point, Polygon};
use crate::linemerge::LineMerger;
use planar_types::{Coord, CoordinateSequence, Envelope};
use rustc_hash::FxHashMap;

/// A result area edge directed with the result interior on its left.
#[derive(Debug, Clone, Copy)]
struct DirectedEdge {
    edge: usize,
    from: usize,
    to: usize,
}

pub(crate) struct Extracted {
    pub polygons: Vec<Polygon>,
    pub lines: Vec<LineString>,
    pub points: Vec<Point>,
}

fn inside(loc: Location) -> bool {
    loc == Location::Interior
}

fn covered(loc: Location) -> bool {
    loc != Location::Exterior
}

pub(crate) fn extract(graph: &TopologyGraph, op: OverlayOp) -> Result<Extracted> {
    let mut area_edges: Vec<DirectedEdge> = Vec::new();
    let mut area_of_edge: Vec<Option<usize>> = vec![None; graph.edges.len()];
    let mut line_edges: Vec<usize> = Vec::new();
    let mut has_result_edge = vec![false; graph.nodes.len()];
    let mut in_result_area = vec![false; graph.nodes.len()];

    for (i, e) in graph.edges.iter().enumerate() {
        let left_in = op.is_in(inside(e.left[0]), inside(e.left[1]));
        let right_in = op.is_in(inside(e.right[0]), inside(e.right[1]));
        if left_in && right_in {
            in_result_area[e.from] = true;
            in_result_area[e.to] = true;
            continue;
        }
        if left_in != right_in {
            let (from, to) = if left_in { (e.from, e.to) } else { (e.to, e.from) };
            area_of_edge[i] = Some(area_edges.len());
            area_edges.push(DirectedEdge { edge: i, from, to });
        } else if !left_in
            && op.is_in(covered(e.on[0]), covered(e.on[1]))
            && (0..2).any(|k| e.is_line(k) || e.has_area_label(k))
        {
            line_edges.push(i);
        } else {
            continue;
        }
        has_result_edge[e.from] = true;
        has_result_edge[e.to] = true;
    }

    let polygons = build_polygons(graph, &area_edges, &area_of_edge)?;

    let mut merger = LineMerger::new();
    for &i in &line_edges {
        let e = &graph.edges[i];
        merger.add_sequence(CoordinateSequence::from_coords([
            graph.nodes[e.from].coord,
            graph.nodes[e.to].coord,
        ]));
    }
    let lines = if line_edges.is_empty() {
        Vec::new()
    } else {
        merger.merged_line_strings()
    };

    let mut points = Vec::new();
    for (n, node) in graph.nodes.iter().enumerate() {
        // a node whose incident edges all dissolved into the result
        // interior is covered by the result area
        if has_result_edge[n] || in_result_area[n] {
            continue;
        }
        if op.is_in(covered(node.loc[0]), covered(node.loc[1]))
            && !op.is_in(inside(node.area_loc[0]), inside(node.area_loc[1]))
        {
            points.push(Point::from_coord_unchecked(node.coord));
        }
    }
    points.sort_by(|a, b| match (a.coord(), b.coord()) {
        (Some(p), Some(q)) => p.lex_cmp(&q),
        _ => std::cmp::Ordering::Equal,
    });

    Ok(Extracted {
        polygons,
        lines,
        points,
    })
}

/// Next result edge leaving the end node of `d`: the first one met turning
/// clockwise from the reverse of `d`, which keeps rings minimal.
fn next_edge(
    graph: &TopologyGraph,
    edges: &[DirectedEdge],
    area_of_edge: &[Option<usize>],
    d: &DirectedEdge,
) -> Option<usize> {
    let star = &graph.nodes[d.to].star;
    let pos = star.iter().position(|&e| e == d.edge)?;
    let n = star.len();
    (1..n)
        .map(|step| star[(pos + n - step) % n])
        .filter_map(|e| area_of_edge[e])
        .find(|&cand| edges[cand].from == d.to)
}

fn trace_rings(
    graph: &TopologyGraph,
    edges: &[DirectedEdge],
    area_of_edge: &[Option<usize>],
) -> Result<Vec<Vec<usize>>> {
    let mut visited = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if visited[start] {
            continue;
        }
        let mut nodes = vec![edges[start].from];
        let mut current = start;
        loop {
            visited[current] = true;
            nodes.push(edges[current].to);
            let next = next_edge(graph, edges, area_of_edge, &edges[current]).ok_or_else(|| {
                GeometryError::topology("unable to close result ring: no outgoing edge")
            })?;
            if next == start {
                break;
            }
            if visited[next] {
                return Err(GeometryError::topology(
                    "unable to close result ring: edge visited twice",
                ));
            }
            current = next;
        }
        rings.extend(split_at_repeated_nodes(&nodes));
    }
    Ok(rings)
}

/// Split a closed node walk wherever it revisits a node.
fn split_at_repeated_nodes(walk: &[usize]) -> Vec<Vec<usize>> {
    let mut rings = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
    let mut position: FxHashMap<usize, usize> = FxHashMap::default();
    for &n in walk {
        if let Some(&i) = position.get(&n) {
            let mut ring: Vec<usize> = stack[i..].to_vec();
            ring.push(n);
            for m in stack.drain(i + 1..) {
                position.remove(&m);
            }
            rings.push(ring);
        } else {
            position.insert(n, stack.len());
            stack.push(n);
        }
    }
    rings
}

fn build_polygons(
    graph: &TopologyGraph,
    edges: &[DirectedEdge],
    area_of_edge: &[Option<usize>],
) -> Result<Vec<Polygon>> {
    if edges.is_empty() {
        return Ok(Vec::new());
    }
    let mut shells: Vec<(Vec<Coord>, Envelope, f64)> = Vec::new();
    let mut holes: Vec<Vec<Coord>> = Vec::new();
    for ring in trace_rings(graph, edges, area_of_edge)? {
        let coords: Vec<Coord> = ring.iter().map(|&n| graph.nodes[n].coord).collect();
        if coords.len() < 4 {
            continue;
        }
        if is_ccw(&coords) {
            let env = Envelope::from_coords(coords.iter().copied());
            let area = signed_area(&coords).abs();
            shells.push((coords, env, area));
        } else {
            holes.push(coords);
        }
    }

    let mut assigned: Vec<Vec<Vec<Coord>>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        let env = Envelope::from_coords(hole.iter().copied());
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, (shell, shell_env, _))| {
                shell_env.contains(&env) && hole_inside_shell(&hole, shell)
            })
            .min_by(|a, b| a.1.2.total_cmp(&b.1.2))
            .map(|(i, _)| i)
            .ok_or_else(|| GeometryError::topology("result hole lies outside every shell"))?;
        assigned[owner].push(hole);
    }

    log::debug!(
        "Assembled {} shells and {} holes",
        shells.len(),
        assigned.iter().map(Vec::len).sum::<usize>()
    );

    Ok(shells
        .into_iter()
        .zip(assigned)
        .map(|((shell, _, _), holes)| {
            Polygon::from_rings_unchecked(
                LinearRing::from_sequence_unchecked(CoordinateSequence::from_coords(shell)),
                holes
                    .into_iter()
                    .map(|h| {
                        LinearRing::from_sequence_unchecked(CoordinateSequence::from_coords(h))
                    })
                    .collect(),
            )
        })
        .collect())
}

/// Test hole vertices, then edge midpoints, until one is off the shell.
fn hole_inside_shell(hole: &[Coord], shell: &[Coord]) -> bool {
    let probes = hole
        .iter()
        .copied()
        .chain(hole.windows(2).map(|w| w[0].midpoint(w[1])));
    for p in probes {
        match locate_in_ring(p, shell.iter().copied()) {
            Location::Interior => return true,
            Location::Exterior => return false,
            Location::Boundary => {}
        }
    }
    false
}
