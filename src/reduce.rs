//! Passes that strip structure which can't affect the result, and the
//! angular ordering that face tracing relies on.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::num::fuzzy_cmp;
use crate::segment::Segment;
use crate::topology::{EdgeId, Graph, HalfEdgeId, SortVector, Stage, VertexId};

// Sort angles get rotated by multiples of this until none of them is near
// the ±π seam. Any irrational multiple of π works.
const ROTATION_STEP: f64 = 0.6180339887498949;
const MAX_ROTATIONS: usize = 64;

fn wrap_angle(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

impl<S: Segment> Graph<S> {
    /// Fuses pairs of collinear lines that meet at a vertex with no other edges.
    ///
    /// Only valid on graphs without input loops, because the loops would have
    /// to be rewritten too.
    pub fn collapse_adjacent_edges(&mut self) {
        debug_assert!(self.loops.is_empty());
        let mut fused = 0;
        loop {
            let candidate = self
                .vertices
                .iter()
                .find_map(|(v, vertex)| self.fusable(v, &vertex.incident).map(|hs| (v, hs)));
            let Some((v, [h0, h1])) = candidate else {
                break;
            };

            // Keep the orientation of the first edge.
            let (far0, far1) = (self.half_start(h0), self.half_start(h1));
            let (start, end) = if h0.reversed { (far1, far0) } else { (far0, far1) };
            let seg = S::line(self.vertices[start].point, self.vertices[end].point);
            self.remove_edge(h0.edge);
            self.remove_edge(h1.edge);
            self.vertices.remove(v);
            self.add_edge(seg, start, end);
            fused += 1;
        }
        log::debug!("collapse_adjacent_edges: fused {fused} pairs");
        self.check_invariants();
    }

    /// If `v` joins exactly two distinct straight edges that continue each
    /// other, returns the two half-edges ending at `v`.
    fn fusable(&self, v: VertexId, incident: &[HalfEdgeId]) -> Option<[HalfEdgeId; 2]> {
        let &[h0, h1] = incident else {
            return None;
        };
        if h0.edge == h1.edge {
            return None;
        }
        let (e0, e1) = (&self.edges[h0.edge], &self.edges[h1.edge]);
        if !e0.segment.is_line() || !e1.segment.is_line() {
            return None;
        }
        let (far0, far1) = (self.half_start(h0), self.half_start(h1));
        if far0 == v || far1 == v || far0 == far1 {
            return None;
        }
        // Directions in which the two edges leave `v`; they continue each
        // other if these are opposite.
        let out0 = self.half_segment(h0.other_half()).tangent_at(0.0);
        let out1 = self.half_segment(h1.other_half()).tangent_at(0.0);
        ((out0 + out1).hypot() < self.tolerances.collinear).then_some([h0, h1])
    }

    /// Removes every edge whose removal would disconnect its component.
    ///
    /// Such an edge has the same face on both sides, so it can't separate
    /// regions with different winding numbers.
    pub fn remove_bridges(&mut self) {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let bridges = self.find_bridges();
        for &e in &bridges {
            self.replace_edge_in_loops(e, &[]);
            self.remove_edge(e);
        }
        log::debug!("remove_bridges: removed {} bridges", bridges.len());
        self.check_invariants();
    }

    /// Tarjan's bridge-finding algorithm, with an explicit stack.
    pub(crate) fn find_bridges(&mut self) -> Vec<EdgeId> {
        for vertex in self.vertices.values_mut() {
            vertex.visited = false;
            vertex.visit_index = 0;
            vertex.low_index = 0;
        }

        let roots: Vec<VertexId> = self.vertices.keys().collect();
        let mut bridges = Vec::new();
        let mut counter = 0;
        // (vertex, the edge we arrived by, position in the incident list)
        let mut stack: Vec<(VertexId, Option<EdgeId>, usize)> = Vec::new();

        for root in roots {
            if self.vertices[root].visited {
                continue;
            }
            self.visit(root, &mut counter);
            stack.push((root, None, 0));

            while let Some(&mut (v, parent_edge, ref mut next)) = stack.last_mut() {
                let incident = &self.vertices[v].incident;
                if *next < incident.len() {
                    let h = incident[*next];
                    *next += 1;
                    // Skipping the parent by edge, not by vertex, so that a
                    // doubled edge doesn't count as a bridge.
                    if Some(h.edge) == parent_edge {
                        continue;
                    }
                    let w = self.half_start(h);
                    if w == v {
                        continue;
                    }
                    if self.vertices[w].visited {
                        let low = self.vertices[v].low_index.min(self.vertices[w].visit_index);
                        self.vertices[v].low_index = low;
                    } else {
                        self.visit(w, &mut counter);
                        stack.push((w, Some(h.edge), 0));
                    }
                } else {
                    stack.pop();
                    if let (Some(e), Some(&(u, _, _))) = (parent_edge, stack.last()) {
                        let v_low = self.vertices[v].low_index;
                        let u_vertex = &mut self.vertices[u];
                        u_vertex.low_index = u_vertex.low_index.min(v_low);
                        if v_low > u_vertex.visit_index {
                            bridges.push(e);
                        }
                    }
                }
            }
        }
        bridges
    }

    fn visit(&mut self, v: VertexId, counter: &mut usize) {
        let vertex = &mut self.vertices[v];
        vertex.visited = true;
        vertex.visit_index = *counter;
        vertex.low_index = *counter;
        *counter += 1;
    }

    /// Repeatedly removes vertices with fewer than two incident half-edges,
    /// along with their dangling edges.
    pub fn remove_low_order_vertices(&mut self) {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let mut removed = 0;
        loop {
            let low: Vec<VertexId> = self
                .vertices
                .iter()
                .filter(|(_, v)| v.incident.len() < 2)
                .map(|(id, _)| id)
                .collect();
            if low.is_empty() {
                break;
            }
            for v in low {
                // An earlier removal in this round may have changed it.
                let Some(vertex) = self.vertices.get(v) else {
                    continue;
                };
                if let Some(&h) = vertex.incident.first() {
                    if vertex.incident.len() >= 2 {
                        continue;
                    }
                    self.replace_edge_in_loops(h.edge, &[]);
                    self.remove_edge(h.edge);
                }
                self.vertices.remove(v);
                removed += 1;
            }
        }
        log::debug!("remove_low_order_vertices: removed {removed} vertices");
        self.check_invariants();
    }

    /// Sorts each vertex's incident half-edges counter-clockwise by the
    /// direction in which their edges leave the vertex.
    ///
    /// Ties in direction are broken by curvature where the edge leaves, and
    /// then by curvature near its far end.
    pub fn order_vertex_edges(&mut self) {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let tol = self.tolerances;
        let ids: Vec<VertexId> = self.vertices.keys().collect();
        for v in ids {
            let incident = self.vertices[v].incident.clone();
            let mut keyed: Vec<(HalfEdgeId, SortVector)> = incident
                .iter()
                .map(|&h| {
                    let out = self.half_segment(h.other_half());
                    let key = SortVector {
                        angle: out.tangent_at(0.0).atan2(),
                        curvature: out.curvature_at(0.0),
                        far_curvature: out.curvature_at(0.999),
                    };
                    (h, key)
                })
                .collect();

            // Rotate everything away from the seam, where nearly-equal
            // directions would land at opposite ends of the order.
            for _ in 0..MAX_ROTATIONS {
                let near_seam = keyed
                    .iter()
                    .any(|(_, k)| PI - k.angle.abs() < tol.angle_wrap);
                if !near_seam {
                    break;
                }
                for (_, k) in &mut keyed {
                    k.angle = wrap_angle(k.angle + ROTATION_STEP);
                }
            }

            sort_by_key_clusters(&mut keyed, tol.angle, tol.curvature);
            for &(h, key) in &keyed {
                self.half_mut(h).sort_vector = Some(key);
            }
            self.vertices[v].incident = keyed.into_iter().map(|(h, _)| h).collect();
        }
        self.check_invariants();
    }

    /// The half-edge after `h` when walking around the face on `h`'s left.
    ///
    /// This turns as far clockwise as possible at the end of `h`, which keeps
    /// the face on the left. Requires [`Graph::order_vertex_edges`].
    pub fn next_half_edge(&self, h: HalfEdgeId) -> HalfEdgeId {
        let incident = &self.vertices[self.half_end(h)].incident;
        let n = incident.len();
        let idx = incident.iter().position(|&g| g == h);
        debug_assert!(idx.is_some(), "{h:?} is missing from its end vertex");
        let idx = idx.unwrap_or(0);
        incident[(idx + n - 1) % n].other_half()
    }
}

/// Sorts by angle, breaking near-ties by curvature and then by far curvature.
///
/// Fuzzy comparisons aren't transitive, so instead of handing one to `sort_by`
/// we sort exactly and then re-sort each run of nearly-equal keys.
fn sort_by_key_clusters<T>(items: &mut [(T, SortVector)], angle_eps: f64, curvature_eps: f64) {
    items.sort_by(|a, b| a.1.angle.total_cmp(&b.1.angle));
    for run in clusters(items, |a, b| fuzzy_cmp(a.angle, b.angle, angle_eps)) {
        let run = &mut items[run];
        run.sort_by(|a, b| a.1.curvature.total_cmp(&b.1.curvature));
        for inner in clusters(run, |a, b| fuzzy_cmp(a.curvature, b.curvature, curvature_eps)) {
            run[inner].sort_by(|a, b| a.1.far_curvature.total_cmp(&b.1.far_curvature));
        }
    }
}

/// Splits a sorted slice into maximal runs where neighbors compare equal.
fn clusters<T>(
    items: &[(T, SortVector)],
    cmp: impl Fn(&SortVector, &SortVector) -> Ordering,
) -> Vec<std::ops::Range<usize>> {
    let mut ret = Vec::new();
    let mut start = 0;
    for i in 1..=items.len() {
        if i == items.len() || cmp(&items[i - 1].1, &items[i].1) != Ordering::Equal {
            if i - start > 1 {
                ret.push(start..i);
            }
            start = i;
        }
    }
    ret
}
