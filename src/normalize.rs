//! Passes that turn an arbitrary graph into a planar one.
//!
//! After [`Graph::normalize`], no two edges overlap or cross except at
//! shared vertices, no edge crosses itself, and no two vertices are closer
//! than the merge distance.

use kurbo::{Point, Rect};

use crate::segment::{Overlap, Segment};
use crate::sweep::Sweep;
use crate::topology::{EdgeId, Graph, HalfEdgeId, Stage, VertexId};

// Merging vertices can make edges coincide or cross again, so the passes
// repeat. Each round that merges anything shrinks the vertex set, so this is
// only reached on pathological input.
const MAX_ROUNDS: usize = 16;

fn point_rect(p: Point) -> Rect {
    Rect::from_points(p, p)
}

fn snap_param(t: f64, eps: f64) -> f64 {
    if t < eps {
        0.0
    } else if t > 1.0 - eps {
        1.0
    } else {
        t
    }
}

impl<S: Segment> Graph<S> {
    /// Runs the four normalization passes in order, and again after any
    /// round in which vertices were merged, until merging changes nothing.
    pub fn normalize(&mut self) {
        for round in 0..MAX_ROUNDS {
            self.eliminate_overlap();
            self.eliminate_self_intersection();
            self.eliminate_intersection();
            if self.collapse_vertices() == 0 {
                log::debug!("normalize: done after {} rounds", round + 1);
                return;
            }
        }
        log::warn!("normalize: vertices still merging after {MAX_ROUNDS} rounds");
    }

    /// Replaces every pair of edges that coincide along a stretch with a
    /// single shared edge for that stretch, plus leftover pieces.
    ///
    /// Returns the number of overlaps resolved.
    pub fn eliminate_overlap(&mut self) -> usize {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let mut sweep = Sweep::new(self.tolerances.sweep_padding);
        for (e, edge) in &self.edges {
            sweep.schedule(e, edge.segment.bounds());
        }

        let mut splits = 0;
        let mut cands = Vec::new();
        while let Some(e) = sweep.next_start() {
            let bounds = self.edges[e].segment.bounds();
            sweep.candidates(bounds, &mut cands);

            let found = cands.iter().find_map(|&other| {
                let overlap = self.edges[e]
                    .segment
                    .overlaps(&self.edges[other].segment)?;
                self.clean_overlap(overlap).map(|ov| (other, ov))
            });

            match found {
                Some((other, overlap)) => {
                    let new_edges = self.split_overlap(e, other, overlap);
                    sweep.retire(e);
                    sweep.retire(other);
                    for n in new_edges {
                        sweep.schedule(n, self.edges[n].segment.bounds());
                    }
                    splits += 1;
                }
                None => sweep.activate(e, bounds),
            }
        }

        log::debug!("eliminate_overlap: resolved {splits} overlaps");
        self.check_invariants();
        splits
    }

    /// Rounds an overlap's parameters to the ends, and discards it if
    /// nothing substantial is left.
    fn clean_overlap(&self, overlap: Overlap) -> Option<Overlap> {
        let eps = self.tolerances.overlap_param;
        let ov = Overlap {
            t0: snap_param(overlap.t0, eps),
            t1: snap_param(overlap.t1, eps),
            qt0: snap_param(overlap.qt0, eps),
            qt1: snap_param(overlap.qt1, eps),
            ..overlap
        };
        (ov.t1 - ov.t0 > eps && (ov.qt1 - ov.qt0).abs() > eps).then_some(ov)
    }

    /// The vertex to use for the point where the overlap meets `a` at
    /// parameter `t` and `b` at parameter `qt`.
    fn overlap_vertex(&mut self, a: EdgeId, b: EdgeId, t: f64, qt: f64) -> VertexId {
        let (ea, eb) = (&self.edges[a], &self.edges[b]);
        if t == 0.0 {
            ea.start
        } else if t == 1.0 {
            ea.end
        } else if qt == 0.0 {
            eb.start
        } else if qt == 1.0 {
            eb.end
        } else {
            let p = ea.segment.eval(t);
            self.add_vertex(p)
        }
    }

    /// Splits two overlapping edges into a shared middle edge and up to four leftovers.
    ///
    /// Returns the new edges.
    fn split_overlap(&mut self, a: EdgeId, b: EdgeId, ov: Overlap) -> Vec<EdgeId> {
        log::trace!("overlap between {a:?} and {b:?}: {ov:?}");
        let v0 = self.overlap_vertex(a, b, ov.t0, ov.qt0);
        let v1 = self.overlap_vertex(a, b, ov.t1, ov.qt1);
        let (qlo, qhi) = (ov.qt0.min(ov.qt1), ov.qt0.max(ov.qt1));
        let (vlo, vhi) = if ov.is_reversed() { (v1, v0) } else { (v0, v1) };

        let seg_a = self.edges[a].segment.clone();
        let seg_b = self.edges[b].segment.clone();
        let (a_start, a_end) = (self.edges[a].start, self.edges[a].end);
        let (b_start, b_end) = (self.edges[b].start, self.edges[b].end);

        let middle = self.add_child_edge(a, seg_a.subsegment(ov.t0..ov.t1), v0, v1);
        let b_loops = self.edges[b].loops.clone();
        {
            let from_clip = self.edges[b].from_clip;
            let edge = &mut self.edges[middle];
            edge.from_clip |= from_clip;
            for l in b_loops {
                if !edge.loops.contains(&l) {
                    edge.loops.push(l);
                }
            }
        }
        let mut new_edges = vec![middle];

        let mut a_path = Vec::with_capacity(3);
        if ov.t0 > 0.0 {
            let e = self.add_child_edge(a, seg_a.subsegment(0.0..ov.t0), a_start, v0);
            a_path.push(HalfEdgeId::forward(e));
            new_edges.push(e);
        }
        a_path.push(HalfEdgeId::forward(middle));
        if ov.t1 < 1.0 {
            let e = self.add_child_edge(a, seg_a.subsegment(ov.t1..1.0), v1, a_end);
            a_path.push(HalfEdgeId::forward(e));
            new_edges.push(e);
        }

        let mut b_path = Vec::with_capacity(3);
        if qlo > 0.0 {
            let e = self.add_child_edge(b, seg_b.subsegment(0.0..qlo), b_start, vlo);
            b_path.push(HalfEdgeId::forward(e));
            new_edges.push(e);
        }
        b_path.push(if ov.is_reversed() {
            HalfEdgeId::backward(middle)
        } else {
            HalfEdgeId::forward(middle)
        });
        if qhi < 1.0 {
            let e = self.add_child_edge(b, seg_b.subsegment(qhi..1.0), vhi, b_end);
            b_path.push(HalfEdgeId::forward(e));
            new_edges.push(e);
        }

        self.replace_edge_in_loops(a, &a_path);
        self.replace_edge_in_loops(b, &b_path);
        self.remove_edge(a);
        self.remove_edge(b);
        new_edges
    }

    /// Splits every edge that crosses itself into three, around the crossing.
    pub fn eliminate_self_intersection(&mut self) -> usize {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let ids: Vec<EdgeId> = self.edges.keys().collect();
        let mut count = 0;
        for e in ids {
            let Some(si) = self.edges[e].segment.self_intersection() else {
                continue;
            };
            let seg = self.edges[e].segment.clone();
            let (start, end) = (self.edges[e].start, self.edges[e].end);
            let v = self.add_vertex(si.point);
            let pieces = seg.subdivisions(&[si.a_t, si.b_t]);
            let verts = [start, v, v, end];
            let path: Vec<HalfEdgeId> = pieces
                .into_iter()
                .enumerate()
                .map(|(i, piece)| {
                    HalfEdgeId::forward(self.add_child_edge(e, piece, verts[i], verts[i + 1]))
                })
                .collect();
            self.replace_edge_in_loops(e, &path);
            self.remove_edge(e);
            count += 1;
        }
        log::debug!("eliminate_self_intersection: split {count} edges");
        self.check_invariants();
        count
    }

    /// Is parameter `t` of edge `e`, at point `p`, away from both of its ends?
    fn is_internal(&self, e: EdgeId, t: f64, p: Point) -> bool {
        let eps = self.tolerances.intersection_param;
        let dist = self.tolerances.endpoint_distance();
        let edge = &self.edges[e];
        t > eps
            && t < 1.0 - eps
            && (p - self.vertices[edge.start].point).hypot() > dist
            && (p - self.vertices[edge.end].point).hypot() > dist
    }

    /// Splits edges wherever they cross one another away from their endpoints.
    ///
    /// Returns the number of crossing pairs resolved.
    pub fn eliminate_intersection(&mut self) -> usize {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let mut sweep = Sweep::new(self.tolerances.sweep_padding);
        for (e, edge) in &self.edges {
            sweep.schedule(e, edge.segment.bounds());
        }

        let mut splits = 0;
        let mut cands = Vec::new();
        while let Some(e) = sweep.next_start() {
            let bounds = self.edges[e].segment.bounds();
            sweep.candidates(bounds, &mut cands);

            let mut resolved = None;
            for &other in &cands {
                if let Some(result) = self.simple_split(e, other) {
                    resolved = Some((other, result));
                    break;
                }
            }

            match resolved {
                None => sweep.activate(e, bounds),
                Some((other, (a_pieces, b_pieces))) => {
                    splits += 1;
                    // An edge that didn't need splitting is re-queued, so that it
                    // gets compared against the new pieces (and everything else).
                    for (old, pieces) in [(e, a_pieces), (other, b_pieces)] {
                        match pieces {
                            Some(pieces) => {
                                sweep.retire(old);
                                for n in pieces {
                                    sweep.schedule(n, self.edges[n].segment.bounds());
                                }
                            }
                            None => sweep.schedule(old, self.edges[old].segment.bounds()),
                        }
                    }
                }
            }
        }

        log::debug!("eliminate_intersection: resolved {splits} crossings");
        self.check_invariants();
        splits
    }

    /// Splits `a` and `b` at their crossings, if they have any that aren't at
    /// both edges' endpoints.
    ///
    /// Returns the pieces that replaced each edge (or `None` for an edge that
    /// survived intact), or `None` if nothing needed doing.
    #[allow(clippy::type_complexity)]
    fn simple_split(
        &mut self,
        a: EdgeId,
        b: EdgeId,
    ) -> Option<(Option<Vec<EdgeId>>, Option<Vec<EdgeId>>)> {
        let hits = self.edges[a].segment.intersections(&self.edges[b].segment);

        let mut a_splits: Vec<(f64, VertexId)> = Vec::new();
        let mut b_splits: Vec<(f64, VertexId)> = Vec::new();
        for hit in hits {
            let a_inside = self.is_internal(a, hit.a_t, hit.point);
            let b_inside = self.is_internal(b, hit.b_t, hit.point);
            if !a_inside && !b_inside {
                continue;
            }
            let (ea, eb) = (&self.edges[a], &self.edges[b]);
            let v = if !a_inside {
                if hit.a_t < 0.5 {
                    ea.start
                } else {
                    ea.end
                }
            } else if !b_inside {
                if hit.b_t < 0.5 {
                    eb.start
                } else {
                    eb.end
                }
            } else {
                self.add_vertex(hit.point)
            };
            if a_inside {
                a_splits.push((hit.a_t, v));
            }
            if b_inside {
                b_splits.push((hit.b_t, v));
            }
        }

        if a_splits.is_empty() && b_splits.is_empty() {
            return None;
        }
        let a_pieces = self.split_edge(a, a_splits);
        let b_pieces = self.split_edge(b, b_splits);
        Some((a_pieces, b_pieces))
    }

    /// Splits an edge at the given parameters, joining the pieces at the given vertices.
    fn split_edge(&mut self, e: EdgeId, mut splits: Vec<(f64, VertexId)>) -> Option<Vec<EdgeId>> {
        if splits.is_empty() {
            return None;
        }
        splits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let eps = self.tolerances.intersection_param;
        splits.dedup_by(|next, prev| next.0 - prev.0 < eps);

        let ts: Vec<f64> = splits.iter().map(|s| s.0).collect();
        let seg = self.edges[e].segment.clone();
        let mut verts = vec![self.edges[e].start];
        verts.extend(splits.iter().map(|s| s.1));
        verts.push(self.edges[e].end);

        log::trace!("splitting {e:?} at {ts:?}");
        let pieces: Vec<EdgeId> = seg
            .subdivisions(&ts)
            .into_iter()
            .enumerate()
            .map(|(i, piece)| self.add_child_edge(e, piece, verts[i], verts[i + 1]))
            .collect();
        let path: Vec<HalfEdgeId> = pieces.iter().map(|&p| HalfEdgeId::forward(p)).collect();
        self.replace_edge_in_loops(e, &path);
        self.remove_edge(e);
        Some(pieces)
    }

    /// Merges vertices that are closer than the merge distance.
    ///
    /// Returns the number of merges.
    pub fn collapse_vertices(&mut self) -> usize {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let merge_distance = self.tolerances.merge_distance();
        let mut sweep = Sweep::new(merge_distance.max(self.tolerances.sweep_padding));
        for (v, vertex) in &self.vertices {
            sweep.schedule(v, point_rect(vertex.point));
        }

        let mut merges = 0;
        let mut cands = Vec::new();
        while let Some(v) = sweep.next_start() {
            let p = self.vertices[v].point;
            sweep.candidates(point_rect(p), &mut cands);
            let close = cands
                .iter()
                .copied()
                .find(|&w| (self.vertices[w].point - p).hypot() < merge_distance);

            match close {
                Some(w) => {
                    let merged = self.merge_vertices(v, w);
                    sweep.retire(v);
                    sweep.retire(w);
                    sweep.schedule(merged, point_rect(self.vertices[merged].point));
                    merges += 1;
                }
                None => sweep.activate(v, point_rect(p)),
            }
        }

        log::debug!("collapse_vertices: performed {merges} merges");
        self.check_invariants();
        merges
    }

    /// Replaces two vertices with one at their midpoint.
    fn merge_vertices(&mut self, v: VertexId, w: VertexId) -> VertexId {
        let p = self.vertices[v].point.midpoint(self.vertices[w].point);
        let m = self.add_vertex(p);

        let mut edges: Vec<EdgeId> = self.vertices[v]
            .incident
            .iter()
            .chain(&self.vertices[w].incident)
            .map(|h| h.edge)
            .collect();
        edges.sort();
        edges.dedup();

        let mut incident = Vec::new();
        for e in edges {
            let edge = &mut self.edges[e];
            if edge.start == v || edge.start == w {
                edge.start = m;
            }
            if edge.end == v || edge.end == w {
                edge.end = m;
            }
            let (start, end) = (edge.start, edge.end);
            let start_point = self.vertices[start].point;
            let end_point = self.vertices[end].point;
            let edge = &mut self.edges[e];
            edge.segment = edge.segment.with_endpoints(start_point, end_point);

            // A loop no bigger than the merge distance would only cross
            // itself once its ends are snapped, so it goes too.
            if start == m && end == m {
                let b = edge.segment.bounds();
                let extent = b.width().max(b.height());
                let min_extent = self
                    .tolerances
                    .degenerate_extent
                    .max(self.tolerances.merge_distance());
                if !edge.segment.encloses_area() || extent <= min_extent {
                    self.replace_edge_in_loops(e, &[]);
                    self.edges.remove(e);
                    continue;
                }
            }
            if start == m {
                incident.push(HalfEdgeId::backward(e));
            }
            if end == m {
                incident.push(HalfEdgeId::forward(e));
            }
        }

        self.vertices[m].incident = incident;
        self.vertices.remove(v);
        self.vertices.remove(w);
        m
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{CubicBez, Line, PathSeg};

    use crate::topology::tests::polyline;
    use crate::topology::{Graph, ShapeId};

    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<PathSeg> {
        vec![PathSeg::Line(Line::new((x0, y0), (x1, y1)))]
    }

    fn loop_points(g: &Graph<PathSeg>, l: usize) -> Vec<Point> {
        let lp = &g.loops()[crate::topology::LoopIdx(l)];
        let mut pts = vec![g.vertex(g.half_start(lp.half_edges[0])).point];
        pts.extend(lp.half_edges.iter().map(|&h| g.vertex(g.half_end(h)).point));
        pts
    }

    #[test]
    fn collinear_overlap() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), line(0.0, 0.0, 2.0, 0.0), false, false);
        g.add_subpath(ShapeId(0), line(1.0, 0.0, 3.0, 0.0), false, false);
        g.eliminate_overlap();

        assert_eq!(g.edge_count(), 3);
        assert_eq!(
            loop_points(&g, 0),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)]
        );
        assert_eq!(
            loop_points(&g, 1),
            vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(3.0, 0.0)]
        );
        // The shared piece is one edge, used by both loops.
        let shared_a = g.loops()[crate::topology::LoopIdx(0)].half_edges[1];
        let shared_b = g.loops()[crate::topology::LoopIdx(1)].half_edges[0];
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn reversed_overlap() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), line(0.0, 0.0, 2.0, 0.0), false, false);
        g.add_subpath(ShapeId(1), line(3.0, 0.0, 1.0, 0.0), false, false);
        g.eliminate_overlap();

        assert_eq!(g.edge_count(), 3);
        assert_eq!(
            loop_points(&g, 1),
            vec![Point::new(3.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 0.0)]
        );
        let shared_a = g.loops()[crate::topology::LoopIdx(0)].half_edges[1];
        let shared_b = g.loops()[crate::topology::LoopIdx(1)].half_edges[1];
        assert_eq!(shared_a, shared_b.other_half());
    }

    #[test]
    fn identical_edges() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), line(0.0, 0.0, 2.0, 0.0), false, false);
        g.add_subpath(ShapeId(1), line(0.0, 0.0, 2.0, 0.0), false, false);
        g.eliminate_overlap();
        assert_eq!(g.edge_count(), 1);
        g.collapse_vertices();
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn crossing() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), line(0.0, 0.0, 2.0, 2.0), false, false);
        g.add_subpath(ShapeId(0), line(0.0, 2.0, 2.0, 0.0), false, false);
        let before: Vec<EdgeId> = g.edges().map(|(e, _)| e).collect();
        g.eliminate_intersection();

        assert_eq!(g.edge_count(), 4);
        assert!(before.iter().all(|&e| g.edges.get(e).is_none()));
        let center: Vec<_> = g
            .vertices()
            .filter(|(_, v)| v.incident.len() == 4)
            .map(|(_, v)| v.point)
            .collect();
        assert_eq!(center.len(), 1);
        assert!((center[0] - Point::new(1.0, 1.0)).hypot() < 1e-12);
    }

    #[test]
    fn t_junction_reuses_endpoint() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), line(0.0, 0.0, 2.0, 0.0), false, false);
        g.add_subpath(ShapeId(0), line(1.0, 0.0, 1.0, 1.0), false, false);
        g.eliminate_intersection();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn many_crossings() {
        // A grid of 3 horizontal and 3 vertical lines.
        let mut g = Graph::new();
        for i in 0..3 {
            let c = i as f64;
            g.add_subpath(ShapeId(0), line(-1.0, c, 3.0, c), false, false);
            g.add_subpath(ShapeId(0), line(c, -1.0, c, 3.0), false, false);
        }
        g.normalize();
        // Each line is cut into 4 pieces by the 3 lines crossing it.
        assert_eq!(g.edge_count(), 24);
        assert_eq!(g.vertex_count(), 9 + 12);
    }

    #[test]
    fn self_intersecting_cubic() {
        let mut g = Graph::new();
        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (2.0, 1.0), (-1.0, 1.0), (1.0, 0.0)));
        g.add_subpath(ShapeId(0), vec![c], false, false);
        g.eliminate_self_intersection();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.vertex_count(), 3);
        let self_loops = g.edges().filter(|(_, e)| e.start == e.end).count();
        assert_eq!(self_loops, 1);
    }

    #[test]
    fn near_vertices_merge() {
        let mut g = Graph::new();
        g.add_subpath(ShapeId(0), polyline(&[(0.0, 0.0), (1.0, 0.0)]), false, false);
        g.add_subpath(ShapeId(0), polyline(&[(1.00001, 0.0), (1.0, 1.0)]), false, false);
        g.collapse_vertices();
        assert_eq!(g.vertex_count(), 3);
        let joint = g
            .vertices()
            .find(|(_, v)| v.incident.len() == 2)
            .map(|(_, v)| v.point)
            .unwrap();
        assert!((joint - Point::new(1.000005, 0.0)).hypot() < 1e-12);
    }

    #[test]
    fn tiny_edge_collapses_away() {
        let mut g = Graph::new();
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 0.00001), (1.0, 1.0)];
        let l = g.add_subpath(ShapeId(0), polyline(&pts), false, false).unwrap();
        g.collapse_vertices();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.loops()[l].half_edges.len(), 2);
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut g = Graph::new();
        g.add_path(ShapeId(0), &crate::topology::tests::rect_path(0.0, 0.0, 2.0, 2.0), true);
        g.add_path(ShapeId(1), &crate::topology::tests::rect_path(1.0, 1.0, 3.0, 3.0), true);
        g.add_path(ShapeId(1), &crate::topology::tests::rect_path(0.0, 0.0, 2.0, 1.0), true);
        g.normalize();
        let count = (g.vertex_count(), g.edge_count());
        let mut points: Vec<(f64, f64)> = g.vertices().map(|(_, v)| (v.point.x, v.point.y)).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());

        g.normalize();
        assert_eq!((g.vertex_count(), g.edge_count()), count);
        let mut again: Vec<(f64, f64)> = g.vertices().map(|(_, v)| (v.point.x, v.point.y)).collect();
        again.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(points, again);
    }

    #[test]
    fn merged_edges_become_shared() {
        let mut g = Graph::new();
        let offset = 5e-5;
        g.add_path(ShapeId(0), &crate::topology::tests::rect_path(0.0, 0.0, 1.0, 1.0), true);
        g.add_path(
            ShapeId(1),
            &crate::topology::tests::rect_path(offset, offset, 1.0 + offset, 1.0 + offset),
            true,
        );
        g.normalize();
        assert_eq!((g.vertex_count(), g.edge_count()), (4, 4));
        // Both squares run along every remaining edge, in the same direction.
        for (e, _) in g.edges() {
            let diff = g.compute_differential(e);
            assert_eq!((diff.get(ShapeId(0)), diff.get(ShapeId(1))), (1, 1));
        }

        g.normalize();
        assert_eq!((g.vertex_count(), g.edge_count()), (4, 4));
    }

    #[test]
    fn collapsed_curve_survives_as_a_loop() {
        let mut g = Graph::new();
        let c = PathSeg::Cubic(CubicBez::new((0.0, 0.0), (3.0, 3.0), (-3.0, 3.0), (-5e-5, 0.0)));
        let l = g.add_subpath(ShapeId(0), vec![c], true, true).unwrap();
        assert_eq!(g.edge_count(), 2);

        g.normalize();
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.edge_count(), 1);
        let (_, edge) = g.edges().next().unwrap();
        assert_eq!(edge.start, edge.end);
        assert!(edge.segment.bounds().width() > 1.0);
        assert_eq!(g.loops()[l].half_edges.len(), 1);
    }

    #[test]
    fn tiny_circle_collapses_away() {
        let mut g = Graph::new();
        let circle = kurbo::Shape::to_path(&kurbo::Circle::new((0.0, 0.0), 3e-5), 1e-9);
        g.add_path(ShapeId(0), &circle, true);
        g.normalize();
        assert_eq!(g.edge_count(), 0);
    }
}
