//! Faces, and the winding numbers of each shape in each face.

use std::collections::HashMap;

use kurbo::{Line, Rect, Vec2};
use slotmap::SecondaryMap;

use crate::segment::Segment;
use crate::topology::{
    Boundary, BoundaryId, EdgeId, Face, FaceId, Graph, HalfEdgeId, ShapeId, Stage, VertexId,
    WindingMap,
};

/// The direction of the rays used to find which boundary encloses which.
///
/// Close to vertical, but not exactly, so that rays don't run along the
/// axis-aligned edges that are common in practice.
pub const RAY_ANGLE: f64 = 1.5729657;

impl<S: Segment> Graph<S> {
    /// Runs normalization, reduction and face extraction, and solves the winding numbers.
    pub fn compute_simplified_faces(&mut self) {
        self.normalize();
        self.remove_bridges();
        self.remove_low_order_vertices();
        self.order_vertex_edges();
        self.extract_faces();
        self.compute_boundary_tree();
        self.compute_winding_map();
    }

    /// Traces every boundary, and creates a face for each one that encloses
    /// a bounded region.
    pub fn extract_faces(&mut self) {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let limit = 2 * self.edges.len();
        let edge_ids: Vec<EdgeId> = self.edges.keys().collect();
        let mut inner = 0;
        let mut outer = 0;

        for e in edge_ids {
            for first in [HalfEdgeId::forward(e), HalfEdgeId::backward(e)] {
                if self.half(first).boundary.is_some() {
                    continue;
                }

                let mut half_edges = vec![first];
                let mut h = self.next_half_edge(first);
                while h != first {
                    half_edges.push(h);
                    if half_edges.len() > limit {
                        debug_assert!(false, "boundary starting at {first:?} doesn't close");
                        break;
                    }
                    h = self.next_half_edge(h);
                }

                let mut signed_area = 0.0;
                let mut bounds: Option<Rect> = None;
                for &h in &half_edges {
                    let seg = self.half_segment(h);
                    signed_area += seg.signed_area();
                    let b = seg.bounds();
                    bounds = Some(bounds.map_or(b, |r| r.union(b)));
                }

                let boundary = self.boundaries.insert(Boundary {
                    half_edges: half_edges.clone(),
                    signed_area,
                    bounds: bounds.unwrap_or(Rect::ZERO),
                    children: Vec::new(),
                });
                let face = if signed_area > 0.0 {
                    inner += 1;
                    Some(self.faces.insert(Face {
                        boundary: Some(boundary),
                        ..Face::default()
                    }))
                } else {
                    outer += 1;
                    None
                };
                for h in half_edges {
                    let data = self.half_mut(h);
                    data.boundary = Some(boundary);
                    data.face = face;
                }
            }
        }

        log::debug!("extract_faces: {inner} inner and {outer} outer boundaries");
        self.stage = Stage::BoundariesExtracted;
        self.check_invariants();
    }

    /// Labels each vertex with a connected component.
    fn components(&self) -> SecondaryMap<VertexId, usize> {
        let mut component = SecondaryMap::new();
        let mut stack = Vec::new();
        for (root, _) in &self.vertices {
            if component.contains_key(root) {
                continue;
            }
            let label = component.len();
            component.insert(root, label);
            stack.push(root);
            while let Some(v) = stack.pop() {
                for &h in &self.vertices[v].incident {
                    let w = self.half_start(h);
                    if !component.contains_key(w) {
                        component.insert(w, label);
                        stack.push(w);
                    }
                }
            }
        }
        component
    }

    /// Finds the boundary immediately enclosing an outer boundary, by casting
    /// a ray from its extreme point.
    ///
    /// Returns `None` if the ray escapes to infinity.
    fn enclosing_boundary(
        &self,
        b: BoundaryId,
        components: &SecondaryMap<VertexId, usize>,
        ray_length: f64,
    ) -> Option<BoundaryId> {
        let dir = Vec2::from_angle(RAY_ANGLE);
        let boundary = &self.boundaries[b];
        let first = boundary.half_edges.first()?;
        let own_component = components[self.half_start(*first)];

        let origin = boundary
            .half_edges
            .iter()
            .map(|&h| self.edges[h.edge].segment.extreme_point(dir))
            .max_by(|p, q| p.to_vec2().dot(dir).total_cmp(&q.to_vec2().dot(dir)))?;
        let ray = Line::new(origin, origin + dir * ray_length);

        // Edges in the same component can't enclose it. Skipping them also
        // skips the edges that pass through the ray's origin.
        let mut best: Option<(f64, EdgeId, f64)> = None;
        for (e, edge) in &self.edges {
            if components[edge.start] == own_component {
                continue;
            }
            for hit in edge.segment.line_intersections(ray) {
                if hit.line_t > 0.0 && best.map_or(true, |(t, _, _)| hit.line_t < t) {
                    best = Some((hit.line_t, e, hit.segment_t));
                }
            }
        }

        let (_, e, t) = best?;
        let tangent = self.edges[e].segment.tangent_at(t);
        // The half whose left side faces back along the ray.
        let h = if dir.cross(tangent) > 0.0 {
            HalfEdgeId::forward(e)
        } else {
            HalfEdgeId::backward(e)
        };
        self.half(h).boundary
    }

    /// Works out which components sit inside which faces.
    ///
    /// Every outer boundary becomes a hole of the face that immediately
    /// contains it, and the half-edges along it learn that face.
    pub fn compute_boundary_tree(&mut self) {
        debug_assert_eq!(self.stage, Stage::BoundariesExtracted);
        let components = self.components();
        let bounds = self.bounds();
        let ray_length = 2.0 * (bounds.width() + bounds.height()) + 1.0;

        let outer: Vec<BoundaryId> = self
            .boundaries
            .iter()
            .filter(|(_, b)| !b.is_inner())
            .map(|(id, _)| id)
            .collect();
        let mut roots = Vec::new();
        for &b in &outer {
            match self.enclosing_boundary(b, &components, ray_length) {
                Some(parent) => self.boundaries[parent].children.push(b),
                None => roots.push(b),
            }
        }

        // Children of an outer boundary are in the same face as it, so holes
        // get handed down until they reach a face.
        let mut stack: Vec<(FaceId, BoundaryId)> = roots
            .into_iter()
            .map(|b| (self.unbounded, b))
            .collect();
        for (f, face) in &self.faces {
            if let Some(b) = face.boundary {
                stack.extend(self.boundaries[b].children.iter().map(|&c| (f, c)));
            }
        }
        while let Some((f, b)) = stack.pop() {
            self.faces[f].holes.push(b);
            let boundary = &self.boundaries[b];
            stack.extend(boundary.children.iter().map(|&c| (f, c)));
            for h in boundary.half_edges.clone() {
                self.half_mut(h).face = Some(f);
            }
        }

        self.stage = Stage::BoundaryTreeBuilt;
    }

    /// The change in each shape's winding number when crossing an edge from
    /// the right of its forward half to the left.
    ///
    /// This counts how many times the closed loops of each shape run along the
    /// edge forwards, minus how many times they run along it backwards.
    pub fn compute_differential(&self, e: EdgeId) -> WindingMap {
        let mut ret = WindingMap::default();
        for &l in &self.edges[e].loops {
            let lp = &self.loops[l];
            if !lp.closed {
                continue;
            }
            for h in &lp.half_edges {
                if h.edge == e {
                    ret.add(lp.shape, if h.reversed { -1 } else { 1 });
                }
            }
        }
        ret
    }

    /// Propagates winding numbers outward from the unbounded face, which has
    /// winding number zero for every shape.
    pub fn compute_winding_map(&mut self) {
        debug_assert_eq!(self.stage, Stage::BoundaryTreeBuilt);
        let shapes: Vec<ShapeId> = self.shapes.iter().copied().collect();
        let zero = || {
            let mut w = WindingMap::default();
            for &s in &shapes {
                w.set(s, 0);
            }
            w
        };
        for face in self.faces.values_mut() {
            face.winding = None;
        }
        self.faces[self.unbounded].winding = Some(zero());

        let differentials: HashMap<EdgeId, WindingMap> = self
            .edges
            .keys()
            .map(|e| (e, self.compute_differential(e)))
            .collect();
        let mut pending: Vec<EdgeId> = self.edges.keys().collect();

        while !pending.is_empty() {
            let mut progress = false;
            let mut i = 0;
            while i < pending.len() {
                let e = pending[i];
                let (Some(left), Some(right)) = (
                    self.half(HalfEdgeId::forward(e)).face,
                    self.half(HalfEdgeId::backward(e)).face,
                ) else {
                    debug_assert!(false, "{e:?} is missing a face");
                    pending.swap_remove(i);
                    continue;
                };
                let diff = &differentials[&e];
                let known = (
                    self.faces[left].winding.clone(),
                    self.faces[right].winding.clone(),
                );
                match known {
                    (Some(_), Some(_)) => {}
                    (Some(w), None) => {
                        self.faces[right].winding = Some(w.zip_with(diff, |a, d| a - d));
                    }
                    (None, Some(w)) => {
                        self.faces[left].winding = Some(w.zip_with(diff, |a, d| a + d));
                    }
                    (None, None) => {
                        i += 1;
                        continue;
                    }
                }
                progress = true;
                pending.swap_remove(i);
            }

            if !progress {
                log::warn!(
                    "compute_winding_map: {} edges border only unreachable faces",
                    pending.len()
                );
                for face in self.faces.values_mut() {
                    if face.winding.is_none() {
                        face.winding = Some(zero());
                    }
                }
                break;
            }
        }

        self.stage = Stage::WindingSolved;
    }

    /// Decides, for each face, whether it's part of the result.
    ///
    /// Can be called again with a different filter, since the windings don't change.
    pub fn compute_face_inclusion(&mut self, filter: impl Fn(&WindingMap) -> bool) {
        debug_assert!(self.stage >= Stage::WindingSolved);
        for face in self.faces.values_mut() {
            face.filled = face.winding.as_ref().map(&filter);
        }
        self.stage = Stage::InclusionClassified;
    }

    /// The face containing a point that isn't on any edge.
    ///
    /// Requires the boundary tree.
    pub fn face_containing(&self, p: kurbo::Point) -> FaceId {
        debug_assert!(self.stage >= Stage::BoundaryTreeBuilt);
        let dir = Vec2::from_angle(RAY_ANGLE);
        let bounds = self.bounds();
        let ray_length =
            2.0 * (bounds.width() + bounds.height()) + (p - bounds.center()).hypot() + 1.0;
        let ray = Line::new(p, p + dir * ray_length);

        let mut best: Option<(f64, EdgeId, f64)> = None;
        for (e, edge) in &self.edges {
            for hit in edge.segment.line_intersections(ray) {
                if best.map_or(true, |(t, _, _)| hit.line_t < t) {
                    best = Some((hit.line_t, e, hit.segment_t));
                }
            }
        }
        let Some((_, e, t)) = best else {
            return self.unbounded;
        };
        let tangent = self.edges[e].segment.tangent_at(t);
        let h = if dir.cross(tangent) > 0.0 {
            HalfEdgeId::forward(e)
        } else {
            HalfEdgeId::backward(e)
        };
        self.half(h).face.unwrap_or(self.unbounded)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use kurbo::{PathSeg, Point};

    use super::*;
    use crate::topology::tests::rect_path;

    fn graph(rects: &[(u32, [f64; 4])]) -> Graph<PathSeg> {
        let mut g = Graph::new();
        for &(shape, [x0, y0, x1, y1]) in rects {
            g.add_path(ShapeId(shape), &rect_path(x0, y0, x1, y1), true);
        }
        g.compute_simplified_faces();
        g
    }

    fn winding_at(g: &Graph<PathSeg>, x: f64, y: f64) -> WindingMap {
        let f = g.face_containing(Point::new(x, y));
        g.face(f).winding.clone().unwrap()
    }

    #[test]
    #[should_panic(expected = "dangling edge")]
    fn faces_need_reduced_graph() {
        let mut g = Graph::new();
        g.add_path(ShapeId(0), &rect_path(0.0, 0.0, 1.0, 1.0), true);
        let tail = crate::topology::tests::polyline(&[(1.0, 1.0), (2.0, 2.0)]);
        g.add_subpath(ShapeId(0), tail, false, false);
        g.normalize();
        g.order_vertex_edges();
        g.extract_faces();
    }

    #[test]
    fn single_square() {
        let g = graph(&[(0, [0.0, 0.0, 1.0, 1.0])]);
        assert_eq!(g.faces().count(), 2);
        assert_eq!(g.boundaries().count(), 2);
        assert_eq!(winding_at(&g, 0.5, 0.5).get(ShapeId(0)), 1);
        assert_eq!(winding_at(&g, 2.0, 2.0).get(ShapeId(0)), 0);
        let inner: Vec<_> = g.boundaries().filter(|(_, b)| b.is_inner()).collect();
        assert_eq!(inner.len(), 1);
        assert!((inner[0].1.signed_area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_square_winds_negatively() {
        let mut g = Graph::new();
        let mut path = kurbo::BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.0, 1.0));
        path.line_to((1.0, 1.0));
        path.line_to((1.0, 0.0));
        path.close_path();
        g.add_path(ShapeId(0), &path, true);
        g.compute_simplified_faces();
        assert_eq!(winding_at(&g, 0.5, 0.5).get(ShapeId(0)), -1);
    }

    #[test]
    fn nested_squares_make_a_hole() {
        let g = graph(&[(0, [0.0, 0.0, 4.0, 4.0]), (1, [1.0, 1.0, 2.0, 2.0])]);
        assert_eq!(g.faces().count(), 3);
        let outer_face = g.face_containing(Point::new(3.0, 3.0));
        assert_eq!(g.face(outer_face).holes.len(), 1);
        assert_eq!(g.face(g.unbounded_face()).holes.len(), 1);

        let w = winding_at(&g, 1.5, 1.5);
        assert_eq!((w.get(ShapeId(0)), w.get(ShapeId(1))), (1, 1));
        let w = winding_at(&g, 3.0, 3.0);
        assert_eq!((w.get(ShapeId(0)), w.get(ShapeId(1))), (1, 0));
    }

    #[test]
    fn siblings_share_a_face() {
        let g = graph(&[
            (0, [0.0, 0.0, 10.0, 10.0]),
            (1, [1.0, 1.0, 2.0, 2.0]),
            (1, [1.5, 5.0, 2.5, 6.0]),
        ]);
        let outer_face = g.face_containing(Point::new(9.0, 9.0));
        assert_eq!(g.face(outer_face).holes.len(), 2);
        assert_eq!(winding_at(&g, 2.0, 5.5).get(ShapeId(1)), 1);
    }

    #[test]
    fn overlapping_squares() {
        let g = graph(&[(0, [0.0, 0.0, 2.0, 2.0]), (1, [1.0, 1.0, 3.0, 3.0])]);
        assert_eq!(g.faces().count(), 4);
        let w = winding_at(&g, 1.5, 1.5);
        assert_eq!((w.get(ShapeId(0)), w.get(ShapeId(1))), (1, 1));
        let w = winding_at(&g, 0.5, 0.5);
        assert_eq!((w.get(ShapeId(0)), w.get(ShapeId(1))), (1, 0));
        let w = winding_at(&g, 2.5, 2.5);
        assert_eq!((w.get(ShapeId(0)), w.get(ShapeId(1))), (0, 1));
    }

    #[test]
    fn windings_agree_with_differentials() {
        let g = graph(&[
            (0, [0.0, 0.0, 3.0, 3.0]),
            (0, [1.0, 1.0, 4.0, 2.0]),
            (1, [2.0, -1.0, 2.5, 5.0]),
            (2, [0.5, 0.5, 1.5, 1.5]),
        ]);
        check_winding_consistency(&g);
    }

    pub(crate) fn check_winding_consistency(g: &Graph<PathSeg>) {
        for (e, _) in g.edges() {
            let left = g.half(HalfEdgeId::forward(e)).face.unwrap();
            let right = g.half(HalfEdgeId::backward(e)).face.unwrap();
            let wl = g.face(left).winding.as_ref().unwrap();
            let wr = g.face(right).winding.as_ref().unwrap();
            let diff = g.compute_differential(e);
            for s in g.shapes() {
                assert_eq!(wl.get(s) - wr.get(s), diff.get(s), "{e:?} for {s:?}");
            }
        }
    }

    #[test]
    fn inclusion() {
        let mut g = graph(&[(0, [0.0, 0.0, 2.0, 2.0]), (1, [1.0, 1.0, 3.0, 3.0])]);
        g.compute_face_inclusion(|w| w.get(ShapeId(0)) != 0 && w.get(ShapeId(1)) != 0);
        let filled = g.faces().filter(|(_, f)| f.filled == Some(true)).count();
        assert_eq!(filled, 1);
        assert_eq!(g.stage(), Stage::InclusionClassified);
    }
}
