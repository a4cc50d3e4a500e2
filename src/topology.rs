//! The planar graph: vertices, edges, loops, boundaries and faces.
//!
//! Everything is stored in arenas owned by a [`Graph`] and referred to by
//! handle. Removing an entity invalidates its handle, and indexing with a
//! stale handle panics, so a dangling reference can't silently alias a new
//! entity.

use std::collections::{BTreeMap, BTreeSet};

use kurbo::{BezPath, PathEl, PathSeg, Point, Rect};
use slotmap::{new_key_type, SlotMap};

use crate::segment::Segment;
use crate::tolerances::Tolerances;

new_key_type! {
    /// A handle to a [`Vertex`].
    pub struct VertexId;
    /// A handle to an [`Edge`].
    pub struct EdgeId;
    /// A handle to a [`Boundary`].
    pub struct BoundaryId;
    /// A handle to a [`Face`].
    pub struct FaceId;
}

/// One of the two directions of an edge.
///
/// The forward half runs from the edge's start vertex to its end vertex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId {
    /// The edge this is half of.
    pub edge: EdgeId,
    /// Does this half run against the edge's orientation?
    pub reversed: bool,
}

impl HalfEdgeId {
    /// The half that runs along the edge's orientation.
    pub fn forward(edge: EdgeId) -> Self {
        HalfEdgeId {
            edge,
            reversed: false,
        }
    }

    /// The half that runs against the edge's orientation.
    pub fn backward(edge: EdgeId) -> Self {
        HalfEdgeId {
            edge,
            reversed: true,
        }
    }

    /// The other half of the same edge.
    pub fn other_half(self) -> Self {
        HalfEdgeId {
            edge: self.edge,
            reversed: !self.reversed,
        }
    }

    fn slot(self) -> usize {
        usize::from(self.reversed)
    }
}

impl std::fmt::Debug for HalfEdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dir = if self.reversed { "<-" } else { "->" };
        write!(f, "{:?}{dir}", self.edge)
    }
}

/// A caller-supplied tag for a group of input paths.
///
/// Paths with the same tag contribute to the same winding number.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ShapeId(pub u32);

/// Winding numbers, one per shape.
///
/// Shapes that don't appear in the map have winding number zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindingMap(BTreeMap<ShapeId, i32>);

impl WindingMap {
    /// The winding number of a shape.
    pub fn get(&self, shape: ShapeId) -> i32 {
        self.0.get(&shape).copied().unwrap_or(0)
    }

    /// Sets the winding number of a shape.
    pub fn set(&mut self, shape: ShapeId, winding: i32) {
        self.0.insert(shape, winding);
    }

    /// Adds to the winding number of a shape.
    pub fn add(&mut self, shape: ShapeId, delta: i32) {
        *self.0.entry(shape).or_insert(0) += delta;
    }

    /// Iterates over the shapes with explicitly stored winding numbers.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, i32)> + '_ {
        self.0.iter().map(|(shape, w)| (*shape, *w))
    }

    /// Combines two maps shape-by-shape.
    pub(crate) fn zip_with(&self, other: &WindingMap, f: impl Fn(i32, i32) -> i32) -> WindingMap {
        let shapes: BTreeSet<ShapeId> = self.0.keys().chain(other.0.keys()).copied().collect();
        WindingMap(
            shapes
                .into_iter()
                .map(|s| (s, f(self.get(s), other.get(s))))
                .collect(),
        )
    }
}

/// A point where edges meet.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// Where it is.
    pub point: Point,
    /// Every half-edge that ends here, each exactly once.
    ///
    /// Once edges have been ordered, this is sorted counter-clockwise (in y-up
    /// coordinates) by the direction in which each edge leaves the vertex.
    pub incident: Vec<HalfEdgeId>,
    pub(crate) visited: bool,
    pub(crate) visit_index: usize,
    pub(crate) low_index: usize,
}

impl Vertex {
    fn new(point: Point) -> Self {
        Vertex {
            point,
            incident: Vec::new(),
            visited: false,
            visit_index: 0,
            low_index: 0,
        }
    }
}

/// The key that half-edges are sorted by around a vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortVector {
    /// The (possibly rotated) angle of the outgoing direction.
    pub angle: f64,
    /// The curvature where the edge leaves the vertex.
    pub curvature: f64,
    /// The curvature near the far end of the edge.
    pub far_curvature: f64,
}

/// The per-direction data of an edge.
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeData {
    /// The face to the left of this half.
    pub face: Option<FaceId>,
    /// The boundary that this half belongs to.
    pub boundary: Option<BoundaryId>,
    /// The key that orders this half among the halves ending at its end vertex.
    pub sort_vector: Option<SortVector>,
}

/// An oriented curve between two vertices.
#[derive(Clone, Debug)]
pub struct Edge<S> {
    /// The geometry, oriented from `start` to `end`.
    pub segment: S,
    /// The vertex at parameter 0.
    pub start: VertexId,
    /// The vertex at parameter 1.
    pub end: VertexId,
    /// Data for the forward and reversed halves, in that order.
    pub halves: [HalfEdgeData; 2],
    /// Did this edge come from the clip shape in a clipping operation?
    pub from_clip: bool,
    // The loops that mention this edge (possibly stale, never missing).
    pub(crate) loops: Vec<LoopIdx>,
}

/// An index into the graph's list of loops.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopIdx(pub usize);

/// The graph's loops, indexed by [`LoopIdx`].
#[derive(Clone)]
pub struct LoopVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(LoopVec, LoopIdx, "loop");

/// An input path, as a sequence of half-edges.
///
/// The sequence is kept up to date as edges get split, merged and removed.
#[derive(Clone, Debug)]
pub struct Loop {
    /// The shape this path belongs to.
    pub shape: ShapeId,
    /// Closed paths contribute to winding numbers; open ones don't.
    pub closed: bool,
    /// The half-edges along the path, in order.
    pub half_edges: Vec<HalfEdgeId>,
}

/// A cycle of half-edges, found by always taking the next edge clockwise.
#[derive(Clone, Debug)]
pub struct Boundary {
    /// The cycle.
    pub half_edges: Vec<HalfEdgeId>,
    /// Positive for the boundary of a bounded face, which winds counter-clockwise
    /// (in y-up coordinates). Negative for the outside of a connected component.
    pub signed_area: f64,
    /// The bounding box of the cycle.
    pub bounds: Rect,
    /// The outer boundaries immediately inside this one.
    pub children: Vec<BoundaryId>,
}

impl Boundary {
    /// Is this the boundary of a bounded face?
    pub fn is_inner(&self) -> bool {
        self.signed_area > 0.0
    }
}

/// A connected region of the plane that no edge passes through.
#[derive(Clone, Debug, Default)]
pub struct Face {
    /// The boundary enclosing this face, or `None` for the unbounded face.
    pub boundary: Option<BoundaryId>,
    /// The outer boundaries of the components inside this face.
    pub holes: Vec<BoundaryId>,
    /// The winding number of each shape in this face, once solved.
    pub winding: Option<WindingMap>,
    /// Whether this face is part of the result, once classified.
    pub filled: Option<bool>,
}

/// How far a graph has progressed through face classification.
///
/// Each pass expects the graph to be at a particular stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Faces haven't been computed. The graph can still be edited.
    Unprocessed,
    /// Boundaries and the faces they enclose are known.
    BoundariesExtracted,
    /// Every face knows its holes.
    BoundaryTreeBuilt,
    /// Every face knows its winding numbers.
    WindingSolved,
    /// Every face knows whether it's filled.
    InclusionClassified,
}

/// A planar graph of curve segments, together with the input paths that produced it.
#[derive(Clone, Debug)]
pub struct Graph<S> {
    pub(crate) vertices: SlotMap<VertexId, Vertex>,
    pub(crate) edges: SlotMap<EdgeId, Edge<S>>,
    pub(crate) loops: LoopVec<Loop>,
    pub(crate) boundaries: SlotMap<BoundaryId, Boundary>,
    pub(crate) faces: SlotMap<FaceId, Face>,
    pub(crate) unbounded: FaceId,
    pub(crate) shapes: BTreeSet<ShapeId>,
    pub(crate) stage: Stage,
    pub(crate) tolerances: Tolerances,
}

impl<S: Segment> Default for Graph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Segment> Graph<S> {
    /// Creates an empty graph with the default tolerances.
    pub fn new() -> Self {
        Self::with_tolerances(Tolerances::default())
    }

    /// Creates an empty graph.
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        let mut faces = SlotMap::with_key();
        let unbounded = faces.insert(Face::default());
        Graph {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            loops: LoopVec::default(),
            boundaries: SlotMap::with_key(),
            faces,
            unbounded,
            shapes: BTreeSet::new(),
            stage: Stage::Unprocessed,
            tolerances,
        }
    }

    /// The tolerances this graph was built with.
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// The current stage of face classification.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// All the vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter()
    }

    /// All the edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge<S>)> + '_ {
        self.edges.iter()
    }

    /// All the input loops.
    pub fn loops(&self) -> &LoopVec<Loop> {
        &self.loops
    }

    /// All the boundaries.
    pub fn boundaries(&self) -> impl Iterator<Item = (BoundaryId, &Boundary)> + '_ {
        self.boundaries.iter()
    }

    /// All the faces, including the unbounded one.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter()
    }

    /// The shapes that have been added.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().copied()
    }

    /// The face containing everything far away.
    pub fn unbounded_face(&self) -> FaceId {
        self.unbounded
    }

    /// Looks up a vertex.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> &Edge<S> {
        &self.edges[id]
    }

    /// Looks up a boundary.
    pub fn boundary(&self, id: BoundaryId) -> &Boundary {
        &self.boundaries[id]
    }

    /// Looks up a face.
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id]
    }

    /// The number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The per-direction data of a half-edge.
    pub fn half(&self, h: HalfEdgeId) -> &HalfEdgeData {
        &self.edges[h.edge].halves[h.slot()]
    }

    pub(crate) fn half_mut(&mut self, h: HalfEdgeId) -> &mut HalfEdgeData {
        &mut self.edges[h.edge].halves[h.slot()]
    }

    /// The vertex a half-edge leaves from.
    pub fn half_start(&self, h: HalfEdgeId) -> VertexId {
        let edge = &self.edges[h.edge];
        if h.reversed {
            edge.end
        } else {
            edge.start
        }
    }

    /// The vertex a half-edge arrives at.
    pub fn half_end(&self, h: HalfEdgeId) -> VertexId {
        self.half_start(h.other_half())
    }

    /// The geometry of a half-edge, oriented in its direction of travel.
    pub fn half_segment(&self, h: HalfEdgeId) -> S {
        let seg = &self.edges[h.edge].segment;
        if h.reversed {
            seg.reversed()
        } else {
            seg.clone()
        }
    }

    /// The bounding box of everything in the graph.
    pub fn bounds(&self) -> Rect {
        self.edges
            .values()
            .map(|e| e.segment.bounds())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    pub(crate) fn add_vertex(&mut self, point: Point) -> VertexId {
        self.vertices.insert(Vertex::new(point))
    }

    /// Adds an edge, snapping the segment's endpoints onto its vertices.
    pub(crate) fn add_edge(&mut self, segment: S, start: VertexId, end: VertexId) -> EdgeId {
        let segment = segment.with_endpoints(self.vertices[start].point, self.vertices[end].point);
        let e = self.edges.insert(Edge {
            segment,
            start,
            end,
            halves: Default::default(),
            from_clip: false,
            loops: Vec::new(),
        });
        self.vertices[start].incident.push(HalfEdgeId::backward(e));
        self.vertices[end].incident.push(HalfEdgeId::forward(e));
        e
    }

    /// Adds an edge that replaces part of `parent`, inheriting its loop membership.
    pub(crate) fn add_child_edge(
        &mut self,
        parent: EdgeId,
        segment: S,
        start: VertexId,
        end: VertexId,
    ) -> EdgeId {
        let e = self.add_edge(segment, start, end);
        let (loops, from_clip) = {
            let p = &self.edges[parent];
            (p.loops.clone(), p.from_clip)
        };
        let edge = &mut self.edges[e];
        edge.loops = loops;
        edge.from_clip = from_clip;
        e
    }

    /// Removes an edge from the graph, and from its vertices' incident lists.
    ///
    /// Loops aren't touched: call [`Graph::replace_edge_in_loops`] first.
    pub(crate) fn remove_edge(&mut self, e: EdgeId) {
        if let Some(edge) = self.edges.remove(e) {
            if let Some(v) = self.vertices.get_mut(edge.start) {
                v.incident.retain(|h| h.edge != e);
            }
            if let Some(v) = self.vertices.get_mut(edge.end) {
                v.incident.retain(|h| h.edge != e);
            }
        }
    }

    /// Replaces every occurrence of `e` in every loop.
    ///
    /// `replacement` describes the path of `e`'s forward half; where a loop
    /// traverses `e` backwards, the replacement is traversed backwards too.
    /// An empty replacement splices the edge out.
    pub(crate) fn replace_edge_in_loops(&mut self, e: EdgeId, replacement: &[HalfEdgeId]) {
        let forward = HalfEdgeId::forward(e);
        let backward = HalfEdgeId::backward(e);
        let reversed: Vec<HalfEdgeId> = replacement.iter().rev().map(|h| h.other_half()).collect();
        let loops = self.edges[e].loops.clone();

        for &l in &loops {
            let old = std::mem::take(&mut self.loops[l].half_edges);
            let mut new = Vec::with_capacity(old.len() + replacement.len());
            for h in old {
                if h == forward {
                    new.extend_from_slice(replacement);
                } else if h == backward {
                    new.extend_from_slice(&reversed);
                } else {
                    new.push(h);
                }
            }
            self.loops[l].half_edges = new;
        }

        for h in replacement {
            let edge = &mut self.edges[h.edge];
            for &l in &loops {
                if !edge.loops.contains(&l) {
                    edge.loops.push(l);
                }
            }
        }
    }

    /// Adds a path, given as a sequence of segments, to the graph.
    ///
    /// The path is treated as closed if `closed` or `ensure_closed` is set. A
    /// closed path whose ends don't meet gets an extra line to close it. Where
    /// two consecutive segments don't quite meet, they are joined at the
    /// average of their endpoints. Zero-length segments are dropped.
    pub fn add_subpath(
        &mut self,
        shape: ShapeId,
        segments: impl IntoIterator<Item = S>,
        closed: bool,
        ensure_closed: bool,
    ) -> Option<LoopIdx> {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let mut segs: Vec<S> = segments
            .into_iter()
            .filter(|s| {
                let b = s.bounds();
                s.start() != s.end() || (s.encloses_area() && (b.width() > 0.0 || b.height() > 0.0))
            })
            .collect();
        let (first, last) = match (segs.first(), segs.last()) {
            (Some(first), Some(last)) => (first.start(), last.end()),
            _ => return None,
        };

        let closed = closed || ensure_closed;
        if closed && first != last {
            segs.push(S::line(last, first));
        }

        let n = segs.len();
        let vertex_count = if closed { n } else { n + 1 };
        let vertices: Vec<VertexId> = (0..vertex_count)
            .map(|i| {
                let point = if i == 0 {
                    if closed {
                        segs[n - 1].end().midpoint(segs[0].start())
                    } else {
                        segs[0].start()
                    }
                } else if i == n {
                    segs[n - 1].end()
                } else {
                    segs[i - 1].end().midpoint(segs[i].start())
                };
                self.add_vertex(point)
            })
            .collect();

        let idx = self.loops.push(Loop {
            shape,
            closed,
            half_edges: Vec::with_capacity(n),
        });
        for (i, seg) in segs.into_iter().enumerate() {
            let e = self.add_edge(seg, vertices[i], vertices[(i + 1) % vertex_count]);
            self.edges[e].loops.push(idx);
            self.loops[idx].half_edges.push(HalfEdgeId::forward(e));
        }
        self.shapes.insert(shape);
        Some(idx)
    }

    /// Checks the structural invariants of the graph, panicking if any fail.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub fn check_invariants(&self) {
        for (e, edge) in &self.edges {
            assert!(self.vertices.contains_key(edge.start), "{e:?} has a dangling start");
            assert!(self.vertices.contains_key(edge.end), "{e:?} has a dangling end");
            let fwd = HalfEdgeId::forward(e);
            let bwd = HalfEdgeId::backward(e);
            let end = &self.vertices[edge.end].incident;
            let start = &self.vertices[edge.start].incident;
            assert_eq!(end.iter().filter(|&&h| h == fwd).count(), 1, "{fwd:?}");
            assert_eq!(start.iter().filter(|&&h| h == bwd).count(), 1, "{bwd:?}");
        }
        for (v, vertex) in &self.vertices {
            for &h in &vertex.incident {
                assert!(self.edges.contains_key(h.edge), "{v:?} has a dangling {h:?}");
                assert_eq!(self.half_end(h), v);
            }
            // Reduction has run by the time faces exist, so nothing dangles.
            if self.stage >= Stage::BoundariesExtracted {
                assert_ne!(vertex.incident.len(), 1, "{v:?} has a dangling edge");
            }
        }
        for (l, lp) in self.loops.iter() {
            for h in &lp.half_edges {
                assert!(self.edges.contains_key(h.edge), "{l:?} has a dangling {h:?}");
                assert!(self.edges[h.edge].loops.contains(&l));
            }
        }
    }

    /// Checks the structural invariants of the graph, panicking if any fail.
    #[cfg(not(any(test, feature = "slow-asserts")))]
    pub fn check_invariants(&self) {}
}

impl Graph<PathSeg> {
    /// Adds every subpath of a `BezPath`, tagged with `shape`.
    ///
    /// Subpaths ending with `ClosePath` are closed. The others are closed only
    /// if `ensure_closed` is set.
    pub fn add_path(&mut self, shape: ShapeId, path: &BezPath, ensure_closed: bool) {
        let mut start = Point::ZERO;
        let mut last = Point::ZERO;
        let mut segs: Vec<PathSeg> = Vec::new();

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    self.add_subpath(shape, segs.drain(..), false, ensure_closed);
                    start = p;
                    last = p;
                }
                PathEl::LineTo(p) => {
                    segs.push(PathSeg::Line(kurbo::Line::new(last, p)));
                    last = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    segs.push(PathSeg::Quad(kurbo::QuadBez::new(last, p1, p2)));
                    last = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    segs.push(PathSeg::Cubic(kurbo::CubicBez::new(last, p1, p2, p3)));
                    last = p3;
                }
                PathEl::ClosePath => {
                    self.add_subpath(shape, segs.drain(..), true, ensure_closed);
                    last = start;
                }
            }
        }
        self.add_subpath(shape, segs.drain(..), false, ensure_closed);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kurbo::Line;

    pub(crate) fn polyline(points: &[(f64, f64)]) -> Vec<PathSeg> {
        points
            .windows(2)
            .map(|w| PathSeg::Line(Line::new(w[0], w[1])))
            .collect()
    }

    pub(crate) fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        kurbo::Shape::to_path(&Rect::new(x0, y0, x1, y1), 0.1)
    }

    #[test]
    fn closed_square() {
        let mut g = Graph::new();
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let l = g
            .add_subpath(ShapeId(0), polyline(&pts), false, true)
            .unwrap();
        g.check_invariants();

        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 4);
        let lp = &g.loops()[l];
        assert!(lp.closed);
        assert_eq!(lp.half_edges.len(), 4);
        for w in lp.half_edges.windows(2) {
            assert_eq!(g.half_end(w[0]), g.half_start(w[1]));
        }
        for (_, v) in g.vertices() {
            assert_eq!(v.incident.len(), 2);
        }
    }

    #[test]
    fn open_path_stays_open() {
        let mut g = Graph::new();
        let l = g
            .add_subpath(ShapeId(3), polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]), false, false)
            .unwrap();
        g.check_invariants();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert!(!g.loops()[l].closed);
        assert_eq!(g.shapes().collect::<Vec<_>>(), vec![ShapeId(3)]);
    }

    #[test]
    fn degenerate_segments_are_dropped() {
        let mut g = Graph::new();
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        assert!(g.add_subpath(ShapeId(0), polyline(&pts), false, false).is_some());
        assert_eq!(g.edge_count(), 2);
        assert!(g.add_subpath(ShapeId(0), Vec::new(), true, true).is_none());
    }

    #[test]
    fn joints_are_averaged() {
        let mut g = Graph::new();
        let segs = vec![
            PathSeg::Line(Line::new((0.0, 0.0), (1.0, 0.0))),
            PathSeg::Line(Line::new((1.0, 0.002), (1.0, 1.0))),
        ];
        g.add_subpath(ShapeId(0), segs, false, false);
        let joint = g
            .vertices()
            .find(|(_, v)| v.incident.len() == 2)
            .map(|(_, v)| v.point)
            .unwrap();
        assert_eq!(joint, Point::new(1.0, 0.001));
        for (_, e) in g.edges() {
            assert_eq!(e.segment.start(), g.vertex(e.start).point);
            assert_eq!(e.segment.end(), g.vertex(e.end).point);
        }
    }

    #[test]
    fn bez_path_subpaths() {
        let mut g = Graph::new();
        let mut path = rect_path(0.0, 0.0, 1.0, 1.0);
        path.move_to((5.0, 5.0));
        path.line_to((6.0, 5.0));
        g.add_path(ShapeId(0), &path, false);
        assert_eq!(g.loops().len(), 2);
        let closed: Vec<bool> = g.loops().iter().map(|(_, l)| l.closed).collect();
        assert_eq!(closed, vec![true, false]);
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn loop_replacement_respects_direction() {
        let mut g = Graph::new();
        let pts = [(0.0, 0.0), (2.0, 0.0)];
        let a = g.add_subpath(ShapeId(0), polyline(&pts), false, false).unwrap();
        let back = [(2.0, 0.0), (0.0, 0.0)];
        let b = g.add_subpath(ShapeId(1), polyline(&back), false, false).unwrap();

        // Join the second loop's edge onto the first loop's vertices, so both
        // loops traverse the same edge in opposite directions.
        let e = g.loops()[a].half_edges[0].edge;
        let other = g.loops()[b].half_edges[0].edge;
        g.replace_edge_in_loops(other, &[HalfEdgeId::backward(e)]);
        g.remove_edge(other);

        let (start, end) = (g.edge(e).start, g.edge(e).end);
        let mid = g.add_vertex(Point::new(1.0, 0.0));
        let seg = g.edge(e).segment;
        let [s0, s1] = seg.subdivided(0.5);
        let e0 = g.add_child_edge(e, s0, start, mid);
        let e1 = g.add_child_edge(e, s1, mid, end);
        g.replace_edge_in_loops(e, &[HalfEdgeId::forward(e0), HalfEdgeId::forward(e1)]);
        g.remove_edge(e);

        assert_eq!(
            g.loops()[a].half_edges,
            vec![HalfEdgeId::forward(e0), HalfEdgeId::forward(e1)]
        );
        assert_eq!(
            g.loops()[b].half_edges,
            vec![HalfEdgeId::backward(e1), HalfEdgeId::backward(e0)]
        );
    }
}
