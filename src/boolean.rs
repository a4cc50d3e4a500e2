//! Turning classified faces into output paths.
//!
//! Once every face knows whether it's filled, the edges we care about are the
//! ones separating a filled face from an unfilled one. We copy them into a
//! fresh graph, where neighboring faces always alternate between filled and
//! unfilled, and trace that graph's faces to get the output contours.

use kurbo::{Line, Point, Vec2};
use slotmap::SecondaryMap;

use crate::contour::{Contour, Contours};
use crate::faces::RAY_ANGLE;
use crate::segment::Segment;
use crate::topology::{
    BoundaryId, EdgeId, Graph, HalfEdgeId, LoopIdx, ShapeId, Stage, VertexId, WindingMap,
};
use crate::{BinaryOp, FillRule};

/// What to keep when clipping a path against an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Keep the parts of the path outside the clip area.
    pub include_exterior: bool,
    /// Keep the parts of the path running along the clip area's boundary.
    pub include_boundary: bool,
    /// Keep the parts of the path inside the clip area.
    pub include_interior: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        ClipOptions {
            include_exterior: false,
            include_boundary: true,
            include_interior: true,
        }
    }
}

/// Is a point with this winding number inside, according to the fill rule?
pub fn is_filled(winding: i32, fill_rule: FillRule) -> bool {
    match fill_rule {
        FillRule::EvenOdd => winding % 2 != 0,
        FillRule::NonZero => winding != 0,
    }
}

/// The inclusion rule for a boolean operation over the shapes `0..shape_count`.
///
/// Union, intersection and exclusive-or treat all the shapes alike (a point
/// is in the exclusive-or if it's in an odd number of shapes). The difference
/// is shape 0 minus all the others.
pub fn binary_filter(
    op: BinaryOp,
    fill_rule: FillRule,
    shape_count: u32,
) -> impl Fn(&WindingMap) -> bool {
    move |w: &WindingMap| {
        let mut inside = (0..shape_count).map(|s| is_filled(w.get(ShapeId(s)), fill_rule));
        match op {
            BinaryOp::Union => inside.any(|x| x),
            BinaryOp::Intersection => shape_count > 0 && inside.all(|x| x),
            BinaryOp::Xor => inside.filter(|&x| x).count() % 2 == 1,
            BinaryOp::Difference => inside.next() == Some(true) && inside.all(|x| !x),
        }
    }
}

/// The inclusion rule for simplifying shape 0.
pub fn simplify_filter(fill_rule: FillRule) -> impl Fn(&WindingMap) -> bool {
    move |w: &WindingMap| is_filled(w.get(ShapeId(0)), fill_rule)
}

impl<S: Segment> Graph<S> {
    /// Computes the contours of the set picked out by `filter`.
    ///
    /// Runs the whole face pipeline first, if it hasn't been run already. The
    /// windings are kept, so later calls with other filters only redo the
    /// classification and output.
    pub fn binary_result(&mut self, filter: impl Fn(&WindingMap) -> bool) -> Contours<S> {
        if self.stage == Stage::Unprocessed {
            self.compute_simplified_faces();
        }
        self.compute_face_inclusion(filter);
        let mut filled = self.create_filled_sub_graph();
        filled.fill_alternating_faces();
        filled.faces_to_contours()
    }

    /// Is `e` on the boundary between a filled face and an unfilled one?
    fn separates_fill(&self, e: EdgeId) -> bool {
        let filled = |h: HalfEdgeId| {
            self.half(h)
                .face
                .and_then(|f| self.faces[f].filled)
                .unwrap_or(false)
        };
        filled(HalfEdgeId::forward(e)) != filled(HalfEdgeId::backward(e))
    }

    /// Builds a new graph out of the edges that separate filled faces from
    /// unfilled ones, and extracts its faces.
    pub fn create_filled_sub_graph(&self) -> Graph<S> {
        debug_assert_eq!(self.stage, Stage::InclusionClassified);
        let mut ret = Graph::with_tolerances(self.tolerances);
        let mut remap: SecondaryMap<VertexId, VertexId> = SecondaryMap::new();

        for (e, edge) in &self.edges {
            if !self.separates_fill(e) {
                continue;
            }
            let mut vertex = |v: VertexId, ret: &mut Graph<S>| {
                if let Some(&w) = remap.get(v) {
                    w
                } else {
                    let w = ret.add_vertex(self.vertices[v].point);
                    remap.insert(v, w);
                    w
                }
            };
            let start = vertex(edge.start, &mut ret);
            let end = vertex(edge.end, &mut ret);
            ret.add_edge(edge.segment.clone(), start, end);
        }
        log::debug!(
            "create_filled_sub_graph: kept {} of {} edges",
            ret.edges.len(),
            self.edges.len()
        );

        ret.collapse_adjacent_edges();
        ret.order_vertex_edges();
        ret.extract_faces();
        ret.compute_boundary_tree();
        ret
    }

    /// Marks faces as filled and unfilled, starting from an unfilled
    /// unbounded face and flipping across every edge.
    ///
    /// This only makes sense for graphs like the ones from
    /// [`Graph::create_filled_sub_graph`], in which every edge separates a
    /// filled face from an unfilled one.
    pub fn fill_alternating_faces(&mut self) {
        debug_assert_eq!(self.stage, Stage::BoundaryTreeBuilt);
        for face in self.faces.values_mut() {
            face.filled = None;
        }
        self.faces[self.unbounded].filled = Some(false);

        let mut pending: Vec<EdgeId> = self.edges.keys().collect();
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|&e| {
                let left = self.half(HalfEdgeId::forward(e)).face;
                let right = self.half(HalfEdgeId::backward(e)).face;
                let (Some(left), Some(right)) = (left, right) else {
                    return false;
                };
                match (self.faces[left].filled, self.faces[right].filled) {
                    (Some(l), None) => self.faces[right].filled = Some(!l),
                    (None, Some(r)) => self.faces[left].filled = Some(!r),
                    (None, None) => return true,
                    (Some(l), Some(r)) => debug_assert_ne!(l, r, "{e:?} doesn't separate fill"),
                }
                false
            });

            if pending.len() == before {
                log::warn!(
                    "fill_alternating_faces: {} edges border only unreachable faces",
                    pending.len()
                );
                for face in self.faces.values_mut() {
                    face.filled.get_or_insert(false);
                }
                break;
            }
        }

        self.stage = Stage::InclusionClassified;
    }

    fn boundary_contour(&self, b: BoundaryId) -> Contour<S> {
        Contour {
            segments: self.boundaries[b]
                .half_edges
                .iter()
                .map(|&h| self.half_segment(h))
                .collect(),
            ..Contour::default()
        }
    }

    /// Emits a contour for the boundary of every filled face, and a contour
    /// for each of its holes.
    pub fn faces_to_contours(&self) -> Contours<S> {
        debug_assert_eq!(self.stage, Stage::InclusionClassified);
        let mut ret = Contours::default();
        for face in self.faces.values() {
            let (Some(true), Some(boundary)) = (face.filled, face.boundary) else {
                continue;
            };
            let outer = ret.push(self.boundary_contour(boundary));
            for &hole in &face.holes {
                ret.push(Contour {
                    parent: Some(outer),
                    outer: false,
                    ..self.boundary_contour(hole)
                });
            }
        }
        ret
    }

    /// The winding number of `shape`'s closed loops around a point that
    /// isn't on any of them.
    ///
    /// Works on a normalized graph, without needing faces.
    pub fn winding_number(&self, shape: ShapeId, p: Point) -> i32 {
        self.winding_from(&self.shape_differentials(shape), p)
    }

    /// The edges that `shape`'s closed loops run along on balance, with the
    /// net number of times they run along each one forwards.
    fn shape_differentials(&self, shape: ShapeId) -> Vec<(EdgeId, i32)> {
        let mut diffs: SecondaryMap<EdgeId, i32> = SecondaryMap::new();
        for (_, lp) in self.loops.iter() {
            if lp.shape != shape || !lp.closed {
                continue;
            }
            for h in &lp.half_edges {
                if let Some(entry) = diffs.entry(h.edge) {
                    *entry.or_insert(0) += if h.reversed { -1 } else { 1 };
                }
            }
        }
        diffs.into_iter().filter(|&(_, d)| d != 0).collect()
    }

    fn winding_from(&self, diffs: &[(EdgeId, i32)], p: Point) -> i32 {
        let dir = Vec2::from_angle(RAY_ANGLE);
        let bounds = self.bounds();
        let ray_length =
            2.0 * (bounds.width() + bounds.height()) + (p - bounds.center()).hypot() + 1.0;
        let ray = Line::new(p, p + dir * ray_length);

        let mut winding = 0;
        for &(e, diff) in diffs {
            let edge = &self.edges[e];
            for hit in edge.segment.line_intersections(ray) {
                let cross = dir.cross(edge.segment.tangent_at(hit.segment_t));
                if cross > 0.0 {
                    winding += diff;
                } else if cross < 0.0 {
                    winding -= diff;
                }
            }
        }
        winding
    }

    /// Clips the loops of `shape` against the area enclosed by `clip`.
    ///
    /// Each part of `shape` ends up in the interior of the clip area, in its
    /// exterior, or running along its boundary; `options` says which of those
    /// to keep. Every maximal run of kept segments becomes one contour. A closed
    /// loop that is kept entirely stays closed.
    pub fn clip_shape(&mut self, clip: ShapeId, shape: ShapeId, options: ClipOptions) -> Contours<S> {
        debug_assert_eq!(self.stage, Stage::Unprocessed);
        let clip_loops: Vec<LoopIdx> = self
            .loops
            .indices()
            .filter(|&l| self.loops[l].shape == clip)
            .collect();
        for l in clip_loops {
            for h in self.loops[l].half_edges.clone() {
                self.edges[h.edge].from_clip = true;
            }
        }
        self.normalize();
        let clip_diffs = self.shape_differentials(clip);

        let mut ret = Contours::default();
        let mut kept = 0;
        for (_, lp) in self.loops.iter() {
            if lp.shape != shape || lp.half_edges.is_empty() {
                continue;
            }
            let included: Vec<bool> = lp
                .half_edges
                .iter()
                .map(|&h| self.clip_includes(h.edge, &clip_diffs, options))
                .collect();
            for run in runs(&included, lp.closed) {
                kept += run.indices.len();
                ret.push(Contour {
                    segments: run
                        .indices
                        .iter()
                        .map(|&i| self.half_segment(lp.half_edges[i]))
                        .collect(),
                    closed: run.closed,
                    ..Contour::default()
                });
            }
        }
        log::debug!("clip_shape: kept {kept} segments in {} runs", ret.len());
        ret
    }

    fn clip_includes(
        &self,
        e: EdgeId,
        clip_diffs: &[(EdgeId, i32)],
        options: ClipOptions,
    ) -> bool {
        let edge = &self.edges[e];
        if edge.from_clip {
            options.include_boundary
        } else if self.winding_from(clip_diffs, edge.segment.eval(0.5)) != 0 {
            options.include_interior
        } else {
            options.include_exterior
        }
    }
}

#[derive(Debug, PartialEq)]
struct Run {
    indices: Vec<usize>,
    closed: bool,
}

/// Splits a loop into maximal runs of included segments.
///
/// For a closed loop, a run that crosses the loop's starting point isn't
/// split there.
fn runs(included: &[bool], closed: bool) -> Vec<Run> {
    let n = included.len();
    if closed && included.iter().all(|&x| x) {
        return vec![Run {
            indices: (0..n).collect(),
            closed: true,
        }];
    }

    // Start just after an excluded segment, so that no run wraps around.
    let offset = if closed {
        included.iter().position(|&x| !x).map_or(0, |k| k + 1)
    } else {
        0
    };
    let mut ret = Vec::new();
    let mut current = Vec::new();
    for i in (0..n).map(|i| (i + offset) % n) {
        if included[i] {
            current.push(i);
        } else if !current.is_empty() {
            ret.push(Run {
                indices: std::mem::take(&mut current),
                closed: false,
            });
        }
    }
    if !current.is_empty() {
        ret.push(Run {
            indices: current,
            closed: false,
        });
    }
    ret
}
