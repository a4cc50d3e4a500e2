#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

mod boolean;
mod contour;
mod faces;
mod normalize;
mod num;
mod reduce;
pub mod segment;
mod segment_tree;
mod sweep;
mod tolerances;
pub mod topology;

#[cfg(feature = "generators")]
pub mod generators;

use arrayvec::ArrayVec;
use kurbo::{BezPath, PathEl, PathSeg, Point};

pub use boolean::{binary_filter, is_filled, simplify_filter, ClipOptions};
pub use contour::{Contour, ContourIdx, Contours};
pub use segment::Segment;
pub use tolerances::Tolerances;
pub use topology::{Graph, ShapeId, WindingMap};

/// A fill rule tells us how to decide whether a point is "inside" a path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FillRule {
    /// The point is "inside" if its winding number is odd.
    EvenOdd,
    /// The point is "inside" if its winding number is non-zero.
    NonZero,
}

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
}

/// The input points were faulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// At least one of the inputs was infinite.
    #[error("one of the inputs was infinite")]
    Infinity,
    /// At least one of the inputs was not a number.
    #[error("one of the inputs had a NaN")]
    NaN,
}

fn check_finite<'a>(paths: impl IntoIterator<Item = &'a BezPath>) -> Result<(), Error> {
    let mut ret = Ok(());
    for el in paths.into_iter().flat_map(|p| p.elements()) {
        let mut points = ArrayVec::<Point, 3>::new();
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
            PathEl::QuadTo(p1, p2) => points.extend([p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => points.extend([p1, p2, p3]),
            PathEl::ClosePath => {}
        }
        for p in points {
            if p.x.is_nan() || p.y.is_nan() {
                return Err(Error::NaN);
            }
            if !p.x.is_finite() || !p.y.is_finite() {
                ret = Err(Error::Infinity);
            }
        }
    }
    ret
}

/// Runs a filter over a collection of shapes, where the `i`th path is
/// shape `i`. Every subpath is treated as closed.
fn shapes_op(
    shapes: &[&BezPath],
    filter: impl Fn(&WindingMap) -> bool,
) -> Result<Contours<PathSeg>, Error> {
    check_finite(shapes.iter().copied())?;
    let mut graph = Graph::new();
    for (i, path) in shapes.iter().enumerate() {
        graph.add_path(ShapeId(i as u32), path, true);
    }
    Ok(graph.binary_result(filter))
}

/// Computes a boolean operation between two sets, each of which is described
/// as a collection of closed paths.
///
/// Subpaths that aren't explicitly closed get closed with a straight line.
pub fn binary_op(
    set_a: &BezPath,
    set_b: &BezPath,
    fill_rule: FillRule,
    op: BinaryOp,
) -> Result<Contours<PathSeg>, Error> {
    shapes_op(&[set_a, set_b], binary_filter(op, fill_rule, 2))
}

fn n_ary(shapes: &[BezPath], fill_rule: FillRule, op: BinaryOp) -> Result<Contours<PathSeg>, Error> {
    let refs: Vec<&BezPath> = shapes.iter().collect();
    shapes_op(&refs, binary_filter(op, fill_rule, refs.len() as u32))
}

/// The union of any number of sets.
pub fn union(shapes: &[BezPath], fill_rule: FillRule) -> Result<Contours<PathSeg>, Error> {
    n_ary(shapes, fill_rule, BinaryOp::Union)
}

/// The intersection of any number of sets.
///
/// The intersection of no sets at all is empty.
pub fn intersection(shapes: &[BezPath], fill_rule: FillRule) -> Result<Contours<PathSeg>, Error> {
    n_ary(shapes, fill_rule, BinaryOp::Intersection)
}

/// The points that are in an odd number of the sets.
pub fn xor(shapes: &[BezPath], fill_rule: FillRule) -> Result<Contours<PathSeg>, Error> {
    n_ary(shapes, fill_rule, BinaryOp::Xor)
}

/// The first set, minus all the others.
pub fn difference(shapes: &[BezPath], fill_rule: FillRule) -> Result<Contours<PathSeg>, Error> {
    n_ary(shapes, fill_rule, BinaryOp::Difference)
}

/// Resolves a single, possibly self-intersecting, set into non-overlapping contours.
pub fn simplify(shape: &BezPath, fill_rule: FillRule) -> Result<Contours<PathSeg>, Error> {
    shapes_op(&[shape], simplify_filter(fill_rule))
}

/// Clips a path (which doesn't need to be closed) against the area enclosed
/// by `clip_area`.
///
/// The result consists of the pieces of `path` that `options` asks for, in
/// their original direction. Containment in the clip area uses the non-zero
/// fill rule.
pub fn clip(
    clip_area: &BezPath,
    path: &BezPath,
    options: ClipOptions,
) -> Result<Contours<PathSeg>, Error> {
    check_finite([clip_area, path])?;
    let mut graph = Graph::new();
    graph.add_path(ShapeId(0), clip_area, true);
    graph.add_path(ShapeId(1), path, false);
    Ok(graph.clip_shape(ShapeId(0), ShapeId(1), options))
}
