//! The curve primitives that the graph is built from.
//!
//! The graph algorithms never look inside a curve: everything they need
//! (splitting, intersecting, overlap detection, tangents and so on) goes
//! through the [`Segment`] trait. We provide an implementation for
//! [`kurbo::PathSeg`], which covers lines, quadratics and cubics.

use std::ops::Range;

use arrayvec::ArrayVec;
use kurbo::{
    Affine, CubicBez, Line, LineIntersection, ParamCurve, ParamCurveArea, ParamCurveDeriv,
    ParamCurveExtrema, ParamCurveNearest, PathSeg, Point, Rect, Vec2,
};

/// An isolated crossing between two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentIntersection {
    /// The (approximate) crossing point.
    pub point: Point,
    /// The parameter of the crossing on the first segment.
    pub a_t: f64,
    /// The parameter of the crossing on the second segment.
    pub b_t: f64,
}

/// A continuous overlap between two segments.
///
/// On the parameter range `t0..t1` of the first segment, the first segment
/// coincides with the second one evaluated at `a * t + b`. In particular
/// `qt0 = a * t0 + b` and `qt1 = a * t1 + b`, so `qt0 > qt1` whenever the
/// two segments run in opposite directions (which is when `a` is negative).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    /// Start of the shared range on the first segment.
    pub t0: f64,
    /// End of the shared range on the first segment.
    pub t1: f64,
    /// The second segment's parameter corresponding to `t0`.
    pub qt0: f64,
    /// The second segment's parameter corresponding to `t1`.
    pub qt1: f64,
    /// The slope of the parameter map. Negative for opposite directions.
    pub a: f64,
    /// The offset of the parameter map.
    pub b: f64,
}

impl Overlap {
    /// Do the two segments run in opposite directions on the shared range?
    pub fn is_reversed(&self) -> bool {
        self.a < 0.0
    }
}

/// A point where a segment crosses itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelfIntersection {
    /// The first parameter visiting `point`.
    pub a_t: f64,
    /// The second parameter visiting `point`. Always larger than `a_t`.
    pub b_t: f64,
    /// The crossing point.
    pub point: Point,
}

/// The operations that the planar graph needs from its curves.
///
/// Segments are parametrized on `[0, 1]`, from [`Segment::start`] to [`Segment::end`].
pub trait Segment: Clone + std::fmt::Debug {
    /// A straight line segment between two points.
    fn line(p0: Point, p1: Point) -> Self;

    /// The point at parameter 0.
    fn start(&self) -> Point;

    /// The point at parameter 1.
    fn end(&self) -> Point;

    /// A tight axis-aligned bounding box.
    fn bounds(&self) -> Rect;

    /// The point at parameter `t`.
    fn eval(&self, t: f64) -> Point;

    /// The part of this segment between two parameters.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// This segment, split at parameter `t`.
    fn subdivided(&self, t: f64) -> [Self; 2] {
        [self.subsegment(0.0..t), self.subsegment(t..1.0)]
    }

    /// Splits this segment at a sorted list of interior parameters.
    ///
    /// Returns `ts.len() + 1` pieces.
    fn subdivisions(&self, ts: &[f64]) -> Vec<Self> {
        debug_assert!(ts.windows(2).all(|w| w[0] <= w[1]));
        let mut ret = Vec::with_capacity(ts.len() + 1);
        let mut prev = 0.0;
        for &t in ts {
            ret.push(self.subsegment(prev..t));
            prev = t;
        }
        ret.push(self.subsegment(prev..1.0));
        ret
    }

    /// The same curve, traversed in the opposite direction.
    fn reversed(&self) -> Self;

    /// The unit tangent direction at `t`.
    fn tangent_at(&self, t: f64) -> Vec2;

    /// The signed curvature at `t` (positive when turning counter-clockwise in y-up coordinates).
    fn curvature_at(&self, t: f64) -> f64;

    /// The signed area between the segment and the origin, positive for counter-clockwise
    /// traversal in y-up coordinates. Summing over a closed loop gives the loop's area.
    fn signed_area(&self) -> f64;

    /// Isolated crossings with another segment, sorted by `a_t`.
    ///
    /// Continuous overlaps are not reported here; see [`Segment::overlaps`].
    fn intersections(&self, other: &Self) -> Vec<SegmentIntersection>;

    /// A continuous overlap with another segment, if there is one.
    fn overlaps(&self, other: &Self) -> Option<Overlap>;

    /// The point where this segment crosses itself, if it does.
    fn self_intersection(&self) -> Option<SelfIntersection>;

    /// Crossings with a straight line segment.
    fn line_intersections(&self, line: Line) -> ArrayVec<LineIntersection, 3>;

    /// The point on this segment that is furthest in `direction`.
    fn extreme_point(&self, direction: Vec2) -> Point;

    /// The same segment with its endpoints moved, keeping its shape as far as possible.
    fn with_endpoints(&self, start: Point, end: Point) -> Self;

    /// Is this a straight line?
    fn is_line(&self) -> bool;

    /// Can this segment, on its own, close up a region with non-zero area?
    ///
    /// A line that starts and ends at the same point is degenerate, but a
    /// curve that does so can still bound a loop.
    fn encloses_area(&self) -> bool {
        !self.is_line()
    }
}

// Below this size, a piece of a curve is treated as a straight line when looking for
// curve-curve intersections.
const LINEAR_EXTENT: f64 = 1e-7;
const MAX_SUBDIVISION_DEPTH: usize = 64;
// Crossings closer than this (in both parameters) are considered the same.
const DUPLICATE_PARAM: f64 = 1e-6;
// Endpoints closer than this to another curve count as touching it, for overlaps.
const OVERLAP_DISTANCE: f64 = 1e-6;
const NEAREST_ACCURACY: f64 = 1e-9;

fn derivative(seg: &PathSeg, t: f64) -> Vec2 {
    match seg {
        PathSeg::Line(l) => l.p1 - l.p0,
        PathSeg::Quad(q) => q.deriv().eval(t).to_vec2(),
        PathSeg::Cubic(c) => c.deriv().eval(t).to_vec2(),
    }
}

fn second_derivative(seg: &PathSeg, t: f64) -> Vec2 {
    match seg {
        PathSeg::Line(_) => Vec2::ZERO,
        PathSeg::Quad(q) => q.deriv().deriv().eval(t).to_vec2(),
        PathSeg::Cubic(c) => c.deriv().deriv().eval(t).to_vec2(),
    }
}

fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > 1e-12).then(|| v / len)
}

impl Segment for PathSeg {
    fn line(p0: Point, p1: Point) -> Self {
        PathSeg::Line(Line::new(p0, p1))
    }

    fn start(&self) -> Point {
        ParamCurve::start(self)
    }

    fn end(&self) -> Point {
        ParamCurve::end(self)
    }

    fn bounds(&self) -> Rect {
        ParamCurveExtrema::bounding_box(self)
    }

    fn eval(&self, t: f64) -> Point {
        ParamCurve::eval(self, t)
    }

    fn subsegment(&self, range: Range<f64>) -> Self {
        ParamCurve::subsegment(self, range)
    }

    fn reversed(&self) -> Self {
        self.reverse()
    }

    fn tangent_at(&self, t: f64) -> Vec2 {
        // A cubic whose control point sits on its endpoint has a vanishing
        // derivative there, so we fall back to looking slightly inwards.
        let nudged = if t < 0.5 { t + 1e-3 } else { t - 1e-3 };
        unit(derivative(self, t))
            .or_else(|| unit(derivative(self, nudged)))
            .or_else(|| unit(Segment::end(self) - Segment::start(self)))
            .unwrap_or(Vec2::new(1.0, 0.0))
    }

    fn curvature_at(&self, t: f64) -> f64 {
        if let PathSeg::Line(_) = self {
            return 0.0;
        }
        let d1 = derivative(self, t);
        let d2 = second_derivative(self, t);
        let len = d1.hypot();
        if len < 1e-12 {
            return 0.0;
        }
        d1.cross(d2) / (len * len * len)
    }

    fn signed_area(&self) -> f64 {
        ParamCurveArea::signed_area(self)
    }

    fn intersections(&self, other: &Self) -> Vec<SegmentIntersection> {
        let mut hits = match (self, other) {
            (PathSeg::Line(a), PathSeg::Line(b)) => line_line(*a, *b, 0.0)
                .map(|(a_t, b_t)| vec![(a_t, b_t)])
                .unwrap_or_default(),
            (PathSeg::Line(a), b) => b
                .intersect_line(*a)
                .into_iter()
                .map(|hit| (hit.line_t, hit.segment_t))
                .collect(),
            (a, PathSeg::Line(b)) => a
                .intersect_line(*b)
                .into_iter()
                .map(|hit| (hit.segment_t, hit.line_t))
                .collect(),
            (a, b) => curve_curve(a, b),
        };

        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut ret: Vec<SegmentIntersection> = Vec::with_capacity(hits.len());
        for (a_t, b_t) in hits {
            let a_t = a_t.clamp(0.0, 1.0);
            let b_t = b_t.clamp(0.0, 1.0);
            let duplicate = ret.iter().any(|prev| {
                (prev.a_t - a_t).abs() < DUPLICATE_PARAM && (prev.b_t - b_t).abs() < DUPLICATE_PARAM
            });
            if !duplicate {
                let point = Segment::eval(self, a_t).midpoint(Segment::eval(other, b_t));
                ret.push(SegmentIntersection { point, a_t, b_t });
            }
        }
        ret
    }

    fn overlaps(&self, other: &Self) -> Option<Overlap> {
        let slack = OVERLAP_DISTANCE;
        let ours = Segment::bounds(self).inflate(slack, slack);
        if !touches(ours, Segment::bounds(other)) {
            return None;
        }

        // Each endpoint that lies on the other curve gives one point of the
        // parameter correspondence.
        let mut pairs: ArrayVec<(f64, f64), 4> = ArrayVec::new();
        for (qt, p) in [(0.0, Segment::start(other)), (1.0, Segment::end(other))] {
            let near = self.nearest(p, NEAREST_ACCURACY);
            if near.distance_sq < slack * slack {
                pairs.push((near.t, qt));
            }
        }
        for (t, p) in [(0.0, Segment::start(self)), (1.0, Segment::end(self))] {
            let near = other.nearest(p, NEAREST_ACCURACY);
            if near.distance_sq < slack * slack {
                pairs.push((t, near.t));
            }
        }

        let (lo, hi) = pairs.iter().fold((None, None), |(lo, hi), &pair| {
            let lo = match lo {
                Some((t, _)) if t <= pair.0 => lo,
                _ => Some(pair),
            };
            let hi = match hi {
                Some((t, _)) if t >= pair.0 => hi,
                _ => Some(pair),
            };
            (lo, hi)
        });
        let ((t0, qt0), (t1, qt1)) = (lo?, hi?);
        if t1 - t0 < DUPLICATE_PARAM || (qt1 - qt0).abs() < DUPLICATE_PARAM {
            return None;
        }

        let a = (qt1 - qt0) / (t1 - t0);
        let b = qt0 - a * t0;

        // Both curves could share endpoints without coinciding in between.
        let verify_slack = 10.0 * slack;
        for s in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let t = t0 + s * (t1 - t0);
            let p = Segment::eval(self, t);
            let q = Segment::eval(other, a * t + b);
            if (p - q).hypot2() > verify_slack * verify_slack {
                return None;
            }
        }

        Some(Overlap {
            t0,
            t1,
            qt0,
            qt1,
            a,
            b,
        })
    }

    fn self_intersection(&self) -> Option<SelfIntersection> {
        let PathSeg::Cubic(c) = self else {
            return None;
        };
        cubic_self_intersection(*c)
    }

    fn line_intersections(&self, line: Line) -> ArrayVec<LineIntersection, 3> {
        self.intersect_line(line)
    }

    fn extreme_point(&self, direction: Vec2) -> Point {
        // Rotate so that `direction` points along the x axis; then the
        // extreme point is among the x-extrema.
        let rotated = Affine::rotate(-direction.atan2()) * *self;
        let mut best = Segment::start(self);
        let mut best_dot = best.to_vec2().dot(direction);
        let candidates = rotated.extrema().into_iter().chain([1.0]);
        for t in candidates {
            let p = Segment::eval(self, t);
            let dot = p.to_vec2().dot(direction);
            if dot > best_dot {
                best = p;
                best_dot = dot;
            }
        }
        best
    }

    fn with_endpoints(&self, start: Point, end: Point) -> Self {
        match self {
            PathSeg::Line(_) => PathSeg::Line(Line::new(start, end)),
            PathSeg::Quad(q) => PathSeg::Quad(kurbo::QuadBez::new(start, q.p1, end)),
            PathSeg::Cubic(c) => PathSeg::Cubic(CubicBez::new(
                start,
                c.p1 + (start - c.p0),
                c.p2 + (end - c.p3),
                end,
            )),
        }
    }

    fn is_line(&self) -> bool {
        matches!(self, PathSeg::Line(_))
    }
}

// Closed-box overlap. Horizontal and vertical lines have zero-area boxes,
// so `Rect::overlaps`-style area tests would miss them.
fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Intersects two line segments, returning the parameters on each.
///
/// Parallel lines never intersect (their overlaps are found elsewhere). The
/// parameters may exceed `[0, 1]` by up to `slack`.
fn line_line(a: Line, b: Line, slack: f64) -> Option<(f64, f64)> {
    let da = a.p1 - a.p0;
    let db = b.p1 - b.p0;
    let denom = da.cross(db);
    if denom.abs() <= 1e-12 * da.hypot() * db.hypot() {
        return None;
    }
    let offset = b.p0 - a.p0;
    let s = offset.cross(db) / denom;
    let t = offset.cross(da) / denom;
    let range = -slack..=(1.0 + slack);
    (range.contains(&s) && range.contains(&t)).then_some((s, t))
}

#[derive(Clone)]
struct Piece {
    seg: PathSeg,
    params: Range<f64>,
    bbox: Rect,
}

impl Piece {
    fn new(seg: PathSeg, params: Range<f64>) -> Self {
        let bbox = Segment::bounds(&seg);
        Piece { seg, params, bbox }
    }

    fn is_linear(&self) -> bool {
        self.bbox.width().max(self.bbox.height()) <= LINEAR_EXTENT
    }

    fn split(&self) -> [Piece; 2] {
        let mid = (self.params.start + self.params.end) / 2.0;
        let [left, right] = self.seg.subdivided(0.5);
        [
            Piece::new(left, self.params.start..mid),
            Piece::new(right, mid..self.params.end),
        ]
    }

    fn chord(&self) -> Line {
        Line::new(Segment::start(&self.seg), Segment::end(&self.seg))
    }

    fn global(&self, t: f64) -> f64 {
        self.params.start + t * (self.params.end - self.params.start)
    }
}

/// Finds crossings between two curves by recursive bounding-box subdivision.
fn curve_curve(a: &PathSeg, b: &PathSeg) -> Vec<(f64, f64)> {
    let mut pairs = vec![(Piece::new(*a, 0.0..1.0), Piece::new(*b, 0.0..1.0))];
    let mut ret = Vec::new();

    for _ in 0..MAX_SUBDIVISION_DEPTH {
        if pairs.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for (p, q) in pairs {
            let slack = LINEAR_EXTENT;
            if !touches(p.bbox.inflate(slack, slack), q.bbox) {
                continue;
            }
            match (p.is_linear(), q.is_linear()) {
                (true, true) => {
                    if let Some((s, t)) = line_line(p.chord(), q.chord(), 1e-9) {
                        ret.push((p.global(s), q.global(t)));
                    }
                }
                (true, false) => {
                    for q in q.split() {
                        next.push((p.clone(), q));
                    }
                }
                (false, true) => {
                    for p in p.split() {
                        next.push((p, q.clone()));
                    }
                }
                (false, false) => {
                    for p in p.split() {
                        for q in q.split() {
                            next.push((p.clone(), q));
                        }
                    }
                }
            }
        }
        pairs = next;
    }
    if !pairs.is_empty() {
        log::debug!(
            "curve intersection gave up with {} unresolved pairs",
            pairs.len()
        );
    }
    ret
}

/// Finds the loop of a cubic, if it has one.
///
/// Writing the cubic as `a t^3 + b t^2 + c t + d`, two parameters `s != t`
/// map to the same point exactly when `a (σ^2 - π) + b σ + c = 0`, where
/// `σ = s + t` and `π = s t`. Crossing with `a` isolates `σ`, and dotting
/// with `a` then gives `π`.
fn cubic_self_intersection(c: CubicBez) -> Option<SelfIntersection> {
    let (p0, p1, p2, p3) = (c.p0.to_vec2(), c.p1.to_vec2(), c.p2.to_vec2(), c.p3.to_vec2());
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 3.0 * p0 - 6.0 * p1 + 3.0 * p2;
    let cc = -3.0 * p0 + 3.0 * p1;

    let a_len2 = a.hypot2();
    let ba = b.cross(a);
    if a_len2 < 1e-18 || ba.abs() < 1e-18 {
        return None;
    }

    let sigma = a.cross(cc) / ba;
    let pi = sigma * sigma + (b * sigma + cc).dot(a) / a_len2;
    let disc = sigma * sigma - 4.0 * pi;
    if disc <= 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let s = (sigma - root) / 2.0;
    let t = (sigma + root) / 2.0;
    let inside = |x: f64| x > 1e-9 && x < 1.0 - 1e-9;
    if !inside(s) || !inside(t) {
        return None;
    }

    let point = c.eval(s).midpoint(c.eval(t));
    Some(SelfIntersection {
        a_t: s,
        b_t: t,
        point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::QuadBez;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> PathSeg {
        PathSeg::Line(Line::new((x0, y0), (x1, y1)))
    }

    fn cubic(pts: [(f64, f64); 4]) -> PathSeg {
        PathSeg::Cubic(CubicBez::new(pts[0], pts[1], pts[2], pts[3]))
    }

    #[test]
    fn crossing_lines() {
        let a = line(0.0, 0.0, 2.0, 2.0);
        let b = line(0.0, 2.0, 2.0, 0.0);
        let hits = a.intersections(&b);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].a_t - 0.5).abs() < 1e-12);
        assert!((hits[0].b_t - 0.5).abs() < 1e-12);
        assert!((hits[0].point - Point::new(1.0, 1.0)).hypot() < 1e-12);
    }

    #[test]
    fn parallel_lines() {
        let a = line(0.0, 0.0, 2.0, 0.0);
        let b = line(0.0, 1.0, 2.0, 1.0);
        assert!(a.intersections(&b).is_empty());
        assert!(a.overlaps(&b).is_none());
    }

    #[test]
    fn line_and_cubic() {
        let arch = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let l = line(-1.0, 1.0, 3.0, 1.0);
        let hits = arch.intersections(&l);
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert!((hit.point.y - 1.0).abs() < 1e-6);
        }
        assert!((hits[0].point.x + hits[1].point.x - 2.0).abs() < 1e-6);
        assert!(hits[0].a_t < hits[1].a_t);
    }

    #[test]
    fn crossing_cubics() {
        // Both arches share x(t), and meet where 6t(1 - t) = 1.
        let up = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let down = cubic([(0.0, 2.0), (0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
        let hits = up.intersections(&down);
        assert_eq!(hits.len(), 2);
        let expected = [
            (1.0 - (1.0f64 / 3.0).sqrt()) / 2.0,
            (1.0 + (1.0f64 / 3.0).sqrt()) / 2.0,
        ];
        for (hit, t) in hits.iter().zip(expected) {
            assert!((hit.a_t - t).abs() < 1e-5);
            assert!((hit.b_t - t).abs() < 1e-5);
            assert!((hit.point.y - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn same_direction_overlap() {
        let a = line(0.0, 0.0, 2.0, 0.0);
        let b = line(1.0, 0.0, 3.0, 0.0);
        let overlap = a.overlaps(&b).unwrap();
        assert!((overlap.t0 - 0.5).abs() < 1e-9);
        assert!((overlap.t1 - 1.0).abs() < 1e-9);
        assert!(overlap.qt0.abs() < 1e-9);
        assert!((overlap.qt1 - 0.5).abs() < 1e-9);
        assert!(!overlap.is_reversed());
    }

    #[test]
    fn opposite_direction_overlap() {
        let a = line(0.0, 0.0, 2.0, 0.0);
        let b = line(3.0, 0.0, 1.0, 0.0);
        let overlap = a.overlaps(&b).unwrap();
        assert!((overlap.t0 - 0.5).abs() < 1e-9);
        assert!((overlap.t1 - 1.0).abs() < 1e-9);
        assert!((overlap.qt0 - 1.0).abs() < 1e-9);
        assert!((overlap.qt1 - 0.5).abs() < 1e-9);
        assert!(overlap.is_reversed());
    }

    #[test]
    fn curves_sharing_endpoints_do_not_overlap() {
        let a = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let b = cubic([(0.0, 0.0), (0.0, -2.0), (2.0, -2.0), (2.0, 0.0)]);
        assert!(a.overlaps(&b).is_none());
    }

    #[test]
    fn cubic_overlapping_its_piece() {
        let a = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let b = Segment::subsegment(&a, 0.25..0.75).reversed();
        let overlap = a.overlaps(&b).unwrap();
        assert!((overlap.t0 - 0.25).abs() < 1e-6);
        assert!((overlap.t1 - 0.75).abs() < 1e-6);
        assert!((overlap.qt0 - 1.0).abs() < 1e-6);
        assert!(overlap.qt1.abs() < 1e-6);
    }

    #[test]
    fn looping_cubic() {
        let c = cubic([(0.0, 0.0), (2.0, 1.0), (-1.0, 1.0), (1.0, 0.0)]);
        let si = c.self_intersection().unwrap();
        assert!(si.a_t < si.b_t);
        assert!(si.a_t > 0.0 && si.b_t < 1.0);
        assert!((Segment::eval(&c, si.a_t) - Segment::eval(&c, si.b_t)).hypot() < 1e-9);
        assert!((si.a_t + si.b_t - 1.0).abs() < 1e-9);
    }

    #[test]
    fn arch_has_no_loop() {
        let c = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        assert!(c.self_intersection().is_none());
        let q = PathSeg::Quad(QuadBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 0.0)));
        assert!(q.self_intersection().is_none());
    }

    #[test]
    fn tangents_and_curvature() {
        let l = line(0.0, 0.0, 0.0, 3.0);
        assert!((l.tangent_at(0.5) - Vec2::new(0.0, 1.0)).hypot() < 1e-12);
        assert_eq!(l.curvature_at(0.5), 0.0);

        // Turning left (counter-clockwise) has positive curvature.
        let q = PathSeg::Quad(QuadBez::new((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)));
        assert!(q.curvature_at(0.5) > 0.0);
        assert!(q.reversed().curvature_at(0.5) < 0.0);

        // A degenerate control point still gives a tangent.
        let c = cubic([(0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (2.0, 1.0)]);
        let t = c.tangent_at(0.0);
        assert!((t.hypot() - 1.0).abs() < 1e-9);
        assert!(t.x > 0.0 && t.y > 0.0);
    }

    #[test]
    fn extreme_points() {
        let arch = cubic([(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let top = arch.extreme_point(Vec2::new(0.0, 1.0));
        assert!((top - Point::new(1.0, 1.5)).hypot() < 1e-9);
        let right = arch.extreme_point(Vec2::new(1.0, 0.0));
        assert!((right - Point::new(2.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn snapping_endpoints() {
        let c = cubic([(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)]);
        let moved = c.with_endpoints(Point::new(0.0, 1.0), Point::new(3.0, 0.0));
        let PathSeg::Cubic(moved) = moved else {
            panic!("snapping changed the segment kind");
        };
        assert_eq!(moved.p1, Point::new(1.0, 2.0));
        assert_eq!(moved.p2, Point::new(2.0, 1.0));
    }
}
