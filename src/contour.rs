//! The output of boolean operations: closed (and, for clipping, open) paths.

use kurbo::{BezPath, PathSeg};

use crate::segment::Segment;

/// An index for a [`Contour`] within [`Contours`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, serde::Serialize)]
pub struct ContourIdx(pub usize);

/// A connected sequence of segments, each one starting where the last one ended.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Contour<S> {
    /// The segments making up this contour.
    pub segments: Vec<S>,

    /// Whether the last segment ends where the first one starts.
    ///
    /// The contours of a boolean operation are always closed. Clipping an
    /// open path produces open contours.
    pub closed: bool,

    /// The contour enclosing this one, if this contour is a hole.
    ///
    /// For example, the shaded set below:
    ///
    /// ```text
    ///   ----------------------
    ///   |xxxxxxxxxxxxxxxxxxxx|
    ///   |xxxxxxxxx/\xxxxxxxxx|
    ///   |xxxxxxxx/  \xxxxxxxx|
    ///   |xxxxxxxx\  /xxxxxxxx|
    ///   |xxxxxxxxx\/xxxxxxxxx|
    ///   |xxxxxxxxxxxxxxxxxxxx|
    ///   ----------------------
    /// ```
    ///
    /// is represented as a square contour with no parent, and a diamond
    /// contour with the square as its parent. A filled island inside the
    /// diamond would get its own contour with no parent.
    pub parent: Option<ContourIdx>,

    /// Whether this contour bounds its set from the outside.
    ///
    /// The set is on the left as you walk along a contour, so (with the `y`
    /// axis pointing up) outer contours wind counter-clockwise and holes wind
    /// clockwise.
    pub outer: bool,
}

impl<S> Default for Contour<S> {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            closed: true,
            parent: None,
            outer: true,
        }
    }
}

impl<S: Segment> Contour<S> {
    /// The area enclosed by this contour, positive if it winds counter-clockwise.
    ///
    /// For an open contour, this is the area enclosed after closing it with a
    /// straight line.
    pub fn signed_area(&self) -> f64 {
        let mut area: f64 = self.segments.iter().map(S::signed_area).sum();
        if let (false, Some(first), Some(last)) =
            (self.closed, self.segments.first(), self.segments.last())
        {
            area += S::line(last.end(), first.start()).signed_area();
        }
        area
    }
}

impl Contour<PathSeg> {
    /// Converts this contour to a `kurbo` path.
    pub fn path(&self) -> BezPath {
        let mut ret = BezPath::new();
        let Some(first) = self.segments.first() else {
            return ret;
        };
        ret.move_to(first.start());
        for seg in &self.segments {
            match *seg {
                PathSeg::Line(l) => ret.line_to(l.p1),
                PathSeg::Quad(q) => ret.quad_to(q.p1, q.p2),
                PathSeg::Cubic(c) => ret.curve_to(c.p1, c.p2, c.p3),
            }
        }
        if self.closed {
            ret.close_path();
        }
        ret
    }
}

/// A collection of [`Contour`]s.
///
/// Can be indexed with a [`ContourIdx`].
#[derive(Clone, Debug, serde::Serialize)]
pub struct Contours<S> {
    contours: Vec<Contour<S>>,
}

impl<S> Default for Contours<S> {
    fn default() -> Self {
        Self {
            contours: Vec::new(),
        }
    }
}

impl<S> Contours<S> {
    pub(crate) fn push(&mut self, contour: Contour<S>) -> ContourIdx {
        self.contours.push(contour);
        ContourIdx(self.contours.len() - 1)
    }

    /// Returns all of the contour indices, grouped by containment.
    ///
    /// For each of the inner vecs, the first element is an outer contour with
    /// no parent, and the others are its holes.
    pub fn grouped(&self) -> Vec<Vec<ContourIdx>> {
        let mut children = vec![Vec::new(); self.contours.len()];
        let mut top_level = Vec::new();
        for (i, c) in self.contours.iter().enumerate() {
            match c.parent {
                Some(parent) => children[parent.0].push(ContourIdx(i)),
                None => top_level.push(ContourIdx(i)),
            }
        }

        top_level
            .into_iter()
            .map(|top| {
                let mut group = vec![top];
                let mut i = 0;
                while i < group.len() {
                    group.extend_from_slice(&children[group[i].0]);
                    i += 1;
                }
                group
            })
            .collect()
    }

    /// Iterates over all of the contours.
    pub fn contours(&self) -> impl Iterator<Item = &Contour<S>> + '_ {
        self.contours.iter()
    }

    /// The number of contours.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Are there no contours at all?
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

impl<S: Segment> Contours<S> {
    /// The total signed area of all the contours.
    ///
    /// Since holes wind the other way, this is the area of the set they describe.
    pub fn signed_area(&self) -> f64 {
        self.contours.iter().map(Contour::signed_area).sum()
    }
}

impl Contours<PathSeg> {
    /// Converts all the contours to a single `kurbo` path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        for c in &self.contours {
            ret.extend(c.path().elements().iter().copied());
        }
        ret
    }
}

impl<S> std::ops::Index<ContourIdx> for Contours<S> {
    type Output = Contour<S>;

    fn index(&self, index: ContourIdx) -> &Self::Output {
        &self.contours[index.0]
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Line, PathEl, Point, QuadBez};

    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> PathSeg {
        PathSeg::Line(Line::new((x0, y0), (x1, y1)))
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<PathSeg> {
        vec![
            line(x0, y0, x1, y0),
            line(x1, y0, x1, y1),
            line(x1, y1, x0, y1),
            line(x0, y1, x0, y0),
        ]
    }

    #[test]
    fn grouping_and_area() {
        let mut contours = Contours::default();
        let outer = contours.push(Contour {
            segments: square(0.0, 0.0, 4.0, 4.0),
            ..Contour::default()
        });
        contours.push(Contour {
            segments: square(5.0, 0.0, 6.0, 1.0),
            ..Contour::default()
        });
        let mut hole = square(1.0, 1.0, 2.0, 2.0);
        hole.reverse();
        for s in &mut hole {
            *s = s.reversed();
        }
        contours.push(Contour {
            segments: hole,
            parent: Some(outer),
            outer: false,
            closed: true,
        });

        assert_eq!(
            contours.grouped(),
            vec![
                vec![ContourIdx(0), ContourIdx(2)],
                vec![ContourIdx(1)]
            ]
        );
        assert!((contours.signed_area() - 16.0).abs() < 1e-12);
        assert!(!contours[ContourIdx(2)].outer);
    }

    #[test]
    fn to_path() {
        let c = Contour {
            segments: vec![
                line(0.0, 0.0, 1.0, 0.0),
                PathSeg::Quad(QuadBez::new((1.0, 0.0), (1.0, 1.0), (0.0, 1.0))),
            ],
            closed: false,
            ..Contour::default()
        };
        let path = c.path();
        assert_eq!(path.elements().len(), 3);
        assert_eq!(
            path.elements()[2],
            PathEl::QuadTo(Point::new(1.0, 1.0), Point::new(0.0, 1.0))
        );

        let closed = Contour {
            closed: true,
            ..c
        };
        assert_eq!(closed.path().elements().len(), 4);
    }
}
