//! Utilities for generating examples, benchmarks, and test cases.

use kurbo::{BezPath, Point};

fn quad(path: &mut BezPath, points: [Point; 4]) {
    path.move_to(points[0]);
    for p in &points[1..] {
        path.line_to(*p);
    }
    path.close_path();
}

/// Generate a bunch of squares, arranged in a grid.
///
/// The corner of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated up by `slant`.
fn squares((x0, y0): (f64, f64), size: f64, offset: f64, slant: f64, count: usize) -> BezPath {
    let mut ret = BezPath::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            quad(
                &mut ret,
                [
                    Point::new(x, y),
                    Point::new(x + size, y + slant),
                    Point::new(x + size, y + size + slant),
                    Point::new(x, y + size),
                ],
            );
        }
    }
    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// +----+ +----+ +----+
/// |    | |    | |    |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |    | |    | |    |
/// +----+ +----+ +----+
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares. Every square winds counter-clockwise.
pub fn checkerboard(n: usize) -> (BezPath, BezPath) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 0.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 0.0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
pub fn slanted_checkerboard(n: usize) -> (BezPath, BezPath) {
    (
        squares((0.0, 0.0), 30.0, 40.0, 1.0, n),
        squares((20.0, 20.0), 30.0, 40.0, 1.0, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from bottom-left
/// to top-right. The "odds" go from bottom-right to top-left.
pub fn slanties(n: usize) -> (BezPath, BezPath) {
    let h = 20.0 * n as f64;

    let mut even = BezPath::new();
    let mut odd = BezPath::new();
    for i in 0..n {
        let x_off = 20.0 * i as f64;
        quad(
            &mut even,
            [
                Point::new(x_off, 0.0),
                Point::new(x_off + 10.0, 0.0),
                Point::new(x_off + h + 10.0, h),
                Point::new(x_off + h, h),
            ],
        );
        quad(
            &mut odd,
            [
                Point::new(x_off + h, 0.0),
                Point::new(x_off + h + 10.0, 0.0),
                Point::new(x_off + 10.0, h),
                Point::new(x_off, h),
            ],
        );
    }

    (even, odd)
}
