//! Numerical thresholds.

use serde::{Deserialize, Serialize};

/// The epsilons used by the graph passes.
///
/// All of these are absolute distances in the input's coordinate space, or
/// dimensionless curve parameters. The defaults suit inputs whose
/// coordinates are roughly in the range of screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// The base vertex collapse distance. Vertices closer than ten times this
    /// are merged, and crossings closer than a tenth of it to an endpoint are
    /// attributed to that endpoint.
    pub vertex_collapse: f64,
    /// How much bounding boxes are padded in the sweep, so that touching boxes
    /// still get compared.
    pub sweep_padding: f64,
    /// Crossings whose parameter is this close to 0 or 1 are at an endpoint.
    pub intersection_param: f64,
    /// Overlap parameters this close to 0 or 1 are snapped to it.
    pub overlap_param: f64,
    /// Outgoing directions closer than this (in radians) are tied.
    pub angle: f64,
    /// Curvatures closer than this are tied.
    pub curvature: f64,
    /// Sort angles must stay at least this far from the `±π` seam.
    pub angle_wrap: f64,
    /// Unit tangents closer than this are considered the same direction.
    pub collinear: f64,
    /// A curve collapsed onto a single vertex survives as a loop only if its
    /// bounding box is larger than this, and larger than the merge distance.
    pub degenerate_extent: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            vertex_collapse: 1e-5,
            sweep_padding: 1e-4,
            intersection_param: 1e-6,
            overlap_param: 1e-5,
            angle: 1e-5,
            curvature: 1e-5,
            angle_wrap: 1e-4,
            collinear: 1e-6,
            degenerate_extent: 1e-5,
        }
    }
}

impl Tolerances {
    /// Vertices closer than this are merged.
    pub fn merge_distance(&self) -> f64 {
        10.0 * self.vertex_collapse
    }

    /// Crossings closer than this to an edge's endpoint are attributed to the endpoint.
    pub fn endpoint_distance(&self) -> f64 {
        0.1 * self.vertex_collapse
    }
}
