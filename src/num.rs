//! Ordering for floats, for use as priority-queue and sort keys.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the wrappers in the `ordered_float` crate, this one just panics
/// (in debug builds) when comparing NaNs. Every coordinate that reaches the
/// engine has already been checked for finiteness, so the check is only a
/// tripwire.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl CheapOrderedFloat {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state)
    }
}

impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        debug_assert!(!self.0.is_nan() && !other.0.is_nan());
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

/// Compares two floats, treating them as equal if they're within `eps` of one another.
pub fn fuzzy_cmp(a: f64, b: f64, eps: f64) -> std::cmp::Ordering {
    if (a - b).abs() < eps {
        std::cmp::Ordering::Equal
    } else if a < b {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn ordering() {
        let mut xs: Vec<CheapOrderedFloat> =
            [3.0, -1.0, 0.5, 2.0].into_iter().map(Into::into).collect();
        xs.sort();
        let xs: Vec<f64> = xs.into_iter().map(CheapOrderedFloat::into_inner).collect();
        assert_eq!(xs, vec![-1.0, 0.5, 2.0, 3.0]);
    }

    #[test]
    fn fuzzy() {
        assert_eq!(fuzzy_cmp(1.0, 1.0 + 1e-7, 1e-5), Ordering::Equal);
        assert_eq!(fuzzy_cmp(1.0, 1.1, 1e-5), Ordering::Less);
        assert_eq!(fuzzy_cmp(1.1, 1.0, 1e-5), Ordering::Greater);
    }
}
