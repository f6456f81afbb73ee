use serde::{Deserialize, Serialize};

/// A user-drawn region of interest on the plot canvas, kept as polygon
/// vertices in plot coordinates. The histogram viewer only ever uses the
/// horizontal extent.
#[derive(Clone, Debug, Default)]
pub struct PolygonRoi {
    vertices: Vec<[f64; 2]>,
}

impl PolygonRoi {
    /// A rectangle spanned between two drag corners.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            vertices: vec![[a[0], a[1]], [b[0], a[1]], [b[0], b[1]], [a[0], b[1]]],
        }
    }

    /// Minimum and maximum x coordinate over all vertices. None for an
    /// empty polygon or if any vertex is NaN.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for [x, _] in self.vertices.iter() {
            if x.is_nan() {
                return None;
            }
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(*x), hi.max(*x)),
                None => (*x, *x),
            });
        }
        extent
    }
}

/// An inclusive range along the x axis, the result of snapping a raw
/// selection to bin edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeRoi {
    pub lo: f64,
    pub hi: f64,
}

impl RangeRoi {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo: lo.min(hi),
            hi: lo.max(hi),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_x_extent() {
        let roi = PolygonRoi::from_corners([3.5, 0.0], [1.25, 2.0]);
        assert_eq!(roi.x_extent(), Some((1.25, 3.5)));
    }

    #[test]
    fn empty_polygon_has_no_extent() {
        assert_eq!(PolygonRoi::default().x_extent(), None);
    }

    #[test]
    fn range_roi_is_inclusive_and_ordered() {
        let roi = RangeRoi::new(4.0, 1.0);
        assert_eq!(roi.lo, 1.0);
        assert!(roi.contains(1.0));
        assert!(roi.contains(4.0));
        assert!(!roi.contains(4.0001));
    }
}
