//! Cubic Bezier curves sampled for line drawing and cart travel

use crate::foundation::math::Vec3;

/// Marker color for a curve's start anchor
pub const ANCHOR_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Marker color for tangent control points
pub const TANGENT_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Marker color for the selected control point
pub const SELECTED_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);

/// Cubic Bezier curve with a cached polyline
///
/// The curve is evaluated in power form `a t³ + b t² + c t + d` at
/// [`SEGMENTS`](Self::SEGMENTS) + 1 evenly spaced parameters. Call
/// [`recalculate`](Self::recalculate) after editing control points.
#[derive(Debug, Clone)]
pub struct BezierCurve {
    /// Start anchor
    pub p0: Vec3,
    /// First tangent control point
    pub p1: Vec3,
    /// Second tangent control point
    pub p2: Vec3,
    /// End anchor
    pub p3: Vec3,
    /// Marker colors for `p0`, `p1` and `p2` (`p3` belongs to the next curve)
    pub marker_colors: [Vec3; 3],
    samples: Vec<Vec3>,
}

impl BezierCurve {
    /// Number of line segments in the sampled polyline
    pub const SEGMENTS: usize = 150;

    /// Build a curve and sample it
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let mut curve = Self {
            p0,
            p1,
            p2,
            p3,
            marker_colors: [ANCHOR_COLOR, TANGENT_COLOR, TANGENT_COLOR],
            samples: Vec::with_capacity(Self::SEGMENTS + 1),
        };
        curve.recalculate();
        curve
    }

    /// Evaluate the curve at `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Vec3 {
        let a = -self.p0 + self.p1 * 3.0 - self.p2 * 3.0 + self.p3;
        let b = self.p0 * 3.0 - self.p1 * 6.0 + self.p2 * 3.0;
        let c = self.p0 * -3.0 + self.p1 * 3.0;
        let d = self.p0;
        ((a * t + b) * t + c) * t + d
    }

    /// Re-sample the polyline from the current control points
    #[allow(clippy::cast_precision_loss)]
    pub fn recalculate(&mut self) {
        self.samples.clear();
        for i in 0..=Self::SEGMENTS {
            let t = i as f32 / Self::SEGMENTS as f32;
            self.samples.push(self.point_at(t));
        }
    }

    /// Cached polyline, `SEGMENTS + 1` points from `p0` to `p3`
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    /// Control point by index within this curve (0..=3)
    pub fn control(&self, index: usize) -> Option<Vec3> {
        match index {
            0 => Some(self.p0),
            1 => Some(self.p1),
            2 => Some(self.p2),
            3 => Some(self.p3),
            _ => None,
        }
    }

    /// Approximate arc length from the sampled polyline
    pub fn length(&self) -> f32 {
        self.samples.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn s_curve() -> BezierCurve {
        BezierCurve::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_endpoints_interpolate_anchors() {
        let curve = s_curve();
        assert_relative_eq!(curve.point_at(0.0), curve.p0, epsilon = 1e-6);
        assert_relative_eq!(curve.point_at(1.0), curve.p3, epsilon = 1e-5);
    }

    #[test]
    fn test_midpoint_matches_bernstein_form() {
        let curve = s_curve();
        let expected = (curve.p0 + curve.p1 * 3.0 + curve.p2 * 3.0 + curve.p3) / 8.0;
        assert_relative_eq!(curve.point_at(0.5), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_sampling_and_recalculate() {
        let mut curve = s_curve();
        assert_eq!(curve.samples().len(), BezierCurve::SEGMENTS + 1);
        assert_relative_eq!(curve.samples()[0], curve.p0, epsilon = 1e-6);

        curve.p3 = Vec3::new(10.0, 0.0, 0.0);
        curve.recalculate();
        assert_eq!(curve.samples().len(), BezierCurve::SEGMENTS + 1);
        assert_relative_eq!(
            curve.samples()[BezierCurve::SEGMENTS],
            Vec3::new(10.0, 0.0, 0.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_straight_curve_length() {
        let curve = BezierCurve::new(
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        assert_relative_eq!(curve.length(), 3.0, epsilon = 1e-4);
        assert_eq!(curve.control(4), None);
    }
}
