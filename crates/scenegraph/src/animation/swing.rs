//! Limb swing: an oscillating rotation about the local X axis

use crate::foundation::math::utils;

/// Which way a swing is currently turning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingDirection {
    /// Positive rotation about X
    Forward,
    /// Negative rotation about X
    Backward,
}

impl SwingDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Oscillating rotation attached to a group
///
/// Each update advances the accumulated angle by `speed * dt` in the current
/// direction and reports the step so the owning group can pre-multiply it
/// onto its local matrix. The direction reverses once a step carries the
/// angle to or past the limit on the side it is moving towards; an angle
/// already past the limit on the way back does not flip it again.
#[derive(Debug, Clone, PartialEq)]
pub struct Swing {
    angle_deg: f32,
    limit_deg: f32,
    speed_deg: f32,
    direction: SwingDirection,
}

impl Swing {
    /// Default amplitude in degrees
    pub const DEFAULT_LIMIT_DEG: f32 = 45.0;

    /// Default angular speed in degrees per second
    pub const DEFAULT_SPEED_DEG: f32 = 30.0;

    /// Create a swing with explicit speed (deg/s), limit (deg) and start direction
    pub fn new(speed_deg: f32, limit_deg: f32, direction: SwingDirection) -> Self {
        Self {
            angle_deg: 0.0,
            limit_deg: limit_deg.abs(),
            speed_deg: speed_deg.abs(),
            direction,
        }
    }

    /// Default swing starting forward (left arm, right leg)
    pub fn forward() -> Self {
        Self::new(Self::DEFAULT_SPEED_DEG, Self::DEFAULT_LIMIT_DEG, SwingDirection::Forward)
    }

    /// Default swing starting backward (right arm, left leg)
    pub fn backward() -> Self {
        Self::new(Self::DEFAULT_SPEED_DEG, Self::DEFAULT_LIMIT_DEG, SwingDirection::Backward)
    }

    /// Advance by `delta_time` seconds and return the rotation step in radians
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        let step = self.direction.sign() * self.speed_deg * delta_time;
        self.angle_deg += step;
        let past_limit = match self.direction {
            SwingDirection::Forward => self.angle_deg >= self.limit_deg,
            SwingDirection::Backward => self.angle_deg <= -self.limit_deg,
        };
        if past_limit {
            self.direction = self.direction.reversed();
        }
        utils::deg_to_rad(step)
    }

    /// Accumulated angle in degrees
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    /// Current direction
    pub fn direction(&self) -> SwingDirection {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_follows_direction() {
        let mut forward = Swing::new(10.0, 45.0, SwingDirection::Forward);
        let mut backward = Swing::new(10.0, 45.0, SwingDirection::Backward);

        assert_relative_eq!(forward.advance(0.5), utils::deg_to_rad(5.0));
        assert_relative_eq!(backward.advance(0.5), utils::deg_to_rad(-5.0));
        assert_relative_eq!(forward.angle_deg(), 5.0);
        assert_relative_eq!(backward.angle_deg(), -5.0);
    }

    #[test]
    fn test_direction_flips_at_limit() {
        let mut swing = Swing::new(10.0, 45.0, SwingDirection::Forward);
        for _ in 0..4 {
            swing.advance(1.0);
        }
        assert_eq!(swing.direction(), SwingDirection::Forward);

        swing.advance(1.0);
        assert_relative_eq!(swing.angle_deg(), 50.0);
        assert_eq!(swing.direction(), SwingDirection::Backward);

        swing.advance(1.0);
        assert_relative_eq!(swing.angle_deg(), 40.0);
    }

    #[test]
    fn test_swing_stays_bounded() {
        let mut swing = Swing::backward();
        for _ in 0..10_000 {
            swing.advance(1.0 / 60.0);
            assert!(swing.angle_deg().abs() <= Swing::DEFAULT_LIMIT_DEG + 1.0);
        }
    }

    #[test]
    fn test_recovers_after_long_frame() {
        let mut swing = Swing::forward();
        for _ in 0..10 {
            swing.advance(0.1);
        }
        // a single 8 s frame overshoots the limit by far
        swing.advance(8.0);
        assert_relative_eq!(swing.angle_deg(), 270.0, epsilon = 1e-3);
        assert_eq!(swing.direction(), SwingDirection::Backward);

        for _ in 0..600 {
            swing.advance(1.0 / 60.0);
            assert_eq!(swing.direction(), SwingDirection::Backward);
        }
        assert!(swing.angle_deg() < 0.0);

        let mut flips = 0;
        let mut direction = swing.direction();
        for _ in 0..1200 {
            swing.advance(1.0 / 60.0);
            assert!(swing.angle_deg().abs() <= Swing::DEFAULT_LIMIT_DEG + 1.0);
            if swing.direction() != direction {
                flips += 1;
                direction = swing.direction();
            }
        }
        assert!((6..=8).contains(&flips), "{flips} flips in 20 s");
    }

    #[test]
    fn test_zero_delta_is_no_step() {
        let mut swing = Swing::forward();
        assert_relative_eq!(swing.advance(0.0), 0.0);
        assert_eq!(swing.direction(), SwingDirection::Forward);
    }
}
