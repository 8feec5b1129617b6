//! Closed roller-coaster track built from chained Bezier curves
//!
//! A track with `n` curves is described by `3n + 1` points where the last
//! point repeats the first. Curve `i` uses points `3i..=3i+3`, so neighbouring
//! curves share their anchor. Editing keeps the joints C1 continuous: moving an
//! anchor drags both tangents around it, and moving a tangent mirrors the
//! opposite tangent of the joint.

use std::any::Any;
use std::sync::Arc;

use super::curve::{BezierCurve, ANCHOR_COLOR, SELECTED_COLOR, TANGENT_COLOR};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{Drawable, Material, Mesh, RenderBackend};
use crate::scene::SceneError;

/// Axis a control point is moved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// World X
    X,
    /// World Y
    Y,
    /// World Z
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

#[derive(Debug, Clone)]
struct Cart {
    position: Vec3,
    curve: usize,
    /// Index of the sample the cart is heading towards
    sample: usize,
}

/// Editable closed track with a cart running along it
#[derive(Debug, Clone)]
pub struct Track {
    curves: Vec<BezierCurve>,
    selected: usize,
    cart: Cart,
    velocity: f32,
    /// Whether the cart advances on update
    pub moving: bool,
}

impl Track {
    /// Distance a control point moves per edit
    pub const MOVE_STEP: f32 = 0.2;

    /// Default cart speed in units per second
    pub const DEFAULT_VELOCITY: f32 = 5.0;

    /// Build a closed track from `3n + 1` points whose last point equals the first
    pub fn new(points: &[Vec3]) -> Result<Self, SceneError> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(SceneError::InvalidTrack(format!(
                "expected 3n + 1 points, got {}",
                points.len()
            )));
        }
        let (first, last) = (points[0], points[points.len() - 1]);
        if (first - last).norm() > 1e-5 {
            return Err(SceneError::InvalidTrack(format!(
                "track is not closed: first point {first:?} != last point {last:?}"
            )));
        }
        if points.iter().any(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(SceneError::InvalidTrack("non-finite control point".to_string()));
        }

        let curves: Vec<BezierCurve> = points
            .windows(4)
            .step_by(3)
            .map(|w| BezierCurve::new(w[0], w[1], w[2], w[3]))
            .collect();

        log::debug!("Built track with {} curves", curves.len());

        let mut track = Self {
            curves,
            selected: 0,
            cart: Cart {
                position: first,
                curve: 0,
                sample: 1,
            },
            velocity: Self::DEFAULT_VELOCITY,
            moving: true,
        };
        track.set_marker(track.selected, SELECTED_COLOR);
        Ok(track)
    }

    /// Curves in travel order
    pub fn curves(&self) -> &[BezierCurve] {
        &self.curves
    }

    /// Number of editable control points (the closing point is not counted)
    pub fn control_count(&self) -> usize {
        self.curves.len() * 3
    }

    /// Control point by its index along the track
    pub fn control_point(&self, index: usize) -> Option<Vec3> {
        let curve = self.curves.get(index / 3)?;
        curve.control(index % 3)
    }

    /// Tangent handle lines: each joins a curve's `p2` to the next curve's `p1`
    /// through their shared anchor
    pub fn handles(&self) -> Vec<[Vec3; 2]> {
        let count = self.curves.len();
        (0..count)
            .map(|i| [self.curves[i].p2, self.curves[(i + 1) % count].p1])
            .collect()
    }

    /// Radius around the track origin enclosing every curve and the cart
    ///
    /// Each cubic lies inside the hull of its control points, so the farthest
    /// control point bounds the whole loop. Grows and shrinks with edits.
    pub fn bounding_radius(&self) -> f32 {
        self.curves
            .iter()
            .flat_map(|c| [c.p0, c.p1, c.p2, c.p3])
            .map(|p| p.norm())
            .fold(0.0, f32::max)
    }

    /// Index of the selected control point
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the selection to the next (or previous, when `back`) control point
    pub fn select_next(&mut self, back: bool) {
        let count = self.control_count();
        let default_color = if self.selected % 3 == 0 {
            ANCHOR_COLOR
        } else {
            TANGENT_COLOR
        };
        self.set_marker(self.selected, default_color);

        self.selected = if back {
            (self.selected + count - 1) % count
        } else {
            (self.selected + 1) % count
        };

        self.set_marker(self.selected, SELECTED_COLOR);
        log::trace!("Selected track control point {}", self.selected);
    }

    /// Nudge the selected control point by ±[`MOVE_STEP`](Self::MOVE_STEP)
    /// along `axis`, keeping the joint C1 continuous
    pub fn move_selected(&mut self, axis: Axis, positive: bool) {
        let count = self.curves.len();
        let cur = self.selected / 3;
        let prev = (cur + count - 1) % count;
        let next = (cur + 1) % count;
        let delta = axis.unit() * if positive { Self::MOVE_STEP } else { -Self::MOVE_STEP };

        match self.selected % 3 {
            0 => {
                self.curves[cur].p0 += delta;
                self.curves[cur].p1 += delta;
                self.curves[prev].p2 += delta;
                self.curves[prev].p3 += delta;
            }
            1 => {
                self.curves[cur].p1 += delta;
                self.curves[prev].p2 -= delta;
            }
            _ => {
                self.curves[cur].p2 += delta;
                self.curves[next].p1 -= delta;
            }
        }

        for index in [prev, cur, next] {
            self.curves[index].recalculate();
        }
    }

    /// Cart speed in units per second
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Change the cart speed; negative values are clamped to zero
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity.max(0.0);
    }

    /// Pause or resume the cart
    pub fn toggle_moving(&mut self) {
        self.moving = !self.moving;
        log::info!("Track cart {}", if self.moving { "resumed" } else { "paused" });
    }

    /// Current cart position in track space
    pub fn cart_position(&self) -> Vec3 {
        self.cart.position
    }

    /// Index of the curve the cart is on
    pub fn cart_curve(&self) -> usize {
        self.cart.curve
    }

    /// Move the cart `velocity * delta_time` along the sampled polyline
    ///
    /// The cart walks sample to sample, carrying leftover distance across
    /// samples, curves and the loop seam. At most one full lap is walked per
    /// call, which also bounds the walk on a zero-length track.
    pub fn advance(&mut self, delta_time: f32) {
        if !self.moving {
            return;
        }

        let mut remaining = self.velocity * delta_time.max(0.0);
        let max_steps = self.curves.len() * BezierCurve::SEGMENTS;
        let mut steps = 0;

        while remaining > 0.0 && steps <= max_steps {
            let target = self.curves[self.cart.curve].samples()[self.cart.sample];
            let to_target = target - self.cart.position;
            let distance = to_target.norm();

            if distance > remaining {
                self.cart.position += to_target * (remaining / distance);
                return;
            }

            self.cart.position = target;
            remaining -= distance;
            self.cart.sample += 1;
            if self.cart.sample > BezierCurve::SEGMENTS {
                self.cart.sample = 1;
                self.cart.curve = (self.cart.curve + 1) % self.curves.len();
            }
            steps += 1;
        }
    }

    fn set_marker(&mut self, index: usize, color: Vec3) {
        if let Some(curve) = self.curves.get_mut(index / 3) {
            curve.marker_colors[index % 3] = color;
        }
    }
}

/// Drawable wrapper that renders a [`Track`] and runs its cart
pub struct TrackDrawable {
    track: Track,
    marker: Arc<Mesh>,
    cart_material: Material,
}

impl TrackDrawable {
    /// Scale applied to the unit marker mesh at each control point
    pub const MARKER_SCALE: f32 = 0.1;

    /// Draw `track` using `marker` (a unit sphere) for control points and the cart
    pub fn new(track: Track, marker: Arc<Mesh>) -> Self {
        Self {
            track,
            marker,
            cart_material: Material::new().with_color(0.2, 0.4, 1.0),
        }
    }

    /// Borrow the track
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Mutably borrow the track for edits
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    /// Radius enclosing everything [`draw`](Drawable::draw) submits:
    /// the track plus a full-size cart marker
    pub fn bounding_radius(&self) -> f32 {
        self.track.bounding_radius() + self.marker.bounding_radius()
    }
}

impl Drawable for TrackDrawable {
    fn draw(&self, transform: &Mat4, material: &Material, backend: &mut dyn RenderBackend) {
        for curve in self.track.curves() {
            backend.draw_lines(curve.samples(), transform, material);
        }

        let handle_material = Material::new().with_color(0.6, 0.6, 0.6);
        for handle in self.track.handles() {
            backend.draw_lines(&handle, transform, &handle_material);
        }

        let marker_scale = Mat4::new_scaling(Self::MARKER_SCALE);
        for curve in self.track.curves() {
            for (point, color) in [curve.p0, curve.p1, curve.p2].into_iter().zip(curve.marker_colors) {
                let model = transform * Mat4::new_translation(&point) * marker_scale;
                backend.draw_mesh(&self.marker, &model, &Material { color });
            }
        }

        let cart = transform * Mat4::new_translation(&self.track.cart_position());
        backend.draw_mesh(&self.marker, &cart, &self.cart_material);
    }

    fn update(&mut self, _transform: &Mat4, delta_time: f32) {
        self.track.advance(delta_time);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
