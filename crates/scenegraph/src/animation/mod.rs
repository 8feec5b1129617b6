//! Per-frame animation state driven from `update`
//!
//! - [`Swing`]: limb oscillation attached to a group node
//! - [`BezierCurve`] / [`Track`]: editable closed track with a moving cart,
//!   rendered through [`TrackDrawable`]

pub mod swing;
pub mod curve;
pub mod track;

pub use swing::{Swing, SwingDirection};
pub use curve::BezierCurve;
pub use track::{Axis, Track, TrackDrawable};
