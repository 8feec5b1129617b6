//! Roller-coaster track placed behind the army

use std::sync::Arc;

use scenegraph::animation::{Track, TrackDrawable};
use scenegraph::foundation::math::{Mat4, Vec3};
use scenegraph::render::{Material, Mesh};
use scenegraph::scene::{DrawableNode, GroupNode, Scene, SceneError};

/// Name of the drawable holding the track, for lookups through the scene
pub const TRACK_NODE: &str = "track";

/// Name of the bounded group carrying the track
pub const COASTER_GROUP: &str = "coaster";

/// Control points of the closed track: 8 cubic curves, last point repeats the first
pub fn track_points() -> Vec<Vec3> {
    [
        [1.0, -2.0, 10.0],
        [0.0, -4.0, 11.0],
        [-4.0, -6.0, 6.0],
        [-6.0, -7.0, 4.0],
        [-8.0, -8.0, 2.0],
        [-10.0, -6.0, 0.0],
        [-8.0, -2.0, -2.0],
        [-6.0, 2.0, -4.0],
        [-4.0, 3.0, -6.0],
        [-3.0, 1.0, -7.0],
        [-2.0, -1.0, -8.0],
        [0.0, -2.0, -10.0],
        [2.0, -5.0, -8.0],
        [4.0, -8.0, -6.0],
        [6.0, -7.0, -4.0],
        [7.0, -6.0, -3.0],
        [8.0, -5.0, -2.0],
        [9.0, -1.0, -1.0],
        [10.0, 1.0, 0.0],
        [11.0, 3.0, 1.0],
        [8.0, 5.0, 4.0],
        [6.0, 2.0, 6.0],
        [4.0, -1.0, 8.0],
        [2.0, 0.0, 9.0],
        [1.0, -2.0, 10.0],
    ]
    .into_iter()
    .map(Vec3::from)
    .collect()
}

/// Bounded group holding the track drawable, centered at `center`
pub fn build_coaster(center: Vec3) -> Result<GroupNode, SceneError> {
    let track = Track::new(&track_points())?;
    log::info!(
        "Track built: {} curves, {:.1} units long",
        track.curves().len(),
        track.curves().iter().map(|c| c.length()).sum::<f32>()
    );

    let marker = Arc::new(Mesh::uv_sphere(8, 12));
    let drawable = TrackDrawable::new(track, marker);

    Ok(GroupNode::new(COASTER_GROUP, Mat4::new_translation(&center))
        .with_bounds(drawable.bounding_radius())
        .with_child(DrawableNode::new(
            TRACK_NODE,
            Box::new(drawable),
            Material::new().with_color(1.0, 1.0, 1.0),
        )))
}

/// Resize the coaster's bounding sphere after track edits
///
/// Returns the new radius, or `None` when the scene has no coaster.
pub fn refit_bounds(scene: &mut Scene) -> Result<Option<f32>, SceneError> {
    let Some(radius) = scene
        .find_drawable_mut::<TrackDrawable>(TRACK_NODE)
        .map(|track| track.bounding_radius())
    else {
        return Ok(None);
    };
    let Some(group) = scene.find_group_mut(COASTER_GROUP) else {
        return Ok(None);
    };
    group.set_bounds(radius)?;
    log::debug!("Coaster bounds refit to {:.2}", radius);
    Ok(Some(radius))
}
