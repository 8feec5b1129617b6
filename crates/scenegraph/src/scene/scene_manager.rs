//! Scene orchestrator: owns the tree, the camera and the culling toggles

use std::any::Any;

use super::{Camera, DrawPass, DrawableNode, Frustum, GroupNode, RenderStats, SceneError, UpdatePass};
use crate::config::SceneConfig;
use crate::foundation::math::Mat4;
use crate::render::RenderBackend;

/// Root of a scene graph plus the per-frame context
///
/// The scene is the only place traversal state lives: the camera the frustum
/// is derived from, the culling, frustum-freeze and show-bounds toggles, and
/// the statistics of the last draw.
pub struct Scene {
    root: GroupNode,
    camera: Camera,
    frozen_frustum: Option<Frustum>,
    culling_enabled: bool,
    show_bounds: bool,
    stats: RenderStats,
    frame: u64,
}

impl Scene {
    /// Take ownership of `root` and `camera` after validating both
    ///
    /// Culling starts enabled, bounds hidden, frustum live.
    ///
    /// # Errors
    /// - [`SceneError::InvalidTransform`] / [`SceneError::InvalidBounds`]
    ///   for the first malformed group in the tree
    /// - [`SceneError::DegenerateCamera`] when the camera cannot form a frustum
    pub fn new(root: GroupNode, camera: Camera) -> Result<Self, SceneError> {
        root.validate()?;
        camera.validate()?;

        log::debug!(
            "Scene created: {} nodes, {} drawables, {} bounded groups",
            root.node_count(),
            root.drawable_count(),
            root.bounded_group_count()
        );

        Ok(Self {
            root,
            camera,
            frozen_frustum: None,
            culling_enabled: true,
            show_bounds: false,
            stats: RenderStats::default(),
            frame: 0,
        })
    }

    /// Build a scene with camera and toggles taken from `config`
    ///
    /// # Errors
    /// Same as [`Scene::new`].
    pub fn from_config(root: GroupNode, config: &SceneConfig) -> Result<Self, SceneError> {
        let mut scene = Self::new(root, config.camera.to_camera())?;
        scene.culling_enabled = config.culling.enabled;
        scene.show_bounds = config.culling.show_bounds;
        if config.culling.freeze_frustum {
            scene.frozen_frustum = Some(Frustum::from_camera(&scene.camera));
        }
        Ok(scene)
    }

    /// Advance animation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        let mut pass = UpdatePass::new(delta_time);
        self.root.update(&Mat4::identity(), &mut pass);
        log::trace!("Update visited {} nodes (dt = {:.4})", pass.nodes_visited, delta_time);
    }

    /// Traverse the tree, submitting visible drawables to `backend`
    ///
    /// Statistics are reset once at the start; the returned value is also
    /// available through [`stats`](Self::stats) until the next draw.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) -> RenderStats {
        debug_assert!(
            self.camera.validate().is_ok(),
            "camera became degenerate: {:?}",
            self.camera
        );

        self.stats = RenderStats {
            frame: self.frame,
            ..RenderStats::default()
        };

        let frustum = self.active_frustum();
        let mut pass = DrawPass::new(backend, &mut self.stats).with_show_bounds(self.show_bounds);
        if self.culling_enabled {
            pass = pass.with_frustum(&frustum);
        }
        self.root.draw(&Mat4::identity(), &mut pass);
        let visited = pass.nodes_visited;

        log::trace!(
            "Frame {}: {} ({} culled, {} drawables, {} nodes visited)",
            self.frame,
            self.stats,
            self.stats.objects_culled,
            self.stats.drawables_submitted,
            visited
        );

        self.frame += 1;
        self.stats
    }

    /// Update then draw
    pub fn frame(&mut self, delta_time: f32, backend: &mut dyn RenderBackend) -> RenderStats {
        self.update(delta_time);
        self.draw(backend)
    }

    /// Frustum the next draw will test against
    ///
    /// The frozen snapshot when the debug freeze is on, otherwise derived
    /// from the current camera.
    pub fn active_frustum(&self) -> Frustum {
        self.frozen_frustum
            .clone()
            .unwrap_or_else(|| Frustum::from_camera(&self.camera))
    }

    /// Whether bounded groups are tested against the frustum
    pub fn culling_enabled(&self) -> bool {
        self.culling_enabled
    }

    /// Enable or disable frustum culling
    pub fn set_culling(&mut self, enabled: bool) {
        if self.culling_enabled != enabled {
            log::info!("Frustum culling {}", if enabled { "enabled" } else { "disabled" });
        }
        self.culling_enabled = enabled;
    }

    /// Flip frustum culling and return the new state
    pub fn toggle_culling(&mut self) -> bool {
        self.set_culling(!self.culling_enabled);
        self.culling_enabled
    }

    /// Whether the culling frustum is frozen
    pub fn is_frustum_frozen(&self) -> bool {
        self.frozen_frustum.is_some()
    }

    /// Freeze the culling frustum at the current camera, or release it
    ///
    /// While frozen the camera can move freely and culling keeps using the
    /// snapshot. Returns the new state.
    pub fn toggle_frustum_freeze(&mut self) -> bool {
        if self.frozen_frustum.take().is_some() {
            log::info!("Culling frustum released");
        } else {
            self.frozen_frustum = Some(Frustum::from_camera(&self.camera));
            log::info!("Culling frustum frozen at camera {:?}", self.camera.position);
        }
        self.is_frustum_frozen()
    }

    /// Whether bounding-sphere wireframes are submitted
    pub fn show_bounds(&self) -> bool {
        self.show_bounds
    }

    /// Show or hide bounding-sphere wireframes
    pub fn set_show_bounds(&mut self, show: bool) {
        self.show_bounds = show;
    }

    /// Flip bounding-sphere wireframes and return the new state
    pub fn toggle_show_bounds(&mut self) -> bool {
        self.show_bounds = !self.show_bounds;
        log::info!("Bounding spheres {}", if self.show_bounds { "shown" } else { "hidden" });
        self.show_bounds
    }

    /// Statistics of the last draw
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Number of draws performed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Camera used to build the frustum
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera for controllers; changes apply from the next draw
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Root group
    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    /// Mutable root group, for edits between frames
    ///
    /// Group mutators validate their input, so the tree stays as valid as
    /// [`Scene::new`] checked it.
    pub fn root_mut(&mut self) -> &mut GroupNode {
        &mut self.root
    }

    /// First group named `name`
    pub fn find_group_mut(&mut self, name: &str) -> Option<&mut GroupNode> {
        self.root.find_group_mut(name)
    }

    /// First drawable leaf named `name`
    pub fn find_drawable_node_mut(&mut self, name: &str) -> Option<&mut DrawableNode> {
        self.root.find_drawable_mut(name)
    }

    /// First drawable leaf named `name`, downcast to `T`
    pub fn find_drawable_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.root.find_drawable_mut(name)?.drawable_as_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;

    fn bounded(name: &str, at: Vec3) -> GroupNode {
        GroupNode::new(name, Mat4::new_translation(&at)).with_bounds(1.0)
    }

    fn two_group_scene() -> Scene {
        let root = GroupNode::identity("root")
            .with_child(bounded("front", Vec3::new(0.0, 0.0, 0.0)))
            .with_child(bounded("behind", Vec3::new(0.0, 0.0, 40.0)));
        Scene::new(root, Camera::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_input() {
        let root = GroupNode::identity("root").with_child(bounded("zero", Vec3::zeros()).with_bounds(0.0));
        assert!(matches!(
            Scene::new(root, Camera::default()),
            Err(SceneError::InvalidBounds { .. })
        ));

        let mut camera = Camera::default();
        camera.near = 0.0;
        assert!(matches!(
            Scene::new(GroupNode::identity("root"), camera),
            Err(SceneError::DegenerateCamera(_))
        ));
    }

    #[test]
    fn test_culling_toggle() {
        let mut scene = two_group_scene();
        let mut backend = HeadlessBackend::new();

        let stats = scene.draw(&mut backend);
        assert_eq!(stats.objects_rendered, 1);
        assert_eq!(stats.objects_culled, 1);

        assert!(!scene.toggle_culling());
        let stats = scene.draw(&mut backend);
        assert_eq!(stats.objects_rendered, 2);
        assert_eq!(stats.objects_culled, 0);
        assert_eq!(stats.frame, 1);
        assert_eq!(scene.frame_count(), 2);
    }

    #[test]
    fn test_frozen_frustum_ignores_camera_moves() {
        let mut scene = two_group_scene();
        let mut backend = HeadlessBackend::new();

        assert!(scene.toggle_frustum_freeze());
        // turn around to face the group behind the initial eye
        scene.camera_mut().set_position(Vec3::new(0.0, 0.0, 60.0));
        scene.camera_mut().set_target(Vec3::new(0.0, 0.0, 100.0));

        let stats = scene.draw(&mut backend);
        assert_eq!(stats.objects_rendered, 1);
        assert!(scene.active_frustum().intersects_sphere(Vec3::zeros(), 1.0));

        assert!(!scene.toggle_frustum_freeze());
        let stats = scene.draw(&mut backend);
        assert_eq!(stats.objects_rendered, 0);
        assert_eq!(stats.objects_culled, 2);
    }

    #[test]
    fn test_show_bounds_only_for_drawn_groups() {
        let mut scene = two_group_scene();
        let mut backend = HeadlessBackend::new();

        scene.draw(&mut backend);
        assert_eq!(backend.wire_spheres, 0);

        assert!(scene.toggle_show_bounds());
        scene.draw(&mut backend);
        assert_eq!(backend.wire_spheres, 1);
    }

    #[test]
    fn test_rider_camera_above_origin_draws() {
        let mut scene = two_group_scene();
        scene.camera_mut().ride(Vec3::new(0.0, 5.0, 0.0));
        assert!(scene.camera().validate().is_ok());

        let stats = scene.draw(&mut HeadlessBackend::new());
        assert_eq!(stats.objects_total(), 2);
    }

    #[test]
    fn test_edits_after_construction_are_validated() {
        let mut scene = two_group_scene();

        let front = scene.find_group_mut("front").unwrap();
        assert!(front.set_bounds(-1.0).is_err());
        assert!(front.set_local(Mat4::from_element(f32::INFINITY)).is_err());

        assert!(scene.root_mut().add_child(bounded("bad", Vec3::zeros()).with_bounds(0.0)).is_err());
        assert!(scene.root_mut().add_child(bounded("extra", Vec3::new(1.0, 0.0, 0.0))).is_ok());
        assert!(scene.root().validate().is_ok());

        let stats = scene.draw(&mut HeadlessBackend::new());
        assert_eq!(stats.objects_total(), 3);
        assert_eq!(stats.objects_rendered, 2);
    }

    #[test]
    fn test_from_config_applies_toggles() {
        let mut config = SceneConfig::default();
        config.culling.enabled = false;
        config.culling.show_bounds = true;
        config.culling.freeze_frustum = true;

        let scene = Scene::from_config(GroupNode::identity("root"), &config).unwrap();
        assert!(!scene.culling_enabled());
        assert!(scene.show_bounds());
        assert!(scene.is_frustum_frozen());
    }
}
