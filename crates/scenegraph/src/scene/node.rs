//! Scene nodes and the two traversal passes

use std::any::Any;
use std::fmt;

use super::{BoundingSphere, Frustum, RenderStats, SceneError};
use crate::animation::Swing;
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::render::{Drawable, Material, RenderBackend};

/// State threaded through an update traversal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdatePass {
    /// Seconds since the previous update
    pub delta_time: f32,
    /// Nodes reached so far
    pub nodes_visited: usize,
}

impl UpdatePass {
    /// Start an update with `delta_time` seconds
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            nodes_visited: 0,
        }
    }
}

/// State threaded through a draw traversal
pub struct DrawPass<'a> {
    /// Receives every submission
    pub backend: &'a mut dyn RenderBackend,
    /// Frustum to test bounded groups against; `None` disables culling
    pub frustum: Option<&'a Frustum>,
    /// Submit a wireframe sphere for every drawn bounded group
    pub show_bounds: bool,
    /// Counters for this frame
    pub stats: &'a mut RenderStats,
    /// Nodes reached so far (culled subtrees are not entered)
    pub nodes_visited: usize,
}

impl<'a> DrawPass<'a> {
    /// Start a draw submitting to `backend` and counting into `stats`
    pub fn new(backend: &'a mut dyn RenderBackend, stats: &'a mut RenderStats) -> Self {
        Self {
            backend,
            frustum: None,
            show_bounds: false,
            stats,
            nodes_visited: 0,
        }
    }

    /// Cull bounded groups against `frustum`
    pub fn with_frustum(mut self, frustum: &'a Frustum) -> Self {
        self.frustum = Some(frustum);
        self
    }

    /// Toggle bounding-sphere wireframes
    pub fn with_show_bounds(mut self, show_bounds: bool) -> Self {
        self.show_bounds = show_bounds;
        self
    }
}

/// A node in the scene tree
#[derive(Debug)]
pub enum SceneNode {
    /// Interior node with children
    Group(GroupNode),
    /// Leaf that renders
    Drawable(DrawableNode),
}

impl SceneNode {
    /// Node name
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => group.name(),
            Self::Drawable(drawable) => drawable.name(),
        }
    }

    /// Run the update pass for this node with its parent's accumulated transform
    pub fn update(&mut self, parent: &Mat4, pass: &mut UpdatePass) {
        match self {
            Self::Group(group) => group.update(parent, pass),
            Self::Drawable(drawable) => drawable.update(parent, pass),
        }
    }

    /// Run the draw pass for this node with its parent's accumulated transform
    pub fn draw(&self, parent: &Mat4, pass: &mut DrawPass<'_>) {
        match self {
            Self::Group(group) => group.draw(parent, pass),
            Self::Drawable(drawable) => drawable.draw(parent, pass),
        }
    }

    /// Nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        match self {
            Self::Group(group) => group.node_count(),
            Self::Drawable(_) => 1,
        }
    }

    /// Drawable leaves in this subtree
    pub fn drawable_count(&self) -> usize {
        match self {
            Self::Group(group) => group.drawable_count(),
            Self::Drawable(_) => 1,
        }
    }
}

impl From<GroupNode> for SceneNode {
    fn from(group: GroupNode) -> Self {
        Self::Group(group)
    }
}

impl From<DrawableNode> for SceneNode {
    fn from(drawable: DrawableNode) -> Self {
        Self::Drawable(drawable)
    }
}

/// Interior node: local transform, owned children, optional bounds and swing
#[derive(Debug)]
pub struct GroupNode {
    name: String,
    local: Mat4,
    children: Vec<SceneNode>,
    bounds: Option<BoundingSphere>,
    swing: Option<Swing>,
}

impl GroupNode {
    /// Create an empty group with a local-to-parent matrix
    pub fn new(name: impl Into<String>, local: Mat4) -> Self {
        Self {
            name: name.into(),
            local,
            children: Vec::new(),
            bounds: None,
            swing: None,
        }
    }

    /// Empty group with the identity transform
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, Mat4::identity())
    }

    /// Append a child and return the group
    ///
    /// Builder form: nothing is checked until [`validate`](Self::validate)
    /// runs, which `Scene::new` does for the whole tree.
    pub fn with_child(mut self, child: impl Into<SceneNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Attach a bounding sphere of `radius`
    pub fn with_bounds(mut self, radius: f32) -> Self {
        self.bounds = Some(BoundingSphere::new(radius));
        self
    }

    /// Attach a swing animation
    pub fn with_swing(mut self, swing: Swing) -> Self {
        self.swing = Some(swing);
        self
    }

    /// Append a child after validating its subtree
    ///
    /// # Errors
    /// The first [`SceneError`] found in the child's subtree; the child is
    /// dropped and this group is left unchanged.
    pub fn add_child(&mut self, child: impl Into<SceneNode>) -> Result<(), SceneError> {
        let child = child.into();
        if let SceneNode::Group(group) = &child {
            group.validate()?;
        }
        self.children.push(child);
        Ok(())
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local-to-parent matrix
    pub fn local(&self) -> &Mat4 {
        &self.local
    }

    /// Replace the local-to-parent matrix
    ///
    /// # Errors
    /// [`SceneError::InvalidTransform`] when `local` is not a finite affine
    /// matrix; the current matrix is kept.
    pub fn set_local(&mut self, local: Mat4) -> Result<(), SceneError> {
        if !local.is_affine() {
            return Err(self.invalid_transform());
        }
        self.local = local;
        Ok(())
    }

    /// Replace the bounding sphere radius, attaching a sphere if there was none
    ///
    /// # Errors
    /// [`SceneError::InvalidBounds`] for a non-positive or non-finite radius;
    /// the current bounds are kept.
    pub fn set_bounds(&mut self, radius: f32) -> Result<(), SceneError> {
        let bounds = BoundingSphere::new(radius);
        if !bounds.is_valid() {
            return Err(SceneError::InvalidBounds {
                group: self.name.clone(),
                radius,
            });
        }
        self.bounds = Some(bounds);
        Ok(())
    }

    /// Children in draw order
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Attached bounding sphere
    pub fn bounds(&self) -> Option<&BoundingSphere> {
        self.bounds.as_ref()
    }

    /// Attached swing animation
    pub fn swing(&self) -> Option<&Swing> {
        self.swing.as_ref()
    }

    /// Nodes in this subtree, including this group
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Drawable leaves in this subtree
    pub fn drawable_count(&self) -> usize {
        self.children.iter().map(SceneNode::drawable_count).sum()
    }

    /// Groups in this subtree (including this one) carrying a bounding sphere
    pub fn bounded_group_count(&self) -> usize {
        let own = usize::from(self.bounds.is_some());
        own + self
            .children
            .iter()
            .map(|child| match child {
                SceneNode::Group(group) => group.bounded_group_count(),
                SceneNode::Drawable(_) => 0,
            })
            .sum::<usize>()
    }

    /// First group named `name` in depth-first order, this group included
    pub fn find_group_mut(&mut self, name: &str) -> Option<&mut GroupNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            SceneNode::Group(group) => group.find_group_mut(name),
            SceneNode::Drawable(_) => None,
        })
    }

    /// First drawable leaf named `name` in depth-first order
    pub fn find_drawable_mut(&mut self, name: &str) -> Option<&mut DrawableNode> {
        self.children.iter_mut().find_map(|child| match child {
            SceneNode::Drawable(drawable) if drawable.name == name => Some(drawable),
            SceneNode::Drawable(_) => None,
            SceneNode::Group(group) => group.find_drawable_mut(name),
        })
    }

    /// Check every matrix and bounding sphere in this subtree
    ///
    /// # Errors
    /// The first [`SceneError::InvalidTransform`] or
    /// [`SceneError::InvalidBounds`] found in depth-first order.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.local.is_affine() {
            return Err(self.invalid_transform());
        }
        if let Some(bounds) = &self.bounds {
            if !bounds.is_valid() {
                return Err(SceneError::InvalidBounds {
                    group: self.name.clone(),
                    radius: bounds.radius,
                });
            }
        }
        for child in &self.children {
            if let SceneNode::Group(group) = child {
                group.validate()?;
            }
        }
        Ok(())
    }

    fn invalid_transform(&self) -> SceneError {
        SceneError::InvalidTransform {
            node: self.name.clone(),
            reason: "local matrix is not a finite affine transform".to_string(),
        }
    }

    /// Advance animation in this subtree
    ///
    /// The swing step (if any) is pre-multiplied onto the local matrix before
    /// the accumulated transform is passed to the children.
    pub fn update(&mut self, parent: &Mat4, pass: &mut UpdatePass) {
        pass.nodes_visited += 1;

        if let Some(swing) = &mut self.swing {
            let step = swing.advance(pass.delta_time);
            self.local = Mat4::rotation_x(step) * self.local;
        }

        let world = parent * self.local;
        for child in &mut self.children {
            child.update(&world, pass);
        }
    }

    /// Submit this subtree, skipping it when its bounding sphere is culled
    pub fn draw(&self, parent: &Mat4, pass: &mut DrawPass<'_>) {
        pass.nodes_visited += 1;
        let world = parent * self.local;

        if let Some(bounds) = &self.bounds {
            if let Some(frustum) = pass.frustum {
                if !bounds.is_visible(&world, frustum) {
                    pass.stats.objects_culled += 1;
                    log::trace!("Culled group '{}' at {:?}", self.name, world.origin());
                    return;
                }
            }
            pass.stats.objects_rendered += 1;

            if pass.show_bounds {
                pass.backend
                    .draw_wire_sphere(&bounds.wire_transform(&world), &Material::red());
            }
        }

        for child in &self.children {
            child.draw(&world, pass);
        }
    }
}

/// Leaf node owning one drawable and its material
pub struct DrawableNode {
    name: String,
    drawable: Box<dyn Drawable>,
    /// Material handed to the drawable on every draw
    pub material: Material,
}

impl DrawableNode {
    /// Wrap `drawable` as a named leaf
    pub fn new(name: impl Into<String>, drawable: Box<dyn Drawable>, material: Material) -> Self {
        Self {
            name: name.into(),
            drawable,
            material,
        }
    }

    /// Leaf name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the drawable
    pub fn drawable(&self) -> &dyn Drawable {
        self.drawable.as_ref()
    }

    /// Mutably borrow the drawable
    pub fn drawable_mut(&mut self) -> &mut dyn Drawable {
        self.drawable.as_mut()
    }

    /// Downcast the drawable to a concrete type
    pub fn drawable_as<T: Any>(&self) -> Option<&T> {
        self.drawable.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast the drawable to a concrete type
    pub fn drawable_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.drawable.as_any_mut().downcast_mut::<T>()
    }

    /// Forward the update to the drawable
    pub fn update(&mut self, parent: &Mat4, pass: &mut UpdatePass) {
        pass.nodes_visited += 1;
        self.drawable.update(parent, pass.delta_time);
    }

    /// Submit the drawable with its parent's accumulated transform
    pub fn draw(&self, parent: &Mat4, pass: &mut DrawPass<'_>) {
        pass.nodes_visited += 1;
        pass.stats.drawables_submitted += 1;
        self.drawable.draw(parent, &self.material, &mut *pass.backend);
    }
}

impl fmt::Debug for DrawableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawableNode")
            .field("name", &self.name)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;
    use crate::scene::Camera;
    use approx::assert_relative_eq;

    struct Marker;

    impl Drawable for Marker {
        fn draw(&self, transform: &Mat4, material: &Material, backend: &mut dyn RenderBackend) {
            backend.draw_lines(&[Vec3::zeros()], transform, material);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn leaf(name: &str) -> DrawableNode {
        DrawableNode::new(name, Box::new(Marker), Material::default())
    }

    #[test]
    fn test_counts_and_lookup() {
        let mut root = GroupNode::identity("root")
            .with_child(
                GroupNode::new("arm", Mat4::new_translation(&Vec3::x()))
                    .with_bounds(1.0)
                    .with_child(leaf("hand")),
            )
            .with_child(leaf("torso"));

        assert_eq!(root.node_count(), 4);
        assert_eq!(root.drawable_count(), 2);
        assert_eq!(root.bounded_group_count(), 1);

        assert!(root.find_group_mut("arm").is_some());
        assert!(root.find_group_mut("root").is_some());
        assert!(root.find_group_mut("leg").is_none());
        assert!(root.find_drawable_mut("hand").is_some());
        assert!(root.find_drawable_mut("arm").is_none());

        let hand = root.find_drawable_mut("hand").unwrap();
        assert!(hand.drawable_as_mut::<Marker>().is_some());
        assert!(hand.drawable_as::<crate::render::MeshDrawable>().is_none());
    }

    #[test]
    fn test_validate_reports_offending_node() {
        let bad_radius = GroupNode::identity("root").with_child(GroupNode::identity("robot").with_bounds(-2.0));
        assert_eq!(
            bad_radius.validate(),
            Err(SceneError::InvalidBounds {
                group: "robot".to_string(),
                radius: -2.0
            })
        );

        let mut projective = Mat4::identity();
        projective[(3, 2)] = -1.0;
        let bad_matrix = GroupNode::identity("root").with_child(GroupNode::new("skewed", projective));
        assert!(matches!(
            bad_matrix.validate(),
            Err(SceneError::InvalidTransform { node, .. }) if node == "skewed"
        ));
    }

    #[test]
    fn test_mutators_reject_invalid_values() {
        let mut projective = Mat4::identity();
        projective[(3, 2)] = -1.0;
        let moved = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));

        let mut group = GroupNode::identity("arm").with_bounds(1.0);
        assert!(group.set_local(projective).is_err());
        assert_relative_eq!(*group.local(), Mat4::identity());
        assert!(group.set_local(moved).is_ok());
        assert_relative_eq!(*group.local(), moved);

        assert!(matches!(group.set_bounds(f32::NAN), Err(SceneError::InvalidBounds { .. })));
        assert_eq!(group.bounds().map(|b| b.radius), Some(1.0));
        assert!(group.set_bounds(3.0).is_ok());
        assert_eq!(group.bounds().map(|b| b.radius), Some(3.0));

        let bad_child = GroupNode::identity("hand").with_child(GroupNode::identity("finger").with_bounds(0.0));
        assert!(matches!(
            group.add_child(bad_child),
            Err(SceneError::InvalidBounds { group, .. }) if group == "finger"
        ));
        assert!(group.children().is_empty());
        assert!(group.add_child(leaf("hand")).is_ok());
        assert_eq!(group.children().len(), 1);
    }

    #[test]
    fn test_update_premultiplies_swing() {
        let start = Mat4::new_translation(&Vec3::new(1.25, 0.0, 0.0));
        let mut arm = GroupNode::new("arm", start).with_swing(Swing::forward());

        let mut pass = UpdatePass::new(1.0);
        arm.update(&Mat4::identity(), &mut pass);

        let step = crate::foundation::math::utils::deg_to_rad(Swing::DEFAULT_SPEED_DEG);
        assert_relative_eq!(*arm.local(), Mat4::rotation_x(step) * start, epsilon = 1e-6);
        assert_eq!(pass.nodes_visited, 1);
    }

    #[test]
    fn test_show_bounds_submits_wire_spheres() {
        let root = GroupNode::identity("root")
            .with_child(GroupNode::new("near", Mat4::new_translation(&Vec3::new(0.0, 0.0, 0.0))).with_bounds(1.0))
            .with_child(GroupNode::new("behind", Mat4::new_translation(&Vec3::new(0.0, 0.0, 50.0))).with_bounds(1.0));

        let frustum = Frustum::from_camera(&Camera::default());
        let mut backend = HeadlessBackend::new();
        let mut stats = RenderStats::default();
        let mut pass = DrawPass::new(&mut backend, &mut stats)
            .with_frustum(&frustum)
            .with_show_bounds(true);
        root.draw(&Mat4::identity(), &mut pass);
        assert_eq!(pass.nodes_visited, 3);

        assert_eq!(stats.objects_rendered, 1);
        assert_eq!(stats.objects_culled, 1);
        assert_eq!(backend.wire_spheres, 1);
        assert_relative_eq!(backend.sphere_centers[0], Vec3::zeros());
    }
}
