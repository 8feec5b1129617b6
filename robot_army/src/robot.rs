//! Robot factory: one group per robot, limbs that swing, parts sharing meshes

use std::path::Path;
use std::sync::Arc;

use scenegraph::animation::Swing;
use scenegraph::assets::ModelLoader;
use scenegraph::foundation::math::{Mat4, Mat4Ext, Vec3};
use scenegraph::render::{Material, Mesh, MeshDrawable};
use scenegraph::scene::{DrawableNode, GroupNode};

use crate::config::DemoConfig;

/// Meshes every robot instance shares
#[derive(Clone)]
pub struct RobotParts {
    body: Arc<Mesh>,
    head: Arc<Mesh>,
    limb: Arc<Mesh>,
    eyeball: Arc<Mesh>,
}

impl RobotParts {
    /// Unit cubes for every part
    pub fn cubes() -> Self {
        let cube = Arc::new(Mesh::cube());
        Self {
            body: Arc::clone(&cube),
            head: Arc::clone(&cube),
            limb: Arc::clone(&cube),
            eyeball: cube,
        }
    }

    /// Load the robot models from `dir`, keeping a cube for any part that fails
    pub fn load(dir: &Path) -> Self {
        let mut loader = ModelLoader::new(dir).with_normalize(1.0);
        let fallback = Self::cubes();
        let mut part = |file: &str, cube: &Arc<Mesh>| match loader.load_mesh(file) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("Failed to load {}: {}; using a cube", dir.join(file).display(), e);
                Arc::clone(cube)
            }
        };

        Self {
            body: part("body_s.obj", &fallback.body),
            head: part("head_s.obj", &fallback.head),
            limb: part("limb_s.obj", &fallback.limb),
            eyeball: part("eyeball_s.obj", &fallback.eyeball),
        }
    }
}

/// Builds robot subtrees
pub struct RobotFactory {
    parts: RobotParts,
    radius: f32,
    body_material: Material,
    eye_material: Material,
}

impl RobotFactory {
    /// Drawable parts per robot (torso, head, four limbs, two eyes)
    pub const PARTS_PER_ROBOT: usize = 8;

    /// Factory producing robots bounded by a sphere of `radius`
    pub fn new(parts: RobotParts, radius: f32) -> Self {
        Self {
            parts,
            radius,
            body_material: Material::new().with_color(0.6, 0.6, 0.7),
            eye_material: Material::new().with_color(0.1, 0.1, 0.1),
        }
    }

    fn part(&self, name: &str, mesh: &Arc<Mesh>, material: &Material) -> DrawableNode {
        DrawableNode::new(
            name,
            Box::new(MeshDrawable::new(Arc::clone(mesh))),
            *material,
        )
    }

    fn limb(&self, name: &str, offset: Vec3, swing: Swing) -> GroupNode {
        GroupNode::new(name, Mat4::new_translation(&offset))
            .with_swing(swing)
            .with_child(self.part(name, &self.parts.limb, &self.body_material))
    }

    fn eye(&self, name: &str, offset: Vec3) -> GroupNode {
        GroupNode::new(name, Mat4::new_translation(&offset) * Mat4::new_scaling(0.2))
            .with_child(self.part(name, &self.parts.eyeball, &self.eye_material))
    }

    /// One robot standing at `position`
    pub fn build(&self, name: impl Into<String>, position: Vec3) -> GroupNode {
        let body = GroupNode::new("body", Mat4::rotation_deg(Vec3::new(0.0, 1.0, -1.0), 15.0))
            .with_child(self.part("torso", &self.parts.body, &self.body_material))
            .with_child(
                GroupNode::new("head", Mat4::new_translation(&Vec3::new(0.0, 1.2, 0.0)))
                    .with_child(self.part("head", &self.parts.head, &self.body_material)),
            )
            .with_child(self.limb("arm_l", Vec3::new(1.25, 0.0, 0.0), Swing::forward()))
            .with_child(self.limb("arm_r", Vec3::new(-1.25, 0.0, 0.0), Swing::backward()))
            .with_child(self.limb("leg_l", Vec3::new(0.5, -1.8, 0.0), Swing::backward()))
            .with_child(self.limb("leg_r", Vec3::new(-0.5, -1.8, 0.0), Swing::forward()))
            .with_child(self.eye("eye_l", Vec3::new(0.3, 1.5, 1.0)))
            .with_child(self.eye("eye_r", Vec3::new(-0.3, 1.5, 1.0)));

        GroupNode::new(name, Mat4::new_translation(&position))
            .with_bounds(self.radius)
            .with_child(body)
    }
}

/// Lay out the configured grid of robots under one group
#[allow(clippy::cast_precision_loss)]
pub fn build_army(factory: &RobotFactory, config: &DemoConfig) -> GroupNode {
    let mut army = GroupNode::identity("army");
    for i in config.grid_min..config.grid_max {
        for j in config.grid_min..config.grid_max {
            let position = Vec3::new(i as f32 * config.spacing, 0.0, j as f32 * config.spacing);
            army = army.with_child(factory.build(format!("robot_{i}_{j}"), position));
        }
    }
    log::info!(
        "Built {} robots ({} drawables)",
        army.children().len(),
        army.drawable_count()
    );
    army
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_shape() {
        let factory = RobotFactory::new(RobotParts::cubes(), 2.2);
        let robot = factory.build("robot", Vec3::new(5.0, 0.0, -5.0));

        assert_eq!(robot.drawable_count(), RobotFactory::PARTS_PER_ROBOT);
        assert_eq!(robot.bounded_group_count(), 1);
        assert!(robot.validate().is_ok());
        assert_eq!(robot.bounds().map(|b| b.radius), Some(2.2));
    }

    #[test]
    fn test_army_matches_grid() {
        let config = DemoConfig::default();
        let factory = RobotFactory::new(RobotParts::cubes(), config.robot_radius);
        let army = build_army(&factory, &config);

        assert_eq!(army.children().len(), config.robot_count());
        assert_eq!(army.drawable_count(), config.robot_count() * RobotFactory::PARTS_PER_ROBOT);
    }

    #[test]
    fn test_missing_models_fall_back_to_cubes() {
        let parts = RobotParts::load(Path::new("does/not/exist"));
        assert_eq!(parts.body.vertices.len(), Mesh::cube().vertices.len());
        assert_eq!(parts.eyeball.triangle_count(), 12);
    }
}
