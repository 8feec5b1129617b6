//! Robot army demo
//!
//! Builds a grid of animated robots and a roller-coaster track, then runs the
//! update/draw cycle headlessly while exercising the culling toggles, the
//! debug frustum freeze and the camera controller. Statistics go to the log.
//!
//! Usage: `robot_army [config.toml|config.ron]` (default `robot_army.toml`).

mod coaster;
mod config;
mod robot;

use scenegraph::animation::{Axis, TrackDrawable};
use scenegraph::config::{Config, ConfigError};
use scenegraph::foundation::logging;
use scenegraph::foundation::math::Vec3;
use scenegraph::foundation::time::Timer;
use scenegraph::render::HeadlessBackend;
use scenegraph::scene::{GroupNode, Scene, SceneError};
use thiserror::Error;

use crate::coaster::TRACK_NODE;
use crate::config::DemoConfig;
use crate::robot::{build_army, RobotFactory, RobotParts};

const DEFAULT_CONFIG: &str = "robot_army.toml";

/// Where the track sits relative to the army
const COASTER_CENTER: [f32; 3] = [0.0, 0.0, -60.0];

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Scripted input applied at fixed points of the run
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    FreezeFrustum,
    ReleaseFrustum,
    ToggleCulling,
    ToggleBounds,
    EditTrack,
}

fn cue_for(frame: u32, total: u32) -> Option<Cue> {
    let quarter = (total / 4).max(1);
    match frame {
        f if f == quarter => Some(Cue::FreezeFrustum),
        f if f == quarter + quarter / 2 => Some(Cue::EditTrack),
        f if f == 2 * quarter => Some(Cue::ReleaseFrustum),
        f if f == 3 * quarter => Some(Cue::ToggleCulling),
        f if f == 3 * quarter + quarter / 2 => Some(Cue::ToggleBounds),
        _ => None,
    }
}

fn apply_cue(scene: &mut Scene, cue: Cue) {
    log::info!("Frame {}: {:?}", scene.frame_count(), cue);
    match cue {
        Cue::FreezeFrustum | Cue::ReleaseFrustum => {
            scene.toggle_frustum_freeze();
        }
        Cue::ToggleCulling => {
            scene.toggle_culling();
        }
        Cue::ToggleBounds => {
            scene.toggle_show_bounds();
        }
        Cue::EditTrack => {
            if let Some(track) = scene.find_drawable_mut::<TrackDrawable>(TRACK_NODE) {
                let track = track.track_mut();
                track.select_next(false);
                track.move_selected(Axis::Y, true);
                log::info!(
                    "Moved track control point {} to {:?}",
                    track.selected(),
                    track.control_point(track.selected())
                );
            }
            if let Err(e) = coaster::refit_bounds(scene) {
                log::error!("Coaster bounds not updated: {}", e);
            }
        }
    }
}

fn build_scene(config: &DemoConfig) -> Result<Scene, DemoError> {
    let parts = match &config.model_dir {
        Some(dir) => RobotParts::load(dir),
        None => RobotParts::cubes(),
    };
    let factory = RobotFactory::new(parts, config.robot_radius);

    let mut world = GroupNode::identity("world").with_child(build_army(&factory, config));
    if config.coaster {
        world = world.with_child(coaster::build_coaster(Vec3::from(COASTER_CENTER))?);
    }

    Ok(Scene::from_config(world, &config.scene)?)
}

fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let mut scene = build_scene(config)?;
    let mut backend = HeadlessBackend::new();
    let mut timer = if config.fixed_step > 0.0 {
        Timer::fixed(config.fixed_step)
    } else {
        Timer::new()
    };

    // orbit a full turn over the run so the visible set changes
    #[allow(clippy::cast_precision_loss)]
    let orbit_step = std::f32::consts::TAU / config.frames.max(1) as f32;

    let (mut min_rendered, mut max_rendered) = (usize::MAX, 0);
    for frame in 0..config.frames {
        if let Some(cue) = cue_for(frame, config.frames) {
            apply_cue(&mut scene, cue);
        }

        let delta_time = timer.tick();
        let stats = scene.frame(delta_time, &mut backend);
        min_rendered = min_rendered.min(stats.objects_rendered);
        max_rendered = max_rendered.max(stats.objects_rendered);

        if frame % 60 == 0 {
            log::info!(
                "Frame {}: {}, culled {}, drawables {}",
                stats.frame,
                stats,
                stats.objects_culled,
                stats.drawables_submitted
            );
        }

        scene.camera_mut().orbit(Vec3::y(), orbit_step);
    }

    log::info!(
        "Finished {} frames in {:.2}s simulated ({:.1} fps): objects rendered {}..={}, {} submissions",
        timer.frame_count(),
        timer.total_time(),
        timer.average_fps(),
        if min_rendered == usize::MAX { 0 } else { min_rendered },
        max_rendered,
        backend.submissions()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = DemoConfig::load_or_default(&path)?;
    config.validate()?;

    log::info!(
        "Robot army: {} robots, {} frames, culling {}",
        config.robot_count(),
        config.frames,
        if config.scene.culling.enabled { "on" } else { "off" }
    );

    run(&config)?;
    Ok(())
}
