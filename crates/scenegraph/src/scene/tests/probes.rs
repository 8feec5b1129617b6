//! Drawables that report what the traversal did to them

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::foundation::{logging, math::Mat4};
use crate::render::{Drawable, Material, RenderBackend};

/// Shared record of every call a [`Probe`] receives
#[derive(Default)]
pub struct ProbeLog {
    pub updates: Cell<usize>,
    pub draws: Cell<usize>,
    pub drops: Cell<usize>,
    pub last_update: RefCell<Option<Mat4>>,
    pub last_draw: RefCell<Option<Mat4>>,
}

impl ProbeLog {
    /// Fresh shared log; also routes `log` output to the test harness
    pub fn shared() -> Rc<Self> {
        logging::init_for_tests();
        Rc::new(Self::default())
    }
}

/// Drawable that records its calls into a shared [`ProbeLog`]
pub struct Probe {
    log: Rc<ProbeLog>,
}

impl Probe {
    pub fn new(log: &Rc<ProbeLog>) -> Self {
        Self { log: Rc::clone(log) }
    }
}

impl Drawable for Probe {
    fn draw(&self, transform: &Mat4, material: &Material, backend: &mut dyn RenderBackend) {
        self.log.draws.set(self.log.draws.get() + 1);
        *self.log.last_draw.borrow_mut() = Some(*transform);
        backend.draw_wire_sphere(transform, material);
    }

    fn update(&mut self, transform: &Mat4, _delta_time: f32) {
        self.log.updates.set(self.log.updates.get() + 1);
        *self.log.last_update.borrow_mut() = Some(*transform);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.log.drops.set(self.log.drops.get() + 1);
    }
}
