//! Per-frame render statistics

use std::fmt;

/// Counters collected during one [`Scene::draw`](super::Scene::draw)
///
/// Reset exactly once at the start of every draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Bounded groups drawn this frame (passed the frustum test, or culling is off)
    pub objects_rendered: usize,
    /// Bounded groups skipped by the frustum test
    pub objects_culled: usize,
    /// Drawable leaves submitted to the backend
    pub drawables_submitted: usize,
    /// Index of the frame these counters belong to
    pub frame: u64,
}

impl RenderStats {
    /// Bounded groups that were tested or counted this frame
    pub fn objects_total(&self) -> usize {
        self.objects_rendered + self.objects_culled
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "objects rendered: {}", self.objects_rendered)
    }
}
