//! Per-frame list of circles to draw

use glam::Vec2;

use super::Renderer;
use super::vertex::{CircleInstance, Color};
use crate::Viewport;

/// Collects a frame's draw calls as GPU instances
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub viewport: Option<Viewport>,
    pub instances: Vec<CircleInstance>,
    pub score: Option<u64>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes for a vertex/instance buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Renderer for DrawList {
    fn clear(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.instances.clear();
        self.score = None;
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.instances
            .push(CircleInstance::new(center.x, center.y, radius, color));
    }

    fn score(&mut self, seconds: u64) {
        self.score = Some(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::vertex::colors;

    #[test]
    fn test_clear_resets_frame() {
        let mut list = DrawList::new();
        list.circle(Vec2::new(1.0, 1.0), 2.0, colors::STAR);
        list.score(3);
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_bytes().len(), 32);

        list.clear(Viewport::new(10.0, 10.0));
        assert!(list.is_empty());
        assert_eq!(list.score, None);
    }
}
