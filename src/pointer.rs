/*
 * Pointer Module
 *
 * Tracks the pointer the host feeds in. Handlers run between frames and only
 * record plain state here: the latest position (None while the pointer is
 * outside the field) and an activity level that rises with movement and fades
 * every step. Coordinates are already field-relative.
 */

use glam::Vec2;

#[derive(Clone, Debug, Default)]
pub struct PointerFeed {
    position: Option<Vec2>,
    last: Option<Vec2>,
    activity: f32,
}

impl PointerFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn activity(&self) -> f32 {
        self.activity
    }

    // Record a sample and return how far (L1) the pointer moved since the last one.
    // Movement beyond `threshold` excites the flock.
    pub fn move_to(&mut self, position: Vec2, threshold: f32, boost: f32) -> f32 {
        if !position.is_finite() {
            self.leave();
            return 0.0;
        }
        let moved = match self.last {
            Some(last) => {
                let d = (position - last).abs();
                d.x + d.y
            }
            // First sample after entering counts as a big move
            None => f32::INFINITY,
        };
        if moved > threshold {
            self.activity = (self.activity + boost).min(1.0);
        }
        self.position = Some(position);
        self.last = Some(position);
        moved
    }

    // Pointer left the tracked region
    pub fn leave(&mut self) {
        self.position = None;
    }

    pub fn decay(&mut self, factor: f32) {
        self.activity *= factor.clamp(0.0, 1.0);
    }
}
