/*
 * Crumb Module
 *
 * Crumbs are short-lived point attractants dropped by pointer movement. Drops
 * are staged by input handlers between frames and committed at the start of
 * the next step, never more than one per grid cell in the same frame.
 */

use std::collections::HashSet;

use glam::Vec2;

use crate::layout::FieldLayout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crumb {
    pub position: Vec2,
    pub strength: f32,
}

#[derive(Clone, Debug, Default)]
pub struct CrumbTrail {
    crumbs: Vec<Crumb>,
    staged: Vec<Vec2>,
}

impl CrumbTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    // Queue a drop for the next commit
    pub fn stage(&mut self, position: Vec2) {
        self.staged.push(position);
    }

    // Turn staged drops into full-strength crumbs. Returns how many were added.
    pub fn commit(&mut self, layout: &FieldLayout, max_crumbs: usize) -> usize {
        let mut taken = HashSet::new();
        let mut added = 0;
        for position in self.staged.drain(..) {
            let Some(cell) = layout.cell_of(position) else {
                continue;
            };
            if !taken.insert(cell) {
                continue;
            }
            self.crumbs.push(Crumb {
                position,
                strength: 1.0,
            });
            added += 1;
        }

        // Oldest crumbs make room for new ones
        if self.crumbs.len() > max_crumbs {
            let excess = self.crumbs.len() - max_crumbs;
            self.crumbs.drain(..excess);
        }
        added
    }

    // Fade every crumb and drop the ones at or below `floor`
    pub fn decay(&mut self, factor: f32, floor: f32) {
        for crumb in &mut self.crumbs {
            crumb.strength *= factor;
        }
        self.prune(floor);
    }

    pub fn prune(&mut self, floor: f32) {
        self.crumbs.retain(|crumb| crumb.strength > floor.max(0.0));
    }

    // Eat up to `amount` from one crumb, returning what was actually taken
    pub fn bite(&mut self, index: usize, amount: f32) -> f32 {
        match self.crumbs.get_mut(index) {
            Some(crumb) => {
                let eaten = amount.clamp(0.0, crumb.strength);
                crumb.strength -= eaten;
                eaten
            }
            None => 0.0,
        }
    }

    // Keep the crumbs that still fit a new layout
    pub fn retain_within(&mut self, layout: &FieldLayout) {
        self.crumbs.retain(|crumb| layout.contains(crumb.position));
        self.staged.clear();
    }

    pub fn clear(&mut self) {
        self.crumbs.clear();
        self.staged.clear();
    }

    pub fn discard_staged(&mut self) {
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn layout() -> FieldLayout {
        FieldLayout::new(100.0, 100.0, 10, 10)
    }

    #[test]
    fn one_crumb_per_cell_per_frame() {
        let mut trail = CrumbTrail::new();
        trail.stage(vec2(11.0, 11.0));
        trail.stage(vec2(15.0, 18.0));
        trail.stage(vec2(25.0, 11.0));
        assert_eq!(trail.commit(&layout(), 64), 2);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.staged(), 0);

        // A later frame may drop into the same cell again
        trail.stage(vec2(12.0, 12.0));
        assert_eq!(trail.commit(&layout(), 64), 1);
        assert_eq!(trail.len(), 3);
    }

    #[test]
    fn drops_outside_the_field_are_ignored() {
        let mut trail = CrumbTrail::new();
        trail.stage(vec2(-4.0, 10.0));
        assert_eq!(trail.commit(&layout(), 64), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn oldest_evicted_over_capacity() {
        let mut trail = CrumbTrail::new();
        for i in 0..5 {
            trail.stage(vec2(5.0 + 10.0 * i as f32, 5.0));
        }
        trail.commit(&layout(), 3);
        let xs: Vec<f32> = trail.crumbs().iter().map(|c| c.position.x).collect();
        assert_eq!(xs, vec![25.0, 35.0, 45.0]);
    }

    #[test]
    fn decay_removes_faded_crumbs() {
        let mut trail = CrumbTrail::new();
        trail.stage(vec2(5.0, 5.0));
        trail.commit(&layout(), 8);
        for _ in 0..10 {
            trail.decay(0.5, 0.01);
        }
        assert!(trail.is_empty());
    }

    #[test]
    fn bite_never_overdraws() {
        let mut trail = CrumbTrail::new();
        trail.stage(vec2(5.0, 5.0));
        trail.commit(&layout(), 8);
        assert_eq!(trail.bite(0, 0.25), 0.25);
        assert_eq!(trail.bite(0, 5.0), 0.75);
        assert_eq!(trail.crumbs()[0].strength, 0.0);
        assert_eq!(trail.bite(3, 1.0), 0.0);
    }
}
