/*
 * Layout Module
 *
 * Field geometry handed over once by the host: the continuous field the agents
 * live in and the grid of cells the density field buckets it into. The field
 * is a torus; everything that leaves one edge re-enters at the opposite one.
 */

use glam::{vec2, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLayout {
    pub width: f32,
    pub height: f32,
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl FieldLayout {
    // Grid that tiles the field exactly
    pub fn new(width: f32, height: f32, cols: usize, rows: usize) -> Self {
        let cell_width = if cols > 0 { width / cols as f32 } else { 0.0 };
        let cell_height = if rows > 0 { height / rows as f32 } else { 0.0 };
        Self {
            width,
            height,
            cols,
            rows,
            cell_width,
            cell_height,
        }
    }

    // Square cells, `cols` across; the last row may hang over the bottom edge
    pub fn square_cells(width: f32, height: f32, cols: usize) -> Self {
        if cols == 0 || !(width > 0.0) || !(height > 0.0) {
            return Self::new(width, height, 0, 0);
        }
        let cell = width / cols as f32;
        let rows = (height / cell).ceil() as usize;
        Self {
            width,
            height,
            cols,
            rows,
            cell_width: cell,
            cell_height: cell,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
            || self.cols == 0
            || self.rows == 0
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }

    // Convert field coordinates to a (col, row) cell
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        if self.is_degenerate() || !self.contains(pos) {
            return None;
        }
        let col = ((pos.x / self.cell_width) as usize).min(self.cols - 1);
        let row = ((pos.y / self.cell_height) as usize).min(self.rows - 1);
        Some((col, row))
    }

    // Wrap a position back onto the torus
    #[inline]
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        vec2(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }

    // Offset from `from` to `to`, taking the shorter way round on wrapped axes
    #[inline]
    pub fn wrapped_delta(&self, from: Vec2, to: Vec2, wrap_x: bool, wrap_y: bool) -> Vec2 {
        let mut delta = to - from;
        if wrap_x {
            delta.x = shortest(delta.x, self.width);
        }
        if wrap_y {
            delta.y = shortest(delta.y, self.height);
        }
        delta
    }
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round a tiny negative value up to `extent`
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

fn shortest(d: f32, extent: f32) -> f32 {
    if d.abs() > extent / 2.0 {
        if d > 0.0 {
            d - extent
        } else {
            d + extent
        }
    } else {
        d
    }
}
