/*
 * Density Field Module
 *
 * A fixed grid of decaying intensities, one cell per spatial bucket. Agents
 * deposit into the cell they stand in and every cell fades each step, which
 * leaves a trail the renderer turns into glyphs. Bored agents also read it to
 * find empty space.
 *
 * Cells always hold values in [0, 1].
 */

use glam::Vec2;

use crate::layout::FieldLayout;

#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    cols: usize,
    rows: usize,
    cells: Vec<f32>,
}

impl DensityField {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0.0; cols * rows],
        }
    }

    pub fn for_layout(layout: &FieldLayout) -> Self {
        if layout.is_degenerate() {
            Self::new(0, 0)
        } else {
            Self::new(layout.cols, layout.rows)
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.index(col, row).map_or(0.0, |i| self.cells[i])
    }

    // Multiply every cell by `factor`
    pub fn decay(&mut self, factor: f32) {
        let factor = factor.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            *cell *= factor;
        }
    }

    // Add to one cell, saturating at 1
    pub fn deposit(&mut self, col: usize, row: usize, amount: f32) {
        if let Some(i) = self.index(col, row) {
            let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
            self.cells[i] = (self.cells[i] + amount).min(1.0);
        }
    }

    pub fn deposit_at(&mut self, layout: &FieldLayout, pos: Vec2, amount: f32) {
        if let Some((col, row)) = layout.cell_of(pos) {
            self.deposit(col, row, amount);
        }
    }

    // Density under a field position, wrapping it onto the torus first
    pub fn sample(&self, layout: &FieldLayout, pos: Vec2) -> f32 {
        layout
            .cell_of(layout.wrap(pos))
            .map_or(0.0, |(col, row)| self.get(col, row))
    }

    pub fn values(&self) -> &[f32] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> &[f32] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.cols.max(1))
    }

    pub fn max(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    pub fn total(&self) -> f32 {
        self.cells.iter().sum()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn deposit_saturates_at_one() {
        let mut field = DensityField::new(3, 2);
        field.deposit(1, 1, 0.7);
        field.deposit(1, 1, 0.7);
        assert_eq!(field.get(1, 1), 1.0);
        field.deposit(1, 1, -5.0);
        assert_eq!(field.get(1, 1), 1.0);
    }

    #[test]
    fn decay_never_goes_negative() {
        let mut field = DensityField::new(2, 2);
        field.deposit(0, 0, 0.5);
        for _ in 0..2000 {
            field.decay(0.92);
        }
        assert!(field.get(0, 0) >= 0.0);
        assert!(field.get(0, 0) < 1e-6);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut field = DensityField::new(2, 2);
        field.deposit(5, 0, 1.0);
        assert_eq!(field.total(), 0.0);
        assert_eq!(field.get(5, 0), 0.0);
        assert!(field.row(7).is_empty());
    }

    #[test]
    fn sample_wraps() {
        let layout = FieldLayout::new(100.0, 100.0, 10, 10);
        let mut field = DensityField::for_layout(&layout);
        field.deposit_at(&layout, vec2(5.0, 95.0), 0.5);
        assert_eq!(field.sample(&layout, vec2(105.0, -5.0)), 0.5);
    }

    #[test]
    fn rows_are_row_major() {
        let mut field = DensityField::new(3, 2);
        field.deposit(2, 1, 0.4);
        let rows: Vec<&[f32]> = field.iter_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], 0.4);
        assert_eq!(field.row(1)[2], 0.4);
    }

    #[test]
    fn empty_field_iterates_nothing() {
        let field = DensityField::for_layout(&FieldLayout::new(0.0, 0.0, 0, 0));
        assert!(field.is_empty());
        assert_eq!(field.iter_rows().count(), 0);
        assert_eq!(field.max(), 0.0);
    }
}
