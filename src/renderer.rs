/*
 * Renderer Module
 *
 * Turns the density field into ASCII art. Each cell above a small threshold
 * gets a glyph and a colour picked by its value; the colour drifts from a
 * neutral grey ramp toward a warm ramp while the pointer is active.
 *
 * The glyph and colour helpers are plain functions so any front end can use
 * them. The nannou `view` is only built with the `viewer` feature.
 */

use crate::flock::RenderState;

// Cells at or below this stay blank
pub const DRAW_THRESHOLD: f32 = 0.03;

pub const GLYPHS: [char; 11] = [' ', '.', '·', ':', '∘', '∙', '°', '˚', '*', '✦', '~'];

const NEUTRAL: [[u8; 3]; 5] = [
    [0xbb, 0xbb, 0xbb],
    [0x99, 0x99, 0x99],
    [0x77, 0x77, 0x77],
    [0x55, 0x55, 0x55],
    [0x44, 0x44, 0x44],
];

const WARM: [[u8; 3]; 5] = [
    [0xbb, 0xbb, 0xbb],
    [0xaa, 0x99, 0x99],
    [0x99, 0x77, 0x55],
    [0xaa, 0x88, 0x44],
    [0xcc, 0xa0, 0x30],
];

#[inline]
fn bucket(value: f32, len: usize) -> usize {
    ((value * len as f32).floor().max(0.0) as usize).min(len - 1)
}

pub fn glyph_for(value: f32) -> Option<char> {
    if !(value > DRAW_THRESHOLD) {
        return None;
    }
    Some(GLYPHS[bucket(value, GLYPHS.len())])
}

// Blend the neutral and warm ramps at `activity` (0 = neutral, 1 = warm)
pub fn cell_color(value: f32, activity: f32) -> [u8; 3] {
    let i = bucket(value, NEUTRAL.len());
    let t = activity.clamp(0.0, 1.0);
    let mut rgb = [0u8; 3];
    for (c, out) in rgb.iter_mut().enumerate() {
        let n = NEUTRAL[i][c] as f32;
        let w = WARM[i][c] as f32;
        *out = (n + (w - n) * t).round() as u8;
    }
    rgb
}

pub fn cell_alpha(value: f32) -> f32 {
    (value * 1.5 + 0.3).min(0.9)
}

// One glyph to draw: cell centre in field coordinates (top-left origin)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub x: f32,
    pub y: f32,
    pub ch: char,
    pub rgb: [u8; 3],
    pub alpha: f32,
}

// Everything the current frame should draw, row by row
pub fn glyphs(state: &RenderState) -> Vec<Glyph> {
    let layout = state.layout;
    let mut out = Vec::new();
    for (row, values) in state.density.iter_rows().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let Some(ch) = glyph_for(value) else {
                continue;
            };
            out.push(Glyph {
                x: (col as f32 + 0.5) * layout.cell_width,
                y: (row as f32 + 0.5) * layout.cell_height,
                ch,
                rgb: cell_color(value, state.activity),
                alpha: cell_alpha(value),
            });
        }
    }
    out
}

#[cfg(feature = "viewer")]
pub use view::view;

#[cfg(feature = "viewer")]
mod view {
    use nannou::prelude::*;

    use super::glyphs;
    use crate::app::{field_to_window, Model};
    use crate::ui;

    const FONT_SIZE: u32 = 11;

    pub fn view(app: &App, model: &Model, frame: Frame) {
        let draw = app.draw();
        draw.background().color(rgb(0.08, 0.08, 0.08));

        let window_rect = app.window_rect();
        let state = model.flock.render_state();
        let cell = vec2(state.layout.cell_width, state.layout.cell_height) * 2.0;

        for glyph in glyphs(&state) {
            let [r, g, b] = glyph.rgb;
            draw.text(&glyph.ch.to_string())
                .xy(field_to_window(crate::vec2(glyph.x, glyph.y), window_rect))
                .wh(cell)
                .font_size(FONT_SIZE)
                .color(rgba8(r, g, b, (glyph.alpha * 255.0) as u8));
        }

        // Crumbs fade with their strength
        for crumb in state.crumbs {
            draw.text("✦")
                .xy(field_to_window(crumb.position, window_rect))
                .wh(cell)
                .font_size(FONT_SIZE)
                .color(rgba(0.8, 0.63, 0.19, crumb.strength.clamp(0.2, 1.0)));
        }

        // The pointer is the predator when agents flee it
        if model.flock.config().flee {
            if let Some(pointer) = state.pointer {
                draw.text("◉")
                    .xy(field_to_window(pointer, window_rect))
                    .wh(cell)
                    .font_size(FONT_SIZE + 3)
                    .color(rgba(0.8, 0.8, 0.8, 0.9));
            }
        }

        if model.controls.show_debug {
            ui::draw_debug_info(&draw, &model.debug_info, window_rect);
        }

        if let Err(err) = draw.to_frame(app, &frame) {
            tracing::warn!(%err, "failed to draw frame");
        }
        if let Err(err) = model.egui.draw_to_frame(&frame) {
            tracing::warn!(%err, "failed to draw controls");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::DensityField;
    use crate::layout::FieldLayout;
    use glam::vec2;

    #[test]
    fn faint_cells_stay_blank() {
        assert_eq!(glyph_for(0.0), None);
        assert_eq!(glyph_for(DRAW_THRESHOLD), None);
        assert_eq!(glyph_for(f32::NAN), None);
        assert_eq!(glyph_for(0.05), Some(' '));
    }

    #[test]
    fn glyph_ramp_tops_out() {
        assert_eq!(glyph_for(0.5), Some('∙'));
        assert_eq!(glyph_for(1.0), Some('~'));
    }

    #[test]
    fn activity_blends_toward_warm() {
        assert_eq!(cell_color(0.9, 0.0), [0x44, 0x44, 0x44]);
        assert_eq!(cell_color(0.9, 1.0), [0xcc, 0xa0, 0x30]);
        assert_eq!(cell_color(0.9, 0.5), [0x88, 0x72, 0x3a]);
        // First bucket is the same in both ramps
        assert_eq!(cell_color(0.1, 0.7), [0xbb, 0xbb, 0xbb]);
    }

    #[test]
    fn alpha_is_capped() {
        assert!((cell_alpha(0.1) - 0.45).abs() < 1e-6);
        assert_eq!(cell_alpha(1.0), 0.9);
    }

    #[test]
    fn glyphs_sit_at_cell_centres() {
        let layout = FieldLayout::new(40.0, 20.0, 4, 2);
        let mut density = DensityField::for_layout(&layout);
        density.deposit(3, 1, 0.5);
        let state = RenderState {
            tick: 1,
            layout: &layout,
            density: &density,
            agents: &[],
            crumbs: &[],
            pointer: None,
            activity: 0.0,
        };
        let drawn = glyphs(&state);
        assert_eq!(drawn.len(), 1);
        assert_eq!(vec2(drawn[0].x, drawn[0].y), vec2(35.0, 15.0));
        assert_eq!(drawn[0].ch, '∙');
    }
}
