/*
 * UI Module
 *
 * egui controls for the viewer: preset switch, live flocking parameters and
 * the debug overlay. Parameter edits go straight into the flock's config;
 * changes that need a fresh population are reported back to the app.
 */

use nannou_egui::{egui, Egui};

use crate::app::Controls;
use crate::debug::DebugInfo;
use crate::params::{FlockConfig, Preset};

// What the app has to do after this frame's UI pass
#[derive(Clone, Copy, Debug, Default)]
pub struct UiResponse {
    pub reset: bool,
    pub preset: Option<Preset>,
    pub cols_changed: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    config: &mut FlockConfig,
    controls: &mut Controls,
    debug_info: &DebugInfo,
) -> UiResponse {
    let mut response = UiResponse::default();
    let agent_count = config.agent_count;
    let cols = controls.cols;
    let mut preset = controls.preset;

    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            egui::ComboBox::from_label("Preset")
                .selected_text(preset.name())
                .show_ui(ui, |ui| {
                    for choice in Preset::ALL {
                        ui.selectable_value(&mut preset, choice, choice.name());
                    }
                });

            ui.collapsing("Population", |ui| {
                ui.add(
                    egui::Slider::new(&mut config.agent_count, FlockConfig::agent_count_range())
                        .text("Agents"),
                );
                ui.add(egui::Slider::new(&mut controls.cols, 10..=200).text("Columns"));
                if ui.button("Reset Flock").clicked() {
                    response.reset = true;
                }
            });

            ui.collapsing("Flocking", |ui| {
                let radius = FlockConfig::radius_range();
                let gain = FlockConfig::gain_range();
                ui.add(egui::Slider::new(&mut config.separation_radius, radius.clone()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut config.alignment_radius, radius.clone()).text("Alignment Radius"));
                ui.add(egui::Slider::new(&mut config.cohesion_radius, radius).text("Cohesion Radius"));
                ui.add(egui::Slider::new(&mut config.separation_gain, gain.clone()).text("Separation Gain"));
                ui.add(egui::Slider::new(&mut config.alignment_gain, gain.clone()).text("Alignment Gain"));
                ui.add(egui::Slider::new(&mut config.cohesion_gain, gain).text("Cohesion Gain"));
            });

            ui.collapsing("Speed", |ui| {
                let speed = FlockConfig::speed_range();
                ui.add(egui::Slider::new(&mut config.cruise_speed, speed.clone()).text("Cruise"));
                ui.add(egui::Slider::new(&mut config.boost_speed, speed).text("Boost"));
            });

            ui.collapsing("Behaviour", |ui| {
                ui.checkbox(&mut config.flee, "Flee Pointer");
                ui.checkbox(&mut config.crumbs, "Follow Crumbs");
                ui.checkbox(&mut config.foraging, "Foraging");
                ui.checkbox(&mut config.boredom, "Boredom");
                ui.checkbox(&mut config.resting, "Resting");
                ui.add(
                    egui::Slider::new(&mut config.density_decay, FlockConfig::decay_range())
                        .text("Trail Decay"),
                );
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut config.parallel, "Parallel Steering");
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!(
                    "Frame time: {:.2} ms",
                    debug_info.frame_time.as_secs_f64() * 1000.0
                ));
                ui.label(debug_info.stats.to_string());
            });

            ui.checkbox(&mut controls.show_debug, "Show Debug Info");
            ui.checkbox(&mut controls.paused, "Pause Simulation");
        });

    // Sliders move independently; keep the caps ordered
    if config.boost_speed < config.cruise_speed {
        config.boost_speed = config.cruise_speed;
    }
    if config.agent_count != agent_count {
        response.reset = true;
    }
    if preset != controls.preset {
        controls.preset = preset;
        response.preset = Some(preset);
    }
    response.cols_changed = controls.cols != cols;
    response
}

// Overlay panel in the top-right corner
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let margin = 20.0;
    let line_height = 20.0;
    let lines = debug_info.lines();
    let panel_width = 280.0;
    let panel_height = line_height * lines.len() as f32 + margin;

    draw.rect()
        .x_y(
            window_rect.right() - panel_width / 2.0,
            window_rect.top() - panel_height / 2.0,
        )
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;
    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .left_justify()
            .x_y(text_x + (panel_width - margin) / 2.0, text_y - i as f32 * line_height)
            .w(panel_width - margin)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
