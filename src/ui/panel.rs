// src/ui/panel.rs
//! Configuration panel
//!
//! The outer control surface: quality slider, antialiasing toggle,
//! per-category color pickers and the screenshot button. The panel never
//! mutates the scene directly — it emits [`ConfigEvent`]s that the app
//! applies after the frame, which keeps rebuild and recolor ordering in one
//! place.

use crate::config::{CategoryColors, ConfigEvent, MaterialCategory, Rgb, RoomConfig};
use crate::config::{QUALITY_MAX, QUALITY_MIN};

pub struct ControlPanel {
    quality_draft: i32,
    status_line: Option<String>,
}

impl ControlPanel {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            quality_draft: config.quality as i32,
            status_line: None,
        }
    }

    /// Re-syncs the slider draft after the app clamps or applies a value
    pub fn sync_quality(&mut self, quality: u32) {
        self.quality_draft = quality as i32;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_line = Some(status.into());
    }

    /// Draws the panel, pushing requested changes into `events`
    pub fn draw(
        &mut self,
        ui: &imgui::Ui,
        config: &RoomConfig,
        colors: &CategoryColors,
        events: &mut Vec<ConfigEvent>,
    ) {
        ui.window("Kitchen Configurator")
            .size([300.0, 380.0], imgui::Condition::FirstUseEver)
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .build(|| {
                ui.text("Scene");
                ui.slider("Quality", QUALITY_MIN as i32, QUALITY_MAX as i32, &mut self.quality_draft);
                // Rebuilds are expensive; only commit once the drag ends
                if ui.is_item_deactivated_after_edit()
                    && self.quality_draft as u32 != config.quality
                {
                    events.push(ConfigEvent::SetQuality(self.quality_draft as u32));
                }

                let mut antialias = config.antialias;
                if ui.checkbox("Antialiasing (4x MSAA)", &mut antialias) {
                    events.push(ConfigEvent::SetAntialias(antialias));
                }

                ui.separator();
                ui.text("Colors");
                for category in MaterialCategory::ALL {
                    let mut value = colors.get(category).to_array();
                    if ui.color_edit3(category.label(), &mut value) {
                        events.push(ConfigEvent::SetColor(category, Rgb::from_array(value)));
                    }
                }

                ui.separator();
                if ui.button("Save screenshot") {
                    events.push(ConfigEvent::CaptureScreenshot);
                }
                if let Some(status) = &self.status_line {
                    ui.text_wrapped(status);
                }
            });
    }
}
