use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::view::ViewKey;

// ---------------------------------------------------------------------------
// Header – logo, title and subtitle
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        match &state.logo {
            Some(path) => {
                let uri = format!("file://{}", path.display());
                ui.add(
                    egui::Image::new(uri)
                        .max_width(160.0)
                        .max_height(72.0)
                        .rounding(4.0),
                );
            }
            None => {
                ui.group(|ui: &mut Ui| {
                    ui.label(RichText::new("Logo Placeholder").weak());
                });
            }
        }
        ui.add_space(12.0);
        ui.vertical(|ui: &mut Ui| {
            ui.add_space(6.0);
            ui.heading(RichText::new("Decision Intelligence Dashboard").size(26.0).strong());
            ui.label(
                RichText::new("Revenue Growth & Risk Management")
                    .size(16.0)
                    .color(Color32::GRAY),
            );
        });
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Left side panel – navigation and data source
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    let mut selected = state.view;
    for key in ViewKey::ALL {
        ui.radio_value(&mut selected, key, key.label());
    }
    state.set_view(selected);

    ui.add_space(16.0);
    ui.separator();
    ui.strong("Data source");
    ui.label(RichText::new(state.cache.dir().display().to_string()).small());

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reload data").clicked() {
            state.reload();
        }
        if ui.button("Open data folder…").clicked() {
            open_folder_dialog(state);
        }
    });

    if let Some(data) = &state.datasets {
        ui.add_space(8.0);
        ui.label(format!(
            "{} forecast rows · {} ROI segments · {} clusters",
            data.forecast.len(),
            data.roi.len(),
            data.segments.len()
        ));
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open dashboard data folder")
        .set_directory(state.cache.dir())
        .pick_folder();

    if let Some(dir) = folder {
        state.open_dir(dir);
    }
}
