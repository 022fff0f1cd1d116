use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot;
use crate::data::filter::Scenario;
use crate::state::AppState;
use crate::view::{Kpi, Panel, PanelContent, RenderedView, SegmentGrid, ViewKey};

const ERROR_COLOR: Color32 = Color32::from_rgb(200, 60, 60);

// ---------------------------------------------------------------------------
// Central panel – the selected view
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if let Some(msg) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(
                RichText::new(format!("⚠ Critical Error: data files could not be loaded.\n\n{msg}"))
                    .color(ERROR_COLOR)
                    .size(16.0),
            );
        });
        return;
    }

    // Clone so the selection widgets below can mutate state.
    let Some(view) = state.rendered.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Loading…");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(&view.title).size(22.0));
            ui.add_space(6.0);

            if view.key == ViewKey::RevenueForecasting {
                scenario_picker(ui, state);
            }

            show_view(ui, state, &view);

            for note in &view.notes {
                ui.add_space(4.0);
                ui.label(RichText::new(format!("ℹ {note}")).italics());
            }
        });
}

/// Lay panels out: KPI rows and tables full width, charts two per row.
fn show_view(ui: &mut Ui, state: &mut AppState, view: &RenderedView) {
    let mut pending: Vec<&Panel> = Vec::new();
    for panel in &view.panels {
        match &panel.content {
            PanelContent::Chart(_) => {
                pending.push(panel);
                if pending.len() == 2 {
                    chart_row(ui, &pending);
                    pending.clear();
                }
            }
            _ => {
                chart_row(ui, &pending);
                pending.clear();
                if view.key == ViewKey::RoiAnalysis && panel.heading == "Segment Deep Dive" {
                    ui.separator();
                    segment_picker(ui, state);
                }
                show_panel(ui, panel);
            }
        }
    }
    chart_row(ui, &pending);
}

fn chart_row(ui: &mut Ui, panels: &[&Panel]) {
    match panels {
        [] => {}
        [single] => show_panel(ui, single),
        _ => {
            ui.columns(panels.len(), |cols: &mut [Ui]| {
                for (col, panel) in cols.iter_mut().zip(panels) {
                    show_panel(col, panel);
                }
            });
        }
    }
}

fn show_panel(ui: &mut Ui, panel: &Panel) {
    ui.add_space(8.0);
    ui.strong(&panel.heading);
    match &panel.content {
        PanelContent::Kpis(kpis) => kpi_tiles(ui, kpis),
        PanelContent::Chart(spec) => plot::chart(ui, &panel.heading, spec),
        PanelContent::Table(grid) => segment_table(ui, grid),
        PanelContent::Error(msg) => {
            ui.group(|ui: &mut Ui| {
                ui.label(RichText::new(format!("⚠ {msg}")).color(ERROR_COLOR));
            });
        }
    }
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

fn kpi_tiles(ui: &mut Ui, kpis: &[Kpi]) {
    if kpis.is_empty() {
        return;
    }
    ui.columns(kpis.len(), |cols: &mut [Ui]| {
        for (col, kpi) in cols.iter_mut().zip(kpis) {
            col.group(|ui: &mut Ui| {
                ui.label(RichText::new(&kpi.label).color(Color32::GRAY));
                match &kpi.value {
                    Ok(v) => ui.label(RichText::new(v).size(26.0).strong()),
                    Err(e) => ui
                        .label(RichText::new("n/a").size(26.0).color(ERROR_COLOR))
                        .on_hover_text(e),
                };
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Segment table with Avg_Monetary gradient
// ---------------------------------------------------------------------------

fn segment_table(ui: &mut Ui, grid: &SegmentGrid) {
    let monetary_col = grid.headers.len().saturating_sub(1);
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(90.0), grid.headers.len())
        .header(22.0, |mut header| {
            for h in &grid.headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|mut body| {
            for (row_idx, row) in grid.rows.iter().enumerate() {
                body.row(20.0, |mut table_row| {
                    for (col_idx, cell) in row.iter().enumerate() {
                        table_row.col(|ui: &mut Ui| {
                            if col_idx == monetary_col {
                                if let Some(&bg) = grid.monetary_colors.get(row_idx) {
                                    ui.painter().rect_filled(ui.max_rect(), 0.0, Color32::from(bg));
                                    let dark = (bg.r as u32 + bg.g as u32 + bg.b as u32) < 384;
                                    let text = if dark { Color32::WHITE } else { Color32::BLACK };
                                    ui.label(RichText::new(cell).color(text));
                                    return;
                                }
                            }
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Selection widgets
// ---------------------------------------------------------------------------

fn scenario_picker(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select Scenarios to Compare:");
        for sc in Scenario::ALL {
            let mut checked = state.is_scenario_selected(sc);
            if ui.checkbox(&mut checked, sc.column()).changed() {
                state.toggle_scenario(sc);
            }
        }
    });
}

fn segment_picker(ui: &mut Ui, state: &mut AppState) {
    let options = state.segment_options();
    let current = state.current_segment().unwrap_or_default();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select Segment for Detailed Metrics:");
        egui::ComboBox::from_id_salt("segment_picker")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for seg in &options {
                    if ui.selectable_label(*seg == current, seg).clicked() {
                        state.select_segment(seg.clone());
                    }
                }
            });
    });
}
