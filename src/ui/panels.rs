use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::SiteSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the closures.
    let sites = dataset.sites.clone();
    let payload_min = dataset.payload_min;
    let payload_max = dataset.payload_max;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Site dropdown ----
            ui.strong("Launch site");
            let current_label = match &state.selection.site {
                SiteSelection::All => "All sites".to_string(),
                SiteSelection::Site(s) => s.clone(),
            };
            egui::ComboBox::from_id_salt("site_select")
                .selected_text(&current_label)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(state.selection.site == SiteSelection::All, "All sites")
                        .clicked()
                    {
                        state.set_site(SiteSelection::All);
                    }
                    for site in &sites {
                        let is_selected =
                            matches!(&state.selection.site, SiteSelection::Site(s) if s == site);
                        if ui.selectable_label(is_selected, site).clicked() {
                            state.set_site(SiteSelection::Site(site.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Payload range ----
            ui.strong("Payload range (kg)");
            ui.checkbox(&mut state.payload_filter_on, "Filter by payload");
            ui.add_enabled_ui(state.payload_filter_on, |ui: &mut Ui| {
                ui.add(
                    egui::Slider::new(&mut state.payload_slider.0, payload_min..=payload_max)
                        .text("min"),
                );
                ui.add(
                    egui::Slider::new(&mut state.payload_slider.1, payload_min..=payload_max)
                        .text("max"),
                );
            });
            ui.separator();

            // ---- Booster category legend ----
            ui.strong("Booster categories");
            if let Some(cm) = &state.color_map {
                for (label, color) in cm.legend_entries() {
                    ui.label(RichText::new(label).color(color));
                }
            }
        });

    // Push slider / checkbox changes into the selection.
    state.apply_payload_filter();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} launches from {} sites, {} in view",
                ds.len(),
                ds.sites.len(),
                state.scatter.points.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} launches from sites {:?}",
                    dataset.len(),
                    dataset.sites
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
