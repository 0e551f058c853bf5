use std::collections::BTreeMap;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::generate_palette;
use crate::data::views::{BarSpec, PieSpec};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel): 2×2 chart grid
// ---------------------------------------------------------------------------

/// Render the four charts in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a launch-records file to view charts  (File → Open…)");
        });
        return;
    }

    let chart_height = (ui.available_height() / 2.0 - 28.0).max(160.0);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Successful launches");
        success_pie(&mut cols[0], state, chart_height);
        cols[1].strong("Success by site");
        site_bar(&mut cols[1], state, chart_height);
    });
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Payload vs. outcome");
        payload_scatter(&mut cols[0], state, chart_height);
        cols[1].strong("Success rate by booster version");
        bar_chart(&mut cols[1], "booster_bar", &state.booster_bar, chart_height);
    });
}

// ---------------------------------------------------------------------------
// Pie chart – polygon sectors on a unit circle
// ---------------------------------------------------------------------------

fn success_pie(ui: &mut Ui, state: &AppState, height: f32) {
    pie_chart(ui, "success_pie", &state.site_pie, height);
}

fn pie_chart(ui: &mut Ui, id: &str, spec: &PieSpec, height: f32) {
    let total = spec.total();
    let palette = generate_palette(spec.slices.len());

    Plot::new(id)
        .height(height)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .legend(Legend::default())
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            let mut start = 0.0_f64;
            for (slice, color) in spec.slices.iter().zip(palette) {
                let frac = slice.value / total;
                let end = start + frac * std::f64::consts::TAU;
                if slice.value <= 0.0 {
                    start = end;
                    continue;
                }

                // Sector outline: centre, then points along the arc.
                let steps = ((64.0 * frac).ceil() as usize).max(2);
                let mut pts = Vec::with_capacity(steps + 2);
                pts.push([0.0, 0.0]);
                for k in 0..=steps {
                    let angle = start + (end - start) * k as f64 / steps as f64;
                    pts.push([angle.cos(), angle.sin()]);
                }

                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(pts))
                        .name(format!("{} ({})", slice.label, slice.value))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts – one bar per category, label drawn under the axis
// ---------------------------------------------------------------------------

fn site_bar(ui: &mut Ui, state: &AppState, height: f32) {
    bar_chart(ui, "site_bar", &state.site_bar, height);
}

fn bar_chart(ui: &mut Ui, id: &str, spec: &BarSpec, height: f32) {
    let max = spec.bars.iter().map(|b| b.measure).fold(0.0_f64, f64::max);
    let label_y = -0.06 * max.max(f64::EPSILON);

    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.measure)
                .name(&b.category)
                .fill(Color32::LIGHT_BLUE)
                .width(0.6)
        })
        .collect();

    let mut plot = Plot::new(id)
        .height(height)
        .show_x(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false);
    if !spec.bars.is_empty() {
        plot = plot
            .include_x(-0.6)
            .include_x(spec.bars.len() as f64 - 0.4)
            .include_y(label_y * 2.0)
            .include_y(max * 1.1);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars));
        for (i, b) in spec.bars.iter().enumerate() {
            plot_ui.text(Text::new(
                PlotPoint::new(i as f64, label_y),
                b.category.as_str(),
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Payload scatter – one point series per booster category
// ---------------------------------------------------------------------------

fn payload_scatter(ui: &mut Ui, state: &AppState, height: f32) {
    // Group points by booster category so each gets one legend entry.
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for point in &state.scatter.points {
        series
            .entry(point.booster_category.as_str())
            .or_default()
            .push([point.payload_mass_kg, point.outcome.as_f64()]);
    }

    Plot::new("payload_scatter")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch outcome")
        .include_y(-0.2)
        .include_y(1.2)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, pts) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(category))
                    .unwrap_or(Color32::LIGHT_BLUE);

                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .name(category)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
