use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Rect, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use auto_market_dashboard::dashboard::DensityView;
use auto_market_dashboard::data::aggregate::{BarChartData, IcicleNode, ScatterChartData};
use auto_market_dashboard::data::model::{Record, Table};
use auto_market_dashboard::data::EmptySelection;

use crate::color::{shade, text_color_on, ColorMap};
use crate::state::FrameSelector;

const PLOT_HEIGHT: f32 = 360.0;
const ICICLE_LEVEL_HEIGHT: f32 = 56.0;
const MAX_DENSITY_RADIUS: f32 = 18.0;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// Scoped warning shown in place of a pane with no data.
pub fn warning(ui: &mut Ui, notice: &EmptySelection) {
    ui.label(RichText::new(format!("⚠ {notice}")).color(Color32::from_rgb(0xA8, 0x5F, 0x02)));
}

pub fn subheader(ui: &mut Ui, text: impl Into<String>) {
    ui.add_space(8.0);
    ui.label(RichText::new(text).size(18.0).strong());
}

// ---------------------------------------------------------------------------
// Year frames
// ---------------------------------------------------------------------------

/// Year buttons plus a play toggle for charts with one frame per year.
pub fn frame_selector(ui: &mut Ui, frames: &mut FrameSelector, years: &[i32]) {
    let now = ui.input(|i| i.time);
    frames.tick(now, years);

    ui.horizontal(|ui: &mut Ui| {
        let label = if frames.playing { "⏸" } else { "▶" };
        if ui.button(label).clicked() {
            if frames.playing {
                frames.playing = false;
            } else {
                if frames.year == years.last().copied() {
                    frames.year = years.first().copied();
                }
                frames.play(now);
            }
        }
        ui.label("Year:");
        for &year in years {
            if ui
                .selectable_label(frames.year == Some(year), year.to_string())
                .clicked()
            {
                frames.year = Some(year);
                frames.playing = false;
            }
        }
    });

    if frames.playing {
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
    }
}

// ---------------------------------------------------------------------------
// Categorical axes
// ---------------------------------------------------------------------------

/// Label integer grid marks with category names, blank everything else.
fn category_formatter(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < -0.01 || (v - v.round()).abs() > 0.01 {
            return String::new();
        }
        names.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One frame of a bar chart; bars of different groups at the same category
/// are stacked.
pub fn bar_chart(
    ui: &mut Ui,
    id: &str,
    chart: &BarChartData,
    year: Option<i32>,
    colors: &ColorMap,
    x_label: &str,
) {
    let Some(frame) = year.and_then(|y| chart.frame(y)) else {
        ui.label("Pick a year to show this chart.");
        return;
    };

    let stacked = frame.stacked();
    let mut groups: Vec<&str> = Vec::new();
    for (_, bar) in &stacked {
        if !groups.contains(&bar.group.as_str()) {
            groups.push(&bar.group);
        }
    }

    // Bars stack only within their own category.
    let charts: Vec<BarChart> = groups
        .into_iter()
        .map(|group| {
            let color = colors.color_for(group);
            let bars: Vec<Bar> = stacked
                .iter()
                .filter(|(_, b)| b.group == group)
                .filter_map(|(base, b)| {
                    let x = chart.category_index(&b.category)?;
                    Some(
                        Bar::new(x as f64, b.value)
                            .base_offset(*base)
                            .width(0.7)
                            .name(format!("{} ({})", b.category, b.value))
                            .fill(color),
                    )
                })
                .collect();
            BarChart::new(bars).name(group).color(color)
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Vol")
        .x_axis_formatter(category_formatter(chart.category_order.clone()))
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in charts {
                plot_ui.bar_chart(series);
            }
        });
}

// ---------------------------------------------------------------------------
// Icicle
// ---------------------------------------------------------------------------

/// Nested rectangles, one row per level, widths proportional to value.
pub fn icicle(ui: &mut Ui, root: &IcicleNode, colors: &ColorMap) {
    let size = egui::vec2(
        ui.available_width(),
        ICICLE_LEVEL_HEIGHT * root.depth() as f32,
    );
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let mut hovered = None;
    let mut stack = vec![(root, rect.left(), rect.width(), 0usize, Color32::LIGHT_GRAY)];
    while let Some((node, left, width, level, fill)) = stack.pop() {
        let top = rect.top() + level as f32 * ICICLE_LEVEL_HEIGHT;
        let cell = Rect::from_min_size(
            egui::pos2(left, top),
            egui::vec2(width, ICICLE_LEVEL_HEIGHT),
        )
        .shrink(1.0);
        painter.rect_filled(cell, 2.0, fill);

        if cell.width() > 48.0 {
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                format!("{}\n{}", node.label, node.value),
                FontId::proportional(12.0),
                text_color_on(fill),
            );
        }
        if response.hover_pos().is_some_and(|p| cell.contains(p)) {
            hovered = Some(format!("{}: {}", node.label, node.value));
        }

        if node.value <= 0.0 {
            continue;
        }
        let mut x = left;
        for child in &node.children {
            let child_width = width * (child.value / node.value) as f32;
            let child_fill = if level == 0 {
                colors.color_for(&child.label)
            } else {
                shade(fill, 0.25)
            };
            stack.push((child, x, child_width, level + 1, child_fill));
            x += child_width;
        }
    }

    if let Some(text) = hovered {
        response.on_hover_text(text);
    }
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

/// Price vs Milage for one year, coloured by model. Axes keep the range of
/// every year.
pub fn price_scatter(
    ui: &mut Ui,
    id: &str,
    chart: &ScatterChartData,
    year: Option<i32>,
    colors: &ColorMap,
) {
    let Some(frame) = year.and_then(|y| chart.frame(y)) else {
        ui.label("Pick a year to show this chart.");
        return;
    };

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Price")
        .y_axis_label("Milage")
        .allow_scroll(false);
    if let Some(r) = chart.price_range {
        plot = plot.include_x(r.min).include_x(r.max);
    }
    if let Some(r) = chart.milage_range {
        plot = plot.include_y(r.min).include_y(r.max);
    }

    plot.show(ui, |plot_ui| {
        let mut models: Vec<&str> = Vec::new();
        for p in &frame.points {
            if !models.contains(&p.model.as_str()) {
                models.push(&p.model);
            }
        }
        for model in models {
            let points: PlotPoints = frame
                .points
                .iter()
                .filter(|p| p.model == model)
                .map(|p| [p.price, p.milage])
                .collect();
            plot_ui.points(
                Points::new(points)
                    .name(model)
                    .color(colors.color_for(model))
                    .radius(4.0)
                    .filled(true),
            );
        }
    });
}

/// Listing counts on a City × Model grid; marker area follows the count.
pub fn density_scatter(ui: &mut Ui, id: &str, view: &DensityView, colors: &ColorMap) {
    let max_count = view.counts.iter().map(|g| g.count).max().unwrap_or(1).max(1) as f32;

    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("City")
        .y_axis_label("Model")
        .x_axis_formatter(category_formatter(view.city_order.clone()))
        .y_axis_formatter(category_formatter(view.model_order.clone()))
        .include_x(-0.5)
        .include_x(view.city_order.len() as f64 - 0.5)
        .include_y(-0.5)
        .include_y(view.model_order.len() as f64 - 0.5)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for g in &view.counts {
                let (Some(x), Some(y)) = (
                    view.city_order.iter().position(|c| *c == g.city),
                    view.model_order.iter().position(|m| *m == g.model),
                ) else {
                    continue;
                };
                let radius = MAX_DENSITY_RADIUS * (g.count as f32 / max_count).sqrt();
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[x as f64, y as f64]]))
                        .name(&g.model)
                        .color(colors.color_for(&g.model).gamma_multiply(0.8))
                        .radius(radius.max(2.0))
                        .filled(true),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

/// Rows shown verbatim, one column per header.
pub fn data_table<R: Record>(ui: &mut Ui, id: &str, table: &Table<R>) {
    let rows: Vec<Vec<String>> = table.iter().map(|r| r.cells()).collect();
    let columns = table.columns();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(320.0)
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(20.0, |mut header| {
                for name in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let cells = &rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
