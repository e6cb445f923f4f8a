use eframe::egui::{self, RichText, Ui};

use auto_market_dashboard::dashboard::Page;

use crate::state::AppState;
use crate::ui::charts::{self, subheader, warning};

const OVERVIEW_CAPTION: &str = "Sales volumes across segments, brands, models and years: \
hatchbacks, sedans, SUVs, luxury cars and MPVs. Use the year buttons to step through \
the market over time and the year picker below to drill into a single year.";

/// Render the selected page in the central panel.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::MarketOverview => market_overview(ui, state),
            Page::SegmentAnalysis => segment_analysis(ui, state),
            Page::PriceAnalysis => price_analysis(ui, state),
        });
}

/// A combo box over `choices`; returns the value picked this frame, if any.
fn choice_combo<T>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: Option<&T>,
    choices: &[T],
) -> Option<T>
where
    T: Clone + PartialEq + ToString,
{
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.map(|c| c.to_string()).unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in choices {
                    if ui
                        .selectable_label(current == Some(choice), choice.to_string())
                        .clicked()
                        && current != Some(choice)
                    {
                        picked = Some(choice.clone());
                    }
                }
            });
    });
    picked
}

// ---------------------------------------------------------------------------
// Page 1: Market overview
// ---------------------------------------------------------------------------

fn market_overview(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Automotive Market Overview");
    ui.label(RichText::new(OVERVIEW_CAPTION).weak());

    subheader(ui, "Brand Market Share Over The Years");
    match &state.overview.share_chart {
        Ok(chart) => {
            let years = chart.years();
            if let (Some(first), Some(last)) = (years.first(), years.last()) {
                ui.label(format!(
                    "Over {} brands in the traffic report data from {first} to {last}",
                    state.overview.brand_count
                ));
            }
            charts::frame_selector(ui, &mut state.overview_frame, &years);
            charts::bar_chart(
                ui,
                "brand_share",
                chart,
                state.overview_frame.year,
                &state.brand_colors,
                "Brand",
            );
        }
        Err(notice) => warning(ui, notice),
    }

    subheader(ui, "Passenger Car Distribution by Year");
    let picked = choice_combo(
        ui,
        "year_selection",
        "Select the desired year",
        state.selected_year.as_ref(),
        &state.year_choices,
    );
    if let Some(year) = picked {
        state.select_year(year);
    }

    match &state.distribution {
        Ok(root) => {
            if let Some(year) = state.selected_year {
                ui.label(format!("Passenger Car Distribution for the Selected Year {year}"));
            }
            charts::icicle(ui, root, &state.segment_colors);
        }
        Err(notice) => warning(ui, notice),
    }
}

// ---------------------------------------------------------------------------
// Page 2: Segment analysis
// ---------------------------------------------------------------------------

fn segment_analysis(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Segment Analysis");
    ui.label("Analyze the performance of brands and models within specific segments.");

    let picked = choice_combo(
        ui,
        "segment_selection",
        "Select the required segment",
        state.selected_segment.as_ref(),
        &state.segment_choices,
    );
    if let Some(segment) = picked {
        state.select_segment(segment);
    }

    let view = match &state.segment_view {
        Ok(view) => view,
        Err(notice) => {
            warning(ui, notice);
            return;
        }
    };

    subheader(ui, format!("Brand Analysis for {}", view.segment));
    let years = view.brand_chart.years();
    charts::frame_selector(ui, &mut state.segment_frame, &years);
    charts::bar_chart(
        ui,
        "segment_brands",
        &view.brand_chart,
        state.segment_frame.year,
        &state.brand_colors,
        "Brand",
    );

    subheader(ui, format!("Model Analysis for {}", view.segment));
    charts::bar_chart(
        ui,
        "segment_models",
        &view.model_chart,
        state.segment_frame.year,
        &state.brand_colors,
        "Model",
    );

    egui::CollapsingHeader::new("View Summary Statistics")
        .id_salt("segment_summary")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            charts::data_table(ui, "segment_summary_table", &view.summary);
        });
}

// ---------------------------------------------------------------------------
// Page 3: Price analysis
// ---------------------------------------------------------------------------

fn price_analysis(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Price Analysis");
    ui.label("Analyze the price and mileage distribution of used and new cars.");

    ui.add_space(8.0);
    ui.heading("Used Car Prices");
    ui.separator();

    let picked = choice_combo(
        ui,
        "brand_selection",
        "Select the required brand",
        state.selected_brand.as_ref(),
        &state.brand_choices,
    );
    if let Some(brand) = picked {
        state.select_brand(brand);
    }

    let Some(view) = &state.price_view else {
        ui.label("No brands to choose from.");
        return;
    };

    match &view.used {
        Ok(used) => {
            subheader(ui, format!("Mileage and Price Distribution for {}", view.brand));
            let years = used.scatter.years();
            charts::frame_selector(ui, &mut state.price_frame, &years);
            charts::price_scatter(
                ui,
                "price_scatter",
                &used.scatter,
                state.price_frame.year,
                &state.model_colors,
            );

            subheader(
                ui,
                format!("Car Density for {} Across Cities and Models", view.brand),
            );
            match &used.density {
                Ok(density) => {
                    charts::density_scatter(ui, "city_density", density, &state.model_colors)
                }
                Err(notice) => warning(ui, notice),
            }
        }
        Err(notice) => warning(ui, notice),
    }

    ui.add_space(8.0);
    ui.heading("New Car Prices");
    ui.separator();
    match &view.new_prices {
        Ok(table) => charts::data_table(ui, "new_prices_table", table),
        Err(notice) => warning(ui, notice),
    }
}
