//! Page builders: compose filters and aggregates into what each page draws.
//!
//! Every pane comes back as a [`PaneResult`]. An `Err` carries the notice to
//! show instead of that pane; sibling panes are unaffected.

use std::fmt;

use crate::data::aggregate::{
    bar_frames, count_distinct, order_by_total, scatter_frames, volume_hierarchy, BarChartData,
    IcicleNode, ScatterChartData,
};
use crate::data::filter::{filter_eq, non_empty};
use crate::data::model::{
    BrandShareColumn, BrandShareRecord, GroupedCount, GroupedCountColumn, NewPriceColumn,
    NewPriceRecord, Table, UsedListingColumn,
};
use crate::data::{DataContext, EmptySelection};

pub type PaneResult<T> = Result<T, EmptySelection>;

const DATA: &str = "data";
const NEW_CAR_DATA: &str = "new car data";

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    MarketOverview,
    SegmentAnalysis,
    PriceAnalysis,
}

impl Page {
    pub const ALL: [Page; 3] = [
        Page::MarketOverview,
        Page::SegmentAnalysis,
        Page::PriceAnalysis,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::MarketOverview => "Market Overview",
            Page::SegmentAnalysis => "Segment Analysis",
            Page::PriceAnalysis => "Price Analysis",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn logged<T>(pane: PaneResult<T>) -> PaneResult<T> {
    if let Err(notice) = &pane {
        log::warn!("{notice}");
    }
    pane
}

// ---------------------------------------------------------------------------
// Market overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview {
    pub brand_count: usize,
    /// Vol per brand, one frame per year.
    pub share_chart: PaneResult<BarChartData>,
}

pub fn market_overview(ctx: &DataContext) -> MarketOverview {
    let table = ctx.brand_share();
    let share_chart = non_empty(table, DATA, Some("brand market share"))
        .map(|t| bar_frames(t, BrandShareColumn::Brand, BrandShareColumn::Brand));

    MarketOverview {
        brand_count: count_distinct(table, BrandShareColumn::Brand),
        share_chart: logged(share_chart),
    }
}

/// Segment → Brand → Model volumes for one year.
pub fn year_distribution(ctx: &DataContext, year: i32) -> PaneResult<IcicleNode> {
    log::debug!("building distribution for {year}");
    let rows = filter_eq(ctx.brand_share(), BrandShareColumn::Year, year);
    logged(
        rows.or_no_match(DATA, BrandShareColumn::Year, year)
            .map(|t| volume_hierarchy(&t)),
    )
}

// ---------------------------------------------------------------------------
// Segment analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAnalysis {
    pub segment: String,
    pub brand_chart: BarChartData,
    /// Vol per model, grouped by brand.
    pub model_chart: BarChartData,
    pub summary: Table<BrandShareRecord>,
}

pub fn segment_analysis(ctx: &DataContext, segment: &str) -> PaneResult<SegmentAnalysis> {
    log::debug!("building segment analysis for {segment}");
    let rows = filter_eq(ctx.brand_share(), BrandShareColumn::Segment, segment);
    logged(
        rows.or_no_match(DATA, BrandShareColumn::Segment, segment)
            .map(|summary| SegmentAnalysis {
                segment: segment.to_string(),
                brand_chart: bar_frames(&summary, BrandShareColumn::Brand, BrandShareColumn::Brand),
                model_chart: bar_frames(&summary, BrandShareColumn::Model, BrandShareColumn::Brand),
                summary,
            }),
    )
}

// ---------------------------------------------------------------------------
// Price analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DensityView {
    pub counts: Table<GroupedCount>,
    /// x axis: cities by listing count, largest first.
    pub city_order: Vec<String>,
    /// y axis: models in key order.
    pub model_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsedPrices {
    pub scatter: ScatterChartData,
    pub density: PaneResult<DensityView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceAnalysis {
    pub brand: String,
    pub used: PaneResult<UsedPrices>,
    pub new_prices: PaneResult<Table<NewPriceRecord>>,
}

pub fn price_analysis(ctx: &DataContext, brand: &str) -> PriceAnalysis {
    log::debug!("building price analysis for {brand}");
    let used = filter_eq(ctx.used_listings(), UsedListingColumn::Brand, brand)
        .or_no_match(DATA, UsedListingColumn::Brand, brand)
        .map(|listings| UsedPrices {
            scatter: scatter_frames(&listings),
            density: logged(density_view(ctx, brand)),
        });

    let new_prices = non_empty(ctx.new_prices(), NEW_CAR_DATA, None).and_then(|table| {
        filter_eq(table, NewPriceColumn::Brand, brand).or_no_match(
            NEW_CAR_DATA,
            NewPriceColumn::Brand,
            brand,
        )
    });

    PriceAnalysis {
        brand: brand.to_string(),
        used: logged(used),
        new_prices: logged(new_prices),
    }
}

fn density_view(ctx: &DataContext, brand: &str) -> PaneResult<DensityView> {
    let counts = filter_eq(ctx.grouped_used(), GroupedCountColumn::Brand, brand).or_no_match(
        DATA,
        GroupedCountColumn::Brand,
        brand,
    )?;

    let mut model_order: Vec<String> = Vec::new();
    for g in &counts {
        if !model_order.contains(&g.model) {
            model_order.push(g.model.clone());
        }
    }

    Ok(DensityView {
        city_order: order_by_total(&counts, GroupedCountColumn::City),
        model_order,
        counts,
    })
}
