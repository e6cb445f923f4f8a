use auto_market_dashboard::dashboard::{
    self, MarketOverview, Page, PaneResult, PriceAnalysis, SegmentAnalysis,
};
use auto_market_dashboard::data::aggregate::IcicleNode;
use auto_market_dashboard::data::model::{BrandShareColumn, UsedListingColumn};
use auto_market_dashboard::data::{DataContext, EmptySelection};

use crate::color::ColorMap;

/// Seconds each frame stays on screen while playing.
const FRAME_SECONDS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Frame selection for per-year charts
// ---------------------------------------------------------------------------

/// Which year of a framed chart is shown, and whether it is auto-advancing.
#[derive(Debug, Clone, Default)]
pub struct FrameSelector {
    pub year: Option<i32>,
    pub playing: bool,
    last_step: f64,
}

impl FrameSelector {
    /// Point at `years[0]` unless the current year is still on offer.
    pub fn reset(&mut self, years: &[i32]) {
        if !self.year.is_some_and(|y| years.contains(&y)) {
            self.year = years.first().copied();
        }
        self.playing = false;
    }

    pub fn play(&mut self, now: f64) {
        self.playing = true;
        self.last_step = now;
    }

    /// Move to the next year once `FRAME_SECONDS` have passed. Stops on the
    /// last year.
    pub fn tick(&mut self, now: f64, years: &[i32]) {
        if !self.playing || now - self.last_step < FRAME_SECONDS {
            return;
        }
        self.last_step = now;
        let pos = self
            .year
            .and_then(|y| years.iter().position(|v| *v == y))
            .map_or(0, |p| p + 1);
        match years.get(pos) {
            Some(next) => self.year = Some(*next),
            None => self.playing = false,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub context: DataContext,
    pub page: Page,

    // -- selection domains, fixed after load --
    pub year_choices: Vec<i32>,
    pub segment_choices: Vec<String>,
    pub brand_choices: Vec<String>,

    // -- colours, assigned in order of first appearance --
    pub brand_colors: ColorMap,
    pub segment_colors: ColorMap,
    pub model_colors: ColorMap,

    // -- Market overview --
    pub overview: MarketOverview,
    pub overview_frame: FrameSelector,
    pub selected_year: Option<i32>,
    pub distribution: PaneResult<IcicleNode>,

    // -- Segment analysis --
    pub selected_segment: Option<String>,
    pub segment_view: PaneResult<SegmentAnalysis>,
    pub segment_frame: FrameSelector,

    // -- Price analysis --
    pub selected_brand: Option<String>,
    pub price_view: Option<PriceAnalysis>,
    pub price_frame: FrameSelector,
}

fn nothing_to_choose() -> EmptySelection {
    EmptySelection::NoRows {
        subject: "data",
        table: None,
    }
}

impl AppState {
    /// Derive every page's initial view, selecting the first value of each
    /// domain.
    pub fn new(context: DataContext) -> Self {
        let year_choices = context.year_choices();
        let segment_choices = context.segment_choices();
        let brand_choices = context.brand_choices();

        let brand_colors = ColorMap::new(
            context
                .brand_share()
                .distinct_values(BrandShareColumn::Brand)
                .iter()
                .map(|v| v.to_string()),
        );
        let segment_colors = ColorMap::new(
            context
                .brand_share()
                .distinct_values(BrandShareColumn::Segment)
                .iter()
                .map(|v| v.to_string()),
        );

        let overview = dashboard::market_overview(&context);
        let mut overview_frame = FrameSelector::default();
        if let Ok(chart) = &overview.share_chart {
            overview_frame.reset(&chart.years());
        }

        let mut state = AppState {
            context,
            page: Page::default(),
            year_choices,
            segment_choices,
            brand_choices,
            brand_colors,
            segment_colors,
            model_colors: ColorMap::new(std::iter::empty()),
            overview,
            overview_frame,
            selected_year: None,
            distribution: Err(nothing_to_choose()),
            selected_segment: None,
            segment_view: Err(nothing_to_choose()),
            segment_frame: FrameSelector::default(),
            selected_brand: None,
            price_view: None,
            price_frame: FrameSelector::default(),
        };

        if let Some(year) = state.year_choices.first().copied() {
            state.select_year(year);
        }
        if let Some(segment) = state.segment_choices.first().cloned() {
            state.select_segment(segment);
        }
        if let Some(brand) = state.brand_choices.first().cloned() {
            state.select_brand(brand);
        }
        state
    }

    /// Recompute the year distribution.
    pub fn select_year(&mut self, year: i32) {
        self.distribution = dashboard::year_distribution(&self.context, year);
        self.selected_year = Some(year);
    }

    /// Recompute the segment page.
    pub fn select_segment(&mut self, segment: String) {
        self.segment_view = dashboard::segment_analysis(&self.context, &segment);
        if let Ok(view) = &self.segment_view {
            self.segment_frame.reset(&view.brand_chart.years());
        }
        self.selected_segment = Some(segment);
    }

    /// Recompute the price page and the per-model colours it uses.
    pub fn select_brand(&mut self, brand: String) {
        let view = dashboard::price_analysis(&self.context, &brand);
        if let Ok(used) = &view.used {
            self.price_frame.reset(&used.scatter.years());
        }
        self.model_colors = ColorMap::new(
            self.context
                .used_listings()
                .iter()
                .filter(|r| r.brand == brand)
                .map(|r| r.model.clone()),
        );
        log::debug!(
            "brand {brand}: {} models on the price page",
            self.model_colors.len()
        );
        self.price_view = Some(view);
        self.selected_brand = Some(brand);
    }

    /// Row counts per source table for the status bar.
    pub fn table_sizes(&self) -> [(&'static str, usize); 3] {
        [
            ("brand share rows", self.context.brand_share().len()),
            ("used listings", self.context.used_listings().len()),
            ("new-car prices", self.context.new_prices().len()),
        ]
    }

    /// Number of distinct used-listing models, shown in the sidebar.
    pub fn used_model_count(&self) -> usize {
        self.context
            .used_listings()
            .distinct_values(UsedListingColumn::Model)
            .len()
    }
}
