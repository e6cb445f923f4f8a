use super::aggregate::group_counts;
use super::error::DataError;
use super::loader::{load_sources, DataSources, LoadedTables};
use super::model::{
    BrandShareColumn, BrandShareRecord, CellValue, GroupedCount, NewPriceRecord, Table,
    UsedListingColumn, UsedListingRecord,
};

// ---------------------------------------------------------------------------
// DataContext – everything the pages read, built once at startup
// ---------------------------------------------------------------------------

/// The immutable source tables plus the listing counts derived from them.
/// Handlers receive it by reference; nothing writes to it after construction.
#[derive(Debug, Clone)]
pub struct DataContext {
    brand_share: Table<BrandShareRecord>,
    used_listings: Table<UsedListingRecord>,
    new_prices: Table<NewPriceRecord>,
    grouped_used: Table<GroupedCount>,
}

impl DataContext {
    /// Load every source from disk. Fails without exposing any table if one
    /// of them is missing or malformed.
    pub fn load(sources: &DataSources) -> Result<Self, DataError> {
        let LoadedTables {
            brand_share,
            used_listings,
            new_prices,
        } = load_sources(sources)?;
        Ok(Self::from_tables(brand_share, used_listings, new_prices))
    }

    /// Build a context from tables already in memory.
    pub fn from_tables(
        brand_share: Table<BrandShareRecord>,
        used_listings: Table<UsedListingRecord>,
        new_prices: Table<NewPriceRecord>,
    ) -> Self {
        let grouped_used = group_counts(&used_listings);
        log::info!(
            "Grouped {} used listings into {} (brand, model, city, color) counts",
            used_listings.len(),
            grouped_used.len()
        );
        DataContext {
            brand_share,
            used_listings,
            new_prices,
            grouped_used,
        }
    }

    pub fn brand_share(&self) -> &Table<BrandShareRecord> {
        &self.brand_share
    }

    pub fn used_listings(&self) -> &Table<UsedListingRecord> {
        &self.used_listings
    }

    pub fn new_prices(&self) -> &Table<NewPriceRecord> {
        &self.new_prices
    }

    pub fn grouped_used(&self) -> &Table<GroupedCount> {
        &self.grouped_used
    }

    // -- selection domains --

    /// Years on offer for the distribution view.
    pub fn year_choices(&self) -> Vec<i32> {
        self.brand_share
            .distinct_values(BrandShareColumn::Year)
            .iter()
            .filter_map(|v| match v {
                CellValue::Integer(i) => i32::try_from(*i).ok(),
                _ => None,
            })
            .collect()
    }

    pub fn segment_choices(&self) -> Vec<String> {
        text_choices(self.brand_share.distinct_values(BrandShareColumn::Segment))
    }

    /// Brands on offer for the price analysis, taken from used listings.
    pub fn brand_choices(&self) -> Vec<String> {
        text_choices(self.used_listings.distinct_values(UsedListingColumn::Brand))
    }
}

fn text_choices(values: Vec<CellValue>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            CellValue::Text(s) => Some(s),
            _ => None,
        })
        .collect()
}
