use std::collections::BTreeMap;

use super::model::{
    BrandShareColumn, BrandShareRecord, GroupedCount, GroupedCountColumn, Record, Table,
    UsedListingColumn, UsedListingRecord,
};

// ---------------------------------------------------------------------------
// Listing counts per (Brand, Model, City, Color)
// ---------------------------------------------------------------------------

/// Count used listings per (Brand, Model, City, Color).
///
/// One row per distinct key, sorted ascending by the key with plain
/// (case-sensitive) string comparison. An empty input gives an empty table.
pub fn group_counts(listings: &Table<UsedListingRecord>) -> Table<GroupedCount> {
    let mut counts: BTreeMap<(&str, &str, &str, &str), u64> = BTreeMap::new();
    for r in listings {
        *counts
            .entry((r.brand.as_str(), r.model.as_str(), r.city.as_str(), r.color.as_str()))
            .or_default() += 1;
    }

    let rows = counts
        .into_iter()
        .map(|((brand, model, city, color), count)| GroupedCount {
            brand: brand.to_string(),
            model: model.to_string(),
            city: city.to_string(),
            color: color.to_string(),
            count,
        })
        .collect();
    Table::from_records(rows)
}

/// Categories of `column` ordered by their summed count, largest first.
/// Ties fall back to the category name.
pub fn order_by_total(grouped: &Table<GroupedCount>, column: GroupedCountColumn) -> Vec<String> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for r in grouped {
        *totals.entry(r.value(column).to_string()).or_default() += r.count;
    }
    let mut ordered: Vec<(String, u64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered.into_iter().map(|(name, _)| name).collect()
}

/// Number of distinct values in `column`.
pub fn count_distinct<R: Record>(table: &Table<R>, column: R::Column) -> usize {
    table.distinct_values(column).len()
}

// ---------------------------------------------------------------------------
// Bar charts: Vol per category, one frame per year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    /// Colour group; equals `category` when the chart is not grouped.
    pub group: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarFrame {
    pub year: i32,
    pub bars: Vec<Bar>,
}

impl BarFrame {
    /// Each bar with the height already stacked under it. Only bars of the
    /// same category stack; every category starts from zero.
    pub fn stacked(&self) -> Vec<(f64, &Bar)> {
        let mut heights: BTreeMap<&str, f64> = BTreeMap::new();
        self.bars
            .iter()
            .map(|bar| {
                let height = heights.entry(bar.category.as_str()).or_default();
                let base = *height;
                *height += bar.value;
                (base, bar)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub frames: Vec<BarFrame>,
    /// Shared x-axis order across frames: total Vol descending.
    pub category_order: Vec<String>,
}

impl BarChartData {
    pub fn years(&self) -> Vec<i32> {
        self.frames.iter().map(|f| f.year).collect()
    }

    pub fn frame(&self, year: i32) -> Option<&BarFrame> {
        self.frames.iter().find(|f| f.year == year)
    }

    /// Position of `category` on the x axis.
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.category_order.iter().position(|c| c == category)
    }
}

/// Sum Vol per (`category`, `group`) for every year, ascending by year.
pub fn bar_frames(
    table: &Table<BrandShareRecord>,
    category: BrandShareColumn,
    group: BrandShareColumn,
) -> BarChartData {
    let mut sums: BTreeMap<(i32, String, String), f64> = BTreeMap::new();
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for r in table {
        let cat = r.value(category).to_string();
        let grp = r.value(group).to_string();
        *totals.entry(cat.clone()).or_default() += r.vol;
        *sums.entry((r.year, cat, grp)).or_default() += r.vol;
    }

    let mut ordered: Vec<(String, f64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let category_order: Vec<String> = ordered.into_iter().map(|(name, _)| name).collect();

    let mut frames: Vec<BarFrame> = Vec::new();
    for ((year, category, group), value) in sums {
        if frames.last().map(|f| f.year) != Some(year) {
            frames.push(BarFrame {
                year,
                bars: Vec::new(),
            });
        }
        if let Some(frame) = frames.last_mut() {
            frame.bars.push(Bar {
                category,
                group,
                value,
            });
        }
    }

    for frame in &mut frames {
        frame.bars.sort_by_key(|b| {
            (
                category_order
                    .iter()
                    .position(|c| *c == b.category)
                    .unwrap_or(usize::MAX),
                b.group.clone(),
            )
        });
    }

    BarChartData {
        frames,
        category_order,
    }
}

// ---------------------------------------------------------------------------
// Icicle: all → Segment → Brand → Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct IcicleNode {
    pub label: String,
    pub value: f64,
    pub children: Vec<IcicleNode>,
}

impl IcicleNode {
    fn leaf(label: String, value: f64) -> Self {
        IcicleNode {
            label,
            value,
            children: Vec::new(),
        }
    }

    fn branch(label: String, mut children: Vec<IcicleNode>) -> Self {
        children.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
        IcicleNode {
            label,
            value: children.iter().map(|c| c.value).sum(),
            children,
        }
    }

    /// Levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

/// Label of the hierarchy root.
pub const HIERARCHY_ROOT: &str = "all";

/// Volume hierarchy of `table`; siblings ordered by value, largest first.
pub fn volume_hierarchy(table: &Table<BrandShareRecord>) -> IcicleNode {
    let mut tree: BTreeMap<&str, BTreeMap<&str, BTreeMap<&str, f64>>> = BTreeMap::new();
    for r in table {
        *tree
            .entry(r.segment.as_str())
            .or_default()
            .entry(r.brand.as_str())
            .or_default()
            .entry(r.model.as_str())
            .or_default() += r.vol;
    }

    let segments = tree
        .into_iter()
        .map(|(segment, brands)| {
            let brands = brands
                .into_iter()
                .map(|(brand, models)| {
                    let models = models
                        .into_iter()
                        .map(|(model, vol)| IcicleNode::leaf(model.to_string(), vol))
                        .collect();
                    IcicleNode::branch(brand.to_string(), models)
                })
                .collect();
            IcicleNode::branch(segment.to_string(), brands)
        })
        .collect();
    IcicleNode::branch(HIERARCHY_ROOT.to_string(), segments)
}

// ---------------------------------------------------------------------------
// Scatter: Price vs Milage per model, one frame per year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Min and max of a numeric column; `None` for an empty table.
pub fn value_range<R: Record>(table: &Table<R>, column: R::Column) -> Option<ValueRange> {
    table
        .iter()
        .filter_map(|r| r.value(column).as_f64())
        .fold(None, |acc, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(ValueRange { min, max }) => Some(ValueRange {
                min: min.min(v),
                max: max.max(v),
            }),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub model: String,
    pub price: f64,
    pub milage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFrame {
    pub year: i32,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChartData {
    pub frames: Vec<ScatterFrame>,
    /// Axis ranges over every frame so they stay put while paging years.
    pub price_range: Option<ValueRange>,
    pub milage_range: Option<ValueRange>,
}

impl ScatterChartData {
    pub fn years(&self) -> Vec<i32> {
        self.frames.iter().map(|f| f.year).collect()
    }

    pub fn frame(&self, year: i32) -> Option<&ScatterFrame> {
        self.frames.iter().find(|f| f.year == year)
    }
}

pub fn scatter_frames(listings: &Table<UsedListingRecord>) -> ScatterChartData {
    let mut by_year: BTreeMap<i32, Vec<ScatterPoint>> = BTreeMap::new();
    for r in listings {
        by_year.entry(r.year).or_default().push(ScatterPoint {
            model: r.model.clone(),
            price: r.price,
            milage: r.milage,
        });
    }

    ScatterChartData {
        frames: by_year
            .into_iter()
            .map(|(year, points)| ScatterFrame { year, points })
            .collect(),
        price_range: value_range(listings, UsedListingColumn::Price),
        milage_range: value_range(listings, UsedListingColumn::Milage),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn listing(brand: &str, model: &str, city: &str, color: &str) -> UsedListingRecord {
        UsedListingRecord {
            brand: brand.into(),
            model: model.into(),
            city: city.into(),
            color: color.into(),
            price: 100.0,
            milage: 1000.0,
            year: 2020,
        }
    }

    fn share(year: i32, segment: &str, brand: &str, model: &str, vol: f64) -> BrandShareRecord {
        BrandShareRecord {
            year,
            segment: segment.into(),
            brand: brand.into(),
            model: model.into(),
            vol,
        }
    }

    fn listings() -> Table<UsedListingRecord> {
        Table::from_records(vec![
            listing("Toyota", "Corolla", "X", "Red"),
            listing("Kia", "Rio", "Cairo", "Blue"),
            listing("Toyota", "Corolla", "X", "Red"),
            listing("bmw", "X5", "Giza", "Black"),
            listing("BMW", "X5", "Giza", "Black"),
            listing("Kia", "Rio", "Alex", "Blue"),
            listing("Kia", "Rio", "Cairo", "Blue"),
            listing("Kia", "Rio", "Cairo", "Silver"),
        ])
    }

    #[test]
    fn identical_listings_collapse_into_one_count() {
        let table = Table::from_records(vec![
            listing("Toyota", "Corolla", "X", "Red"),
            listing("Toyota", "Corolla", "X", "Red"),
        ]);
        let grouped = group_counts(&table);
        assert_eq!(grouped.len(), 1);
        assert_eq!(
            grouped.rows()[0],
            GroupedCount {
                brand: "Toyota".into(),
                model: "Corolla".into(),
                city: "X".into(),
                color: "Red".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn counts_sum_to_row_count_and_keys_are_unique() {
        let table = listings();
        let grouped = group_counts(&table);

        let total: u64 = grouped.iter().map(|g| g.count).sum();
        assert_eq!(total as usize, table.len());

        let keys: HashSet<_> = grouped
            .iter()
            .map(|g| (g.brand.clone(), g.model.clone(), g.city.clone(), g.color.clone()))
            .collect();
        assert_eq!(keys.len(), grouped.len());

        for g in &grouped {
            let matching = table
                .iter()
                .filter(|r| {
                    r.brand == g.brand
                        && r.model == g.model
                        && r.city == g.city
                        && r.color == g.color
                })
                .count();
            assert_eq!(g.count as usize, matching);
        }
    }

    #[test]
    fn output_is_sorted_by_compound_key_case_sensitively() {
        let grouped = group_counts(&listings());
        let keys: Vec<(&str, &str, &str, &str)> = grouped
            .iter()
            .map(|g| (g.brand.as_str(), g.model.as_str(), g.city.as_str(), g.color.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("BMW", "X5", "Giza", "Black"),
                ("Kia", "Rio", "Alex", "Blue"),
                ("Kia", "Rio", "Cairo", "Blue"),
                ("Kia", "Rio", "Cairo", "Silver"),
                ("Toyota", "Corolla", "X", "Red"),
                ("bmw", "X5", "Giza", "Black"),
            ]
        );
    }

    #[test]
    fn empty_listings_group_to_empty_table() {
        let grouped = group_counts(&Table::from_records(Vec::new()));
        assert!(grouped.is_empty());
        assert_eq!(grouped, group_counts(&Table::from_records(Vec::new())));
    }

    #[test]
    fn grouping_twice_is_identical() {
        let table = listings();
        assert_eq!(group_counts(&table), group_counts(&table));
    }

    #[test]
    fn cities_ordered_by_total_count() {
        let grouped = group_counts(&listings());
        assert_eq!(
            order_by_total(&grouped, GroupedCountColumn::City),
            vec!["Cairo", "Giza", "X", "Alex"]
        );
    }

    #[test]
    fn bar_frames_sum_per_year_and_order_by_total() {
        let table = Table::from_records(vec![
            share(2022, "SUV", "Kia", "Sportage", 5.0),
            share(2021, "SUV", "Kia", "Sportage", 10.0),
            share(2021, "Sedan", "Kia", "Cerato", 1.0),
            share(2021, "Sedan", "Toyota", "Corolla", 30.0),
            share(2022, "Sedan", "Toyota", "Corolla", 2.0),
            share(2022, "SUV", "Hyundai", "Tucson", 4.0),
        ]);
        let chart = bar_frames(&table, BrandShareColumn::Brand, BrandShareColumn::Brand);

        assert_eq!(chart.years(), vec![2021, 2022]);
        assert_eq!(chart.category_order, vec!["Toyota", "Kia", "Hyundai"]);

        let frame = chart.frame(2021).expect("2021 frame");
        let bars: Vec<(&str, f64)> = frame
            .bars
            .iter()
            .map(|b| (b.category.as_str(), b.value))
            .collect();
        assert_eq!(bars, vec![("Toyota", 30.0), ("Kia", 11.0)]);

        let frame_total: f64 = chart.frame(2022).unwrap().bars.iter().map(|b| b.value).sum();
        assert_eq!(frame_total, 11.0);
        assert_eq!(chart.category_index("Hyundai"), Some(2));
    }

    #[test]
    fn grouped_bars_keep_groups_apart() {
        let table = Table::from_records(vec![
            share(2021, "SUV", "Kia", "Shared", 3.0),
            share(2021, "SUV", "Hyundai", "Shared", 4.0),
        ]);
        let chart = bar_frames(&table, BrandShareColumn::Model, BrandShareColumn::Brand);
        let groups: Vec<&str> = chart.frames[0].bars.iter().map(|b| b.group.as_str()).collect();
        assert_eq!(groups, vec!["Hyundai", "Kia"]);
    }

    #[test]
    fn stacking_only_adds_up_within_a_category() {
        let table = Table::from_records(vec![
            share(2021, "Sedan", "Toyota", "Corolla", 30.0),
            share(2021, "Sedan", "Kia", "Cerato", 11.0),
            share(2021, "SUV", "Kia", "Sportage", 6.0),
            share(2021, "SUV", "Hyundai", "Tucson", 4.0),
        ]);

        let by_brand = bar_frames(&table, BrandShareColumn::Brand, BrandShareColumn::Brand);
        let bases: Vec<(&str, f64)> = by_brand.frames[0]
            .stacked()
            .into_iter()
            .map(|(base, bar)| (bar.category.as_str(), base))
            .collect();
        assert_eq!(bases, vec![("Toyota", 0.0), ("Kia", 0.0), ("Hyundai", 0.0)]);

        let by_segment = bar_frames(&table, BrandShareColumn::Segment, BrandShareColumn::Brand);
        let spans: Vec<(&str, &str, f64, f64)> = by_segment.frames[0]
            .stacked()
            .into_iter()
            .map(|(base, bar)| (bar.category.as_str(), bar.group.as_str(), base, base + bar.value))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("Sedan", "Kia", 0.0, 11.0),
                ("Sedan", "Toyota", 11.0, 41.0),
                ("SUV", "Hyundai", 0.0, 4.0),
                ("SUV", "Kia", 4.0, 10.0),
            ]
        );
    }

    #[test]
    fn hierarchy_values_roll_up() {
        let table = Table::from_records(vec![
            share(2021, "SUV", "Kia", "Sportage", 10.0),
            share(2021, "SUV", "Kia", "Sorento", 15.0),
            share(2021, "SUV", "Hyundai", "Tucson", 30.0),
            share(2021, "Sedan", "Toyota", "Corolla", 20.0),
        ]);
        let root = volume_hierarchy(&table);

        assert_eq!(root.label, HIERARCHY_ROOT);
        assert_eq!(root.value, 75.0);
        assert_eq!(root.depth(), 4);

        let labels: Vec<&str> = root.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["SUV", "Sedan"]);

        let suv = &root.children[0];
        assert_eq!(suv.value, 55.0);
        assert_eq!(suv.children[0].label, "Hyundai");
        assert_eq!(suv.children[1].label, "Kia");
        assert_eq!(suv.children[1].children[0].label, "Sorento");

        fn check(node: &IcicleNode) {
            if !node.children.is_empty() {
                let sum: f64 = node.children.iter().map(|c| c.value).sum();
                assert_eq!(node.value, sum, "{}", node.label);
                node.children.iter().for_each(check);
            }
        }
        check(&root);
    }

    #[test]
    fn scatter_frames_split_by_year_with_global_ranges() {
        let mut rows = vec![
            listing("Kia", "Rio", "Cairo", "Blue"),
            listing("Kia", "Picanto", "Cairo", "Red"),
            listing("Kia", "Rio", "Giza", "Blue"),
        ];
        rows[0].price = 250.0;
        rows[0].milage = 90_000.0;
        rows[1].year = 2018;
        rows[1].price = 80.0;
        rows[2].milage = 12.0;
        let chart = scatter_frames(&Table::from_records(rows));

        assert_eq!(chart.years(), vec![2018, 2020]);
        assert_eq!(chart.frame(2020).unwrap().points.len(), 2);
        assert_eq!(chart.frame(2018).unwrap().points[0].model, "Picanto");
        assert_eq!(chart.price_range, Some(ValueRange { min: 80.0, max: 250.0 }));
        assert_eq!(chart.milage_range, Some(ValueRange { min: 12.0, max: 90_000.0 }));
    }

    #[test]
    fn ranges_of_empty_table_are_none() {
        let chart = scatter_frames(&Table::from_records(Vec::new()));
        assert!(chart.frames.is_empty());
        assert_eq!(chart.price_range, None);
    }

    #[test]
    fn distinct_brands_are_counted_once() {
        let table = listings();
        assert_eq!(count_distinct(&table, UsedListingColumn::Brand), 4);
    }
}
