use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of any table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, used for equality filters and for the
/// distinct-value domains that drive the selection widgets.
/// Using `BTreeMap` / `HashSet` downstream so `CellValue` must be `Ord + Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

// -- Manual Eq/Ord/Hash so CellValue can key maps and sets --
// Numbers compare by `total_cmp`: `-0.0` and `0.0` differ, `NaN` equals itself.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Number(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Number(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Number(v) => write!(f, "{v}"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Integer(i as i64)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<u64> for CellValue {
    fn from(i: u64) -> Self {
        CellValue::Integer(i as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

// ---------------------------------------------------------------------------
// Column identifiers
// ---------------------------------------------------------------------------

/// A closed set of columns for one table type. `name` is the CSV header.
pub trait TableColumn:
    Copy + Eq + Ord + std::hash::Hash + fmt::Debug + fmt::Display + 'static
{
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
}

macro_rules! table_columns {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $header:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl TableColumn for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $header),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

table_columns! {
    /// Columns of the brand market share table.
    pub enum BrandShareColumn {
        Year => "Year",
        Segment => "Segment",
        Brand => "Brand",
        Model => "Model",
        Vol => "Vol",
    }
}

table_columns! {
    /// Columns of the used-car listing table.
    pub enum UsedListingColumn {
        Brand => "Brand",
        Model => "Model",
        City => "City",
        Color => "Color",
        Price => "Price",
        Milage => "Milage",
        Year => "Year",
    }
}

table_columns! {
    /// Filterable columns of the new-car price sheet. Price columns vary
    /// between sheets and are carried as display text only.
    pub enum NewPriceColumn {
        Brand => "Brand",
        Model => "Model",
    }
}

table_columns! {
    /// Columns of the derived listing counts.
    pub enum GroupedCountColumn {
        Brand => "Brand",
        Model => "Model",
        City => "City",
        Color => "Color",
        Count => "count",
    }
}

// ---------------------------------------------------------------------------
// Records – one row of each table
// ---------------------------------------------------------------------------

/// A row type with typed access to its columns.
pub trait Record: Clone + PartialEq + fmt::Debug {
    type Column: TableColumn;

    fn value(&self, column: Self::Column) -> CellValue;

    /// Display cells in header order.
    fn cells(&self) -> Vec<String> {
        Self::Column::ALL
            .iter()
            .map(|c| self.value(*c).to_string())
            .collect()
    }
}

/// Sales volume for one brand/model/segment in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BrandShareRecord {
    pub year: i32,
    pub segment: String,
    pub brand: String,
    pub model: String,
    pub vol: f64,
}

impl Record for BrandShareRecord {
    type Column = BrandShareColumn;

    fn value(&self, column: BrandShareColumn) -> CellValue {
        match column {
            BrandShareColumn::Year => self.year.into(),
            BrandShareColumn::Segment => self.segment.as_str().into(),
            BrandShareColumn::Brand => self.brand.as_str().into(),
            BrandShareColumn::Model => self.model.as_str().into(),
            BrandShareColumn::Vol => self.vol.into(),
        }
    }
}

/// One used-car listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsedListingRecord {
    pub brand: String,
    pub model: String,
    pub city: String,
    pub color: String,
    pub price: f64,
    pub milage: f64,
    pub year: i32,
}

impl Record for UsedListingRecord {
    type Column = UsedListingColumn;

    fn value(&self, column: UsedListingColumn) -> CellValue {
        match column {
            UsedListingColumn::Brand => self.brand.as_str().into(),
            UsedListingColumn::Model => self.model.as_str().into(),
            UsedListingColumn::City => self.city.as_str().into(),
            UsedListingColumn::Color => self.color.as_str().into(),
            UsedListingColumn::Price => self.price.into(),
            UsedListingColumn::Milage => self.milage.into(),
            UsedListingColumn::Year => self.year.into(),
        }
    }
}

/// One new-car catalog entry. `cells` holds every column of the sheet in
/// header order, Brand and Model included.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceRecord {
    pub brand: String,
    pub model: String,
    pub cells: Vec<String>,
}

impl Record for NewPriceRecord {
    type Column = NewPriceColumn;

    fn value(&self, column: NewPriceColumn) -> CellValue {
        match column {
            NewPriceColumn::Brand => self.brand.as_str().into(),
            NewPriceColumn::Model => self.model.as_str().into(),
        }
    }

    fn cells(&self) -> Vec<String> {
        self.cells.clone()
    }
}

/// Number of used listings sharing one (Brand, Model, City, Color) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedCount {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Color")]
    pub color: String,
    pub count: u64,
}

impl Record for GroupedCount {
    type Column = GroupedCountColumn;

    fn value(&self, column: GroupedCountColumn) -> CellValue {
        match column {
            GroupedCountColumn::Brand => self.brand.as_str().into(),
            GroupedCountColumn::Model => self.model.as_str().into(),
            GroupedCountColumn::City => self.city.as_str().into(),
            GroupedCountColumn::Color => self.color.as_str().into(),
            GroupedCountColumn::Count => self.count.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable set of rows with named columns
// ---------------------------------------------------------------------------

/// Rows of one record type plus the header they were read with.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R: Record> Table<R> {
    pub fn new(columns: Vec<String>, rows: Vec<R>) -> Self {
        Table { columns, rows }
    }

    /// Build a table whose header is the record's column set.
    pub fn from_records(rows: Vec<R>) -> Self {
        let columns = R::Column::ALL
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        Table { columns, rows }
    }

    /// A table with the same header and the given rows.
    pub(crate) fn with_rows(&self, rows: Vec<R>) -> Self {
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values of `column`, in order of first appearance.
    pub fn distinct_values(&self, column: R::Column) -> Vec<CellValue> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.value(column))
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
