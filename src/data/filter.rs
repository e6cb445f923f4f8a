use super::error::EmptySelection;
use super::model::{CellValue, Record, Table, TableColumn};

// ---------------------------------------------------------------------------
// Filter predicate: column == value, combined with AND
// ---------------------------------------------------------------------------

/// A conjunction of equality predicates over one table's columns.
/// An empty filter matches every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<C> {
    predicates: Vec<(C, CellValue)>,
}

impl<C: TableColumn> Default for Filter<C> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<C: TableColumn> Filter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-equality predicate on `column`.
    pub fn eq(mut self, column: C, value: impl Into<CellValue>) -> Self {
        self.predicates.push((column, value.into()));
        self
    }

    /// Whether `record` satisfies every predicate.
    pub fn matches<R: Record<Column = C>>(&self, record: &R) -> bool {
        self.predicates
            .iter()
            .all(|(col, value)| record.value(*col) == *value)
    }

    /// Copy the matching rows out of `table`. The source is left untouched.
    pub fn apply<R: Record<Column = C>>(&self, table: &Table<R>) -> FilterResult<R> {
        let rows: Vec<R> = table
            .iter()
            .filter(|r| self.matches(*r))
            .cloned()
            .collect();
        log::debug!(
            "filter {:?}: {} of {} rows matched",
            self.predicates,
            rows.len(),
            table.len()
        );
        if rows.is_empty() {
            FilterResult::Empty
        } else {
            FilterResult::Matched(table.with_rows(rows))
        }
    }
}

/// Single-column equality filter.
pub fn filter_eq<R: Record>(
    table: &Table<R>,
    column: R::Column,
    value: impl Into<CellValue>,
) -> FilterResult<R> {
    Filter::new().eq(column, value).apply(table)
}

// ---------------------------------------------------------------------------
// FilterResult – rows present vs. nothing matched
// ---------------------------------------------------------------------------

/// Outcome of a filter. `Matched` never holds an empty table.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult<R> {
    Matched(Table<R>),
    Empty,
}

impl<R: Record> FilterResult<R> {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterResult::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            FilterResult::Matched(t) => t.len(),
            FilterResult::Empty => 0,
        }
    }

    pub fn table(&self) -> Option<&Table<R>> {
        match self {
            FilterResult::Matched(t) => Some(t),
            FilterResult::Empty => None,
        }
    }

    pub fn into_table(self) -> Option<Table<R>> {
        match self {
            FilterResult::Matched(t) => Some(t),
            FilterResult::Empty => None,
        }
    }

    /// Turn an empty result into the notice for `subject` at this selection.
    pub fn or_no_match(
        self,
        subject: &'static str,
        column: R::Column,
        value: impl ToString,
    ) -> Result<Table<R>, EmptySelection> {
        self.into_table().ok_or_else(|| EmptySelection::NoMatch {
            subject,
            dimension: column.name().to_lowercase(),
            value: value.to_string(),
        })
    }
}

/// Check a whole table before handing it downstream.
pub fn non_empty<'t, R: Record>(
    table: &'t Table<R>,
    subject: &'static str,
    name: Option<&'static str>,
) -> Result<&'t Table<R>, EmptySelection> {
    if table.is_empty() {
        Err(EmptySelection::NoRows {
            subject,
            table: name,
        })
    } else {
        Ok(table)
    }
}
