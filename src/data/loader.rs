use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::error::DataError;
use super::model::{
    BrandShareRecord, NewPriceColumn, NewPriceRecord, Record, Table, TableColumn,
    UsedListingRecord,
};

// ---------------------------------------------------------------------------
// Source locations
// ---------------------------------------------------------------------------

/// Where the three source tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub brand_share: PathBuf,
    pub used_listings: PathBuf,
    pub new_prices: PathBuf,
}

/// The three tables exactly as read from disk.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub brand_share: Table<BrandShareRecord>,
    pub used_listings: Table<UsedListingRecord>,
    pub new_prices: Table<NewPriceRecord>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read all three sources eagerly. The first failure aborts the load and no
/// table is returned.
pub fn load_sources(sources: &DataSources) -> Result<LoadedTables, DataError> {
    let brand_share = load_typed_csv::<BrandShareRecord>(&sources.brand_share)?;
    let used_listings = load_typed_csv::<UsedListingRecord>(&sources.used_listings)?;
    let new_prices = load_new_prices(&sources.new_prices)?;

    Ok(LoadedTables {
        brand_share,
        used_listings,
        new_prices,
    })
}

// ---------------------------------------------------------------------------
// CSV loaders
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least every column of `R`; extra
/// columns are ignored. Cells are trimmed before parsing.
pub fn load_typed_csv<R>(path: &Path) -> Result<Table<R>, DataError>
where
    R: Record + DeserializeOwned,
{
    let mut reader = open_csv(path)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    require_columns::<R::Column>(path, &headers)?;

    let rows = reader
        .deserialize::<R>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| csv_error(path, e))?;

    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(Table::from_records(rows))
}

/// New-car price sheets only share `Brand` and `Model`; every other column is
/// kept as text in header order.
pub fn load_new_prices(path: &Path) -> Result<Table<NewPriceRecord>, DataError> {
    let mut reader = open_csv(path)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    require_columns::<NewPriceColumn>(path, &headers)?;

    let brand_idx = column_index(&headers, NewPriceColumn::Brand);
    let model_idx = column_index(&headers, NewPriceColumn::Model);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        rows.push(NewPriceRecord {
            brand: record.get(brand_idx).unwrap_or("").to_string(),
            model: record.get(model_idx).unwrap_or("").to_string(),
            cells: record.iter().map(|c| c.to_string()).collect(),
        });
    }

    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(Table::new(headers, rows))
}

// -- helpers --

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn require_columns<C: TableColumn>(path: &Path, headers: &[String]) -> Result<(), DataError> {
    let missing: Vec<&str> = C::ALL
        .iter()
        .map(|c| c.name())
        .filter(|name| !headers.iter().any(|h| h == name))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MalformedTable {
            path: path.to_path_buf(),
            reason: format!("missing column(s): {}", missing.join(", ")),
        })
    }
}

fn column_index<C: TableColumn>(headers: &[String], column: C) -> usize {
    headers
        .iter()
        .position(|h| h == column.name())
        .unwrap_or(usize::MAX)
}

/// I/O failures mean the file is unavailable; anything else is bad content.
fn csv_error(path: &Path, err: csv::Error) -> DataError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::DataUnavailable {
            path: path.to_path_buf(),
            source,
        },
        _ => DataError::MalformedTable {
            path: path.to_path_buf(),
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BrandShareColumn, UsedListingColumn};

    const BRAND_SHARE: &str = "Year,Segment,Brand,Model,Vol\n\
        2021,SUV,Kia,Sportage,1200\n\
        2022, Sedan ,Toyota,Corolla,3400.5\n";
    const USED: &str = "Brand,Model,City,Color,Price,Milage,Year,Transmission\n\
        Toyota,Corolla,Cairo,Red,450000,82000,2018,Automatic\n\
        Kia,Picanto,Giza,White,310000,40000,2020,Manual\n";
    const NEW: &str = "Brand,Model,Trim,Price EGP\n\
        Toyota,Corolla,Base,1500000\n\
        Kia,Sportage,Top,2100000\n";

    fn write_sources(dir: &Path) -> DataSources {
        let sources = DataSources {
            brand_share: dir.join("brand_share.csv"),
            used_listings: dir.join("old.csv"),
            new_prices: dir.join("New Feb 2025 Prices.csv"),
        };
        std::fs::write(&sources.brand_share, BRAND_SHARE).unwrap();
        std::fs::write(&sources.used_listings, USED).unwrap();
        std::fs::write(&sources.new_prices, NEW).unwrap();
        sources
    }

    #[test]
    fn loads_all_three_tables_with_their_columns() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let tables = load_sources(&write_sources(tmp.path())).expect("load");

        let expected: Vec<&str> = BrandShareColumn::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(tables.brand_share.columns(), expected.as_slice());
        assert_eq!(tables.brand_share.rows()[1].segment, "Sedan");
        assert_eq!(tables.brand_share.rows()[1].vol, 3400.5);

        let expected: Vec<&str> = UsedListingColumn::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(tables.used_listings.columns(), expected.as_slice());
        assert_eq!(tables.used_listings.len(), 2);

        assert_eq!(tables.new_prices.columns(), ["Brand", "Model", "Trim", "Price EGP"]);
        assert_eq!(tables.new_prices.rows()[1].brand, "Kia");
        assert_eq!(
            tables.new_prices.rows()[0].cells,
            vec!["Toyota", "Corolla", "Base", "1500000"]
        );
    }

    #[test]
    fn missing_file_is_data_unavailable_naming_the_path() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let mut sources = write_sources(tmp.path());
        sources.used_listings = tmp.path().join("nope.csv");

        let err = load_sources(&sources).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }), "{err}");
        assert_eq!(err.path(), sources.used_listings.as_path());
    }

    #[test]
    fn missing_header_is_malformed() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("brand_share.csv");
        std::fs::write(&path, "Year,Segment,Brand,Vol\n2021,SUV,Kia,3\n").unwrap();

        let err = load_typed_csv::<BrandShareRecord>(&path).unwrap_err();
        match err {
            DataError::MalformedTable { reason, .. } => assert!(reason.contains("Model")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_number_is_malformed() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("brand_share.csv");
        std::fs::write(&path, "Year,Segment,Brand,Model,Vol\nlast year,SUV,Kia,Rio,3\n").unwrap();

        let err = load_typed_csv::<BrandShareRecord>(&path).unwrap_err();
        assert!(matches!(err, DataError::MalformedTable { .. }), "{err}");
    }

    #[test]
    fn header_only_file_loads_as_empty_table() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("new.csv");
        std::fs::write(&path, "Brand,Model,Price\n").unwrap();

        let table = load_new_prices(&path).expect("load");
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["Brand", "Model", "Price"]);
    }
}
