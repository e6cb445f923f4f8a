use std::fs;
use std::path::Path;

use auto_market_dashboard::config::DashboardConfig;
use auto_market_dashboard::dashboard::{market_overview, price_analysis, year_distribution};
use auto_market_dashboard::data::{DataContext, DataError};

const BRAND_SHARE: &str = "\
Year,Segment,Brand,Model,Vol
2021,Hatchback,Suzuki,Spresso,9100
2021,Sedan,Toyota,Corolla,8700
2022,SUV,Hyundai,Tucson,7600
2022,Sedan,Toyota,Corolla,9050
";

const USED: &str = "\
Brand,Model,City,Color,Price,Milage,Year
Toyota,Corolla,X,Red,450000,82000,2018
Toyota,Corolla,X,Red,470000,61000,2019
Toyota,Corolla,Giza,White,520000,30000,2021
Hyundai,Tucson,Cairo,Black,900000,45000,2020
";

const NEW: &str = "\
Brand,Model,Trim,Price EGP
Toyota,Corolla,Base,1550000
";

/// Write the three sources into `dir` and return a config pointing there.
fn write_data(dir: &Path) -> DashboardConfig {
    let config = DashboardConfig {
        data_dir: dir.to_path_buf(),
        ..DashboardConfig::default()
    };
    let sources = config.sources();
    fs::write(&sources.brand_share, BRAND_SHARE).expect("write brand share");
    fs::write(&sources.used_listings, USED).expect("write listings");
    fs::write(&sources.new_prices, NEW).expect("write new prices");
    config
}

#[test]
fn test_load_and_group_from_files() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let config = write_data(tmp.path());

    let ctx = DataContext::load(&config.sources()).expect("load");
    assert_eq!(ctx.brand_share().len(), 4);
    assert_eq!(ctx.used_listings().len(), 4);
    assert_eq!(ctx.new_prices().len(), 1);

    let grouped = ctx.grouped_used();
    assert_eq!(grouped.len(), 3);
    let red_corollas = grouped
        .iter()
        .find(|g| g.model == "Corolla" && g.city == "X" && g.color == "Red")
        .expect("grouped row");
    assert_eq!(red_corollas.count, 2);
    let total: u64 = grouped.iter().map(|g| g.count).sum();
    assert_eq!(total, 4);
}

#[test]
fn test_missing_source_halts_loading() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let config = write_data(tmp.path());
    let sources = config.sources();
    fs::remove_file(&sources.new_prices).expect("remove");

    match DataContext::load(&sources) {
        Err(DataError::DataUnavailable { path, .. }) => assert_eq!(path, sources.new_prices),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("load should fail without the new price sheet"),
    }
}

#[test]
fn test_pages_from_loaded_files() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let config = write_data(tmp.path());
    let ctx = DataContext::load(&config.sources()).expect("load");

    assert_eq!(ctx.year_choices(), vec![2021, 2022]);
    assert_eq!(ctx.segment_choices(), vec!["Hatchback", "Sedan", "SUV"]);
    assert_eq!(ctx.brand_choices(), vec!["Toyota", "Hyundai"]);

    let overview = market_overview(&ctx);
    assert_eq!(overview.brand_count, 3);
    assert_eq!(
        overview.share_chart.expect("chart").category_order,
        vec!["Toyota", "Suzuki", "Hyundai"]
    );

    let missing = year_distribution(&ctx, 2099).unwrap_err();
    assert_eq!(missing.to_string(), "No data available for the selected year: 2099");

    let toyota = price_analysis(&ctx, "Toyota");
    let used = toyota.used.expect("used");
    assert_eq!(used.scatter.years(), vec![2018, 2019, 2021]);
    assert_eq!(used.density.expect("density").city_order, vec!["X", "Giza"]);
    assert_eq!(toyota.new_prices.expect("new").rows()[0].cells[3], "1550000");
}
