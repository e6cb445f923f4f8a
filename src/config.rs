use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::DataSources;

/// Dashboard settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_brand_share_file")]
    pub brand_share_file: String,
    #[serde(default = "default_used_listings_file")]
    pub used_listings_file: String,
    #[serde(default = "default_new_prices_file")]
    pub new_prices_file: String,
    #[serde(default)]
    pub window: WindowOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowOptions {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_brand_share_file() -> String {
    "brand_share.csv".to_string()
}

fn default_used_listings_file() -> String {
    "old.csv".to_string()
}

fn default_new_prices_file() -> String {
    "New Feb 2025 Prices.csv".to_string()
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    860.0
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            brand_share_file: default_brand_share_file(),
            used_listings_file: default_used_listings_file(),
            new_prices_file: default_new_prices_file(),
            window: WindowOptions::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Full paths of the three source tables.
    pub fn sources(&self) -> DataSources {
        DataSources {
            brand_share: self.data_dir.join(&self.brand_share_file),
            used_listings: self.data_dir.join(&self.used_listings_file),
            new_prices: self.data_dir.join(&self.new_prices_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_data_directory() {
        let sources = DashboardConfig::default().sources();
        assert_eq!(sources.brand_share, Path::new("data/brand_share.csv"));
        assert_eq!(sources.used_listings, Path::new("data/old.csv"));
        assert_eq!(sources.new_prices, Path::new("data/New Feb 2025 Prices.csv"));
    }

    #[test]
    fn json_overrides_only_what_it_names() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "data_dir": "/srv/market", "new_prices_file": "prices.csv", "window": { "width": 900 } }"#,
        )
        .unwrap();

        let config = DashboardConfig::from_json_file(&path).expect("config");
        assert_eq!(config.used_listings_file, "old.csv");
        assert_eq!(config.window.width, 900.0);
        assert_eq!(config.window.height, 860.0);
        assert_eq!(config.sources().new_prices, Path::new("/srv/market/prices.csv"));
    }

    #[test]
    fn bad_json_reports_the_file() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let path = tmp.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DashboardConfig::from_json_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("dashboard.json"));
    }
}
