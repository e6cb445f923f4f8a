use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use auto_market_dashboard::config::DashboardConfig;
use auto_market_dashboard::data::model::{BrandShareRecord, UsedListingRecord};

#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Write deterministic sample CSVs for the dashboard", long_about = None)]
struct Args {
    /// Output directory
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Used-car listings to generate
    #[arg(long, default_value_t = 600)]
    listings: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (segment, brand, model, base yearly volume, new price in thousands)
const CATALOG: &[(&str, &str, &str, f64, f64)] = &[
    ("Hatchback", "Suzuki", "Spresso", 9_000.0, 690.0),
    ("Hatchback", "Kia", "Picanto", 6_500.0, 850.0),
    ("Hatchback", "Hyundai", "i10", 5_200.0, 780.0),
    ("Sedan", "Toyota", "Corolla", 8_800.0, 1_550.0),
    ("Sedan", "Hyundai", "Elantra", 7_100.0, 1_400.0),
    ("Sedan", "Nissan", "Sunny", 6_900.0, 950.0),
    ("SUV", "Hyundai", "Tucson", 7_600.0, 2_050.0),
    ("SUV", "Kia", "Sportage", 6_200.0, 2_100.0),
    ("SUV", "Chery", "Tiggo 7", 4_800.0, 1_500.0),
    ("Luxury", "Mercedes", "C200", 1_900.0, 4_300.0),
    ("Luxury", "BMW", "320i", 1_600.0, 4_100.0),
    ("MPV", "Toyota", "Innova", 1_100.0, 2_300.0),
    ("MPV", "Kia", "Carnival", 700.0, 3_200.0),
];

const YEARS: [i32; 5] = [2021, 2022, 2023, 2024, 2025];
const CITIES: [&str; 6] = ["Cairo", "Giza", "Alexandria", "Mansoura", "Tanta", "Suez"];
const COLORS: [&str; 6] = ["White", "Black", "Silver", "Red", "Blue", "Grey"];
const TRIMS: [(&str, f64); 3] = [("Base", 1.0), ("Mid", 1.12), ("Top", 1.27)];

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn brand_share(rng: &mut SimpleRng) -> Vec<BrandShareRecord> {
    let mut rows = Vec::new();
    for (i, &year) in YEARS.iter().enumerate() {
        let trend = 1.0 + 0.06 * i as f64;
        for &(segment, brand, model, base, _) in CATALOG {
            rows.push(BrandShareRecord {
                year,
                segment: segment.to_string(),
                brand: brand.to_string(),
                model: model.to_string(),
                vol: (base * trend * rng.range(0.8, 1.2)).round(),
            });
        }
    }
    rows
}

fn used_listings(rng: &mut SimpleRng, n: usize) -> Vec<UsedListingRecord> {
    (0..n)
        .map(|_| {
            let &(_, brand, model, _, new_price) = rng.pick(CATALOG);
            let year = 2010 + (rng.next_u64() % 15) as i32;
            let age = (2025 - year) as f64;
            let milage = (age * rng.range(9_000.0, 22_000.0)).round();
            let price = (new_price * 1_000.0 * 0.9f64.powf(age) * rng.range(0.85, 1.1)).round();
            UsedListingRecord {
                brand: brand.to_string(),
                model: model.to_string(),
                city: rng.pick(&CITIES).to_string(),
                color: rng.pick(&COLORS).to_string(),
                price,
                milage,
                year,
            }
        })
        .collect()
}

fn write_new_prices(path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Brand", "Model", "Trim", "Price EGP"])?;
    for &(_, brand, model, _, price) in CATALOG {
        for (trim, factor) in TRIMS {
            let egp = (price * 1_000.0 * factor).round().to_string();
            writer.write_record([brand, model, trim, egp.as_str()])?;
        }
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Write all three sample tables into `out_dir`; returns the row counts.
fn write_sample(out_dir: &Path, listings: usize, seed: u64) -> Result<(usize, usize, usize)> {
    let mut rng = SimpleRng::new(seed);

    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let config = DashboardConfig {
        data_dir: out_dir.to_path_buf(),
        ..DashboardConfig::default()
    };
    let sources = config.sources();

    let shares = brand_share(&mut rng);
    write_rows(&sources.brand_share, &shares)?;
    let used = used_listings(&mut rng, listings);
    write_rows(&sources.used_listings, &used)?;
    write_new_prices(&sources.new_prices)?;

    Ok((shares.len(), used.len(), CATALOG.len() * TRIMS.len()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (shares, listings, prices) = write_sample(&args.out_dir, args.listings, args.seed)?;
    println!(
        "Wrote {} brand share rows, {} used listings and {} new-car prices to {}",
        shares,
        listings,
        prices,
        args.out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auto_market_dashboard::data::DataContext;

    #[test]
    fn sample_files_load_into_a_context() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let out_dir = tmp.path().join("data");
        let counts = write_sample(&out_dir, 40, 7).expect("write sample");

        let sources = DashboardConfig {
            data_dir: out_dir,
            ..DashboardConfig::default()
        }
        .sources();
        let ctx = DataContext::load(&sources).expect("load sample");
        assert_eq!(
            (ctx.brand_share().len(), ctx.used_listings().len(), ctx.new_prices().len()),
            counts
        );
        assert_eq!(counts, (CATALOG.len() * YEARS.len(), 40, CATALOG.len() * TRIMS.len()));
        assert_eq!(ctx.year_choices(), YEARS.to_vec());

        let grouped: u64 = ctx.grouped_used().iter().map(|g| g.count).sum();
        assert_eq!(grouped, 40);
    }

    #[test]
    fn same_seed_writes_same_files() {
        let a = tempfile::tempdir().expect("temp dir");
        let b = tempfile::tempdir().expect("temp dir");
        write_sample(a.path(), 25, 3).expect("first");
        write_sample(b.path(), 25, 3).expect("second");

        let file = DashboardConfig::default().used_listings_file;
        let first = std::fs::read_to_string(a.path().join(&file)).expect("read first");
        let second = std::fs::read_to_string(b.path().join(&file)).expect("read second");
        assert_eq!(first, second);
    }
}
