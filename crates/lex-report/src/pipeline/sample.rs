//! Synthetic sales dataset used when no input file is given.

use crate::config::ReportConfig;
use crate::error::{Result, ResultExt};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::prelude::*;
use statrs::distribution::{Normal, Poisson};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// File name of the generated dataset inside the output directory.
pub const SAMPLE_FILENAME: &str = "sample_data.csv";

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCT_CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Books", "Home"];

/// Generate the sample frame: one row per day starting 2023-01-01.
///
/// The same seed always yields the same frame.
pub fn generate_sample_frame(seed: u64, rows: usize) -> PolarsResult<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_sales_dist = normal(1000.0, 200.0)?;
    let satisfaction_dist = normal(4.2, 0.8)?;
    let customers_dist = Poisson::new(50.0)
        .map_err(|e| polars_err!(ComputeError: "invalid customer distribution: {}", e))?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    let first_day = (start - epoch).num_days() as i32;
    let days: Vec<i32> = (0..rows).map(|i| first_day + i as i32).collect();

    let base_sales: Vec<f64> = (0..rows).map(|_| base_sales_dist.sample(&mut rng)).collect();
    let customers: Vec<i64> = (0..rows)
        .map(|_| {
            let count: u64 = customers_dist.sample(&mut rng);
            count as i64
        })
        .collect();
    let regions: Vec<&str> = (0..rows).map(|_| pick(&mut rng, &REGIONS)).collect();
    let products: Vec<&str> = (0..rows)
        .map(|_| pick(&mut rng, &PRODUCT_CATEGORIES))
        .collect();
    let discounts: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..30.0)).collect();
    let satisfaction: Vec<f64> = (0..rows)
        .map(|_| satisfaction_dist.sample(&mut rng).clamp(1.0, 5.0))
        .collect();

    let sales: Vec<f64> = base_sales
        .iter()
        .zip(&discounts)
        .map(|(amount, discount)| amount * (1.0 + discount / 100.0))
        .collect();

    let date = Series::new("date".into(), days).cast(&DataType::Date)?;

    DataFrame::new(vec![
        date.into_column(),
        Series::new("sales_amount".into(), sales).into_column(),
        Series::new("customer_count".into(), customers).into_column(),
        Series::new("region".into(), regions).into_column(),
        Series::new("product_category".into(), products).into_column(),
        Series::new("discount_percentage".into(), discounts).into_column(),
        Series::new("satisfaction_score".into(), satisfaction).into_column(),
    ])
}

/// Generate the sample dataset and write it to `<output_dir>/sample_data.csv`.
pub fn write_sample_csv(config: &ReportConfig) -> Result<PathBuf> {
    let mut df = generate_sample_frame(config.sample_seed, config.sample_rows)
        .context("Failed to generate sample data")?;

    let path = config.output_dir.join(SAMPLE_FILENAME);
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to write sample data")?;

    info!("Sample data written to {} ({} rows)", path.display(), df.height());
    Ok(path)
}

fn normal(mean: f64, std_dev: f64) -> PolarsResult<Normal> {
    Normal::new(mean, std_dev)
        .map_err(|e| polars_err!(ComputeError: "invalid normal distribution: {}", e))
}

fn pick<'a>(rng: &mut StdRng, choices: &[&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape_and_columns() {
        let df = generate_sample_frame(42, 365).unwrap();

        assert_eq!(df.shape(), (365, 7));
        let names: Vec<_> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "date",
                "sales_amount",
                "customer_count",
                "region",
                "product_category",
                "discount_percentage",
                "satisfaction_score"
            ]
        );
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = generate_sample_frame(7, 50).unwrap();
        let b = generate_sample_frame(7, 50).unwrap();
        assert!(a.equals(&b));

        let c = generate_sample_frame(8, 50).unwrap();
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_sample_value_ranges() {
        let df = generate_sample_frame(42, 365).unwrap();

        let satisfaction = df.column("satisfaction_score").unwrap().f64().unwrap().clone();
        assert!(satisfaction.into_iter().flatten().all(|v| (1.0..=5.0).contains(&v)));

        let discount = df.column("discount_percentage").unwrap().f64().unwrap().clone();
        assert!(discount.into_iter().flatten().all(|v| (0.0..30.0).contains(&v)));

        let regions = df.column("region").unwrap().str().unwrap().clone();
        assert!(regions.into_iter().flatten().all(|r| REGIONS.contains(&r)));
    }

    #[test]
    fn test_customer_count_mean_is_close_to_fifty() {
        let df = generate_sample_frame(1, 2000).unwrap();
        let customers = df.column("customer_count").unwrap();

        assert_eq!(customers.dtype(), &DataType::Int64);
        let mean = customers.as_materialized_series().mean().unwrap();
        assert!((mean - 50.0).abs() < 1.5, "mean was {}", mean);
    }

    #[test]
    fn test_base_sales_centre_on_one_thousand() {
        let df = generate_sample_frame(3, 2000).unwrap();
        let sales = df.column("sales_amount").unwrap().as_materialized_series().clone();

        // Discounts of 0-30% lift the mean by about 15%
        let mean = sales.mean().unwrap();
        assert!((mean - 1150.0).abs() < 30.0, "mean was {}", mean);
    }

    #[test]
    fn test_first_date_is_new_year_2023() {
        let df = generate_sample_frame(42, 3).unwrap();
        let first = df.column("date").unwrap().get(0).unwrap().to_string();
        assert_eq!(first, "2023-01-01");
    }
}
