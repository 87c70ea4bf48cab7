//! Loading gage activity data and aggregating it into yearly active-site
//! counts. All heavy lifting goes through Polars; the public API deals in the
//! typed structs from [`crate::types`].

use crate::types::{GageRecord, SiteLocation, YearlyCount};
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to read column '{column}' from '{path}'")]
    Column {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Null value in column '{column}' of '{path}'")]
    NullValue { path: PathBuf, column: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

/// Aggregates (site, year) records into one [`YearlyCount`] per year present
/// in the input, sorted ascending by year.
///
/// The count for a year is the number of *distinct* sites with at least one
/// record in that year; duplicate (site, year) pairs collapse to one. Years
/// absent from the input are simply absent from the output (no zero-filling).
pub fn yearly_site_counts(records: &[GageRecord]) -> Result<Vec<YearlyCount>, DataError> {
    let site_ids: Vec<&str> = records.iter().map(|r| r.site_id.as_str()).collect();
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();

    let counts = df!("site_id" => site_ids, "year" => years)?
        .lazy()
        .group_by([col("year")])
        .agg([col("site_id").n_unique().alias("active_sites")])
        .sort(["year"], SortMultipleOptions::default())
        .collect()?;

    let year_col = counts.column("year")?.i32()?;
    let count_col = counts.column("active_sites")?.u32()?;

    Ok(year_col
        .into_iter()
        .zip(count_col)
        .filter_map(|(year, count)| {
            // Grouping keys and n_unique results are never null here.
            Some(YearlyCount {
                year: year?,
                count: count?,
            })
        })
        .collect())
}

/// Loads gage activity records from a headered CSV with `site_id` and `year`
/// columns.
pub fn load_gage_records(path: &Path) -> Result<Vec<GageRecord>, DataError> {
    let df = read_csv(path)?;
    let sites = str_column(&df, path, "site_id")?;
    let years = int_column(&df, path, "year")?;
    let years = years.i32().map_err(|e| column_error(path, "year", e))?;

    let mut records = Vec::with_capacity(df.height());
    for (site, year) in sites.into_iter().zip(years) {
        let Some(site) = site else {
            return Err(null_value(path, "site_id"));
        };
        let Some(year) = year else {
            return Err(null_value(path, "year"));
        };
        records.push(GageRecord::new(site, year));
    }
    info!("Loaded {} gage records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads site geometries from a headered CSV with `site_id`, `longitude` and
/// `latitude` columns.
pub fn load_site_locations(path: &Path) -> Result<Vec<SiteLocation>, DataError> {
    let df = read_csv(path)?;
    let sites = str_column(&df, path, "site_id")?;
    let lons = float_column(&df, path, "longitude")?;
    let lats = float_column(&df, path, "latitude")?;
    let lons = lons.f64().map_err(|e| column_error(path, "longitude", e))?;
    let lats = lats.f64().map_err(|e| column_error(path, "latitude", e))?;

    let mut locations = Vec::with_capacity(df.height());
    for ((site, lon), lat) in sites.into_iter().zip(lons).zip(lats) {
        let Some(site) = site else {
            return Err(null_value(path, "site_id"));
        };
        let (Some(lon), Some(lat)) = (lon, lat) else {
            return Err(null_value(path, "longitude/latitude"));
        };
        locations.push(SiteLocation::new(site, lon, lat));
    }
    info!(
        "Loaded {} site locations from {}",
        locations.len(),
        path.display()
    );
    Ok(locations)
}

fn read_csv(path: &Path) -> Result<DataFrame, DataError> {
    // Site codes carry leading zeros; never let them parse as integers.
    let overrides = Schema::from_iter([Field::new("site_id".into(), DataType::String)]);
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overrides)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::CsvRead {
            path: path.to_path_buf(),
            source: e,
        })
}

fn str_column<'a>(
    df: &'a DataFrame,
    path: &Path,
    name: &str,
) -> Result<&'a StringChunked, DataError> {
    df.column(name)
        .and_then(|c| c.str())
        .map_err(|e| column_error(path, name, e))
}

/// Reads a column as `Int32` regardless of the width the CSV reader inferred.
fn int_column(df: &DataFrame, path: &Path, name: &str) -> Result<Column, DataError> {
    df.column(name)
        .and_then(|c| c.cast(&DataType::Int32))
        .map_err(|e| column_error(path, name, e))
}

/// Reads a column as `Float64`, tolerating integer-inferred CSV columns.
fn float_column(df: &DataFrame, path: &Path, name: &str) -> Result<Column, DataError> {
    df.column(name)
        .and_then(|c| c.cast(&DataType::Float64))
        .map_err(|e| column_error(path, name, e))
}

fn column_error(path: &Path, column: &str, source: PolarsError) -> DataError {
    DataError::Column {
        path: path.to_path_buf(),
        column: column.to_string(),
        source,
    }
}

fn null_value(path: &Path, column: &str) -> DataError {
    DataError::NullValue {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(site: &str, year: i32) -> GageRecord {
        GageRecord::new(site, year)
    }

    #[test]
    fn counts_distinct_sites_per_year() {
        let records = vec![
            record("A", 1900),
            record("B", 1900),
            record("A", 1901),
            record("C", 1903),
            record("B", 1903),
            record("A", 1903),
        ];
        let counts = yearly_site_counts(&records).unwrap();
        assert_eq!(
            counts,
            vec![
                YearlyCount {
                    year: 1900,
                    count: 2
                },
                YearlyCount {
                    year: 1901,
                    count: 1
                },
                YearlyCount {
                    year: 1903,
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn duplicate_records_collapse() {
        let records = vec![record("A", 1950), record("A", 1950), record("A", 1950)];
        let counts = yearly_site_counts(&records).unwrap();
        assert_eq!(
            counts,
            vec![YearlyCount {
                year: 1950,
                count: 1
            }]
        );
    }

    #[test]
    fn absent_years_stay_absent() {
        let records = vec![record("A", 1900), record("A", 1910)];
        let counts = yearly_site_counts(&records).unwrap();
        let years: Vec<i32> = counts.iter().map(|c| c.year).collect();
        assert_eq!(years, vec![1900, 1910]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let counts = yearly_site_counts(&[]).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn output_is_sorted_by_year() {
        let records = vec![record("A", 1990), record("B", 1890), record("C", 1940)];
        let counts = yearly_site_counts(&records).unwrap();
        let years: Vec<i32> = counts.iter().map(|c| c.year).collect();
        assert_eq!(years, vec![1890, 1940, 1990]);
    }

    #[test]
    fn loads_records_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("records.csv");
        fs::write(&csv, "site_id,year\n05553700,1988\n05558300,1990\n").unwrap();

        let records = load_gage_records(&csv).unwrap();
        assert_eq!(
            records,
            vec![record("05553700", 1988), record("05558300", 1990)]
        );
    }

    #[test]
    fn loads_site_locations_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sites.csv");
        fs::write(
            &csv,
            "site_id,longitude,latitude\n05553700,-89.15,41.32\n05558300,-89.46,41.10\n",
        )
        .unwrap();

        let locations = load_site_locations(&csv).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].site_id, "05553700");
        assert!((locations[0].longitude - -89.15).abs() < 1e-9);
        assert!((locations[1].latitude - 41.10).abs() < 1e-9);
    }

    #[test]
    fn missing_csv_reports_path() {
        let err = load_gage_records(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataError::CsvRead { .. }));
    }
}
