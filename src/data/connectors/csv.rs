use super::validator::DataValidator;
use crate::data::PriceSeries;
use crate::error::{Result, SiglabError};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load a CSV file into a DataFrame.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| SiglabError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV file and convert it into a validated price series.
    ///
    /// Nulls are reported but do not fail the load; they become NaN bars
    /// that the labeling strategies treat as non-triggering.
    pub fn load_series<P: AsRef<Path>>(path: P, min_rows: Option<usize>) -> Result<PriceSeries> {
        let df = Self::load(&path)?;

        if let Some(min_rows) = min_rows {
            DataValidator::validate_minimum_rows(&df, min_rows)?;
        }

        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!(
                "Null values in {}: {:?}",
                path.as_ref().display(),
                null_report
            );
        }

        PriceSeries::from_dataframe(&df)
    }
}
