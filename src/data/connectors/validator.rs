use crate::error::{Result, SiglabError};
use polars::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Open,
    High,
    Low,
    Close,
}

impl RequiredColumn {
    pub fn all() -> [RequiredColumn; 4] {
        [
            RequiredColumn::Open,
            RequiredColumn::High,
            RequiredColumn::Low,
            RequiredColumn::Close,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredColumn::Open => "open",
            RequiredColumn::High => "high",
            RequiredColumn::Low => "low",
            RequiredColumn::Close => "close",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            RequiredColumn::Open => &["open", "Open", "OPEN", "o"],
            RequiredColumn::High => &["high", "High", "HIGH", "h"],
            RequiredColumn::Low => &["low", "Low", "LOW", "l"],
            RequiredColumn::Close => &["close", "Close", "CLOSE", "c", "adj_close", "Adj Close"],
        }
    }
}

const VOLUME_ALIASES: [&str; 4] = ["volume", "Volume", "vol", "Vol"];

/// Resolved column names after alias matching. Volume is optional.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    open: String,
    high: String,
    low: String,
    close: String,
    volume: Option<String>,
}

impl ColumnMap {
    pub fn name_of(&self, column: RequiredColumn) -> &str {
        match column {
            RequiredColumn::Open => &self.open,
            RequiredColumn::High => &self.high,
            RequiredColumn::Low => &self.low,
            RequiredColumn::Close => &self.close,
        }
    }

    pub fn volume_name(&self) -> Option<&str> {
        self.volume.as_deref()
    }
}

pub struct DataValidator;

impl DataValidator {
    /// Validate that a DataFrame has the required OHLC columns (volume is
    /// picked up when present) and that the price relationships hold.
    pub fn validate_ohlcv(df: &DataFrame) -> Result<ColumnMap> {
        let mut resolved: Vec<String> = Vec::with_capacity(4);

        for required in RequiredColumn::all() {
            match Self::find_column(df, required.aliases()) {
                Some(name) => resolved.push(name.to_string()),
                None => {
                    return Err(SiglabError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        let column_map = ColumnMap {
            open: resolved[0].clone(),
            high: resolved[1].clone(),
            low: resolved[2].clone(),
            close: resolved[3].clone(),
            volume: Self::find_column(df, &VOLUME_ALIASES).map(|s| s.to_string()),
        };

        // Validate column types are numeric
        for required in RequiredColumn::all() {
            let name = column_map.name_of(required);
            let series = df.column(name)?;
            if !matches!(
                series.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(SiglabError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    name,
                    required.as_str(),
                    series.dtype()
                )));
            }
        }

        Self::validate_ohlc_relationships(df, &column_map)?;

        Ok(column_map)
    }

    fn find_column<'a>(df: &'a DataFrame, aliases: &[&str]) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in aliases {
            if let Some(col) = columns.iter().find(|col| col.as_str() == *alias) {
                return Some(col.as_str());
            }
        }
        None
    }

    /// Validate OHLC relationships. Rows with missing values are skipped;
    /// null handling is reported separately by `check_nulls`.
    fn validate_ohlc_relationships(df: &DataFrame, column_map: &ColumnMap) -> Result<()> {
        let open = df
            .column(column_map.name_of(RequiredColumn::Open))?
            .cast(&DataType::Float64)?;
        let high = df
            .column(column_map.name_of(RequiredColumn::High))?
            .cast(&DataType::Float64)?;
        let low = df
            .column(column_map.name_of(RequiredColumn::Low))?
            .cast(&DataType::Float64)?;
        let close = df
            .column(column_map.name_of(RequiredColumn::Close))?
            .cast(&DataType::Float64)?;

        let open = open.f64()?;
        let high = high.f64()?;
        let low = low.f64()?;
        let close = close.f64()?;

        for i in 0..df.height() {
            if let (Some(o), Some(h), Some(l), Some(c)) =
                (open.get(i), high.get(i), low.get(i), close.get(i))
            {
                if h < l {
                    return Err(SiglabError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < low ({})",
                        i, h, l
                    )));
                }
                if h < o || h < c {
                    return Err(SiglabError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < open ({}) or close ({})",
                        i, h, o, c
                    )));
                }
                if l > o || l > c {
                    return Err(SiglabError::DataLoading(format!(
                        "Invalid data at row {}: low ({}) > open ({}) or close ({})",
                        i, l, o, c
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(SiglabError::InsufficientData(format!(
                "{} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Report null counts per column without failing; callers decide whether
    /// the gaps matter.
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn validates_good_data() {
        let df = df! {
            "open" => &[100.0, 101.0, 102.0],
            "high" => &[101.0, 103.0, 104.0],
            "low" => &[99.0, 100.0, 101.0],
            "close" => &[100.5, 102.0, 103.0],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        let map = DataValidator::validate_ohlcv(&df).unwrap();
        assert_eq!(map.name_of(RequiredColumn::Close), "close");
        assert_eq!(map.volume_name(), Some("volume"));
    }

    #[test]
    fn resolves_aliases() {
        let df = df! {
            "Open" => &[100.0, 101.0],
            "High" => &[101.0, 103.0],
            "Low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],
        }
        .unwrap();

        let map = DataValidator::validate_ohlcv(&df).unwrap();
        assert_eq!(map.name_of(RequiredColumn::Open), "Open");
        assert!(map.volume_name().is_none());
    }

    #[test]
    fn rejects_missing_column() {
        let df = df! {
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_err());
    }

    #[test]
    fn rejects_high_below_low() {
        let df = df! {
            "open" => &[100.0],
            "high" => &[98.0],
            "low" => &[99.0],
            "close" => &[99.5],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_err());
    }

    #[test]
    fn minimum_rows_enforced() {
        let df = df! {
            "close" => &[100.0, 101.0],
        }
        .unwrap();

        assert!(DataValidator::validate_minimum_rows(&df, 2).is_ok());
        assert!(matches!(
            DataValidator::validate_minimum_rows(&df, 3),
            Err(SiglabError::InsufficientData(_))
        ));
    }

    #[test]
    fn null_report_counts_gaps() {
        let df = df! {
            "close" => &[Some(100.0), None, Some(102.0)],
        }
        .unwrap();

        let report = DataValidator::check_nulls(&df).unwrap();
        assert_eq!(report, vec![("close".to_string(), 1)]);
    }
}
