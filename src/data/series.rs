use crate::data::connectors::validator::{DataValidator, RequiredColumn};
use crate::error::{Result, SiglabError};
use chrono::NaiveDate;
use polars::prelude::*;

/// Immutable OHLC(V) history indexed by strictly increasing dates.
///
/// All engine components borrow a series read-only and allocate fresh
/// outputs; nothing here is ever mutated after construction. NaN values are
/// permitted (they mark missing bars and never trigger labels or barriers),
/// but finite closes must be positive since close ratios are taken
/// throughout.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
}

impl PriceSeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = dates.len();
        if open.len() != n || high.len() != n || low.len() != n || close.len() != n {
            return Err(SiglabError::DataLoading(format!(
                "Column lengths differ: {} dates vs {}/{}/{}/{} OHLC",
                n,
                open.len(),
                high.len(),
                low.len(),
                close.len()
            )));
        }
        if let Some(v) = &volume {
            if v.len() != n {
                return Err(SiglabError::DataLoading(format!(
                    "Volume length {} does not match {} bars",
                    v.len(),
                    n
                )));
            }
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SiglabError::DataLoading(format!(
                    "Dates must be strictly increasing, found {} after {}",
                    pair[1], pair[0]
                )));
            }
        }
        let mut nan_closes = 0usize;
        for (i, &c) in close.iter().enumerate() {
            if c.is_nan() {
                nan_closes += 1;
            } else if c <= 0.0 {
                return Err(SiglabError::DataLoading(format!(
                    "Close at row {} is {}; closes must be positive",
                    i, c
                )));
            }
        }
        if nan_closes > 0 {
            log::warn!("{} of {} closes are NaN", nan_closes, n);
        }

        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Build a series from closes alone, copying them into the other price
    /// columns. Useful when only one price stream is available.
    pub fn from_close(dates: Vec<NaiveDate>, close: Vec<f64>) -> Result<Self> {
        let open = close.clone();
        let high = close.clone();
        let low = close.clone();
        Self::new(dates, open, high, low, close, None)
    }

    /// Extract a series from a DataFrame with OHLC columns (common alias
    /// spellings accepted) and a date column.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let column_map = DataValidator::validate_ohlcv(df)?;

        let dates = extract_dates(df)?;
        let open = extract_f64(df, column_map.name_of(RequiredColumn::Open))?;
        let high = extract_f64(df, column_map.name_of(RequiredColumn::High))?;
        let low = extract_f64(df, column_map.name_of(RequiredColumn::Low))?;
        let close = extract_f64(df, column_map.name_of(RequiredColumn::Close))?;
        let volume = match column_map.volume_name() {
            Some(name) => Some(extract_f64(df, name)?),
            None => None,
        };

        Self::new(dates, open, high, low, close, volume)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }
}

fn extract_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.f64()?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

const DATE_ALIASES: [&str; 6] = ["date", "datetime", "time", "timestamp", "Date", "DateTime"];

fn extract_dates(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    let columns = df.get_column_names();
    let name = DATE_ALIASES
        .iter()
        .find(|&&alias| columns.iter().any(|col| col.as_str() == alias))
        .ok_or_else(|| {
            SiglabError::DataLoading(format!(
                "Missing date column (tried aliases: {:?})",
                DATE_ALIASES
            ))
        })?;

    // Going through a string cast handles both native Date columns and
    // plain text columns with one parser.
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;

    let mut dates = Vec::with_capacity(df.height());
    for (i, value) in values.into_iter().enumerate() {
        let text = value.ok_or_else(|| {
            SiglabError::DataLoading(format!("Null date at row {}", i))
        })?;
        // Accept bare dates and datetime strings with a date prefix.
        let prefix = text.get(..10).unwrap_or(text);
        let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| {
            SiglabError::DataLoading(format!("Unparseable date '{}' at row {}", text, i))
        })?;
        dates.push(date);
    }
    Ok(dates)
}
