//! CSV Data Loader Module
//! Reads the sales file, decodes it, parses it with Polars and builds the record table.

use crate::data::{Record, Table};
use crate::settings::DataSettings;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns every input file must provide (after header normalization).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "region",
    "category",
    "product_name",
    "order_date",
    "ship_date",
    "sales",
    "profit",
    "discount",
];

/// Numeric cell text read as a missing value, like a blank cell.
const MISSING_NUMBER_TOKENS: [&str; 8] = ["nan", "-nan", "na", "n/a", "#n/a", "<na>", "null", "none"];

/// Date formats tried, in order, when none are configured.
pub const DEFAULT_DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode input as {encoding}: {source}")]
    Encoding {
        encoding: TextEncoding,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: String },
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a date")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Text encoding of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value.
    #[default]
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String, LoaderError> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|source| LoaderError::Encoding {
                    encoding: *self,
                    source,
                })
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("unsupported encoding '{}'", other)),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lowercase a header and replace spaces with underscores.
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Loads the sales file into a [`Table`].
#[derive(Debug, Clone)]
pub struct DataLoader {
    encoding: TextEncoding,
    date_formats: Vec<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(TextEncoding::default())
    }
}

impl DataLoader {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn from_settings(settings: &DataSettings) -> Self {
        Self::new(settings.encoding).with_date_formats(settings.date_formats.clone())
    }

    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        if !formats.is_empty() {
            self.date_formats = formats;
        }
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Read, decode and parse the file at `path`.
    pub fn load_table(&self, path: &Path) -> Result<Table, LoaderError> {
        let started = Instant::now();
        let bytes = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoaderError::NotFound(path.to_path_buf())
            } else {
                LoaderError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), encoding = %self.encoding, "read data file");

        let text = self.encoding.decode(&bytes)?;
        let table = self.parse_table(&text)?;

        info!(
            path = %path.display(),
            rows = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded sales table"
        );
        Ok(table)
    }

    /// Parse already-decoded CSV text.
    pub fn parse_table(&self, text: &str) -> Result<Table, LoaderError> {
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            // Every column stays text; cells are parsed per column below.
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;

        let normalized: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| normalize_column_name(name.as_str()))
            .collect();
        df.set_column_names(normalized.iter().map(String::as_str))?;

        for column in REQUIRED_COLUMNS {
            if df.column(column).is_err() {
                return Err(LoaderError::MissingColumn(column.to_string()));
            }
        }

        let regions = Self::text_column(&df, "region")?;
        let categories = Self::text_column(&df, "category")?;
        let products = Self::text_column(&df, "product_name")?;
        let order_dates = self.date_column(&df, "order_date")?;
        let ship_dates = self.date_column(&df, "ship_date")?;
        let sales = Self::numeric_column(&df, "sales")?;
        let profits = Self::numeric_column(&df, "profit")?;
        let discounts = Self::numeric_column(&df, "discount")?;

        let records = (0..df.height())
            .map(|i| Record {
                region: regions[i].clone(),
                category: categories[i].clone(),
                product_name: products[i].clone(),
                order_date: order_dates[i],
                ship_date: ship_dates[i],
                sales: sales[i],
                profit: profits[i],
                discount: discounts[i],
            })
            .collect();

        Ok(Table::new(records))
    }

    /// Cells of a column as optional strings; blank cells become `None`.
    fn cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?
            .cast(&DataType::String)?;
        let values = column
            .str()?
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(values)
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, LoaderError> {
        Self::cells(df, name)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| LoaderError::MissingValue {
                    row: i + 1,
                    column: name.to_string(),
                })
            })
            .collect()
    }

    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, LoaderError> {
        let mut blanks = 0usize;
        let values = Self::cells(df, name)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Some(s) if !is_missing_number(&s) => match s.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(LoaderError::InvalidNumber {
                        row: i + 1,
                        column: name.to_string(),
                        value: s,
                    }),
                },
                _ => {
                    blanks += 1;
                    Ok(0.0)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if blanks > 0 {
            warn!(column = name, blanks, "missing numeric cells counted as zero");
        }
        Ok(values)
    }

    fn date_column(&self, df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>, LoaderError> {
        Self::cells(df, name)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let value = v.ok_or_else(|| LoaderError::MissingValue {
                    row: i + 1,
                    column: name.to_string(),
                })?;
                self.parse_date(&value).ok_or_else(|| LoaderError::InvalidDate {
                    row: i + 1,
                    column: name.to_string(),
                    value,
                })
            })
            .collect()
    }

    /// Try each configured format; a trailing time component is ignored.
    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let parse = |text: &str| {
            self.date_formats
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        };
        parse(value).or_else(|| {
            let (date_part, _time) = value.split_once([' ', 'T'])?;
            parse(date_part)
        })
    }
}

fn is_missing_number(text: &str) -> bool {
    MISSING_NUMBER_TOKENS
        .iter()
        .any(|token| text.eq_ignore_ascii_case(token))
}
