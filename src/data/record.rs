//! Sales Record Model
//! One transaction row, the immutable table of rows, and the month key.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// One sales transaction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub region: String,
    pub category: String,
    pub product_name: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    pub discount: f64,
}

impl Record {
    /// Month bucket of the order date.
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.order_date)
    }
}

/// Calendar month key, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Read-only, ordered collection of records for one run.
///
/// Filtering produces a new `Table`; nothing mutates the rows after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct regions.
    pub fn regions(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Sorted distinct categories.
    pub fn categories(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.category.as_str()))
    }

    /// Earliest and latest order date, if any rows exist.
    pub fn order_date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.order_date).min()?;
        let max = self.records.iter().map(|r| r.order_date).max()?;
        Some((min, max))
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = values.map(str::to_string).collect();
        out.sort();
        out.dedup();
        out
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
