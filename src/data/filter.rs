//! Filter Stage
//! Immutable filter criteria and the pure function narrowing a table with them.

use crate::data::{Record, Table};
use chrono::NaiveDate;
use tracing::debug;

/// Label that stands for "no constraint" in region/category pickers.
pub const ALL_LABEL: &str = "All";

/// A categorical constraint: everything, or exactly one observed label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Map a picker label to a selection; `"All"` means unconstrained.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            Selection::All
        } else {
            Selection::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL_LABEL,
            Selection::Only(value) => value,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

/// Inclusive date range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// User-selected constraints, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub region: Selection,
    pub category: Selection,
    pub order_dates: DateRange,
}

impl FilterCriteria {
    /// Criteria that keep every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Selection) -> Self {
        self.region = region;
        self
    }

    pub fn with_category(mut self, category: Selection) -> Self {
        self.category = category;
        self
    }

    pub fn with_order_dates(mut self, order_dates: DateRange) -> Self {
        self.order_dates = order_dates;
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.region.matches(&record.region)
            && self.category.matches(&record.category)
            && self.order_dates.contains(record.order_date)
    }

    /// Rows satisfying every criterion, in their original order.
    pub fn apply(&self, table: &Table) -> Table {
        let kept: Vec<Record> = table.iter().filter(|r| self.matches(r)).cloned().collect();
        debug!(
            region = self.region.label(),
            category = self.category.label(),
            input_rows = table.len(),
            kept_rows = kept.len(),
            "applied filters"
        );
        Table::new(kept)
    }
}

/// Choices offered to the user for a loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// `"All"` followed by the sorted distinct regions.
    pub regions: Vec<String>,
    /// `"All"` followed by the sorted distinct categories.
    pub categories: Vec<String>,
    /// Observed order-date span; the default date range.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let with_all = |labels: Vec<String>| {
            std::iter::once(ALL_LABEL.to_string())
                .chain(labels)
                .collect::<Vec<_>>()
        };
        Self {
            regions: with_all(table.regions()),
            categories: with_all(table.categories()),
            date_span: table.order_date_span(),
        }
    }

    /// Criteria matching the initial state of the pickers.
    pub fn default_criteria(&self) -> FilterCriteria {
        let order_dates = self
            .date_span
            .map(|(start, end)| DateRange::new(start, end))
            .unwrap_or_default();
        FilterCriteria::all().with_order_dates(order_dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(region: &str, category: &str, order_date: NaiveDate, sales: f64) -> Record {
        Record {
            region: region.to_string(),
            category: category.to_string(),
            product_name: format!("{region} {category}"),
            order_date,
            ship_date: order_date,
            sales,
            profit: sales / 10.0,
            discount: 0.0,
        }
    }

    fn sample() -> Table {
        Table::new(vec![
            record("East", "Furniture", date(2023, 1, 15), 100.0),
            record("East", "Technology", date(2023, 2, 1), 50.0),
            record("West", "Furniture", date(2023, 3, 31), 30.0),
            record("Central", "Technology", date(2023, 4, 2), 20.0),
        ])
    }

    #[test]
    fn all_criteria_keep_everything() {
        let table = sample();
        assert_eq!(FilterCriteria::all().apply(&table), table);

        let options = FilterOptions::from_table(&table);
        assert_eq!(options.default_criteria().apply(&table), table);
    }

    #[test]
    fn region_selection_narrows_rows() {
        let table = sample();
        let criteria = FilterCriteria::all().with_region(Selection::from_label("West"));
        let filtered = criteria.apply(&table);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].region, "West");
    }

    #[test]
    fn criteria_combine_with_and() {
        let table = sample();
        let criteria = FilterCriteria::all()
            .with_region(Selection::Only("East".into()))
            .with_category(Selection::Only("Technology".into()));
        let filtered = criteria.apply(&table);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].sales, 50.0);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let table = sample();
        let criteria = FilterCriteria::all()
            .with_order_dates(DateRange::new(date(2023, 2, 1), date(2023, 3, 31)));
        let filtered = criteria.apply(&table);
        let sales: Vec<f64> = filtered.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![50.0, 30.0]);
    }

    #[test]
    fn open_ended_range() {
        let range = DateRange {
            start: Some(date(2023, 3, 1)),
            end: None,
        };
        assert!(range.contains(date(2030, 1, 1)));
        assert!(!range.contains(date(2023, 2, 28)));
        assert!(DateRange::unbounded().is_unbounded());
    }

    #[test]
    fn filtering_is_idempotent() {
        let table = sample();
        let criteria = FilterCriteria::all()
            .with_category(Selection::Only("Furniture".into()))
            .with_order_dates(DateRange::new(date(2023, 1, 1), date(2023, 12, 31)));
        let once = criteria.apply(&table);
        assert_eq!(criteria.apply(&once), once);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let table = sample();
        let criteria = FilterCriteria::all().with_region(Selection::Only("North".into()));
        assert!(criteria.apply(&table).is_empty());

        let inverted = FilterCriteria::all()
            .with_order_dates(DateRange::new(date(2023, 5, 1), date(2023, 1, 1)));
        assert!(inverted.apply(&table).is_empty());
    }

    #[test]
    fn filtering_preserves_order() {
        let table = sample();
        let criteria = FilterCriteria::all().with_category(Selection::Only("Technology".into()));
        let filtered = criteria.apply(&table);
        let regions: Vec<&str> = filtered.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["East", "Central"]);
    }

    #[test]
    fn options_list_all_first() {
        let options = FilterOptions::from_table(&sample());
        assert_eq!(options.regions, vec!["All", "Central", "East", "West"]);
        assert_eq!(options.categories, vec!["All", "Furniture", "Technology"]);
        assert_eq!(
            options.date_span,
            Some((date(2023, 1, 15), date(2023, 4, 2)))
        );
        assert_eq!(Selection::from_label(ALL_LABEL), Selection::All);
    }
}
