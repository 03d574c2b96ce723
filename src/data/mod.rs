//! Data module - CSV loading, record model and filtering

mod filter;
mod loader;
mod record;

pub use filter::{DateRange, FilterCriteria, FilterOptions, Selection, ALL_LABEL};
pub use loader::{
    normalize_column_name, DataLoader, LoaderError, TextEncoding, DEFAULT_DATE_FORMATS,
    REQUIRED_COLUMNS,
};
pub use record::{Record, Table, YearMonth};
