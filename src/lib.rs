//! Salescope - Sales Dataset Aggregation Report & Interactive Dashboard
//!
//! Loads a sales CSV, narrows it with optional region/category/date filters
//! and derives grouped totals, rankings and KPIs from the result.

pub mod charts;
pub mod data;
pub mod gui;
pub mod logging;
pub mod report;
pub mod settings;
pub mod stats;
