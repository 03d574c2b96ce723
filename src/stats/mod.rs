//! Stats module - grouped aggregates and KPIs

mod aggregator;

pub use aggregator::{
    profit_margin, CategoryTotals, DiscountPoint, GroupTotal, Kpis, MonthTotal, SalesAggregator,
    SalesReport, DEFAULT_TOP_N,
};
