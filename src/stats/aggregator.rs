//! Sales Aggregator Module
//! Grouped totals, rankings and KPIs over a (filtered) sales table.
//!
//! Every view is a pure function of `&Table`: rows are folded into a
//! `BTreeMap` keyed by the grouping label, then stably sorted where a
//! ranking is needed. Ties therefore keep label order on every run.

use crate::data::{Record, Table, YearMonth};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Default length of the product rankings.
pub const DEFAULT_TOP_N: usize = 10;

/// A grouping label with one summed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Sales and profit summed for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: String,
    pub sales: f64,
    pub profit: f64,
}

/// Sales summed for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub sales: f64,
}

/// One row plotted on the discount vs profit scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountPoint {
    pub discount: f64,
    pub profit: f64,
    pub category: String,
    pub product_name: String,
    pub sales: f64,
}

/// Headline figures for the filtered table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub order_count: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    /// Percent; 0 when there are no sales.
    pub profit_margin: f64,
}

/// KPIs plus every aggregate view for one table snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub kpis: Kpis,
    pub region_sales: Vec<GroupTotal>,
    pub category_performance: Vec<CategoryTotals>,
    pub monthly_trend: Vec<MonthTotal>,
    pub top_products: Vec<GroupTotal>,
    pub loss_products: Vec<GroupTotal>,
    #[serde(skip)]
    pub discount_points: Vec<DiscountPoint>,
}

impl SalesReport {
    pub fn build(table: &Table, top_n: usize) -> Self {
        let ranking = SalesAggregator::product_profit_ranking(table);
        Self {
            kpis: SalesAggregator::kpis(table),
            region_sales: SalesAggregator::region_sales(table),
            category_performance: SalesAggregator::category_performance(table),
            monthly_trend: SalesAggregator::monthly_trend(table),
            top_products: ranking.iter().take(top_n).cloned().collect(),
            loss_products: ranking.iter().rev().take(top_n).cloned().collect(),
            discount_points: SalesAggregator::discount_profit(table),
        }
    }
}

/// Profit as a percentage of sales, 0 when sales are exactly 0.
pub fn profit_margin(total_sales: f64, total_profit: f64) -> f64 {
    if total_sales == 0.0 {
        0.0
    } else {
        total_profit / total_sales * 100.0
    }
}

/// Computes the aggregate views.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Sales per region, largest first.
    pub fn region_sales(table: &Table) -> Vec<GroupTotal> {
        let mut totals = Self::sum_by(table, |r| r.region.as_str(), |r| r.sales);
        Self::sort_descending(&mut totals);
        totals
    }

    /// Sales and profit per category, in category order.
    pub fn category_performance(table: &Table) -> Vec<CategoryTotals> {
        let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in table {
            let entry = groups.entry(record.category.as_str()).or_default();
            entry.0 += record.sales;
            entry.1 += record.profit;
        }
        groups
            .into_iter()
            .map(|(category, (sales, profit))| CategoryTotals {
                category: category.to_string(),
                sales,
                profit,
            })
            .collect()
    }

    /// Sales per order month, oldest first.
    pub fn monthly_trend(table: &Table) -> Vec<MonthTotal> {
        let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for record in table {
            *months.entry(record.month()).or_default() += record.sales;
        }
        months
            .into_iter()
            .map(|(month, sales)| MonthTotal { month, sales })
            .collect()
    }

    /// The `n` products with the highest summed profit.
    pub fn top_profitable_products(table: &Table, n: usize) -> Vec<GroupTotal> {
        Self::product_profit_ranking(table)
            .into_iter()
            .take(n)
            .collect()
    }

    /// The `n` products with the lowest summed profit, worst first.
    pub fn top_loss_products(table: &Table, n: usize) -> Vec<GroupTotal> {
        Self::product_profit_ranking(table)
            .into_iter()
            .rev()
            .take(n)
            .collect()
    }

    /// Every product by summed profit, highest first.
    ///
    /// The loss ranking walks this list from the back, so the two top-n
    /// lists never share a product while at least `2n` products exist.
    pub fn product_profit_ranking(table: &Table) -> Vec<GroupTotal> {
        let mut totals = Self::sum_by(table, |r| r.product_name.as_str(), |r| r.profit);
        Self::sort_descending(&mut totals);
        totals
    }

    pub fn kpis(table: &Table) -> Kpis {
        let total_sales: f64 = table.iter().map(|r| r.sales).sum();
        let total_profit: f64 = table.iter().map(|r| r.profit).sum();
        Kpis {
            order_count: table.len(),
            total_sales,
            total_profit,
            profit_margin: profit_margin(total_sales, total_profit),
        }
    }

    pub fn discount_profit(table: &Table) -> Vec<DiscountPoint> {
        table
            .iter()
            .map(|r| DiscountPoint {
                discount: r.discount,
                profit: r.profit,
                category: r.category.clone(),
                product_name: r.product_name.clone(),
                sales: r.sales,
            })
            .collect()
    }

    fn sum_by<'a>(
        table: &'a Table,
        key: impl Fn(&'a Record) -> &'a str,
        value: impl Fn(&Record) -> f64,
    ) -> Vec<GroupTotal> {
        let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
        for record in table {
            *groups.entry(key(record)).or_default() += value(record);
        }
        groups
            .into_iter()
            .map(|(key, value)| GroupTotal {
                key: key.to_string(),
                value,
            })
            .collect()
    }

    /// Stable, so equal totals stay in label order.
    fn sort_descending(totals: &mut [GroupTotal]) {
        totals.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    }
}
