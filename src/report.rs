//! Text Report
//! Plain-text rendering of a [`SalesReport`] for the batch binary, plus the
//! number formatting shared with the dashboard.

use crate::stats::{GroupTotal, SalesReport};
use std::fmt::Write;
use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

/// `$1,234` style amount, rounded to whole units.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Percentage with two decimals, e.g. `10.00%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render every section of the report as aligned text columns.
pub fn render_text(report: &SalesReport) -> String {
    let mut out = String::new();
    let kpis = &report.kpis;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Orders:        {}", kpis.order_count);
    let _ = writeln!(out, "Total Sales:   {}", format_currency(kpis.total_sales));
    let _ = writeln!(out, "Total Profit:  {}", format_currency(kpis.total_profit));
    let _ = writeln!(out, "Profit Margin: {}", format_percent(kpis.profit_margin));

    write_totals(&mut out, "Sales by Region:", "region", "sales", &report.region_sales);

    let _ = writeln!(out, "\nCategory Performance:");
    let width = label_width(report.category_performance.iter().map(|c| c.category.as_str()), "category");
    let _ = writeln!(out, "{:<width$}  {:>14}  {:>14}", "category", "sales", "profit");
    for row in &report.category_performance {
        let _ = writeln!(
            out,
            "{:<width$}  {:>14.4}  {:>14.4}",
            row.category, row.sales, row.profit
        );
    }
    if report.category_performance.is_empty() {
        let _ = writeln!(out, "(no rows)");
    }

    let _ = writeln!(out, "\nMonthly Sales Trend:");
    let _ = writeln!(out, "{:<7}  {:>14}", "month", "sales");
    for row in &report.monthly_trend {
        let _ = writeln!(out, "{:<7}  {:>14.4}", row.month.to_string(), row.sales);
    }
    if report.monthly_trend.is_empty() {
        let _ = writeln!(out, "(no rows)");
    }

    write_totals(
        &mut out,
        "Top Profitable Products:",
        "product_name",
        "profit",
        &report.top_products,
    );
    write_totals(
        &mut out,
        "Top Loss-Making Products:",
        "product_name",
        "profit",
        &report.loss_products,
    );

    out
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>, header: &str) -> usize {
    labels
        .map(|l| l.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

fn write_totals(out: &mut String, title: &str, key_header: &str, value_header: &str, rows: &[GroupTotal]) {
    let _ = writeln!(out, "\n{}", title);
    let width = label_width(rows.iter().map(|r| r.key.as_str()), key_header);
    let _ = writeln!(out, "{:<width$}  {:>14}", key_header, value_header);
    for row in rows {
        let _ = writeln!(out, "{:<width$}  {:>14.4}", row.key, row.value);
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no rows)");
    }
}

/// Write the report as pretty JSON, flushing before returning.
pub fn write_json_summary(report: &SalesReport, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Table};
    use crate::stats::DEFAULT_TOP_N;
    use chrono::NaiveDate;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(2_297_200.86), "$2,297,201");
        assert_eq!(format_currency(-286_397.02), "-$286,397");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(10.0), "10.00%");
        assert_eq!(format_percent(12.4671), "12.47%");
    }

    #[test]
    fn text_report_lists_sections_in_order() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let table = Table::new(vec![Record {
            region: "West".into(),
            category: "Furniture".into(),
            product_name: "Chair".into(),
            order_date: d,
            ship_date: d,
            sales: 30.0,
            profit: 3.0,
            discount: 0.0,
        }]);
        let text = render_text(&SalesReport::build(&table, DEFAULT_TOP_N));

        let sections = [
            "Profit Margin: 10.00%",
            "Sales by Region:",
            "Category Performance:",
            "Monthly Sales Trend:",
            "2023-01",
            "Top Profitable Products:",
            "Top Loss-Making Products:",
        ];
        let mut cursor = 0;
        for section in sections {
            let found = text[cursor..]
                .find(section)
                .unwrap_or_else(|| panic!("missing '{section}' in:\n{text}"));
            cursor += found + section.len();
        }
    }

    #[test]
    fn empty_report_marks_sections() {
        let text = render_text(&SalesReport::build(&Table::default(), DEFAULT_TOP_N));
        assert!(text.contains("Total Sales:   $0"));
        assert_eq!(text.matches("(no rows)").count(), 5);
    }

    #[test]
    fn json_summary_is_complete_on_disk() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let table = Table::new(vec![Record {
            region: "East".into(),
            category: "Technology".into(),
            product_name: "Phone".into(),
            order_date: d,
            ship_date: d,
            sales: 100.0,
            profit: 20.0,
            discount: 0.0,
        }]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_json_summary(&SalesReport::build(&table, DEFAULT_TOP_N), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["kpis"]["order_count"], 1);
        assert_eq!(value["monthly_trend"][0]["month"], "2023-01");
        assert!(value.get("discount_points").is_none());
    }

    #[test]
    fn json_summary_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.json");
        let report = SalesReport::build(&Table::default(), DEFAULT_TOP_N);
        assert!(write_json_summary(&report, &path).is_err());
    }
}
