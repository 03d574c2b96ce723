//! Load -> filter -> aggregate, end to end through the public API.

use chrono::NaiveDate;
use salescope::data::{DataLoader, DateRange, FilterCriteria, FilterOptions, Selection, TextEncoding};
use salescope::report::render_text;
use salescope::stats::{GroupTotal, SalesReport, DEFAULT_TOP_N};
use std::io::Write;

const CSV: &[u8] = b"\
Row ID,Order Date,Ship Date,Region,Category,Product Name,Sales,Quantity,Discount,Profit
1,1/15/2023,1/18/2023,East,Technology,Phone,100,1,0,10
2,1/20/2023,1/25/2023,East,Furniture,Chair,50,1,0.2,-5
3,2/3/2023,2/8/2023,West,Furniture,Caf\xe9 Table,30,1,0,3
";

fn write_dataset() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CSV).unwrap();
    file
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn full_table_report() {
    let file = write_dataset();
    let table = DataLoader::new(TextEncoding::Latin1)
        .load_table(file.path())
        .unwrap();
    assert_eq!(table.len(), 3);

    let options = FilterOptions::from_table(&table);
    let unfiltered = options.default_criteria().apply(&table);
    assert_eq!(unfiltered, table);

    let report = SalesReport::build(&unfiltered, DEFAULT_TOP_N);
    assert_eq!(
        report.region_sales,
        vec![
            GroupTotal { key: "East".into(), value: 150.0 },
            GroupTotal { key: "West".into(), value: 30.0 },
        ]
    );
    let months: Vec<String> = report.monthly_trend.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(months, vec!["2023-01", "2023-02"]);
    assert_eq!(report.monthly_trend[0].sales, 150.0);
    assert_eq!(report.loss_products[0].key, "Chair");
    assert_eq!(report.top_products[0].key, "Phone");
    assert_eq!(report.top_products[1].key, "Café Table");

    let text = render_text(&report);
    assert!(text.contains("Café Table"));
}

#[test]
fn west_only_report() {
    let file = write_dataset();
    let table = DataLoader::default().load_table(file.path()).unwrap();

    let criteria = FilterCriteria::all().with_region(Selection::from_label("West"));
    let west = criteria.apply(&table);
    assert_eq!(west.len(), 1);
    assert_eq!(criteria.apply(&west), west);

    let report = SalesReport::build(&west, DEFAULT_TOP_N);
    assert_eq!(report.kpis.total_sales, 30.0);
    assert_eq!(report.kpis.total_profit, 3.0);
    assert_eq!(format!("{:.2}%", report.kpis.profit_margin), "10.00%");
}

#[test]
fn filters_excluding_everything_yield_empty_views() {
    let file = write_dataset();
    let table = DataLoader::default().load_table(file.path()).unwrap();

    let criteria = FilterCriteria::all()
        .with_category(Selection::Only("Technology".into()))
        .with_order_dates(DateRange::new(date(2023, 2, 1), date(2023, 2, 28)));
    let empty = criteria.apply(&table);
    assert!(empty.is_empty());

    let report = SalesReport::build(&empty, DEFAULT_TOP_N);
    assert_eq!(report.kpis.profit_margin, 0.0);
    assert!(report.region_sales.is_empty());
    assert!(report.top_products.is_empty());
}

#[test]
fn summary_serializes_month_keys_as_text() {
    let file = write_dataset();
    let table = DataLoader::default().load_table(file.path()).unwrap();
    let report = SalesReport::build(&table, DEFAULT_TOP_N);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["monthly_trend"][0]["month"], "2023-01");
    assert_eq!(json["kpis"]["order_count"], 3);
    assert!(json.get("discount_points").is_none());
}
