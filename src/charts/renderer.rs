//! Static Chart Renderer
//! Writes the batch report charts as PNG files with plotters.
//!
//! Charts:
//! 1. Sales by Region: one bar per region, in ranking order
//! 2. Category-wise Sales & Profit: two bars per category
//! 3. Monthly Sales Trend: line with a marker per month

use crate::stats::{CategoryTotals, GroupTotal, MonthTotal};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart {}: {message}", path.display())]
    Drawing {
        path: std::path::PathBuf,
        message: String,
    },
}

const SALES_COLOR: RGBColor = RGBColor(91, 155, 213);
const PROFIT_COLOR: RGBColor = RGBColor(237, 125, 49);
const TITLE_FONT: (&str, u32) = ("sans-serif", 28);
const LABEL_FONT: (&str, u32) = ("sans-serif", 14);

/// Values, fill colour and legend label of one bar series.
type BarSeries<'a> = (&'a [f64], RGBColor, &'a str);

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bar chart of sales per region.
    pub fn render_region_sales(&self, totals: &[GroupTotal], path: &Path) -> Result<(), ChartError> {
        let labels: Vec<String> = totals.iter().map(|t| t.key.clone()).collect();
        let values: Vec<f64> = totals.iter().map(|t| t.value).collect();
        self.draw_bars(
            path,
            "Sales by Region",
            "Sales",
            &labels,
            &[(values.as_slice(), SALES_COLOR, "sales")],
        )
    }

    /// Grouped bars of sales and profit per category.
    pub fn render_category_performance(
        &self,
        totals: &[CategoryTotals],
        path: &Path,
    ) -> Result<(), ChartError> {
        let labels: Vec<String> = totals.iter().map(|t| t.category.clone()).collect();
        let sales: Vec<f64> = totals.iter().map(|t| t.sales).collect();
        let profit: Vec<f64> = totals.iter().map(|t| t.profit).collect();
        self.draw_bars(
            path,
            "Category-wise Sales & Profit",
            "Amount",
            &labels,
            &[
                (sales.as_slice(), SALES_COLOR, "sales"),
                (profit.as_slice(), PROFIT_COLOR, "profit"),
            ],
        )
    }

    /// Line chart of monthly sales with point markers.
    pub fn render_monthly_trend(&self, trend: &[MonthTotal], path: &Path) -> Result<(), ChartError> {
        let fail = |e: &dyn std::fmt::Display| ChartError::Drawing {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let labels: Vec<String> = trend.iter().map(|m| m.month.to_string()).collect();
        let points: Vec<(i32, f64)> = trend
            .iter()
            .enumerate()
            .map(|(i, m)| (i as i32, m.sales))
            .collect();
        let (y_min, y_max) = Self::value_range(points.iter().map(|p| p.1));
        let x_max = (points.len() as i32 - 1).max(1);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| fail(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Monthly Sales Trend", TITLE_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(|e| fail(&e))?;

        // Roughly a dozen month labels regardless of span.
        let label_step = (labels.len() / 12).max(1);
        let x_labels = labels.clone();
        let x_formatter = move |x: &i32| {
            let idx = *x as usize;
            if idx % label_step == 0 {
                x_labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .x_labels(labels.len().max(2))
            .x_label_formatter(&x_formatter)
            .x_label_style(LABEL_FONT)
            .y_desc("Sales")
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(|e| fail(&e))?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), SALES_COLOR.stroke_width(2)))
            .map_err(|e| fail(&e))?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, SALES_COLOR.filled())),
            )
            .map_err(|e| fail(&e))?;

        root.present().map_err(|e| fail(&e))?;
        Ok(())
    }

    fn draw_bars(
        &self,
        path: &Path,
        title: &str,
        y_desc: &str,
        labels: &[String],
        series: &[BarSeries<'_>],
    ) -> Result<(), ChartError> {
        let fail = |e: &dyn std::fmt::Display| ChartError::Drawing {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let (y_min, y_max) = Self::value_range(series.iter().flat_map(|(v, _, _)| v.iter().copied()));
        let n = labels.len().max(1) as i32;

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| fail(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d((0..n).into_segmented(), y_min..y_max)
            .map_err(|e| fail(&e))?;

        let x_labels = labels.to_vec();
        let x_formatter = move |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => x_labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&x_formatter)
            .x_label_style(LABEL_FONT)
            .y_desc(y_desc)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(|e| fail(&e))?;

        // Each segment is split evenly between the series.
        let slots = series.len().max(1) as u32;
        let segment_px = (self.width.saturating_sub(130)) / n as u32;
        let slot_px = segment_px / slots;

        for (s, (values, color, name)) in series.iter().enumerate() {
            let left = 8 + slot_px * s as u32;
            let right = 8 + slot_px * (slots - 1 - s as u32);
            let color = *color;
            chart
                .draw_series(values.iter().enumerate().map(move |(i, &v)| {
                    let x = i as i32;
                    let mut bar = Rectangle::new(
                        [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), v)],
                        color.filled(),
                    );
                    bar.set_margin(0, 0, left, right);
                    bar
                }))
                .map_err(|e| fail(&e))?
                .label(*name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(|e| fail(&e))?;
        }

        root.present().map_err(|e| fail(&e))?;
        Ok(())
    }

    /// Padded value axis that always includes zero.
    fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let span = (max - min).max(1.0);
        let pad = span * 0.1;
        let low = if min < 0.0 { min - pad } else { 0.0 };
        (low, max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::YearMonth;

    #[test]
    fn value_range_includes_zero() {
        let (lo, hi) = StaticChartRenderer::value_range([10.0, 50.0].into_iter());
        assert_eq!(lo, 0.0);
        assert!(hi > 50.0);

        let (lo, hi) = StaticChartRenderer::value_range([-20.0, 30.0].into_iter());
        assert!(lo < -20.0);
        assert!(hi > 30.0);
    }

    #[test]
    fn empty_values_still_have_a_range() {
        let (lo, hi) = StaticChartRenderer::value_range(std::iter::empty());
        assert!(hi > lo);
    }

    fn renderer() -> StaticChartRenderer {
        StaticChartRenderer::new(640, 400)
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
    }

    #[test]
    fn writes_all_three_charts() {
        let dir = tempfile::tempdir().unwrap();
        let regions = vec![
            GroupTotal { key: "East".into(), value: 150.0 },
            GroupTotal { key: "West".into(), value: 30.0 },
        ];
        let categories = vec![
            CategoryTotals { category: "Furniture".into(), sales: 120.0, profit: -15.0 },
            CategoryTotals { category: "Technology".into(), sales: 60.0, profit: 22.0 },
        ];
        let trend = vec![
            MonthTotal { month: YearMonth::new(2023, 1).unwrap(), sales: 30.0 },
            MonthTotal { month: YearMonth::new(2023, 2).unwrap(), sales: 150.0 },
        ];

        let region_path = dir.path().join("region_sales.png");
        let category_path = dir.path().join("category_performance.png");
        let monthly_path = dir.path().join("monthly_trend.png");
        renderer().render_region_sales(&regions, &region_path).unwrap();
        renderer()
            .render_category_performance(&categories, &category_path)
            .unwrap();
        renderer().render_monthly_trend(&trend, &monthly_path).unwrap();

        for path in [&region_path, &category_path, &monthly_path] {
            assert_png(path);
        }
    }

    #[test]
    fn empty_views_render_empty_frames() {
        let dir = tempfile::tempdir().unwrap();
        let region_path = dir.path().join("region_sales.png");
        let category_path = dir.path().join("category_performance.png");
        let monthly_path = dir.path().join("monthly_trend.png");

        renderer().render_region_sales(&[], &region_path).unwrap();
        renderer().render_category_performance(&[], &category_path).unwrap();
        renderer().render_monthly_trend(&[], &monthly_path).unwrap();

        for path in [&region_path, &category_path, &monthly_path] {
            assert_png(path);
        }
    }

    #[test]
    fn unwritable_path_is_a_drawing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("region_sales.png");
        let err = renderer().render_region_sales(&[], &path).unwrap_err();
        assert!(matches!(err, ChartError::Drawing { path: ref p, .. } if p == &path));
    }
}
