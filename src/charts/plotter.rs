//! Chart Plotter Module
//! Interactive dashboard charts using egui_plot.

use crate::report::format_currency;
use crate::stats::{CategoryTotals, DiscountPoint, GroupTotal, MonthTotal};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};
use std::cmp::Ordering;

/// Main series colour (sales)
pub const SALES_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// Secondary series colour (profit)
pub const PROFIT_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 280.0;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Axis formatter showing `labels[i]` at integer positions.
    fn index_labels(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    fn no_data(ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.label(RichText::new("No rows match the current filters").color(Color32::GRAY));
        ui.add_space(20.0);
    }

    /// Bar per region, in ranking order.
    pub fn draw_region_sales(ui: &mut egui::Ui, totals: &[GroupTotal]) {
        if totals.is_empty() {
            return Self::no_data(ui);
        }

        let bars: Vec<Bar> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| Bar::new(i as f64, t.value).name(&t.key).width(0.6))
            .collect();
        let labels = totals.iter().map(|t| t.key.clone()).collect();

        Plot::new("region_sales")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Region")
            .y_axis_label("Sales")
            .x_axis_formatter(Self::index_labels(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(SALES_COLOR).name("Sales"));
            });
    }

    /// Sales and profit bars side by side for every category.
    pub fn draw_category_performance(ui: &mut egui::Ui, totals: &[CategoryTotals]) {
        if totals.is_empty() {
            return Self::no_data(ui);
        }

        let sales: Vec<Bar> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| Bar::new(i as f64 - 0.2, t.sales).name(&t.category).width(0.4))
            .collect();
        let profit: Vec<Bar> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| Bar::new(i as f64 + 0.2, t.profit).name(&t.category).width(0.4))
            .collect();
        let labels = totals.iter().map(|t| t.category.clone()).collect();

        Plot::new("category_performance")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Category")
            .x_axis_formatter(Self::index_labels(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(sales).color(SALES_COLOR).name("sales"));
                plot_ui.bar_chart(BarChart::new(profit).color(PROFIT_COLOR).name("profit"));
            });
    }

    /// Monthly sales line with a marker per month.
    pub fn draw_monthly_trend(ui: &mut egui::Ui, trend: &[MonthTotal]) {
        if trend.is_empty() {
            return Self::no_data(ui);
        }

        let points: Vec<[f64; 2]> = trend
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, m.sales])
            .collect();
        let labels = trend.iter().map(|m| m.month.to_string()).collect();

        Plot::new("monthly_trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("Sales")
            .x_axis_formatter(Self::index_labels(labels))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(SALES_COLOR)
                        .width(2.0)
                        .name("Sales"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.5)
                        .color(SALES_COLOR),
                );
            });
    }

    /// Discount (x) against profit (y), one series per category.
    pub fn draw_discount_profit(ui: &mut egui::Ui, points: &[DiscountPoint], categories: &[String]) {
        if points.is_empty() {
            return Self::no_data(ui);
        }

        Plot::new("discount_profit")
            .height(CHART_HEIGHT + 40.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Discount")
            .y_axis_label("Profit")
            .label_formatter(|name, value| Self::discount_hover_text(points, name, value))
            .show(ui, |plot_ui| {
                for (i, category) in categories.iter().enumerate() {
                    let series: PlotPoints = points
                        .iter()
                        .filter(|p| &p.category == category)
                        .map(|p| [p.discount, p.profit])
                        .collect();
                    plot_ui.points(
                        Points::new(series)
                            .radius(2.5)
                            .color(Self::series_color(i).gamma_multiply(0.7))
                            .name(category),
                    );
                }
            });
    }

    /// Row of `category` closest to the hovered plot position.
    pub fn nearest_discount_point<'a>(
        points: &'a [DiscountPoint],
        category: &str,
        at: &PlotPoint,
    ) -> Option<&'a DiscountPoint> {
        let distance = |p: &DiscountPoint| (p.discount - at.x).powi(2) + (p.profit - at.y).powi(2);
        points
            .iter()
            .filter(|p| p.category == category)
            .min_by(|a, b| distance(a).partial_cmp(&distance(b)).unwrap_or(Ordering::Equal))
    }

    /// Hover label: product, sales and the point itself.
    fn discount_hover_text(points: &[DiscountPoint], category: &str, at: &PlotPoint) -> String {
        match Self::nearest_discount_point(points, category, at) {
            Some(p) => format!(
                "{}\n{}\nSales: {}\nDiscount: {:.0}%  Profit: {}",
                p.product_name,
                p.category,
                format_currency(p.sales),
                p.discount * 100.0,
                format_currency(p.profit)
            ),
            None => format!(
                "Discount: {:.0}%\nProfit: {}",
                at.x * 100.0,
                format_currency(at.y)
            ),
        }
    }

    /// Ranked product table.
    pub fn draw_product_table(ui: &mut egui::Ui, id: &str, products: &[GroupTotal]) {
        if products.is_empty() {
            return Self::no_data(ui);
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .num_columns(3)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong().size(11.0));
                        ui.label(RichText::new("Product").strong().size(11.0));
                        ui.label(RichText::new("Profit").strong().size(11.0));
                        ui.end_row();

                        let default_text_color = ui.visuals().text_color();
                        for (rank, product) in products.iter().enumerate() {
                            let color = if product.value < 0.0 {
                                Color32::from_rgb(220, 53, 69)
                            } else {
                                default_text_color
                            };
                            ui.label(RichText::new((rank + 1).to_string()).size(11.0));
                            ui.label(RichText::new(&product.key).size(11.0));
                            ui.label(
                                RichText::new(format!("{:.2}", product.value))
                                    .size(11.0)
                                    .color(color),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(category: &str, product: &str, discount: f64, profit: f64, sales: f64) -> DiscountPoint {
        DiscountPoint {
            discount,
            profit,
            category: category.to_string(),
            product_name: product.to_string(),
            sales,
        }
    }

    #[test]
    fn hover_picks_nearest_point_of_the_series() {
        let points = vec![
            point("Furniture", "Bookcase", 0.2, -40.0, 260.0),
            point("Furniture", "Chair", 0.0, 41.9, 731.9),
            point("Technology", "Phone", 0.2, -40.0, 907.2),
        ];

        let hit = ChartPlotter::nearest_discount_point(&points, "Furniture", &PlotPoint::new(0.2, -40.0));
        assert_eq!(hit.map(|p| p.product_name.as_str()), Some("Bookcase"));

        let hit = ChartPlotter::nearest_discount_point(&points, "Technology", &PlotPoint::new(0.2, -40.0));
        assert_eq!(hit.map(|p| p.product_name.as_str()), Some("Phone"));
    }

    #[test]
    fn hover_text_names_product_and_sales() {
        let points = vec![point("Technology", "Phone", 0.2, -40.0, 907.2)];
        let text = ChartPlotter::discount_hover_text(&points, "Technology", &PlotPoint::new(0.2, -40.0));
        assert!(text.starts_with("Phone\n"));
        assert!(text.contains("Sales: $907"));
        assert!(text.contains("Discount: 20%"));
    }

    #[test]
    fn hover_off_series_shows_coordinates() {
        let points = vec![point("Technology", "Phone", 0.2, -40.0, 907.2)];
        let text = ChartPlotter::discount_hover_text(&points, "", &PlotPoint::new(0.5, 1200.0));
        assert_eq!(text, "Discount: 50%\nProfit: $1,200");
    }
}
