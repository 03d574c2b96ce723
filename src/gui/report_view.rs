//! Report View Widget
//! Central scrollable panel: KPI cards, charts and product rankings for the
//! currently filtered table.

use crate::charts::ChartPlotter;
use crate::report::{format_currency, format_percent};
use crate::stats::SalesReport;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const KPI_CARD_HEIGHT: f32 = 70.0;

pub struct ReportView;

impl ReportView {
    /// Draw every view of `report`. `categories` fixes the scatter colours.
    pub fn show(ui: &mut egui::Ui, report: &SalesReport, categories: &[String]) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new("📊 Superstore Sales Performance Dashboard")
                        .size(24.0)
                        .strong(),
                );
                ui.add_space(SECTION_SPACING);

                Self::draw_kpis(ui, report);

                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::section(ui, "Sales by Region");
                ChartPlotter::draw_region_sales(ui, &report.region_sales);

                Self::section(ui, "Category-wise Sales & Profit");
                ChartPlotter::draw_category_performance(ui, &report.category_performance);

                Self::section(ui, "Monthly Sales Trend");
                ChartPlotter::draw_monthly_trend(ui, &report.monthly_trend);

                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::section(ui, "📉 Discount vs Profit Analysis");
                ChartPlotter::draw_discount_profit(ui, &report.discount_points, categories);
                ui.label(
                    RichText::new(
                        "📌 Higher discounts often lead to lower or negative profit; \
                         points in the lower right are over-discounted products.",
                    )
                    .size(12.0)
                    .color(Color32::from_rgb(100, 149, 237)),
                );

                ui.add_space(SECTION_SPACING);
                ui.separator();

                Self::section(ui, "🏆 Top & Bottom Products by Profit");
                ui.columns(2, |columns| {
                    columns[0].label(
                        RichText::new(format!(
                            "✅ Top {} Profitable Products",
                            report.top_products.len()
                        ))
                        .size(14.0)
                        .strong(),
                    );
                    ChartPlotter::draw_product_table(
                        &mut columns[0],
                        "top_products",
                        &report.top_products,
                    );

                    columns[1].label(
                        RichText::new(format!(
                            "❌ Top {} Loss-Making Products",
                            report.loss_products.len()
                        ))
                        .size(14.0)
                        .strong(),
                    );
                    ChartPlotter::draw_product_table(
                        &mut columns[1],
                        "loss_products",
                        &report.loss_products,
                    );
                });
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(5.0);
    }

    fn draw_kpis(ui: &mut egui::Ui, report: &SalesReport) {
        let kpis = &report.kpis;
        let margin_color = if kpis.profit_margin < 0.0 {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::from_rgb(40, 167, 69)
        };
        let cards = [
            ("Total Sales", format_currency(kpis.total_sales), None),
            ("Total Profit", format_currency(kpis.total_profit), None),
            (
                "Profit Margin",
                format_percent(kpis.profit_margin),
                Some(margin_color),
            ),
        ];

        ui.columns(cards.len(), |columns| {
            for (column, (title, value, color)) in columns.iter_mut().zip(cards) {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(column.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(column, |ui| {
                        ui.set_min_height(KPI_CARD_HEIGHT);
                        ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                        let text = RichText::new(value).size(26.0).strong();
                        ui.label(match color {
                            Some(color) => text.color(color),
                            None => text,
                        });
                    });
            }
        });

        ui.label(
            RichText::new(format!("{} orders match the current filters", kpis.order_count))
                .size(11.0)
                .color(Color32::GRAY),
        );
    }
}
