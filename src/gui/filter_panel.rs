//! Filter Panel Widget
//! Left side panel with the dataset picker and the region/category/date filters.

use crate::data::{DateRange, FilterCriteria, FilterOptions, Selection, ALL_LABEL};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Format of the date range text fields.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Build criteria from the raw widget values.
///
/// Blank date fields are unbounded; anything else must parse as `YYYY-MM-DD`.
pub fn parse_criteria(
    region: &str,
    category: &str,
    start: &str,
    end: &str,
) -> Result<FilterCriteria, String> {
    Ok(FilterCriteria::all()
        .with_region(Selection::from_label(region))
        .with_category(Selection::from_label(category))
        .with_order_dates(parse_date_range(start, end)?))
}

/// Order date range from the two text fields.
pub fn parse_date_range(start: &str, end: &str) -> Result<DateRange, String> {
    let parse = |label: &str, text: &str| -> Result<Option<NaiveDate>, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(text, DATE_INPUT_FORMAT)
            .map(Some)
            .map_err(|_| format!("{} date must look like 2017-12-31", label))
    };

    Ok(DateRange {
        start: parse("Start", start)?,
        end: parse("End", end)?,
    })
}

/// Actions triggered by the filter panel
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPanelAction {
    None,
    OpenDataset,
    FiltersChanged,
}

/// Sidebar holding the current filter selections.
pub struct FilterPanel {
    pub options: FilterOptions,
    pub data_path: Option<PathBuf>,
    pub status: String,
    region: String,
    category: String,
    start_text: String,
    end_text: String,
    date_error: Option<String>,
    criteria: FilterCriteria,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self {
            options: FilterOptions::default(),
            data_path: None,
            status: "Ready".to_string(),
            region: ALL_LABEL.to_string(),
            category: ALL_LABEL.to_string(),
            start_text: String::new(),
            end_text: String::new(),
            date_error: None,
            criteria: FilterCriteria::all(),
        }
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria currently in effect.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the choices after a dataset load and reset every filter.
    pub fn set_options(&mut self, options: FilterOptions) {
        self.options = options;
        self.reset();
    }

    /// Back to "All" and the full observed date span.
    pub fn reset(&mut self) {
        self.region = ALL_LABEL.to_string();
        self.category = ALL_LABEL.to_string();
        let (start, end) = self
            .options
            .date_span
            .map(|(s, e)| {
                (
                    s.format(DATE_INPUT_FORMAT).to_string(),
                    e.format(DATE_INPUT_FORMAT).to_string(),
                )
            })
            .unwrap_or_default();
        self.start_text = start;
        self.end_text = end;
        self.date_error = None;
        self.criteria = self.options.default_criteria();
    }

    /// Re-parse the widgets; returns true when the criteria changed.
    ///
    /// Region and category always apply. Unparseable date text keeps the
    /// last valid range and sets `date_error`.
    fn refresh_criteria(&mut self) -> bool {
        let mut criteria = self
            .criteria
            .clone()
            .with_region(Selection::from_label(&self.region))
            .with_category(Selection::from_label(&self.category));
        match parse_date_range(&self.start_text, &self.end_text) {
            Ok(range) => {
                self.date_error = None;
                criteria = criteria.with_order_dates(range);
            }
            Err(message) => self.date_error = Some(message),
        }

        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        true
    }

    /// Draw the filter panel
    pub fn show(&mut self, ui: &mut egui::Ui, enabled: bool) -> FilterPanelAction {
        let mut action = FilterPanelAction::None;
        let mut touched = false;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Salescope")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Sales Performance Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    let path_color = if self.data_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open").clicked() {
                            action = FilterPanelAction::OpenDataset;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔍 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        ui.add_enabled_ui(enabled, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Region:"));
                ComboBox::from_id_salt("region_filter")
                    .width(combo_width)
                    .selected_text(&self.region)
                    .show_ui(ui, |ui| {
                        for region in &self.options.regions {
                            if ui
                                .selectable_label(self.region == *region, region)
                                .clicked()
                            {
                                self.region = region.clone();
                                touched = true;
                            }
                        }
                    });
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Category:"));
                ComboBox::from_id_salt("category_filter")
                    .width(combo_width)
                    .selected_text(&self.category)
                    .show_ui(ui, |ui| {
                        for category in &self.options.categories {
                            if ui
                                .selectable_label(self.category == *category, category)
                                .clicked()
                            {
                                self.category = category.clone();
                                touched = true;
                            }
                        }
                    });
            });

            ui.add_space(10.0);
            ui.label("Order Date Range:");

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("From:"));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.start_text)
                        .desired_width(combo_width)
                        .hint_text("YYYY-MM-DD"),
                );
                touched |= response.changed();
            });
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("To:"));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.end_text)
                        .desired_width(combo_width)
                        .hint_text("YYYY-MM-DD"),
                );
                touched |= response.changed();
            });

            if let Some(error) = &self.date_error {
                ui.label(
                    RichText::new(error)
                        .size(11.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }

            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.button("↺ Reset Filters").clicked() {
                    self.reset();
                    action = FilterPanelAction::FiltersChanged;
                }
            });
        });

        if touched && self.refresh_criteria() {
            action = FilterPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_labels_and_blank_dates_keep_everything() {
        let criteria = parse_criteria(ALL_LABEL, ALL_LABEL, "", "  ").unwrap();
        assert_eq!(criteria, FilterCriteria::all());
    }

    #[test]
    fn widget_values_become_criteria() {
        let criteria = parse_criteria("West", "Furniture", "2017-01-01", "2017-12-31").unwrap();
        assert_eq!(criteria.region, Selection::Only("West".into()));
        assert_eq!(criteria.category, Selection::Only("Furniture".into()));
        assert_eq!(
            criteria.order_dates,
            DateRange::new(
                NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2017, 12, 31).unwrap()
            )
        );
    }

    #[test]
    fn bad_date_text_is_rejected() {
        let err = parse_criteria(ALL_LABEL, ALL_LABEL, "31/12/2017", "").unwrap_err();
        assert!(err.starts_with("Start"));
    }

    #[test]
    fn reset_restores_observed_span() {
        let start = NaiveDate::from_ymd_opt(2014, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 12, 30).unwrap();
        let mut panel = FilterPanel::new();
        panel.set_options(FilterOptions {
            regions: vec![ALL_LABEL.into(), "East".into()],
            categories: vec![ALL_LABEL.into()],
            date_span: Some((start, end)),
        });

        assert_eq!(panel.start_text, "2014-01-03");
        assert_eq!(panel.end_text, "2017-12-30");
        assert_eq!(panel.criteria().order_dates, DateRange::new(start, end));

        panel.region = "East".into();
        assert!(panel.refresh_criteria());
        assert_eq!(panel.criteria().region, Selection::Only("East".into()));
        assert!(!panel.refresh_criteria());

        panel.reset();
        assert_eq!(panel.criteria().region, Selection::All);
    }

    #[test]
    fn combo_change_applies_while_date_text_is_invalid() {
        let start = NaiveDate::from_ymd_opt(2014, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 12, 30).unwrap();
        let mut panel = FilterPanel::new();
        panel.set_options(FilterOptions {
            regions: vec![ALL_LABEL.into(), "East".into(), "West".into()],
            categories: vec![ALL_LABEL.into(), "Furniture".into()],
            date_span: Some((start, end)),
        });

        panel.start_text = "2014-13-".into();
        assert!(!panel.refresh_criteria());
        assert!(panel.date_error.is_some());

        panel.region = "West".into();
        panel.category = "Furniture".into();
        assert!(panel.refresh_criteria());
        assert_eq!(panel.criteria().region, Selection::Only("West".into()));
        assert_eq!(panel.criteria().category, Selection::Only("Furniture".into()));
        assert_eq!(panel.criteria().order_dates, DateRange::new(start, end));
        assert!(panel.date_error.is_some());

        panel.start_text = "2015-01-01".into();
        assert!(panel.refresh_criteria());
        assert!(panel.date_error.is_none());
        assert_eq!(
            panel.criteria().order_dates.start,
            NaiveDate::from_ymd_opt(2015, 1, 1)
        );
    }
}
