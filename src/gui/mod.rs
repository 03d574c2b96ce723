//! GUI module - Dashboard components

mod app;
mod filter_panel;
mod report_view;

pub use app::DashboardApp;
pub use filter_panel::{parse_criteria, parse_date_range, FilterPanel, FilterPanelAction, DATE_INPUT_FORMAT};
pub use report_view::ReportView;
