//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, PALETTE, PROFIT_COLOR, SALES_COLOR};
pub use renderer::{ChartError, StaticChartRenderer};
