pub mod chart;

pub use chart::{draw_error_chart, render_error_chart, ChartStyle};
