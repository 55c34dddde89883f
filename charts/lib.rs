/*!
This crate renders the charts that appear in generated reports. Each chart is
computed entirely from the values handed to it and emitted as standalone svg
markup, so rendering is deterministic and needs no drawing surface.
*/

pub mod bar_chart;
pub mod common;
pub mod histogram_chart;
pub mod pie_chart;

pub use self::bar_chart::{bar_chart, BarChartOptions, BarChartPoint, BarChartSeries};
pub use self::common::CHART_COLORS;
pub use self::histogram_chart::{histogram_chart, HistogramChartOptions};
pub use self::pie_chart::{pie_chart, PieChartOptions, PieChartSlice};
