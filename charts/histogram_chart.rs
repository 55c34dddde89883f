use crate::bar_chart::draw_y_axis;
use crate::common::{escape_xml, format_number, ChartBox, FONT_SIZE, LABEL_PADDING, TITLE_FONT_SIZE};
use std::fmt::Write;

/// A histogram reconstructed from stored bin edges and counts. The edges are
/// taken as-is, `bins.len()` must be `counts.len() + 1`; nothing is re-binned
/// here.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HistogramChartOptions {
	pub bins: Vec<f64>,
	pub counts: Vec<u64>,
	pub title: Option<String>,
	pub x_axis_title: Option<String>,
	pub y_axis_title: Option<String>,
	pub width: f64,
	pub height: f64,
}

/// Render a histogram as standalone svg markup, one bar per stored bin.
pub fn histogram_chart(options: &HistogramChartOptions) -> String {
	let mut svg = String::new();
	let _ = write!(
		svg,
		"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">",
		options.width, options.height, options.width, options.height,
	);
	if options.counts.is_empty() || options.bins.len() != options.counts.len() + 1 {
		svg.push_str("</svg>");
		return svg;
	}
	if let Some(title) = &options.title {
		let _ = write!(
			svg,
			"<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\">{}</text>",
			options.width / 2.0,
			TITLE_FONT_SIZE + 2.0,
			TITLE_FONT_SIZE,
			escape_xml(title),
		);
	}
	let chart_box = ChartBox {
		x: 56.0,
		y: if options.title.is_some() { 28.0 } else { 12.0 },
		w: options.width - 56.0 - 12.0,
		h: options.height
			- (if options.title.is_some() { 28.0 } else { 12.0 })
			- 36.0
			- (if options.x_axis_title.is_some() {
				FONT_SIZE + LABEL_PADDING
			} else {
				0.0
			}),
	};
	let x_min = options.bins[0];
	let x_max = options.bins[options.bins.len() - 1];
	let x_range = if x_max > x_min { x_max - x_min } else { 1.0 };
	let y_max = options.counts.iter().max().copied().unwrap_or(0).max(1) as f64;
	draw_y_axis(&mut svg, &chart_box, 0.0, y_max, options.y_axis_title.as_deref());
	let y_scale = chart_box.h / y_max;
	for (index, count) in options.counts.iter().enumerate() {
		let left = chart_box.x + (options.bins[index] - x_min) / x_range * chart_box.w;
		let right = chart_box.x + (options.bins[index + 1] - x_min) / x_range * chart_box.w;
		let h = *count as f64 * y_scale;
		let _ = write!(
			svg,
			"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"#0a84ff\" stroke=\"#ffffff\" stroke-width=\"0.5\"/>",
			left,
			chart_box.y + chart_box.h - h,
			right - left,
			h,
		);
	}
	// Edge labels at the first, middle, and last bin boundaries.
	for index in [0, options.bins.len() / 2, options.bins.len() - 1] {
		let x = chart_box.x + (options.bins[index] - x_min) / x_range * chart_box.w;
		let _ = write!(
			svg,
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\">{}</text>",
			x,
			chart_box.y + chart_box.h + FONT_SIZE + LABEL_PADDING,
			FONT_SIZE,
			format_number(options.bins[index]),
		);
	}
	if let Some(x_axis_title) = &options.x_axis_title {
		let _ = write!(
			svg,
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\">{}</text>",
			chart_box.x + chart_box.w / 2.0,
			chart_box.y + chart_box.h + (FONT_SIZE + LABEL_PADDING) * 2.0,
			FONT_SIZE,
			escape_xml(x_axis_title),
		);
	}
	svg.push_str("</svg>");
	svg
}

#[cfg(test)]
mod test {
	use super::*;

	fn options() -> HistogramChartOptions {
		HistogramChartOptions {
			bins: (0..=10).map(|i| i as f64).collect(),
			counts: vec![1, 2, 3, 4, 5, 5, 4, 3, 2, 1],
			title: Some("Distribution of Pressure".to_owned()),
			x_axis_title: Some("Pressure".to_owned()),
			y_axis_title: Some("Frequency".to_owned()),
			width: 480.0,
			height: 280.0,
		}
	}

	#[test]
	fn test_one_bar_per_bin() {
		let svg = histogram_chart(&options());
		assert_eq!(svg.matches("<rect").count(), 10);
		assert!(svg.contains("Distribution of Pressure"));
	}

	#[test]
	fn test_mismatched_edges_render_nothing() {
		let mut options = options();
		options.bins.pop();
		let svg = histogram_chart(&options);
		assert!(!svg.contains("<rect"));
	}

	#[test]
	fn test_all_zero_counts() {
		let mut options = options();
		options.counts = vec![0; 10];
		let svg = histogram_chart(&options);
		assert_eq!(svg.matches("<rect").count(), 10);
	}
}
