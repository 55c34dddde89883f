use crate::common::{
	compute_grid_line_interval, escape_xml, format_number, grid_line_values, ChartBox, FONT_SIZE,
	LABEL_PADDING, TITLE_FONT_SIZE,
};
use std::cmp::Ordering;
use std::fmt::Write;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BarChartOptions {
	pub data: Vec<BarChartSeries>,
	pub title: Option<String>,
	pub x_axis_title: Option<String>,
	pub y_axis_title: Option<String>,
	pub width: f64,
	pub height: f64,
}

/// One bar per point, one group of bars per point label across all series.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BarChartSeries {
	pub color: String,
	pub data: Vec<BarChartPoint>,
	pub title: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BarChartPoint {
	pub label: String,
	pub x: f64,
	pub y: Option<f64>,
}

/// Render a grouped bar chart as standalone svg markup.
pub fn bar_chart(options: &BarChartOptions) -> String {
	let n_series = options.data.len();
	let n_groups = options
		.data
		.iter()
		.map(|series| series.data.len())
		.max()
		.unwrap_or(0);
	let mut svg = String::new();
	let _ = write!(
		svg,
		"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">",
		options.width, options.height, options.width, options.height,
	);
	if n_series == 0 || n_groups == 0 {
		svg.push_str("</svg>");
		return svg;
	}
	let y_min = 0.0f64.min(
		options
			.data
			.iter()
			.flat_map(|series| series.data.iter().filter_map(|point| point.y))
			.min_by(|a, b| a.partial_cmp(b).unwrap())
			.unwrap_or(0.0),
	);
	let mut y_max = 0.0f64.max(
		options
			.data
			.iter()
			.flat_map(|series| series.data.iter().filter_map(|point| point.y))
			.max_by(|a, b| a.partial_cmp(b).unwrap())
			.unwrap_or(0.0),
	);
	if let Some(Ordering::Equal) = y_max.partial_cmp(&y_min) {
		y_max = y_min + 1.0;
	}
	let chart_box = ChartBox {
		x: 56.0,
		y: if options.title.is_some() { 28.0 } else { 12.0 },
		w: options.width - 56.0 - 12.0,
		h: options.height
			- (if options.title.is_some() { 28.0 } else { 12.0 })
			- 40.0
			- (if options.x_axis_title.is_some() {
				FONT_SIZE + LABEL_PADDING
			} else {
				0.0
			}),
	};
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
	draw_y_axis(&mut svg, &chart_box, y_min, y_max, options.y_axis_title.as_deref());
	// Bars. Each group slot keeps a fifth of its width as gap, split between
	// the two sides, and the remainder is divided evenly among the series.
	let y_scale = chart_box.h / (y_max - y_min);
	let y_zero = chart_box.y + chart_box.h + y_min * y_scale;
	let slot_w = chart_box.w / n_groups as f64;
	let bar_w = slot_w * 0.8 / n_series as f64;
	for (series_index, series) in options.data.iter().enumerate() {
		for (group_index, point) in series.data.iter().enumerate() {
			let y = match point.y {
				Some(y) => y,
				None => continue,
			};
			let x = chart_box.x
				+ slot_w * group_index as f64
				+ slot_w * 0.1
				+ bar_w * series_index as f64;
			let h = (y * y_scale).abs();
			let top = if y >= 0.0 { y_zero - y * y_scale } else { y_zero };
			let _ = write!(
				svg,
				"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
				x,
				top,
				bar_w,
				h,
				escape_xml(&series.color),
			);
		}
	}
	// Group labels along the x axis, taken from the longest series.
	let labels = options
		.data
		.iter()
		.max_by_key(|series| series.data.len())
		.map(|series| &series.data)
		.unwrap();
	for (group_index, point) in labels.iter().enumerate() {
		let x = chart_box.x + slot_w * group_index as f64 + slot_w / 2.0;
		let y = chart_box.y + chart_box.h + FONT_SIZE + LABEL_PADDING;
		let _ = write!(
			svg,
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\">{}</text>",
			x,
			y,
			FONT_SIZE,
			escape_xml(&point.label),
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
	// Legend, one entry per series, along the bottom edge.
	let mut legend_x = chart_box.x;
	let legend_y = options.height - 6.0;
	for series in options.data.iter() {
		let _ = write!(
			svg,
			"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"10\" height=\"10\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\">{}</text>",
			legend_x,
			legend_y - 9.0,
			escape_xml(&series.color),
			legend_x + 14.0,
			legend_y,
			FONT_SIZE,
			escape_xml(&series.title),
		);
		legend_x += 24.0 + series.title.len() as f64 * FONT_SIZE * 0.6;
	}
	svg.push_str("</svg>");
	svg
}

pub(crate) fn draw_y_axis(
	svg: &mut String,
	chart_box: &ChartBox,
	y_min: f64,
	y_max: f64,
	y_axis_title: Option<&str>,
) {
	let interval = compute_grid_line_interval(y_min, y_max, 8);
	let y_scale = chart_box.h / (y_max - y_min);
	for value in grid_line_values(y_min, y_max, interval) {
		let y = chart_box.y + chart_box.h - (value - y_min) * y_scale;
		let _ = write!(
			svg,
			"<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>",
			chart_box.x,
			y,
			chart_box.x + chart_box.w,
			y,
		);
		let _ = write!(
			svg,
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"{}\">{}</text>",
			chart_box.x - LABEL_PADDING,
			y + FONT_SIZE / 3.0,
			FONT_SIZE,
			format_number(value),
		);
	}
	if let Some(y_axis_title) = y_axis_title {
		let x = FONT_SIZE;
		let y = chart_box.y + chart_box.h / 2.0;
		let _ = write!(
			svg,
			"<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\" transform=\"rotate(-90 {:.2} {:.2})\">{}</text>",
			x,
			y,
			FONT_SIZE,
			x,
			y,
			escape_xml(y_axis_title),
		);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::common::CHART_COLORS;

	fn options() -> BarChartOptions {
		BarChartOptions {
			data: vec![BarChartSeries {
				color: CHART_COLORS[0].to_owned(),
				title: "Flowrate".to_owned(),
				data: vec![
					BarChartPoint {
						label: "A".to_owned(),
						x: 0.0,
						y: Some(15.0),
					},
					BarChartPoint {
						label: "B".to_owned(),
						x: 1.0,
						y: Some(30.0),
					},
				],
			}],
			title: Some("Average Parameters by Equipment".to_owned()),
			x_axis_title: Some("Equipment Type".to_owned()),
			y_axis_title: Some("Average Value".to_owned()),
			width: 640.0,
			height: 400.0,
		}
	}

	#[test]
	fn test_bar_chart_contains_bars_and_labels() {
		let svg = bar_chart(&options());
		assert!(svg.starts_with("<svg"));
		assert!(svg.ends_with("</svg>"));
		assert_eq!(svg.matches("<rect").count(), 2 + 1); // 2 bars + legend swatch
		assert!(svg.contains(">A</text>"));
		assert!(svg.contains(">B</text>"));
		assert!(svg.contains("Average Parameters by Equipment"));
	}

	#[test]
	fn test_empty_data_yields_empty_svg() {
		let svg = bar_chart(&BarChartOptions {
			data: vec![],
			title: None,
			x_axis_title: None,
			y_axis_title: None,
			width: 640.0,
			height: 400.0,
		});
		assert!(svg.starts_with("<svg"));
		assert!(!svg.contains("<rect"));
	}

	#[test]
	fn test_deterministic() {
		assert_eq!(bar_chart(&options()), bar_chart(&options()));
	}
}
