use crate::common::{escape_xml, CHART_COLORS, FONT_SIZE, TITLE_FONT_SIZE};
use std::fmt::Write;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PieChartOptions {
	pub data: Vec<PieChartSlice>,
	pub title: Option<String>,
	pub width: f64,
	pub height: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PieChartSlice {
	pub label: String,
	pub value: f64,
}

/// Render a proportional pie chart as standalone svg markup. The legend shows
/// each slice's share formatted to one decimal place.
pub fn pie_chart(options: &PieChartOptions) -> String {
	let mut svg = String::new();
	let _ = write!(
		svg,
		"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">",
		options.width, options.height, options.width, options.height,
	);
	let total: f64 = options.data.iter().map(|slice| slice.value).sum();
	if options.data.is_empty() || total <= 0.0 {
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
	let top = if options.title.is_some() { 28.0 } else { 8.0 };
	let legend_w = 150.0;
	let cx = (options.width - legend_w) / 2.0;
	let cy = top + (options.height - top) / 2.0;
	let r = ((options.width - legend_w).min(options.height - top) / 2.0 - 8.0).max(10.0);
	if options.data.len() == 1 {
		let _ = write!(
			svg,
			"<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
			cx, cy, r, CHART_COLORS[0],
		);
	} else {
		let mut angle = -std::f64::consts::FRAC_PI_2;
		for (index, slice) in options.data.iter().enumerate() {
			let sweep = slice.value / total * std::f64::consts::PI * 2.0;
			let x1 = cx + r * angle.cos();
			let y1 = cy + r * angle.sin();
			let end = angle + sweep;
			let x2 = cx + r * end.cos();
			let y2 = cy + r * end.sin();
			let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
			let color = CHART_COLORS[index % CHART_COLORS.len()];
			let _ = write!(
				svg,
				"<path d=\"M {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 1 {:.2} {:.2} Z\" fill=\"{}\"/>",
				cx, cy, x1, y1, r, r, large_arc, x2, y2, color,
			);
			angle = end;
		}
	}
	// Legend with each slice's percentage share.
	let legend_x = options.width - legend_w + 8.0;
	let mut legend_y = top + FONT_SIZE;
	for (index, slice) in options.data.iter().enumerate() {
		let color = CHART_COLORS[index % CHART_COLORS.len()];
		let _ = write!(
			svg,
			"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"10\" height=\"10\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\">{} {:.1}%</text>",
			legend_x,
			legend_y - 9.0,
			color,
			legend_x + 14.0,
			legend_y,
			FONT_SIZE,
			escape_xml(&slice.label),
			slice.value / total * 100.0,
		);
		legend_y += FONT_SIZE + 5.0;
	}
	svg.push_str("</svg>");
	svg
}
