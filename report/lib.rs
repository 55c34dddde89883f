/*!
This crate reconstructs a report from a persisted summary document. It never
sees the original upload: every chart and table below is derived from the
stored document alone, and statistics are formatted, never recomputed. The
whole artifact is assembled in memory and returned only on success, so a
failure partway through can never leak a partial report.
*/

use chrono::{DateTime, Utc};
use gauge_charts::{
	bar_chart, common::escape_xml, histogram_chart, pie_chart, BarChartOptions, BarChartPoint,
	BarChartSeries, HistogramChartOptions, PieChartOptions, PieChartSlice, CHART_COLORS,
};
use gauge_stats::Summary;
use std::fmt::Write;
use thiserror::Error;

/// Only columns whose name matches one of these appear in the statistics
/// table. The match is case-insensitive containment, so "Inlet Pressure"
/// qualifies. This allowlist is a fixed convention of the report format.
pub const TARGET_PARAMETERS: &[&str] = &["Flowrate", "Pressure", "Temperature"];

const PREVIEW_MAX_ROWS: usize = 15;
const PREVIEW_MAX_COLUMNS: usize = 5;

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("summary document is malformed: {0}")]
	MalformedSummary(String),
}

/// The suggested download name for a rendered report.
pub fn report_filename(filename: &str) -> String {
	format!("{}_report.html", filename)
}

/// Render the report artifact for one dataset.
pub fn render(
	filename: &str,
	uploaded_at: &DateTime<Utc>,
	summary: &Summary,
) -> Result<Vec<u8>, RenderError> {
	// Validate the document shape up front so a bad section cannot abort
	// generation after content has been emitted.
	for (name, histogram) in summary.histograms.iter() {
		if histogram.counts.is_empty() || histogram.bins.len() != histogram.counts.len() + 1 {
			return Err(RenderError::MalformedSummary(format!(
				"histogram for {} has {} counts and {} bin edges",
				name,
				histogram.counts.len(),
				histogram.bins.len(),
			)));
		}
	}
	let mut html = String::new();
	html.push_str("<!doctype html><html><head><meta charset=\"utf-8\">");
	let _ = write!(
		html,
		"<title>Report for: {}</title>",
		escape_xml(filename),
	);
	html.push_str(
		"<style>body{font-family:sans-serif;margin:2em auto;max-width:48em}\
		 table{border-collapse:collapse}td,th{border:1px solid #999;padding:4px 8px;font-size:13px}\
		 th{background:#eee}.caption{font-style:italic;font-size:13px}</style></head><body>",
	);
	let _ = write!(html, "<h1>Report for: {}</h1>", escape_xml(filename));
	let _ = write!(
		html,
		"<p>Uploaded at: {}</p>",
		uploaded_at.format("%Y-%m-%d %H:%M:%S"),
	);
	write_distribution_section(&mut html, summary);
	write_averages_section(&mut html, summary);
	write_histograms_section(&mut html, summary);
	write_stats_section(&mut html, summary);
	write_preview_section(&mut html, summary);
	html.push_str("</body></html>");
	Ok(html.into_bytes())
}

fn write_distribution_section(html: &mut String, summary: &Summary) {
	if summary.distribution.is_empty() {
		return;
	}
	html.push_str("<h2>1. Equipment Distribution</h2>");
	let data = summary
		.distribution
		.iter()
		.map(|(label, count)| PieChartSlice {
			label: label.clone(),
			value: *count as f64,
		})
		.collect();
	html.push_str(&pie_chart(&PieChartOptions {
		data,
		title: Some("Equipment Distribution".to_owned()),
		width: 480.0,
		height: 320.0,
	}));
	html.push_str(
		"<p class=\"caption\">Figure 1: Proportion of different equipment types found in the dataset.</p>",
	);
}

fn write_averages_section(html: &mut String, summary: &Summary) {
	if summary.averages_by_equipment.is_empty() {
		return;
	}
	// The first three numeric parameters by stored column order, restricted
	// to those present in the grouped means.
	let first_group = match summary.averages_by_equipment.values().next() {
		Some(group) => group,
		None => return,
	};
	let parameters: Vec<&String> = summary
		.columns
		.iter()
		.filter(|column| first_group.contains_key(*column))
		.take(3)
		.collect();
	if parameters.is_empty() {
		return;
	}
	html.push_str("<h2>2. Average Parameters by Equipment</h2>");
	let data = parameters
		.iter()
		.enumerate()
		.map(|(index, parameter)| BarChartSeries {
			color: CHART_COLORS[index % CHART_COLORS.len()].to_owned(),
			title: (*parameter).clone(),
			data: summary
				.averages_by_equipment
				.iter()
				.enumerate()
				.map(|(group_index, (group, means))| BarChartPoint {
					label: group.clone(),
					x: group_index as f64,
					y: means.get(*parameter).copied(),
				})
				.collect(),
		})
		.collect();
	html.push_str(&bar_chart(&BarChartOptions {
		data,
		title: Some("Average Parameters by Equipment".to_owned()),
		x_axis_title: Some("Equipment Type".to_owned()),
		y_axis_title: Some("Average Value".to_owned()),
		width: 640.0,
		height: 420.0,
	}));
	html.push_str(
		"<p class=\"caption\">Figure 2: Comparison of average parameter values across equipment types.</p>",
	);
}

fn write_histograms_section(html: &mut String, summary: &Summary) {
	if summary.histograms.is_empty() {
		return;
	}
	html.push_str("<h2>3. Parameter Distributions</h2>");
	// Charts appear in stored column order.
	for column in summary.columns.iter() {
		let histogram = match summary.histograms.get(column) {
			Some(histogram) => histogram,
			None => continue,
		};
		html.push_str(&histogram_chart(&HistogramChartOptions {
			bins: histogram.bins.clone(),
			counts: histogram.counts.clone(),
			title: Some(format!("Distribution of {}", column)),
			x_axis_title: Some(column.clone()),
			y_axis_title: Some("Frequency".to_owned()),
			width: 480.0,
			height: 280.0,
		}));
	}
	html.push_str(
		"<p class=\"caption\">Figure 3: Histograms showing the spread of values for key parameters.</p>",
	);
}

fn write_stats_section(html: &mut String, summary: &Summary) {
	let parameters: Vec<&String> = summary
		.columns
		.iter()
		.filter(|column| summary.stats.contains_key(*column))
		.filter(|column| {
			let lower = column.to_lowercase();
			TARGET_PARAMETERS
				.iter()
				.any(|target| lower.contains(&target.to_lowercase()))
		})
		.collect();
	if parameters.is_empty() {
		return;
	}
	html.push_str("<h2>4. Detailed Summary Statistics</h2>");
	html.push_str(
		"<table><tr><th>Parameter</th><th>Count</th><th>Min</th><th>Max</th>\
		 <th>Mean</th><th>Std</th><th>50% (Median)</th></tr>",
	);
	for parameter in parameters {
		let stats = &summary.stats[parameter];
		let _ = write!(
			html,
			"<tr><td>{}</td><td>{:.0}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
			escape_xml(parameter),
			stats.count as f64,
			stats.min,
			stats.max,
			stats.mean,
			stats.std,
			stats.p50,
		);
	}
	html.push_str("</table>");
	html.push_str(
		"<p class=\"caption\">Table 1: Numeric summaries for key parameters.</p>",
	);
}

fn write_preview_section(html: &mut String, summary: &Summary) {
	if summary.preview.is_empty() {
		return;
	}
	html.push_str("<h2>5. Data Preview (First 15 Rows)</h2>");
	let columns: Vec<&String> = summary.columns.iter().take(PREVIEW_MAX_COLUMNS).collect();
	html.push_str("<table><tr>");
	for column in columns.iter() {
		let _ = write!(html, "<th>{}</th>", escape_xml(column));
	}
	html.push_str("</tr>");
	for row in summary.preview.iter().take(PREVIEW_MAX_ROWS) {
		html.push_str("<tr>");
		for column in columns.iter() {
			let _ = write!(
				html,
				"<td>{}</td>",
				escape_xml(&cell_text(row.get(*column))),
			);
		}
		html.push_str("</tr>");
	}
	html.push_str("</table>");
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
	match value {
		Some(serde_json::Value::String(value)) => value.clone(),
		Some(serde_json::Value::Number(value)) => value.to_string(),
		Some(serde_json::Value::Bool(value)) => value.to_string(),
		Some(serde_json::Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	}
}
