/*!
This crate computes the summary document for an uploaded dataset. The summary is
the only durable artifact of an upload: every report is later reconstructed
from it alone, so its shape is a complete, self-sufficient intermediate
representation and must stay internally consistent with the source table.
*/

use gauge_dataframe::{Column, Table, Value};
use std::collections::BTreeMap;

pub mod describe;
pub mod downsample;
pub mod histogram;

pub use self::describe::NumberStats;
pub use self::downsample::downsample;
pub use self::histogram::Histogram;

/// This struct contains settings used to compute summaries. The defaults
/// reproduce the frozen document shape that persisted summaries use.
#[derive(Clone, Debug, PartialEq)]
pub struct SummarySettings {
	/// The number of leading rows stored verbatim in the preview.
	pub preview_rows: usize,
	/// The maximum number of points kept per numeric column for plotting.
	pub downsample_cap: usize,
	/// The number of equal-width histogram bins per numeric column.
	pub histogram_bins: usize,
}

impl Default for SummarySettings {
	fn default() -> Self {
		Self {
			preview_rows: 100,
			downsample_cap: 1000,
			histogram_bins: 10,
		}
	}
}

/// The persisted summary document. Field names and the JSON shape are frozen,
/// external clients and the report renderer depend on them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Summary {
	/// The column names, in source order.
	pub columns: Vec<String>,
	/// The total row count of the original table.
	pub rows: usize,
	/// Descriptive statistics for each numeric column, over non-missing values.
	pub stats: BTreeMap<String, NumberStats>,
	/// A flat convenience duplicate of `stats.mean`.
	pub averages: BTreeMap<String, f64>,
	/// Occurrence counts of the distinct values of the first column.
	pub distribution: BTreeMap<String, u64>,
	/// The first rows verbatim, missing cells rendered as the empty string.
	pub preview: Vec<BTreeMap<String, serde_json::Value>>,
	/// A fixed-stride sample of each numeric column, missing replaced by zero.
	pub downsampled: BTreeMap<String, Vec<f64>>,
	/// Equal-width binned histograms for each numeric column.
	pub histograms: BTreeMap<String, Histogram>,
	/// Per-group means of each numeric column, grouped by the first column.
	pub averages_by_equipment: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Summary {
	/// Compute the summary document for a table. This is pure and
	/// deterministic; persisting the result is the caller's concern.
	pub fn compute(table: &Table, settings: &SummarySettings) -> Self {
		let columns = table.column_names();
		let rows = table.nrows();
		let mut stats = BTreeMap::new();
		let mut averages = BTreeMap::new();
		let mut downsampled = BTreeMap::new();
		let mut histograms = BTreeMap::new();
		for column in table.columns.iter() {
			if let Column::Number(column) = column {
				let column_stats = NumberStats::compute(column.present());
				averages.insert(column.name.clone(), column_stats.mean);
				stats.insert(column.name.clone(), column_stats);
				let zero_filled: Vec<f64> = column
					.data
					.iter()
					.map(|value| value.unwrap_or(0.0))
					.collect();
				downsampled.insert(
					column.name.clone(),
					downsample(&zero_filled, settings.downsample_cap),
				);
				histograms.insert(
					column.name.clone(),
					Histogram::compute(column.present(), settings.histogram_bins),
				);
			}
		}
		let distribution = compute_distribution(table);
		let averages_by_equipment = compute_averages_by_equipment(table);
		let preview = compute_preview(table, settings.preview_rows);
		Self {
			columns,
			rows,
			stats,
			averages,
			distribution,
			preview,
			downsampled,
			histograms,
			averages_by_equipment,
		}
	}
}

/// Render the grouping key for a first-column cell. Missing cells yield `None`
/// and are skipped by both the distribution and the grouped averages.
fn group_key(value: &Value) -> Option<String> {
	match value {
		Value::Missing => None,
		Value::Number(value) => Some(value.to_string()),
		Value::Text(value) => Some((*value).to_owned()),
	}
}

fn compute_distribution(table: &Table) -> BTreeMap<String, u64> {
	let mut distribution = BTreeMap::new();
	let first_column = match table.columns.first() {
		Some(column) => column,
		None => return distribution,
	};
	for index in 0..table.nrows() {
		if let Some(key) = group_key(&first_column.get(index)) {
			*distribution.entry(key).or_insert(0) += 1;
		}
	}
	distribution
}

fn compute_averages_by_equipment(table: &Table) -> BTreeMap<String, BTreeMap<String, f64>> {
	let mut group_rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();
	let first_column = match table.columns.first() {
		Some(column) => column,
		None => return BTreeMap::new(),
	};
	for index in 0..table.nrows() {
		if let Some(key) = group_key(&first_column.get(index)) {
			group_rows.entry(key).or_insert_with(Vec::new).push(index);
		}
	}
	group_rows
		.into_iter()
		.map(|(key, indexes)| {
			let mut means = BTreeMap::new();
			for column in table.columns.iter() {
				if let Column::Number(column) = column {
					let mut sum = 0.0;
					let mut count = 0u64;
					for index in indexes.iter() {
						if let Some(value) = column.data[*index] {
							sum += value;
							count += 1;
						}
					}
					let mean = if count == 0 { 0.0 } else { sum / count as f64 };
					means.insert(column.name.clone(), mean);
				}
			}
			(key, means)
		})
		.collect()
}

fn compute_preview(table: &Table, preview_rows: usize) -> Vec<BTreeMap<String, serde_json::Value>> {
	let n_rows = table.nrows().min(preview_rows);
	(0..n_rows)
		.map(|index| {
			table
				.columns
				.iter()
				.map(|column| {
					let value = match column.get(index) {
						Value::Missing => serde_json::Value::String(String::new()),
						Value::Number(value) => serde_json::Value::from(value),
						Value::Text(value) => serde_json::Value::String(value.to_owned()),
					};
					(column.name().to_owned(), value)
				})
				.collect()
		})
		.collect()
}
