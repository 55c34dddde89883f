/// The series color palette, assigned in order.
pub const CHART_COLORS: &[&str] = &[
	"#0a84ff", "#30d158", "#ff9f0a", "#ff453a", "#bf5af2", "#64d2ff",
];

pub const FONT_SIZE: f64 = 11.0;
pub const TITLE_FONT_SIZE: f64 = 14.0;
pub const LABEL_PADDING: f64 = 4.0;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChartBox {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

/// A grid line interval is k * 10^p where k is 1, 2, or 5. This picks the
/// smallest such interval that produces at most `max_grid_lines` lines across
/// the value range.
pub fn compute_grid_line_interval(min: f64, max: f64, max_grid_lines: usize) -> f64 {
	let range = max - min;
	if range <= 0.0 || max_grid_lines == 0 {
		return 1.0;
	}
	let raw_interval = range / max_grid_lines as f64;
	let p = raw_interval.log10().floor();
	let base = 10f64.powf(p);
	for k in &[1.0, 2.0, 5.0, 10.0] {
		let interval = k * base;
		if range / interval <= max_grid_lines as f64 {
			return interval;
		}
	}
	10.0 * base
}

/// The grid line values within [min, max] at multiples of `interval`.
pub fn grid_line_values(min: f64, max: f64, interval: f64) -> Vec<f64> {
	let mut values = Vec::new();
	let mut index = (min / interval).ceil() as i64;
	loop {
		let value = index as f64 * interval;
		if value > max + interval * 1e-9 {
			break;
		}
		values.push(value);
		index += 1;
	}
	values
}

/// Format an axis label or data label for display.
pub fn format_number(value: f64) -> String {
	if value == value.trunc() && value.abs() < 1e12 {
		format!("{:.0}", value)
	} else if value.abs() >= 100.0 {
		format!("{:.1}", value)
	} else {
		format!("{:.2}", value)
	}
}

/// Escape a string for inclusion in svg text or attributes.
pub fn escape_xml(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}
	escaped
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_grid_line_interval_is_1_2_or_5() {
		for (min, max) in [(0.0, 1.0), (0.0, 37.0), (0.0, 1234.0), (-5.0, 5.0)] {
			let interval = compute_grid_line_interval(min, max, 8);
			let p = interval.log10().floor();
			let k = interval / 10f64.powf(p);
			assert!(
				(k - 1.0).abs() < 1e-9 || (k - 2.0).abs() < 1e-9 || (k - 5.0).abs() < 1e-9,
				"interval {} has k {}",
				interval,
				k
			);
			assert!((max - min) / interval <= 8.0);
		}
	}

	#[test]
	fn test_grid_line_values() {
		let values = grid_line_values(0.0, 10.0, 2.0);
		assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
	}

	#[test]
	fn test_format_number() {
		assert_eq!(format_number(10.0), "10");
		assert_eq!(format_number(2.5), "2.50");
		assert_eq!(format_number(123.45), "123.5");
	}

	#[test]
	fn test_escape_xml() {
		assert_eq!(escape_xml("a<b&c>\"d\""), "a&lt;b&amp;c&gt;&quot;d&quot;");
	}
}
