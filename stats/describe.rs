use gauge_util::finite::ToFinite;

/// Descriptive statistics for one numeric column, computed over the
/// non-missing values only. A statistic that is undefined on the sample, the
/// std of fewer than two values or anything at all of zero values, is reported
/// as zero rather than as a missing marker. This is a frozen compatibility
/// policy: consumers of persisted summaries reproduce it exactly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NumberStats {
	pub count: u64,
	pub min: f64,
	pub max: f64,
	pub mean: f64,
	pub std: f64,
	#[serde(rename = "25%")]
	pub p25: f64,
	#[serde(rename = "50%")]
	pub p50: f64,
	#[serde(rename = "75%")]
	pub p75: f64,
}

impl NumberStats {
	pub fn compute(values: impl Iterator<Item = f64>) -> Self {
		let mut values: Vec<f64> = values
			.filter_map(|value| value.to_finite().ok())
			.map(|value| value.get())
			.collect();
		values.sort_by(|a, b| a.partial_cmp(b).unwrap());
		let count = values.len() as u64;
		if count == 0 {
			return Self {
				count: 0,
				min: 0.0,
				max: 0.0,
				mean: 0.0,
				std: 0.0,
				p25: 0.0,
				p50: 0.0,
				p75: 0.0,
			};
		}
		let min = values[0];
		let max = values[values.len() - 1];
		let mut mean = 0.0;
		let mut m2 = 0.0;
		for (index, value) in values.iter().enumerate() {
			let (new_mean, new_m2) = merge_mean_m2(index as u64, mean, m2, 1, *value, 0.0);
			mean = new_mean;
			m2 = new_m2;
		}
		// The document contract is the sample standard deviation.
		let std = if count < 2 {
			0.0
		} else {
			(m2 / (count - 1) as f64).sqrt()
		};
		Self {
			count,
			min,
			max,
			mean,
			std,
			p25: quantile(&values, 0.25),
			p50: quantile(&values, 0.50),
			p75: quantile(&values, 0.75),
		}
	}
}

/// Combine two separate means and m2 values into a single mean and m2.
/// https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Parallel_algorithm
pub fn merge_mean_m2(n_a: u64, mean_a: f64, m2_a: f64, n_b: u64, mean_b: f64, m2_b: f64) -> (f64, f64) {
	let n_a = n_a as f64;
	let n_b = n_b as f64;
	if n_a + n_b == 0.0 {
		return (0.0, 0.0);
	}
	(
		((n_a * mean_a) + (n_b * mean_b)) / (n_a + n_b),
		m2_a + m2_b + (mean_b - mean_a) * (mean_b - mean_a) * (n_a * n_b / (n_a + n_b)),
	)
}

/// Compute a quantile of sorted values by linear interpolation between the two
/// nearest order statistics.
fn quantile(sorted_values: &[f64], q: f64) -> f64 {
	let n = sorted_values.len() as f64;
	let index = ((n - 1.0) * q).trunc() as usize;
	let fract = ((n - 1.0) * q).fract();
	if fract > 0.0 {
		sorted_values[index] * (1.0 - fract) + sorted_values[index + 1] * fract
	} else {
		sorted_values[index]
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_basic_stats() {
		let stats = NumberStats::compute(vec![10.0, 20.0, 30.0].into_iter());
		assert_eq!(stats.count, 3);
		assert_eq!(stats.min, 10.0);
		assert_eq!(stats.max, 30.0);
		assert_eq!(stats.mean, 20.0);
		assert_eq!(stats.p50, 20.0);
		assert_eq!(stats.p25, 15.0);
		assert_eq!(stats.p75, 25.0);
		assert!((stats.std - 10.0).abs() < 1e-9);
	}

	#[test]
	fn test_quantile_interpolation() {
		// For [1, 2, 3, 4] the p25 index is (4 - 1) * 0.25 = 0.75, so the
		// value interpolates three quarters of the way from 1 to 2.
		let stats = NumberStats::compute(vec![1.0, 2.0, 3.0, 4.0].into_iter());
		assert_eq!(stats.p25, 1.75);
		assert_eq!(stats.p50, 2.5);
		assert_eq!(stats.p75, 3.25);
	}

	#[test]
	fn test_empty_sample_is_zero_filled() {
		let stats = NumberStats::compute(std::iter::empty());
		assert_eq!(stats.count, 0);
		assert_eq!(stats.mean, 0.0);
		assert_eq!(stats.std, 0.0);
		assert_eq!(stats.p50, 0.0);
	}

	#[test]
	fn test_single_value_std_is_zero() {
		let stats = NumberStats::compute(vec![7.0].into_iter());
		assert_eq!(stats.count, 1);
		assert_eq!(stats.mean, 7.0);
		assert_eq!(stats.std, 0.0);
		assert_eq!(stats.min, 7.0);
		assert_eq!(stats.max, 7.0);
	}

	#[test]
	fn test_unsorted_input() {
		let stats = NumberStats::compute(vec![30.0, 10.0, 20.0].into_iter());
		assert_eq!(stats.min, 10.0);
		assert_eq!(stats.max, 30.0);
		assert_eq!(stats.p50, 20.0);
	}
}
