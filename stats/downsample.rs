/// Reduce a series to approximately `cap` points with a fixed-stride
/// systematic sample. If the series has at most `cap` values it is returned
/// unchanged; otherwise every `floor(n / cap)`-th value is taken starting at
/// index 0, for an output length of `ceil(n / stride)`. The stride arithmetic,
/// including the off-by-structure of the integer division, is contractual:
/// replays must reproduce it exactly.
pub fn downsample(data: &[f64], cap: usize) -> Vec<f64> {
	if cap == 0 || data.len() <= cap {
		return data.to_vec();
	}
	let stride = data.len() / cap;
	data.iter().copied().step_by(stride).collect()
}

#[cfg(test)]
mod test {
	use super::*;

	fn series(n: usize) -> Vec<f64> {
		(0..n).map(|i| i as f64).collect()
	}

	#[test]
	fn test_short_series_unchanged() {
		let data = series(1000);
		assert_eq!(downsample(&data, 1000), data);
		let data = series(3);
		assert_eq!(downsample(&data, 1000), data);
	}

	#[test]
	fn test_stride_formula() {
		for n in [1001usize, 1500, 1999, 2000, 2500, 5000, 12345] {
			let data = series(n);
			let sampled = downsample(&data, 1000);
			let stride = n / 1000;
			// Output length is ceil(n / stride).
			assert_eq!(sampled.len(), (n + stride - 1) / stride);
			// Values are taken at indices 0, stride, 2 * stride, ...
			for (position, value) in sampled.iter().enumerate() {
				assert_eq!(*value, (position * stride) as f64);
			}
		}
	}

	#[test]
	fn test_stride_one_keeps_everything() {
		// For 1000 < n < 2000 the stride is 1, so nothing is dropped.
		let data = series(1500);
		assert_eq!(downsample(&data, 1000), data);
	}

	#[test]
	fn test_idempotent_below_cap() {
		let data = series(5000);
		let once = downsample(&data, 1000);
		let twice = downsample(&once, 1000);
		assert_eq!(once, twice);
	}
}
