/// An equal-width binned histogram: `counts` has one entry per bin and `bins`
/// holds the bin edges, so `bins.len() == counts.len() + 1`. Reports are later
/// reconstructed from these stored edges and counts, never re-binned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Histogram {
	pub counts: Vec<u64>,
	pub bins: Vec<f64>,
}

impl Histogram {
	/// Bucket values into `n_bins` equal-width bins spanning [min, max]. The
	/// last bin is closed on the right, every other bin is half-open. A single
	/// distinct value expands the range by half a unit on each side, and an
	/// empty sample spans [0, 1] with all-zero counts.
	pub fn compute(values: impl Iterator<Item = f64>, n_bins: usize) -> Self {
		let values: Vec<f64> = values.filter(|value| value.is_finite()).collect();
		let (lo, hi) = match values
			.iter()
			.fold(None, |bounds: Option<(f64, f64)>, value| match bounds {
				None => Some((*value, *value)),
				Some((lo, hi)) => Some((lo.min(*value), hi.max(*value))),
			}) {
			None => (0.0, 1.0),
			Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
			Some((lo, hi)) => (lo, hi),
		};
		let width = hi - lo;
		let bins: Vec<f64> = (0..=n_bins)
			.map(|index| lo + width * index as f64 / n_bins as f64)
			.collect();
		let mut counts = vec![0; n_bins];
		for value in values.iter() {
			let mut index = ((value - lo) / width * n_bins as f64) as usize;
			if index >= n_bins {
				index = n_bins - 1;
			}
			counts[index] += 1;
		}
		Self { counts, bins }
	}
}
