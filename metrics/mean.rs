use super::StreamingMetric;

/// A running weighted arithmetic mean, `sum(weight * value) / sum(weight)`.
#[derive(Debug, Clone, Default)]
pub struct WeightedMean {
	weighted_sum: f64,
	total_weight: f64,
}

impl WeightedMean {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StreamingMetric<'_> for WeightedMean {
	/// (value, weight)
	type Input = (f64, f64);
	type Output = Option<f64>;

	fn update(&mut self, (value, weight): Self::Input) {
		self.weighted_sum += weight * value;
		self.total_weight += weight;
	}

	fn merge(&mut self, other: Self) {
		self.weighted_sum += other.weighted_sum;
		self.total_weight += other.total_weight;
	}

	/// Returns `None` if no weight was accumulated.
	fn finalize(self) -> Self::Output {
		if self.total_weight > 0.0 {
			Some(self.weighted_sum / self.total_weight)
		} else {
			None
		}
	}
}

/**
The geometric mean of `values`, computed as the product raised to the power `1 / n`. A single zero collapses the result to zero and a single `NaN` makes it `NaN`. The product can also underflow to zero when there are many values well below one, for example a thousand values of 0.4, so a zero result does not by itself mean one of the values was zero.
*/
pub fn geometric_mean(values: &[f64]) -> f64 {
	let n = values.len() as f64;
	values.iter().product::<f64>().powf(1.0 / n)
}

#[test]
fn test_weighted_mean() {
	let mut mean = WeightedMean::new();
	mean.update((1.0, 1.0));
	mean.update((4.0, 2.0));
	assert_eq!(mean.finalize(), Some(3.0));
	assert_eq!(WeightedMean::new().finalize(), None);
}

#[test]
fn test_geometric_mean() {
	assert!((geometric_mean(&[2.0, 8.0]) - 4.0).abs() < 1e-12);
	assert_eq!(geometric_mean(&[0.5, 0.0, 1.0]), 0.0);
	assert!(geometric_mean(&[1.0, f64::NAN]).is_nan());
	assert_eq!(geometric_mean(&[0.4; 1000]), 0.0);
}
