use crate::error::{MetricsError, Result};
use ndarray::prelude::*;

/// Check `sample_weight` against `n_samples` and return it, or uniform weights of 1.0 if it is absent.
pub fn check_sample_weight(
	sample_weight: Option<ArrayView1<f64>>,
	n_samples: usize,
) -> Result<Array1<f64>> {
	let sample_weight = match sample_weight {
		None => return Ok(Array1::ones(n_samples)),
		Some(sample_weight) => sample_weight,
	};
	if sample_weight.len() != n_samples {
		return Err(MetricsError::Shape(format!(
			"sample_weight has {} entries but there are {} samples",
			sample_weight.len(),
			n_samples
		)));
	}
	if let Some(position) = sample_weight
		.iter()
		.position(|weight| !weight.is_finite() || *weight < 0.0)
	{
		return Err(MetricsError::SampleWeight(format!(
			"weight at position {} is {}, weights must be finite and non-negative",
			position, sample_weight[position]
		)));
	}
	if sample_weight.sum() <= 0.0 {
		return Err(MetricsError::SampleWeight(
			"weights sum to zero".to_owned(),
		));
	}
	Ok(sample_weight.to_owned())
}

#[test]
fn test_check_sample_weight() {
	assert_eq!(check_sample_weight(None, 3).unwrap(), arr1(&[1.0, 1.0, 1.0]));
	let weights = arr1(&[0.5, 0.0, 2.0]);
	assert_eq!(check_sample_weight(Some(weights.view()), 3).unwrap(), weights);
	assert!(matches!(
		check_sample_weight(Some(weights.view()), 2),
		Err(MetricsError::Shape(_))
	));
	assert!(matches!(
		check_sample_weight(Some(arr1(&[1.0, -1.0]).view()), 2),
		Err(MetricsError::SampleWeight(_))
	));
	assert!(matches!(
		check_sample_weight(Some(arr1(&[0.0, 0.0]).view()), 2),
		Err(MetricsError::SampleWeight(_))
	));
}
