use crate::{
	error::{MetricsError, Result},
	mean::WeightedMean,
	sample_weight::check_sample_weight,
	StreamingMetric,
};
use ndarray::prelude::*;

/**
The relative mean absolute error is the weighted mean of `|prediction - label| / |label|`, computed separately for each output.

A label of exactly zero makes the relative error of that sample infinite, or `NaN` if the prediction is also zero, and the mean inherits it.
*/
#[derive(Debug, Clone)]
pub struct RelativeMeanAbsoluteError {
	means: Vec<WeightedMean>,
}

/// The input to [RelativeMeanAbsoluteError](struct.RelativeMeanAbsoluteError.html): one sample.
pub struct RelativeMeanAbsoluteErrorInput<'a> {
	/// (n_outputs)
	pub labels: ArrayView1<'a, f64>,
	/// (n_outputs)
	pub predictions: ArrayView1<'a, f64>,
	pub weight: f64,
}

impl RelativeMeanAbsoluteError {
	pub fn new(n_outputs: usize) -> Self {
		Self {
			means: vec![WeightedMean::new(); n_outputs],
		}
	}
}

impl<'a> StreamingMetric<'a> for RelativeMeanAbsoluteError {
	type Input = RelativeMeanAbsoluteErrorInput<'a>;
	/// One mean per output, `None` for an output that has accumulated no weight.
	type Output = Vec<Option<f64>>;

	fn update(&mut self, input: Self::Input) {
		let RelativeMeanAbsoluteErrorInput {
			labels,
			predictions,
			weight,
		} = input;
		for ((mean, label), prediction) in self.means.iter_mut().zip(labels).zip(predictions) {
			let relative_error = (prediction - label).abs() / label.abs();
			mean.update((relative_error, weight));
		}
	}

	fn merge(&mut self, other: Self) {
		for (mean, other) in self.means.iter_mut().zip(other.means) {
			mean.merge(other);
		}
	}

	fn finalize(self) -> Self::Output {
		self.means.into_iter().map(|mean| mean.finalize()).collect()
	}
}

/**
Compute the relative mean absolute error of a single output.

```
use ndarray::prelude::*;
use skmetrics::relative_mean_absolute_error;

let y_true = arr1(&[1.0, 2.0, 4.0]);
let y_pred = arr1(&[1.5, 2.0, 3.0]);
let rmae = relative_mean_absolute_error(y_true.view(), y_pred.view(), None).unwrap();
assert!((rmae - 0.25).abs() < 1e-12);
```
*/
pub fn relative_mean_absolute_error(
	y_true: ArrayView1<f64>,
	y_pred: ArrayView1<f64>,
	sample_weight: Option<ArrayView1<f64>>,
) -> Result<f64> {
	let errors = relative_mean_absolute_error_multioutput(
		y_true.insert_axis(Axis(1)),
		y_pred.insert_axis(Axis(1)),
		sample_weight,
	)?;
	Ok(errors[0])
}

/// Compute the relative mean absolute error of each column of `y_true` and `y_pred`, which have shape (n_samples, n_outputs).
pub fn relative_mean_absolute_error_multioutput(
	y_true: ArrayView2<f64>,
	y_pred: ArrayView2<f64>,
	sample_weight: Option<ArrayView1<f64>>,
) -> Result<Array1<f64>> {
	if y_true.shape() != y_pred.shape() {
		return Err(MetricsError::Shape(format!(
			"y_true has shape {:?} but y_pred has shape {:?}",
			y_true.shape(),
			y_pred.shape()
		)));
	}
	if y_true.is_empty() {
		return Err(MetricsError::Shape(format!(
			"y_true must have at least one sample and one output, got shape {:?}",
			y_true.shape()
		)));
	}
	let sample_weight = check_sample_weight(sample_weight, y_true.nrows())?;
	if y_true.iter().any(|label| *label == 0.0) {
		tracing::warn!("y_true contains zeros, the relative error is not finite");
	}
	let mut metric = RelativeMeanAbsoluteError::new(y_true.ncols());
	for ((labels, predictions), &weight) in y_true
		.genrows()
		.into_iter()
		.zip(y_pred.genrows())
		.zip(sample_weight.iter())
	{
		metric.update(RelativeMeanAbsoluteErrorInput {
			labels,
			predictions,
			weight,
		});
	}
	Ok(metric
		.finalize()
		.into_iter()
		.map(|mean| mean.unwrap_or(f64::NAN))
		.collect())
}

#[test]
fn test_perfect_predictions() {
	let y = arr1(&[1.0, 2.0, 3.0]);
	let rmae = relative_mean_absolute_error(y.view(), y.view(), None).unwrap();
	assert_eq!(rmae, 0.0);
	let y = arr1(&[-4.0, 0.5, 1e9]);
	let rmae = relative_mean_absolute_error(y.view(), y.view(), None).unwrap();
	assert_eq!(rmae, 0.0);
}

#[test]
fn test_zero_label_is_not_finite() {
	let y_true = arr1(&[0.0, 2.0]);
	let y_pred = arr1(&[1.0, 2.0]);
	let rmae = relative_mean_absolute_error(y_true.view(), y_pred.view(), None).unwrap();
	assert!(!rmae.is_finite());
	let rmae = relative_mean_absolute_error(y_true.view(), y_true.view(), None).unwrap();
	assert!(rmae.is_nan());
}

#[test]
fn test_equal_weights() {
	let y_true = arr1(&[1.0, 3.0, -2.0, 7.0]);
	let y_pred = arr1(&[1.25, 2.0, -2.5, 9.0]);
	let unweighted = relative_mean_absolute_error(y_true.view(), y_pred.view(), None).unwrap();
	let weights = arr1(&[2.0; 4]);
	let weighted =
		relative_mean_absolute_error(y_true.view(), y_pred.view(), Some(weights.view())).unwrap();
	assert_eq!(unweighted, weighted);
	let weights = arr1(&[0.3; 4]);
	let weighted =
		relative_mean_absolute_error(y_true.view(), y_pred.view(), Some(weights.view())).unwrap();
	assert!((unweighted - weighted).abs() < 1e-12);
}

#[test]
fn test_weights() {
	let y_true = arr1(&[1.0, 2.0]);
	let y_pred = arr1(&[2.0, 2.0]);
	let weights = arr1(&[1.0, 3.0]);
	let rmae =
		relative_mean_absolute_error(y_true.view(), y_pred.view(), Some(weights.view())).unwrap();
	assert_eq!(rmae, 0.25);
	let weights = arr1(&[1.0, 3.0, 1.0]);
	let result = relative_mean_absolute_error(y_true.view(), y_pred.view(), Some(weights.view()));
	assert!(matches!(result, Err(MetricsError::Shape(_))));
}

#[test]
fn test_multioutput() {
	let y_true = arr2(&[[1.0, 10.0], [2.0, 20.0]]);
	let y_pred = arr2(&[[1.5, 10.0], [2.0, 15.0]]);
	let rmae = relative_mean_absolute_error_multioutput(y_true.view(), y_pred.view(), None).unwrap();
	assert_eq!(rmae, arr1(&[0.25, 0.125]));
	let result =
		relative_mean_absolute_error_multioutput(y_true.view(), y_pred.t(), None);
	assert!(result.is_ok());
	let y_pred = arr2(&[[1.5, 10.0]]);
	let result = relative_mean_absolute_error_multioutput(y_true.view(), y_pred.view(), None);
	assert!(matches!(result, Err(MetricsError::Shape(_))));
}

#[test]
fn test_merge() {
	let y_true = arr2(&[[1.0], [2.0], [4.0], [5.0]]);
	let y_pred = arr2(&[[2.0], [1.0], [4.0], [6.0]]);
	let mut left = RelativeMeanAbsoluteError::new(1);
	let mut right = RelativeMeanAbsoluteError::new(1);
	for (index, (labels, predictions)) in y_true.genrows().into_iter().zip(y_pred.genrows()).enumerate() {
		let input = RelativeMeanAbsoluteErrorInput {
			labels,
			predictions,
			weight: 1.0,
		};
		if index < 2 {
			left.update(input);
		} else {
			right.update(input);
		}
	}
	left.merge(right);
	let merged = left.finalize();
	let batch = relative_mean_absolute_error_multioutput(y_true.view(), y_pred.view(), None).unwrap();
	assert_eq!(merged, vec![Some(batch[0])]);
	assert_eq!(RelativeMeanAbsoluteError::new(2).finalize(), vec![None, None]);
}
