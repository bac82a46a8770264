/*!
This module computes the separability score of a projection: how spread out the whole data set is relative to how spread out each class is on its own.
*/

use crate::{
	classes::Classes,
	error::{MetricsError, Result},
};
use ndarray::prelude::*;
use num_traits::ToPrimitive;

/// The within-class and total scatter of a projection, both of shape (n_features, n_features).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterMatrices {
	/// The arithmetic mean of the per-class covariance matrices.
	pub within: Array2<f64>,
	/// The covariance matrix of all samples together.
	pub total: Array2<f64>,
}

/**
This function computes the sample covariance matrix of `values`, where each column is a variable and each row is an observation. It normalizes by `n - 1`.
*/
pub fn covariance(values: ArrayView2<f64>) -> Result<Array2<f64>> {
	let n_samples = values.nrows();
	if n_samples < 2 {
		return Err(MetricsError::DegenerateInput(format!(
			"covariance needs at least 2 samples, got {}",
			n_samples
		)));
	}
	let mean = values
		.mean_axis(Axis(0))
		.ok_or_else(|| MetricsError::Shape("cannot average zero samples".to_owned()))?;
	let centered = &values - &mean.insert_axis(Axis(0));
	Ok(centered.t().dot(&centered) / (n_samples - 1).to_f64().unwrap())
}

/// Compute the within-class and total scatter matrices of the projections `y_pred` grouped by `y_true`.
pub fn scatter_matrices<T>(y_true: ArrayView1<T>, y_pred: ArrayView2<f64>) -> Result<ScatterMatrices>
where
	T: Ord + Clone,
{
	if y_true.len() != y_pred.nrows() {
		return Err(MetricsError::Shape(format!(
			"y_true has {} samples but y_pred has {} rows",
			y_true.len(),
			y_pred.nrows()
		)));
	}
	if y_true.is_empty() || y_pred.ncols() == 0 {
		return Err(MetricsError::Shape(format!(
			"y_pred must have at least one sample and one feature, got shape {:?}",
			y_pred.shape()
		)));
	}
	let classes = Classes::from_labels(y_true);
	let class_indexes = classes.encode(y_true)?;
	let n_features = y_pred.ncols();
	let mut within = Array2::<f64>::zeros((n_features, n_features));
	for class_index in 0..classes.len() {
		let rows: Vec<usize> = class_indexes
			.iter()
			.enumerate()
			.filter(|&(_, &c)| c == class_index)
			.map(|(row, _)| row)
			.collect();
		if rows.len() < 2 {
			return Err(MetricsError::DegenerateInput(format!(
				"class {} has {} sample(s), each class needs at least 2",
				class_index,
				rows.len()
			)));
		}
		within += &covariance(y_pred.select(Axis(0), &rows).view())?;
	}
	within /= classes.len().to_f64().unwrap();
	let total = covariance(y_pred)?;
	tracing::debug!(n_classes = classes.len(), n_features, "computed scatter matrices");
	Ok(ScatterMatrices { within, total })
}

/**
This function computes the separability score: the total scatter divided element-wise by the within-class scatter, reduced to a scalar by taking the trace. With a single feature this is simply the ratio of total to within-class variance. Higher values mean the classes are further apart relative to their own spread.

```
use ndarray::prelude::*;
use skmetrics::separability_score;

let y_true = arr1(&[0, 0, 1, 1]);
let y_pred = arr2(&[[0.0], [2.0], [10.0], [12.0]]);
let score = separability_score(y_true.view(), y_pred.view()).unwrap();
assert!((score - 52.0 / 3.0).abs() < 1e-12);
```
*/
pub fn separability_score<T>(y_true: ArrayView1<T>, y_pred: ArrayView2<f64>) -> Result<f64>
where
	T: Ord + Clone,
{
	let ScatterMatrices { within, total } = scatter_matrices(y_true, y_pred)?;
	if total.nrows() > 1 && is_singular(total.view()) {
		return Err(MetricsError::DegenerateInput(
			"total scatter is singular, the features are linearly dependent".to_owned(),
		));
	}
	// Only the diagonal of the element-wise quotient contributes to the trace.
	if let Some(feature) = within.diag().iter().position(|variance| *variance == 0.0) {
		return Err(MetricsError::DegenerateInput(format!(
			"within-class scatter is singular, feature {} has no within-class variance",
			feature
		)));
	}
	let ratio = &total / &within;
	Ok(ratio.diag().sum())
}

/// Gaussian elimination with partial pivoting. A pivot that is negligible relative to the largest entry means the matrix is singular.
fn is_singular(matrix: ArrayView2<f64>) -> bool {
	let n = matrix.nrows();
	let mut matrix = matrix.to_owned();
	let scale = matrix.iter().fold(0.0f64, |max, value| max.max(value.abs()));
	if scale == 0.0 {
		return true;
	}
	let tolerance = scale * 1e-12;
	for column in 0..n {
		let pivot_row = (column..n)
			.max_by(|&a, &b| {
				matrix[(a, column)]
					.abs()
					.partial_cmp(&matrix[(b, column)].abs())
					.unwrap_or(std::cmp::Ordering::Equal)
			})
			.unwrap_or(column);
		let pivot = matrix[(pivot_row, column)];
		if pivot.abs() <= tolerance {
			return true;
		}
		if pivot_row != column {
			for k in 0..n {
				matrix.swap((pivot_row, k), (column, k));
			}
		}
		for row in column + 1..n {
			let factor = matrix[(row, column)] / pivot;
			for k in column..n {
				matrix[(row, k)] -= factor * matrix[(column, k)];
			}
		}
	}
	false
}

#[test]
fn test_is_singular() {
	assert!(!is_singular(arr2(&[[2.0, 1.0], [1.0, 3.0]]).view()));
	assert!(is_singular(arr2(&[[1.0, 2.0], [2.0, 4.0]]).view()));
	assert!(is_singular(arr2(&[[0.0, 0.0], [0.0, 0.0]]).view()));
}

#[test]
fn test_covariance() {
	let values = arr2(&[[1.0, 2.0], [3.0, 6.0], [5.0, 10.0]]);
	let covariance = covariance(values.view()).unwrap();
	assert_eq!(covariance, arr2(&[[4.0, 8.0], [8.0, 16.0]]));
}

#[test]
fn test_scatter_matrices() {
	let y_true = arr1(&["a", "a", "b", "b"]);
	let y_pred = arr2(&[[0.0], [2.0], [10.0], [12.0]]);
	let scatter = scatter_matrices(y_true.view(), y_pred.view()).unwrap();
	assert_eq!(scatter.within, arr2(&[[2.0]]));
	assert!((scatter.total[(0, 0)] - 104.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_random_projection() {
	use rand::{Rng, SeedableRng};
	let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(0);
	let y_pred = Array2::from_shape_fn((4, 3), |_| rng.gen::<f64>());
	let y_true = arr1(&[0, 0, 1, 1]);
	let score = separability_score(y_true.view(), y_pred.view()).unwrap();
	assert!(score.is_finite());
	assert!(score > 0.0);
}

#[test]
fn test_separation_increases_score() {
	let offsets = [[-1.0, 0.5], [1.0, -0.5], [0.5, 1.0], [-0.5, -1.0]];
	let y_true = arr1(&[0, 0, 0, 0, 1, 1, 1, 1]);
	let scores: Vec<f64> = [0.5, 1.0, 2.0, 4.0, 8.0]
		.iter()
		.map(|&distance| {
			let y_pred = Array2::from_shape_fn((8, 2), |(row, feature)| {
				let center = if row < 4 { 0.0 } else { distance };
				center + offsets[row % 4][feature]
			});
			separability_score(y_true.view(), y_pred.view()).unwrap()
		})
		.collect();
	for pair in scores.windows(2) {
		assert!(pair[1] > pair[0], "{:?}", scores);
	}
}

#[test]
fn test_single_sample_class() {
	let y_true = arr1(&[0, 0, 1]);
	let y_pred = arr2(&[[0.0], [1.0], [5.0]]);
	let result = separability_score(y_true.view(), y_pred.view());
	assert!(matches!(result, Err(MetricsError::DegenerateInput(_))));
}

#[test]
fn test_constant_feature() {
	let y_true = arr1(&[0, 0, 1, 1]);
	let y_pred = arr2(&[[0.0, 1.0], [1.0, 1.0], [5.0, 1.0], [6.0, 1.0]]);
	let result = separability_score(y_true.view(), y_pred.view());
	assert!(matches!(result, Err(MetricsError::DegenerateInput(_))));
}

#[test]
fn test_singular_total_scatter() {
	// the second feature is twice the first
	let y_true = arr1(&[0, 0, 1, 1]);
	let y_pred = arr2(&[[0.0, 0.0], [1.0, 2.0], [5.0, 10.0], [7.0, 14.0]]);
	let scatter = scatter_matrices(y_true.view(), y_pred.view()).unwrap();
	assert!(scatter.within.diag().iter().all(|variance| *variance > 0.0));
	let result = separability_score(y_true.view(), y_pred.view());
	assert!(matches!(result, Err(MetricsError::DegenerateInput(_))));
}

#[test]
fn test_row_mismatch() {
	let y_true = arr1(&[0, 0, 1]);
	let y_pred = arr2(&[[0.0], [1.0]]);
	let result = separability_score(y_true.view(), y_pred.view());
	assert!(matches!(result, Err(MetricsError::Shape(_))));
}
