use crate::{
	auc_roc::{auc, roc_curve},
	classes::{one_hot, Classes},
	contingency::ContingencyMatrix,
	error::{MetricsError, Result},
	mean::geometric_mean,
	options::{GScoreOptions, GeometricRocAucOptions},
	sample_weight::check_sample_weight,
};
use ndarray::prelude::*;

/**
This function computes the G-score: the geometric mean of the true rate (recall) of every class.

The true rate of class `i` is entry `(i, i)` of the contingency matrix divided by the sum of row `i`. A class that only appears in `y_pred` has an empty row, so its rate and the score are `NaN` unless `options.eps` is set.

```
use ndarray::prelude::*;
use skmetrics::{g_score, GScoreOptions};

let y_true = arr1(&[0, 0, 1, 1]);
let y_pred = arr1(&[0, 1, 1, 1]);
let g = g_score(y_true.view(), y_pred.view(), &GScoreOptions::default()).unwrap();
assert!((g - 0.5f64.sqrt()).abs() < 1e-12);
```
*/
pub fn g_score<T>(y_true: ArrayView1<T>, y_pred: ArrayView1<T>, options: &GScoreOptions) -> Result<f64>
where
	T: Ord + Clone,
{
	let contingency_matrix =
		ContingencyMatrix::from_labels(y_true, y_pred, options.eps, options.sparse)?;
	let true_rates = contingency_matrix.diagonal() / contingency_matrix.row_sums();
	if true_rates.iter().any(|rate| rate.is_nan()) {
		tracing::warn!("a class has no true samples, its true rate is undefined");
	}
	Ok(geometric_mean(&true_rates.to_vec()))
}

/**
This function computes the multiclass geometric ROC AUC score. `y_true` is one-hot encoded with one column per class, in sorted class order, and each column is scored against the matching column of `y_score`, which has shape (n_samples, n_classes). The result is the geometric mean of the per-class areas, so a single class with an area of zero makes the whole score zero.
*/
pub fn geometric_roc_auc_score<T>(
	y_true: ArrayView1<T>,
	y_score: ArrayView2<f64>,
	sample_weight: Option<ArrayView1<f64>>,
	options: &GeometricRocAucOptions,
) -> Result<f64>
where
	T: Ord + Clone,
{
	if y_true.is_empty() {
		return Err(MetricsError::Shape(
			"cannot compute roc auc without samples".to_owned(),
		));
	}
	let classes = Classes::from_labels(y_true);
	let n_classes = classes.len();
	if y_score.nrows() != y_true.len() || y_score.ncols() != n_classes {
		return Err(MetricsError::Shape(format!(
			"y_score has shape {:?} but y_true has {} samples and {} classes",
			y_score.shape(),
			y_true.len(),
			n_classes
		)));
	}
	let pos_label = match options.pos_label {
		None | Some(1) => 1.0,
		Some(0) => 0.0,
		Some(pos_label) => {
			return Err(MetricsError::Configuration(format!(
				"pos_label must be 0 or 1 for one-vs-rest indicator columns, got {}",
				pos_label
			)))
		}
	};
	let sample_weight = check_sample_weight(sample_weight, y_true.len())?;
	let indicators = one_hot(y_true, &classes)?;
	let classes_auc = (0..n_classes)
		.map(|class_index| {
			let roc_curve = roc_curve(
				indicators.column(class_index),
				y_score.column(class_index),
				pos_label,
				Some(sample_weight.view()),
				options.drop_intermediate,
			)?;
			let (fpr, tpr): (Vec<f64>, Vec<f64>) = roc_curve
				.iter()
				.map(|point| (point.false_positive_rate, point.true_positive_rate))
				.unzip();
			auc(&fpr, &tpr, options.reorder)
		})
		.collect::<Result<Vec<f64>>>()?;
	tracing::debug!(?classes_auc, "computed per-class roc auc");
	Ok(geometric_mean(&classes_auc))
}

#[test]
fn test_g_score_perfect() {
	let y = arr1(&[0, 0, 1, 1]);
	let g = g_score(y.view(), y.view(), &GScoreOptions::default()).unwrap();
	assert_eq!(g, 1.0);
	let y = arr1(&["cat", "dog", "rabbit", "dog", "cat"]);
	let g = g_score(y.view(), y.view(), &GScoreOptions::default()).unwrap();
	assert_eq!(g, 1.0);
}

#[test]
fn test_g_score_views_with_different_lifetimes() {
	fn score<'a, 'b>(y_true: ArrayView1<'a, i32>, y_pred: ArrayView1<'b, i32>) -> f64 {
		g_score(y_true, y_pred, &GScoreOptions::default()).unwrap()
	}
	let y_true: ArrayView1<'static, i32> = aview1(&[0, 0, 1, 1]);
	let y_pred = arr1(&[0, 1, 1, 1]);
	assert!((score(y_true, y_pred.view()) - 0.5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_g_score_multiclass() {
	// example taken from https://en.wikipedia.org/wiki/Confusion_matrix
	let y_true = arr1(&[
		1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
	]);
	let y_pred = arr1(&[
		1, 1, 1, 1, 1, 2, 2, 2, 1, 1, 2, 2, 2, 3, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
	]);
	let g = g_score(y_true.view(), y_pred.view(), &GScoreOptions::default()).unwrap();
	let expected = (5.0 / 8.0 * 3.0 / 6.0 * 12.0 / 13.0f64).powf(1.0 / 3.0);
	assert!((g - expected).abs() < 1e-12);
}

#[test]
fn test_g_score_relabeling() {
	let y_true = arr1(&[0, 0, 1, 1, 2, 2, 2]);
	let y_pred = arr1(&[0, 1, 1, 1, 2, 0, 2]);
	let relabel = |y: &Array1<i32>| y.mapv(|label| ["z", "x", "y"][label as usize]);
	let g = g_score(y_true.view(), y_pred.view(), &GScoreOptions::default()).unwrap();
	let relabeled = g_score(
		relabel(&y_true).view(),
		relabel(&y_pred).view(),
		&GScoreOptions::default(),
	)
	.unwrap();
	assert!((g - relabeled).abs() < 1e-12);
}

#[test]
fn test_g_score_sparse_matches_dense() {
	let y_true = arr1(&[0, 0, 0, 1, 1, 2]);
	let y_pred = arr1(&[0, 0, 1, 1, 0, 2]);
	let dense = g_score(y_true.view(), y_pred.view(), &GScoreOptions::default()).unwrap();
	let sparse = g_score(
		y_true.view(),
		y_pred.view(),
		&GScoreOptions {
			eps: None,
			sparse: true,
		},
	)
	.unwrap();
	assert_eq!(dense, sparse);
}

#[test]
fn test_g_score_eps() {
	// class 2 is only ever predicted, so its row is empty
	let y_true = arr1(&[0, 0, 1, 1]);
	let y_pred = arr1(&[0, 2, 1, 1]);
	let g = g_score(y_true.view(), y_pred.view(), &GScoreOptions::default()).unwrap();
	assert!(g.is_nan());
	let options = GScoreOptions {
		eps: Some(1e-6),
		sparse: false,
	};
	let g = g_score(y_true.view(), y_pred.view(), &options).unwrap();
	assert!(g.is_finite());
	let options = GScoreOptions {
		eps: Some(1e-6),
		sparse: true,
	};
	let result = g_score(y_true.view(), y_pred.view(), &options);
	assert!(matches!(result, Err(MetricsError::Configuration(_))));
}

#[test]
fn test_geometric_roc_auc_perfect() {
	let y_true = arr1(&[0, 0, 1, 1]);
	let y_score = arr2(&[[0.9, 0.1], [0.8, 0.2], [0.3, 0.7], [0.1, 0.9]]);
	let score = geometric_roc_auc_score(
		y_true.view(),
		y_score.view(),
		None,
		&GeometricRocAucOptions::default(),
	)
	.unwrap();
	assert_eq!(score, 1.0);
	let options = GeometricRocAucOptions {
		pos_label: Some(0),
		..Default::default()
	};
	// with the indicators inverted every class is ranked exactly backwards
	let score = geometric_roc_auc_score(y_true.view(), y_score.view(), None, &options).unwrap();
	assert_eq!(score, 0.0);
}

#[test]
fn test_geometric_roc_auc_noise() {
	use rand::{Rng, SeedableRng};
	let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(42);
	let n_samples = 6000;
	let y_true: Array1<usize> = (0..n_samples).map(|i| i % 3).collect();
	let y_score = Array2::from_shape_fn((n_samples, 3), |_| rng.gen::<f64>());
	let score = geometric_roc_auc_score(
		y_true.view(),
		y_score.view(),
		None,
		&GeometricRocAucOptions::default(),
	)
	.unwrap();
	assert!((score - 0.5).abs() < 0.05, "{}", score);
}

#[test]
fn test_geometric_roc_auc_options() {
	let y_true = arr1(&["a", "b", "c", "a", "b", "c"]);
	let y_score = arr2(&[
		[0.7, 0.2, 0.1],
		[0.3, 0.4, 0.3],
		[0.1, 0.5, 0.4],
		[0.2, 0.6, 0.2],
		[0.4, 0.5, 0.1],
		[0.2, 0.2, 0.6],
	]);
	let default = geometric_roc_auc_score(
		y_true.view(),
		y_score.view(),
		None,
		&GeometricRocAucOptions::default(),
	)
	.unwrap();
	let options = GeometricRocAucOptions {
		pos_label: None,
		drop_intermediate: false,
		reorder: true,
	};
	let weights = arr1(&[0.5; 6]);
	let other = geometric_roc_auc_score(y_true.view(), y_score.view(), Some(weights.view()), &options)
		.unwrap();
	assert!((default - other).abs() < 1e-12);
	assert!(default > 0.0 && default < 1.0);
}

#[test]
fn test_geometric_roc_auc_errors() {
	let y_true = arr1(&[0, 1, 2]);
	let y_score = arr2(&[[0.5, 0.5], [0.5, 0.5], [0.5, 0.5]]);
	let result = geometric_roc_auc_score(
		y_true.view(),
		y_score.view(),
		None,
		&GeometricRocAucOptions::default(),
	);
	assert!(matches!(result, Err(MetricsError::Shape(_))));
	let y_true = arr1(&[0, 1]);
	let options = GeometricRocAucOptions {
		pos_label: Some(2),
		..Default::default()
	};
	let y_score = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
	let result = geometric_roc_auc_score(y_true.view(), y_score.view(), None, &options);
	assert!(matches!(result, Err(MetricsError::Configuration(_))));
}
