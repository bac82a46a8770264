/*!
This crate provides metrics for evaluating classifiers, transformers and regressors: the [`g_score`](fn.g_score.html), the [`geometric_roc_auc_score`](fn.geometric_roc_auc_score.html), the [`separability_score`](fn.separability_score.html) and the [`relative_mean_absolute_error`](fn.relative_mean_absolute_error.html), along with the building blocks they are computed from, such as the [`ContingencyMatrix`](enum.ContingencyMatrix.html) and the [`roc_curve`](fn.roc_curve.html).

Every function is pure and allocates its own intermediates, so they can be called from any number of threads at once.
*/

#![allow(clippy::tabs_in_doc_comments)]

mod auc_roc;
mod classes;
mod classification;
mod contingency;
mod error;
mod mean;
mod options;
mod regression;
mod sample_weight;
mod separability;

pub use self::auc_roc::{auc, roc_curve, RocCurvePoint};
pub use self::classes::{one_hot, Classes};
pub use self::classification::{g_score, geometric_roc_auc_score};
pub use self::contingency::{ContingencyMatrix, CsrMatrix};
pub use self::error::{MetricsError, Result};
pub use self::mean::{geometric_mean, WeightedMean};
pub use self::options::{GScoreOptions, GeometricRocAucOptions};
pub use self::regression::{
	relative_mean_absolute_error, relative_mean_absolute_error_multioutput,
	RelativeMeanAbsoluteError, RelativeMeanAbsoluteErrorInput,
};
pub use self::sample_weight::check_sample_weight;
pub use self::separability::{covariance, scatter_matrices, separability_score, ScatterMatrices};

/**
The `StreamingMetric` trait defines a common interface to metrics that can be computed in a streaming manner, where the input is available in chunks.

After being initialized, a value of type `T` implementing the `StreamingMetric` trait can have `update()` called on it with values of the associated type `Input`. Multiple values of `T` can be merged together by calling `merge()`. This is useful when computing a metric across multiple threads. When finished aggregating, you can call `finalize()` on the metric to produce the associated type `Output`.

# Examples

```
use ndarray::prelude::*;
use skmetrics::{RelativeMeanAbsoluteError, RelativeMeanAbsoluteErrorInput, StreamingMetric};

let mut metric = RelativeMeanAbsoluteError::new(1);
for (label, prediction) in [(2.0, 1.0), (4.0, 4.0)].iter() {
	metric.update(RelativeMeanAbsoluteErrorInput {
		labels: aview1(std::slice::from_ref(label)),
		predictions: aview1(std::slice::from_ref(prediction)),
		weight: 1.0,
	});
}
assert_eq!(metric.finalize(), vec![Some(0.25)]);
```

The seemingly unused generic lifetime `'a` exists here to allow `Input`s and `Output`s to borrow from their enclosing scope.
*/
pub trait StreamingMetric<'a> {
	/// `Input` is the type to aggregate in calls to `update()`.
	type Input;
	/// `Output` is the return type of `finalize()`.
	type Output;
	/// Update this streaming metric with the `Input` `input`.
	fn update(&mut self, input: Self::Input);
	/// Merge multiple independently computed streaming metrics.
	fn merge(&mut self, other: Self);
	/// When you are done aggregating `Input`s, call `finalize()` to produce an `Output`.
	fn finalize(self) -> Self::Output;
}
