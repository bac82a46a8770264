use crate::{
	error::{MetricsError, Result},
	sample_weight::check_sample_weight,
};
use itertools::{izip, Itertools};
use ndarray::prelude::*;
use skmetrics_finite::Finite;
use std::cmp::Ordering;

#[derive(Debug, PartialEq)]
pub struct RocCurvePoint {
	/// The classification threshold. Samples with score >= threshold are predicted positive.
	pub threshold: f64,
	/// The false positive rate for all predictions with score >= threshold.
	pub false_positive_rate: f64,
	/// The true positive rate for all predictions with score >= threshold.
	pub true_positive_rate: f64,
}

/**
This function computes the ROC curve of a single binary problem. The ROC curve plots the false positive rate on the x axis and the true positive rate on the y axis for various classification thresholds.

Samples whose `y_true` equals `pos_label` are positive, all others are negative. The first point is always (0, 0), with a threshold one above the highest score. If `drop_intermediate` is set, points that lie on a straight line between their neighbors are dropped, which does not change the area under the curve.
*/
pub fn roc_curve(
	y_true: ArrayView1<f64>,
	y_score: ArrayView1<f64>,
	pos_label: f64,
	sample_weight: Option<ArrayView1<f64>>,
	drop_intermediate: bool,
) -> Result<Vec<RocCurvePoint>> {
	if y_true.len() != y_score.len() {
		return Err(MetricsError::Shape(format!(
			"y_true has {} samples but y_score has {}",
			y_true.len(),
			y_score.len()
		)));
	}
	if y_true.is_empty() {
		return Err(MetricsError::Shape(
			"cannot compute a roc curve without samples".to_owned(),
		));
	}
	let sample_weight = check_sample_weight(sample_weight, y_true.len())?;
	let mut tps_fps =
		compute_tps_fps_by_threshold(y_true, y_score, pos_label, sample_weight.view())?;
	if drop_intermediate && tps_fps.len() > 2 {
		let n_points = tps_fps.len();
		tps_fps = (0..n_points)
			.filter(|&i| {
				i == 0 || i == n_points - 1 || is_corner(&tps_fps[i - 1], &tps_fps[i], &tps_fps[i + 1])
			})
			.map(|i| tps_fps[i].clone())
			.collect();
	}
	let (count_positives, count_negatives) = match tps_fps.last() {
		Some(last) => (last.true_positives, last.false_positives),
		None => (0.0, 0.0),
	};
	if count_positives <= 0.0 {
		tracing::warn!("no positive samples in y_true, true positive rates are undefined");
	}
	if count_negatives <= 0.0 {
		tracing::warn!("no negative samples in y_true, false positive rates are undefined");
	}
	let rate = |count: f64, total: f64| if total > 0.0 { count / total } else { f64::NAN };
	// add a point at (0,0) on the roc curve with a threshold above every score
	let mut roc_curve = vec![RocCurvePoint {
		threshold: tps_fps[0].threshold + 1.0,
		false_positive_rate: rate(0.0, count_negatives),
		true_positive_rate: rate(0.0, count_positives),
	}];
	roc_curve.extend(tps_fps.iter().map(|point| RocCurvePoint {
		threshold: point.threshold,
		false_positive_rate: rate(point.false_positives, count_negatives),
		true_positive_rate: rate(point.true_positives, count_positives),
	}));
	Ok(roc_curve)
}

/**
This function computes the area under the curve through the points (`x`, `y`) using the trapezoid method.

If `reorder` is false, `x` must be monotonic. A decreasing `x` yields the same area as the mirrored increasing curve. If `reorder` is true, the points are sorted by x, then y, before integrating.
*/
pub fn auc(x: &[f64], y: &[f64], reorder: bool) -> Result<f64> {
	if x.len() != y.len() {
		return Err(MetricsError::Shape(format!(
			"x has {} points but y has {}",
			x.len(),
			y.len()
		)));
	}
	if x.len() < 2 {
		return Err(MetricsError::DegenerateInput(format!(
			"at least 2 points are needed to compute the area under a curve, got {}",
			x.len()
		)));
	}
	let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
	let mut direction = 1.0;
	if reorder {
		points.sort_by(|a, b| {
			a.0.partial_cmp(&b.0)
				.unwrap_or(Ordering::Equal)
				.then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
		});
	} else {
		let dx: Vec<f64> = x.iter().tuple_windows().map(|(a, b)| b - a).collect();
		if dx.iter().any(|dx| *dx < 0.0) {
			if dx.iter().all(|dx| *dx <= 0.0) {
				direction = -1.0;
			} else {
				return Err(MetricsError::DegenerateInput(
					"x is neither increasing nor decreasing".to_owned(),
				));
			}
		}
	}
	// compute the riemann sum of the curve
	let area: f64 = points
		.iter()
		.tuple_windows()
		.map(|(left, right)| {
			let y_average = (left.1 + right.1) / 2.0;
			let dx = right.0 - left.0;
			y_average * dx
		})
		.sum();
	Ok(direction * area)
}

#[derive(Debug, Clone)]
struct TpsFpsPoint {
	/// The classification threshold.
	threshold: f64,
	/// The weighted true positives with score >= threshold.
	true_positives: f64,
	/// The weighted false positives with score >= threshold.
	false_positives: f64,
}

/**
This function computes the cumulative weighted counts of true positives and false positives at each distinct score, from the highest score to the lowest. Samples with equal scores share a single threshold.
*/
fn compute_tps_fps_by_threshold(
	y_true: ArrayView1<f64>,
	y_score: ArrayView1<f64>,
	pos_label: f64,
	sample_weight: ArrayView1<f64>,
) -> Result<Vec<TpsFpsPoint>> {
	let scores = Finite::collect(y_score.iter())?;
	let mut samples: Vec<(Finite<f64>, bool, f64)> =
		izip!(scores, y_true.iter(), sample_weight.iter())
			.map(|(score, label, weight)| (score, *label == pos_label, *weight))
			.collect();
	samples.sort_by(|a, b| b.0.cmp(&a.0));
	let mut tps_fps = Vec::new();
	let mut true_positives = 0.0;
	let mut false_positives = 0.0;
	let groups = samples.iter().group_by(|sample| sample.0);
	for (score, group) in &groups {
		for (_, is_positive, weight) in group {
			if *is_positive {
				true_positives += weight;
			} else {
				false_positives += weight;
			}
		}
		tps_fps.push(TpsFpsPoint {
			threshold: score.get(),
			true_positives,
			false_positives,
		});
	}
	Ok(tps_fps)
}

/// A point is a corner if the curve changes slope at it, in either coordinate.
fn is_corner(previous: &TpsFpsPoint, point: &TpsFpsPoint, next: &TpsFpsPoint) -> bool {
	let second_difference = |f: fn(&TpsFpsPoint) -> f64| f(next) - 2.0 * f(point) + f(previous);
	second_difference(|p| p.false_positives) != 0.0 || second_difference(|p| p.true_positives) != 0.0
}

#[test]
fn test_roc_curve() {
	let labels = arr1(&[1.0, 1.0, 0.0, 0.0]);
	let scores = arr1(&[0.75, 0.5, 0.5, 0.25]);
	let roc_curve = roc_curve(labels.view(), scores.view(), 1.0, None, true).unwrap();
	insta::assert_debug_snapshot!(roc_curve, @r###"
 [
     RocCurvePoint {
         threshold: 1.75,
         false_positive_rate: 0.0,
         true_positive_rate: 0.0,
     },
     RocCurvePoint {
         threshold: 0.75,
         false_positive_rate: 0.0,
         true_positive_rate: 0.5,
     },
     RocCurvePoint {
         threshold: 0.5,
         false_positive_rate: 0.5,
         true_positive_rate: 1.0,
     },
     RocCurvePoint {
         threshold: 0.25,
         false_positive_rate: 1.0,
         true_positive_rate: 1.0,
     },
 ]
 "###);
}

#[test]
fn test_auc_roc() {
	let labels = arr1(&[1.0, 1.0, 0.0, 0.0]);
	let scores = arr1(&[0.9, 0.4, 0.4, 0.2]);
	let roc_curve = roc_curve(labels.view(), scores.view(), 1.0, None, false).unwrap();
	let (fpr, tpr): (Vec<f64>, Vec<f64>) = roc_curve
		.iter()
		.map(|point| (point.false_positive_rate, point.true_positive_rate))
		.unzip();
	assert_eq!(fpr, vec![0.0, 0.0, 0.5, 1.0]);
	assert_eq!(tpr, vec![0.0, 0.5, 1.0, 1.0]);
	let auc = auc(&fpr, &tpr, false).unwrap();
	assert!(f64::abs(auc - 0.875) < f64::EPSILON);
}

#[test]
fn test_drop_intermediate() {
	let labels = arr1(&[1.0, 1.0, 1.0, 0.0]);
	let scores = arr1(&[0.875, 0.75, 0.625, 0.125]);
	let full = roc_curve(labels.view(), scores.view(), 1.0, None, false).unwrap();
	let dropped = roc_curve(labels.view(), scores.view(), 1.0, None, true).unwrap();
	assert_eq!(full.len(), 5);
	let thresholds: Vec<f64> = dropped.iter().map(|point| point.threshold).collect();
	assert_eq!(thresholds, vec![1.875, 0.875, 0.625, 0.125]);
	let area = |curve: &[RocCurvePoint]| {
		let (fpr, tpr): (Vec<f64>, Vec<f64>) = curve
			.iter()
			.map(|point| (point.false_positive_rate, point.true_positive_rate))
			.unzip();
		auc(&fpr, &tpr, false).unwrap()
	};
	assert_eq!(area(&full), 1.0);
	assert_eq!(area(&dropped), 1.0);
}

#[test]
fn test_sample_weight() {
	let labels = arr1(&[1.0, 0.0, 1.0, 0.0]);
	let scores = arr1(&[0.5, 0.25, 0.125, 0.75]);
	let weights = arr1(&[2.0, 2.0, 2.0, 2.0]);
	let unweighted = roc_curve(labels.view(), scores.view(), 1.0, None, true).unwrap();
	let weighted = roc_curve(labels.view(), scores.view(), 1.0, Some(weights.view()), true).unwrap();
	assert_eq!(unweighted, weighted);
	// doubling the weight of the top-ranked negative moves its false positive rate
	let weights = arr1(&[1.0, 1.0, 1.0, 2.0]);
	let weighted = roc_curve(labels.view(), scores.view(), 1.0, Some(weights.view()), false).unwrap();
	assert_eq!(weighted[1].false_positive_rate, 2.0 / 3.0);
}

#[test]
fn test_no_negatives() {
	let labels = arr1(&[1.0, 1.0]);
	let scores = arr1(&[0.5, 0.25]);
	let roc_curve = roc_curve(labels.view(), scores.view(), 1.0, None, true).unwrap();
	assert!(roc_curve.iter().all(|point| point.false_positive_rate.is_nan()));
	assert_eq!(roc_curve[2].true_positive_rate, 1.0);
}

#[test]
fn test_non_finite_scores() {
	let labels = arr1(&[1.0, 0.0]);
	let scores = arr1(&[0.5, f64::NAN]);
	let result = roc_curve(labels.view(), scores.view(), 1.0, None, true);
	assert!(matches!(result, Err(MetricsError::NotFinite(_))));
}

#[test]
fn test_auc_direction() {
	let x = [0.0, 1.0, 0.5];
	let y = [0.0, 1.0, 1.0];
	assert!(matches!(
		auc(&x, &y, false),
		Err(MetricsError::DegenerateInput(_))
	));
	assert_eq!(auc(&x, &y, true).unwrap(), 0.75);
	let decreasing = auc(&[1.0, 0.5, 0.0], &[1.0, 1.0, 0.0], false).unwrap();
	assert_eq!(decreasing, 0.75);
	assert!(matches!(
		auc(&[0.0], &[1.0], false),
		Err(MetricsError::DegenerateInput(_))
	));
}
