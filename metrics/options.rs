/*!
This module defines the option structs accepted by the classification metrics. They deserialize with `serde`, so an evaluation pipeline can keep them in its own configuration file. Missing fields take their default values.
*/

/// Options for [`g_score`](fn.g_score.html).
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct GScoreOptions {
	/// If set, this value is added to every cell of the contingency matrix, which keeps empty rows from producing `NaN`.
	pub eps: Option<f64>,
	/// Store the contingency matrix in compressed sparse row form. Cannot be combined with `eps`.
	pub sparse: bool,
}

/// Options for [`geometric_roc_auc_score`](fn.geometric_roc_auc_score.html).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct GeometricRocAucOptions {
	/// The indicator value considered positive in each one-vs-rest column, either 0 or 1. Defaults to 1.
	pub pos_label: Option<u8>,
	/// Drop thresholds that would not appear on a plotted ROC curve.
	pub drop_intermediate: bool,
	/// Sort curve points by (x, y) before integrating instead of requiring monotonic x.
	pub reorder: bool,
}

impl Default for GeometricRocAucOptions {
	fn default() -> Self {
		Self {
			pos_label: None,
			drop_intermediate: true,
			reorder: false,
		}
	}
}

#[test]
fn test_deserialize_partial_options() {
	let options: GeometricRocAucOptions = serde_json::from_str(r#"{ "reorder": true }"#).unwrap();
	assert_eq!(
		options,
		GeometricRocAucOptions {
			pos_label: None,
			drop_intermediate: true,
			reorder: true,
		}
	);
	let options: GScoreOptions = serde_json::from_str(r#"{ "eps": 1e-9 }"#).unwrap();
	assert_eq!(options.eps, Some(1e-9));
	assert!(!options.sparse);
}
