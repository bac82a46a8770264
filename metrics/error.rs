use skmetrics_finite::NotFiniteError;
use thiserror::Error;

/// The ways a metric computation can fail. Numeric edge cases such as a division by zero are not errors, they propagate as `NaN` or infinity.
#[derive(Debug, Error)]
pub enum MetricsError {
	/// The inputs have mismatched lengths or dimensions, or are empty.
	#[error("shape error: {0}")]
	Shape(String),
	/// Options were requested together that cannot be combined, or an option is out of its domain.
	#[error("configuration error: {0}")]
	Configuration(String),
	/// The inputs are well formed but the metric is undefined for them.
	#[error("degenerate input: {0}")]
	DegenerateInput(String),
	#[error("invalid sample weight: {0}")]
	SampleWeight(String),
	#[error("scores must be finite: {0}")]
	NotFinite(#[from] NotFiniteError),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
