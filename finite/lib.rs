/*!
This crate provides the `Finite` type, a floating point number that is known to be neither infinite nor `NaN`. Because every `Finite` value is comparable, a slice of them can be sorted, which is what threshold sweeps over classifier scores need.

# Example

```
use skmetrics_finite::Finite;

let scores = Finite::collect(&[0.9, 0.4, 0.2]).unwrap();
assert_eq!(scores.iter().max().unwrap().get(), 0.9);
assert!(Finite::new(f64::NAN).is_err());
```
*/

use num_traits::Float;
use std::cmp::{Ord, Ordering};
use thiserror::Error;

#[derive(Clone, Copy, Debug)]
pub struct Finite<T>(T)
where
	T: Float;

/// The error returned when a value is `NaN` or infinite.
#[derive(Debug, Error)]
#[error("value at position {position} is not finite")]
pub struct NotFiniteError {
	/// The index of the offending value in the input it was taken from, or 0 for a lone value.
	pub position: usize,
}

impl<T> Finite<T>
where
	T: Float,
{
	pub fn new(value: T) -> Result<Self, NotFiniteError> {
		if value.is_finite() {
			Ok(Self(value))
		} else {
			Err(NotFiniteError { position: 0 })
		}
	}

	pub fn get(self) -> T {
		self.0
	}

	/// Wrap every value in `values`, failing on the first one that is not finite.
	pub fn collect<'a, I>(values: I) -> Result<Vec<Self>, NotFiniteError>
	where
		I: IntoIterator<Item = &'a T>,
		T: 'a,
	{
		values
			.into_iter()
			.enumerate()
			.map(|(position, value)| {
				Self::new(*value).map_err(|_| NotFiniteError { position })
			})
			.collect()
	}
}

impl<T> PartialEq for Finite<T>
where
	T: Float,
{
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.0.eq(&other.0)
	}
}

impl<T> Eq for Finite<T> where T: Float {}

impl<T> PartialOrd for Finite<T>
where
	T: Float,
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T> Ord for Finite<T>
where
	T: Float,
{
	fn cmp(&self, other: &Self) -> Ordering {
		// Neither side can be NaN.
		self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
	}
}

#[test]
fn test_collect_reports_position() {
	let error = Finite::collect(&[0.5, 1.0, f64::INFINITY, f64::NAN]).unwrap_err();
	assert_eq!(error.position, 2);
}

#[test]
fn test_sort() {
	let mut scores = Finite::collect(&[0.2f64, -1.0, 0.9, 0.2]).unwrap();
	scores.sort();
	let scores: Vec<f64> = scores.into_iter().map(|score| score.get()).collect();
	assert_eq!(scores, vec![-1.0, 0.2, 0.2, 0.9]);
}
