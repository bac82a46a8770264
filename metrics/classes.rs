use crate::error::{MetricsError, Result};
use ndarray::prelude::*;
use std::collections::BTreeMap;

/// The sorted set of unique labels, mapping each label to a 0-indexed class index.
#[derive(Debug, Clone)]
pub struct Classes<T> {
	index: BTreeMap<T, usize>,
}

impl<T> Classes<T>
where
	T: Ord + Clone,
{
	/// Collect the unique values of `labels`.
	pub fn from_labels(labels: ArrayView1<T>) -> Self {
		Self::from_label_sets(&[labels])
	}

	/// Collect the unique values across several label vectors.
	pub fn from_label_sets(label_sets: &[ArrayView1<T>]) -> Self {
		let mut index = BTreeMap::new();
		for labels in label_sets {
			for label in labels.iter() {
				index.entry(label.clone()).or_insert(0);
			}
		}
		for (class_index, value) in index.values_mut().enumerate() {
			*value = class_index;
		}
		Self { index }
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	pub fn index_of(&self, label: &T) -> Option<usize> {
		self.index.get(label).copied()
	}

	/// The classes in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.index.keys()
	}

	/// Map every label to its class index.
	pub fn encode(&self, labels: ArrayView1<T>) -> Result<Vec<usize>> {
		labels
			.iter()
			.enumerate()
			.map(|(position, label)| {
				self.index_of(label).ok_or_else(|| {
					MetricsError::Shape(format!(
						"label at position {} is not one of the {} known classes",
						position,
						self.len()
					))
				})
			})
			.collect()
	}
}

/**
Encode `labels` as a matrix of indicator columns, one per class in `classes`.

```
use ndarray::prelude::*;
use skmetrics::{one_hot, Classes};

let labels = arr1(&["cat", "dog", "cat"]);
let classes = Classes::from_labels(labels.view());
let encoded = one_hot(labels.view(), &classes).unwrap();
assert_eq!(encoded, arr2(&[[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]]));
```
*/
pub fn one_hot<T>(labels: ArrayView1<T>, classes: &Classes<T>) -> Result<Array2<f64>>
where
	T: Ord + Clone,
{
	let class_indexes = classes.encode(labels)?;
	let mut encoded = Array2::zeros((class_indexes.len(), classes.len()));
	for (row, class_index) in class_indexes.into_iter().enumerate() {
		encoded[(row, class_index)] = 1.0;
	}
	Ok(encoded)
}

#[test]
fn test_classes_are_sorted() {
	let labels = arr1(&[3, 1, 2, 3, 1]);
	let classes = Classes::from_labels(labels.view());
	assert_eq!(classes.len(), 3);
	assert_eq!(classes.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
	assert_eq!(classes.encode(labels.view()).unwrap(), vec![2, 0, 1, 2, 0]);
}

#[test]
fn test_union_of_label_sets() {
	let y_true = arr1(&["b", "c"]);
	let y_pred = arr1(&["a", "c"]);
	let classes = Classes::from_label_sets(&[y_true.view(), y_pred.view()]);
	assert_eq!(classes.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
	assert_eq!(classes.index_of(&"b"), Some(1));
}

#[test]
fn test_unknown_label_fails() {
	let classes = Classes::from_labels(arr1(&[0, 1]).view());
	let result = classes.encode(arr1(&[0, 2]).view());
	assert!(matches!(result, Err(MetricsError::Shape(_))));
}
