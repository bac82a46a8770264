/*!
This module computes the contingency matrix between true and predicted labels. Both axes are indexed by the sorted union of the two label sets, so the matrix is always square and entry `(i, i)` is the count of samples whose true and predicted class are both class `i`.
*/

use crate::{
	classes::Classes,
	error::{MetricsError, Result},
};
use ndarray::prelude::*;
use num_traits::ToPrimitive;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ContingencyMatrix {
	//                    true class    predicted class
	//                         |              |
	//                         v              v
	/// Counts, plus `eps` in every cell if it was requested.
	Dense(Array2<f64>),
	Sparse(CsrMatrix),
}

/// A square count matrix in compressed sparse row form. Only non-zero counts are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
	n_classes: usize,
	/// `indptr[i]..indptr[i + 1]` is the range of `indices` and `data` holding row `i`.
	indptr: Vec<usize>,
	/// Column indexes, ascending within each row.
	indices: Vec<usize>,
	data: Vec<u64>,
}

impl ContingencyMatrix {
	/**
	Count how often each true class was predicted as each class.

	`eps`, if set, is added to every cell of the dense matrix. It cannot be combined with `sparse`, because adding a value to every cell would make the matrix dense.
	*/
	pub fn from_labels<T>(
		y_true: ArrayView1<T>,
		y_pred: ArrayView1<T>,
		eps: Option<f64>,
		sparse: bool,
	) -> Result<Self>
	where
		T: Ord + Clone,
	{
		if eps.is_some() && sparse {
			return Err(MetricsError::Configuration(
				"cannot set eps when sparse is true".to_owned(),
			));
		}
		if y_true.len() != y_pred.len() {
			return Err(MetricsError::Shape(format!(
				"y_true has {} samples but y_pred has {}",
				y_true.len(),
				y_pred.len()
			)));
		}
		if y_true.is_empty() {
			return Err(MetricsError::Shape(
				"cannot build a contingency matrix from empty labels".to_owned(),
			));
		}
		let classes = Classes::from_label_sets(&[y_true.view(), y_pred.view()]);
		let true_classes = classes.encode(y_true)?;
		let predicted_classes = classes.encode(y_pred)?;
		let pairs = true_classes.into_iter().zip(predicted_classes.into_iter());
		let n_classes = classes.len();
		tracing::debug!(n_classes, sparse, "computing contingency matrix");
		if sparse {
			Ok(ContingencyMatrix::Sparse(CsrMatrix::from_pairs(
				n_classes, pairs,
			)))
		} else {
			let mut matrix = Array2::from_elem((n_classes, n_classes), eps.unwrap_or(0.0));
			for (true_class, predicted_class) in pairs {
				matrix[(true_class, predicted_class)] += 1.0;
			}
			Ok(ContingencyMatrix::Dense(matrix))
		}
	}

	pub fn n_classes(&self) -> usize {
		match self {
			ContingencyMatrix::Dense(matrix) => matrix.nrows(),
			ContingencyMatrix::Sparse(matrix) => matrix.n_classes,
		}
	}

	pub fn get(&self, true_class: usize, predicted_class: usize) -> f64 {
		match self {
			ContingencyMatrix::Dense(matrix) => matrix[(true_class, predicted_class)],
			ContingencyMatrix::Sparse(matrix) => matrix
				.get(true_class, predicted_class)
				.to_f64()
				.unwrap(),
		}
	}

	/// The number of correctly classified samples in each class.
	pub fn diagonal(&self) -> Array1<f64> {
		match self {
			ContingencyMatrix::Dense(matrix) => matrix.diag().to_owned(),
			ContingencyMatrix::Sparse(_) => {
				(0..self.n_classes()).map(|i| self.get(i, i)).collect()
			}
		}
	}

	/// The total of each row, which is the number of samples in each true class.
	pub fn row_sums(&self) -> Array1<f64> {
		match self {
			ContingencyMatrix::Dense(matrix) => matrix.sum_axis(Axis(1)),
			ContingencyMatrix::Sparse(matrix) => (0..matrix.n_classes)
				.map(|row| {
					matrix.data[matrix.indptr[row]..matrix.indptr[row + 1]]
						.iter()
						.sum::<u64>()
						.to_f64()
						.unwrap()
				})
				.collect(),
		}
	}

	pub fn to_dense(&self) -> Array2<f64> {
		match self {
			ContingencyMatrix::Dense(matrix) => matrix.clone(),
			ContingencyMatrix::Sparse(_) => {
				let n_classes = self.n_classes();
				Array2::from_shape_fn((n_classes, n_classes), |(i, j)| self.get(i, j))
			}
		}
	}
}

impl CsrMatrix {
	fn from_pairs(n_classes: usize, pairs: impl Iterator<Item = (usize, usize)>) -> Self {
		let mut counts: BTreeMap<(usize, usize), u64> = BTreeMap::new();
		for pair in pairs {
			*counts.entry(pair).or_insert(0) += 1;
		}
		let mut indptr = vec![0; n_classes + 1];
		let mut indices = Vec::with_capacity(counts.len());
		let mut data = Vec::with_capacity(counts.len());
		// The map iterates in (row, column) order, which is exactly CSR order.
		for ((row, column), count) in counts {
			indptr[row + 1] += 1;
			indices.push(column);
			data.push(count);
		}
		for row in 0..n_classes {
			indptr[row + 1] += indptr[row];
		}
		Self {
			n_classes,
			indptr,
			indices,
			data,
		}
	}

	pub fn n_nonzero(&self) -> usize {
		self.data.len()
	}

	pub fn get(&self, row: usize, column: usize) -> u64 {
		let start = self.indptr[row];
		let end = self.indptr[row + 1];
		match self.indices[start..end].binary_search(&column) {
			Ok(offset) => self.data[start + offset],
			Err(_) => 0,
		}
	}
}

#[test]
fn test_dense() {
	let y_true = arr1(&[0, 0, 1, 1, 2, 2]);
	let y_pred = arr1(&[0, 1, 1, 1, 2, 0]);
	let matrix = ContingencyMatrix::from_labels(y_true.view(), y_pred.view(), None, false).unwrap();
	assert_eq!(
		matrix.to_dense(),
		arr2(&[[1.0, 1.0, 0.0], [0.0, 2.0, 0.0], [1.0, 0.0, 1.0]])
	);
	assert_eq!(matrix.diagonal(), arr1(&[1.0, 2.0, 1.0]));
	assert_eq!(matrix.row_sums(), arr1(&[2.0, 2.0, 2.0]));
}

#[test]
fn test_sparse_matches_dense() {
	let y_true = arr1(&["a", "a", "b", "c", "c", "c"]);
	let y_pred = arr1(&["a", "c", "b", "c", "c", "a"]);
	let dense = ContingencyMatrix::from_labels(y_true.view(), y_pred.view(), None, false).unwrap();
	let sparse = ContingencyMatrix::from_labels(y_true.view(), y_pred.view(), None, true).unwrap();
	match &sparse {
		ContingencyMatrix::Sparse(csr) => assert_eq!(csr.n_nonzero(), 5),
		ContingencyMatrix::Dense(_) => panic!("expected a sparse matrix"),
	}
	assert_eq!(sparse.to_dense(), dense.to_dense());
	assert_eq!(sparse.diagonal(), dense.diagonal());
	assert_eq!(sparse.row_sums(), dense.row_sums());
}

#[test]
fn test_eps_is_added_to_every_cell() {
	let y_true = arr1(&[0, 1]);
	let y_pred = arr1(&[0, 0]);
	let matrix =
		ContingencyMatrix::from_labels(y_true.view(), y_pred.view(), Some(0.5), false).unwrap();
	assert_eq!(matrix.to_dense(), arr2(&[[1.5, 0.5], [1.5, 0.5]]));
}

#[test]
fn test_eps_and_sparse_are_exclusive() {
	let y = arr1(&[0, 1]);
	let result = ContingencyMatrix::from_labels(y.view(), y.view(), Some(1e-9), true);
	assert!(matches!(result, Err(MetricsError::Configuration(_))));
}

#[test]
fn test_union_makes_matrix_square() {
	let y_true = arr1(&[0, 0, 1]);
	let y_pred = arr1(&[0, 2, 1]);
	let matrix = ContingencyMatrix::from_labels(y_true.view(), y_pred.view(), None, false).unwrap();
	assert_eq!(matrix.n_classes(), 3);
	assert_eq!(matrix.get(0, 2), 1.0);
	assert_eq!(matrix.row_sums(), arr1(&[2.0, 1.0, 0.0]));
}

#[test]
fn test_length_mismatch() {
	let result = ContingencyMatrix::from_labels(arr1(&[0, 1]).view(), arr1(&[0]).view(), None, false);
	assert!(matches!(result, Err(MetricsError::Shape(_))));
}
