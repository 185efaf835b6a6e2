/// Validation failures raised while building a layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
	/// The parallel input columns do not describe the same number of rows.
	#[error(
		"input columns differ in length: {labels} labels, {values} values, {categories} categories"
	)]
	LengthMismatch {
		/// Number of labels supplied.
		labels: usize,
		/// Number of values supplied.
		values: usize,
		/// Number of categories supplied.
		categories: usize,
	},
	/// The drawable area (after margins) is empty, negative or not finite.
	#[error("invalid drawing area {width}x{height}")]
	InvalidDimensions {
		/// Inner width after margins.
		width: f64,
		/// Inner height after margins.
		height: f64,
	},
	/// A data value is NaN or infinite.
	#[error("value at row {index} is not finite: {value}")]
	NonFiniteValue {
		/// Row of the offending value.
		index: usize,
		/// The value itself.
		value: f64,
	},
}

/// Layout result alias.
pub type Result<T> = std::result::Result<T, LayoutError>;
