//! Horizontal cluster targets per category.

use indexmap::IndexSet;

/// How a category is mapped to the x coordinate its bubbles drift towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorStrategy {
	/// `k` distinct categories spread evenly: index `i` sits at
	/// `width / (k + 1) * (i + 1)`.
	#[default]
	EvenSpread,
	/// Three fixed columns: `"A"` at a quarter, `"B"` at the middle, every
	/// other category at three quarters of the width.
	FixedThreeBucket,
}

impl AnchorStrategy {
	/// Anchor x for `category` given the distinct categories in first-seen
	/// order. Unknown categories fall back to the horizontal center.
	pub fn anchor_x(&self, category: &str, categories: &IndexSet<String>, width: f64) -> f64 {
		match self {
			AnchorStrategy::EvenSpread => match categories.get_index_of(category) {
				Some(i) => width / (categories.len() + 1) as f64 * (i + 1) as f64,
				None => width / 2.0,
			},
			AnchorStrategy::FixedThreeBucket => match category {
				"A" => width / 4.0,
				"B" => 2.0 * width / 4.0,
				_ => 3.0 * width / 4.0,
			},
		}
	}
}

/// Distinct categories in order of first appearance.
pub fn distinct_categories<S: AsRef<str>>(categories: &[S]) -> IndexSet<String> {
	categories.iter().map(|c| c.as_ref().to_owned()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn even_spread_matches_two_category_example() {
		let cats = distinct_categories(&["X", "Y", "X"]);
		assert_eq!(cats.len(), 2);
		let x = AnchorStrategy::EvenSpread.anchor_x("X", &cats, 400.0);
		let y = AnchorStrategy::EvenSpread.anchor_x("Y", &cats, 400.0);
		assert!((x - 400.0 / 3.0).abs() < 1e-9);
		assert!((y - 800.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn three_buckets_ignore_category_count() {
		let cats = distinct_categories(&["A", "B", "C", "D", "E"]);
		let s = AnchorStrategy::FixedThreeBucket;
		assert_eq!(s.anchor_x("A", &cats, 400.0), 100.0);
		assert_eq!(s.anchor_x("B", &cats, 400.0), 200.0);
		assert_eq!(s.anchor_x("C", &cats, 400.0), 300.0);
		assert_eq!(s.anchor_x("E", &cats, 400.0), 300.0);
	}

	#[test]
	fn unknown_category_centers() {
		let cats = distinct_categories(&["X"]);
		assert_eq!(AnchorStrategy::EvenSpread.anchor_x("Q", &cats, 300.0), 150.0);
	}
}
