//! Value-to-radius mapping.

/// Square-root scale from `[0, domain_max]` onto `[0, range_max]`, so circle
/// area grows linearly with value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	domain_max: f64,
	range_max: f64,
}

impl SqrtScale {
	/// Negative bounds are treated as zero.
	pub fn new(domain_max: f64, range_max: f64) -> Self {
		Self {
			domain_max: domain_max.max(0.0),
			range_max: range_max.max(0.0),
		}
	}

	/// Scale whose domain is `[0, max(values)]`.
	pub fn fit(values: &[f64], range_max: f64) -> Self {
		let max = values.iter().copied().fold(0.0_f64, f64::max);
		Self::new(max, range_max)
	}

	/// Radius for `value`, always within `[0, range_max]`.
	///
	/// A collapsed domain (every value `<= 0`) maps everything to zero.
	pub fn radius(&self, value: f64) -> f64 {
		if self.domain_max <= 0.0 || value <= 0.0 {
			return 0.0;
		}
		let t = (value / self.domain_max).sqrt();
		(t * self.range_max).clamp(0.0, self.range_max)
	}
}

#[cfg(test)]
mod tests {
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	use super::*;

	#[test]
	fn max_value_maps_to_range_max() {
		let scale = SqrtScale::fit(&[10.0, 40.0], 50.0);
		assert_eq!(scale.radius(40.0), 50.0);
		assert_eq!(scale.radius(10.0), 25.0);
		assert_eq!(scale.radius(0.0), 0.0);
	}

	#[test]
	fn radius_is_monotonic() {
		let mut rng = StdRng::seed_from_u64(11);
		for len in [2, 5, 20, 60] {
			let values: Vec<f64> = (0..len)
				.map(|_| match rng.gen_range(0..4) {
					0 => 0.0,
					1 => rng.gen_range(-50.0..0.0),
					_ => rng.gen_range(0.0..1e4),
				})
				.collect();
			let scale = SqrtScale::fit(&values, 50.0);
			for (i, &a) in values.iter().enumerate() {
				for &b in &values[i + 1..] {
					let (ra, rb) = (scale.radius(a), scale.radius(b));
					if a > b {
						assert!(ra >= rb, "{a} -> {ra}, {b} -> {rb}");
					} else if b > a {
						assert!(rb >= ra, "{b} -> {rb}, {a} -> {ra}");
					}
				}
			}
		}
	}

	#[test]
	fn degenerate_inputs_yield_zero() {
		let scale = SqrtScale::fit(&[0.0, 0.0], 50.0);
		assert_eq!(scale.radius(0.0), 0.0);
		let scale = SqrtScale::fit(&[-4.0, 9.0], 50.0);
		assert_eq!(scale.radius(-4.0), 0.0);
		let scale = SqrtScale::fit(&[], 50.0);
		assert_eq!(scale.radius(1.0), 0.0);
	}
}
