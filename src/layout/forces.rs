//! The five additive forces acting on bubbles each tick.
//!
//! Forces write into velocities (and, for centering, positions); the engine
//! integrates afterwards. None of them touch `Bubble::fixed`.

use indexmap::IndexSet;
use rand::Rng;

use super::anchors::AnchorStrategy;
use super::types::Bubble;

/// Squared distance below which repulsion stops growing.
const MIN_DISTANCE_SQ: f64 = 1.0;

/// Strength of the pairwise many-body force. Negative repels.
#[derive(Clone, Debug, PartialEq)]
pub enum ChargeRule {
	/// Compares the categories of the two interacting bubbles.
	PairwiseCategory {
		/// Strength between bubbles of one category.
		same: f64,
		/// Strength between bubbles of different categories.
		cross: f64,
	},
	/// Compares the category of the pushing bubble with a fixed series label,
	/// ignoring the bubble being pushed.
	SeriesLabel {
		/// Series name compared against.
		label: String,
		/// Strength when the pushing bubble's category equals `label`.
		same: f64,
		/// Strength otherwise.
		cross: f64,
	},
	/// One strength for every pair.
	Uniform(f64),
}

impl ChargeRule {
	/// Strength with which `source` acts on `target`.
	fn strength(&self, target: &Bubble, source: &Bubble) -> f64 {
		match self {
			ChargeRule::PairwiseCategory { same, cross } => {
				if target.category == source.category {
					*same
				} else {
					*cross
				}
			}
			ChargeRule::SeriesLabel { label, same, cross } => {
				if source.category == *label {
					*same
				} else {
					*cross
				}
			}
			ChargeRule::Uniform(s) => *s,
		}
	}
}

/// Tunables for every force. Swapped wholesale on re-parameterization.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceParams {
	/// Many-body strength rule.
	pub charge: ChargeRule,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Share of the overlap resolved per tick.
	pub collide_strength: f64,
	/// Extra gap kept between touching bubbles.
	pub collide_margin: f64,
	/// Where each category's cluster sits horizontally.
	pub anchor: AnchorStrategy,
	/// Pull towards the category anchor x.
	pub anchor_strength: f64,
	/// Pull towards the vertical middle.
	pub vertical_strength: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self::clustered()
	}
}

impl ForceParams {
	/// Loose category clusters spread evenly across the width.
	pub fn clustered() -> Self {
		Self {
			charge: ChargeRule::PairwiseCategory {
				same: -30.0,
				cross: -10.0,
			},
			center_strength: 1.0,
			collide_strength: 0.2,
			collide_margin: 1.0,
			anchor: AnchorStrategy::EvenSpread,
			anchor_strength: 0.2,
			vertical_strength: 0.2,
		}
	}

	/// Tighter regrouping into three columns, used after a drag ends.
	pub fn recluster() -> Self {
		Self {
			charge: ChargeRule::Uniform(5.0),
			center_strength: 1.0,
			collide_strength: 1.0,
			collide_margin: 1.0,
			anchor: AnchorStrategy::FixedThreeBucket,
			anchor_strength: 0.1,
			vertical_strength: 0.1,
		}
	}
}

/// Read-only snapshot of engine state handed to each force.
pub struct ForceContext<'a> {
	pub alpha: f64,
	pub width: f64,
	pub height: f64,
	pub categories: &'a IndexSet<String>,
	pub params: &'a ForceParams,
}

/// Applies every force once, in a fixed order.
pub fn apply_all<R: Rng>(nodes: &mut [Bubble], ctx: &ForceContext<'_>, rng: &mut R) {
	many_body(nodes, ctx, rng);
	center(nodes, ctx);
	collide(nodes, ctx, rng);
	anchor_x(nodes, ctx);
	anchor_y(nodes, ctx);
}

/// Tiny random offset to separate coincident bubbles.
fn jiggle<R: Rng>(rng: &mut R) -> f64 {
	(rng.r#gen::<f64>() - 0.5) * 1e-6
}

fn many_body<R: Rng>(nodes: &mut [Bubble], ctx: &ForceContext<'_>, rng: &mut R) {
	let n = nodes.len();
	let mut dv = vec![(0.0, 0.0); n];
	for i in 0..n {
		for j in 0..n {
			if i == j {
				continue;
			}
			let (target, source) = (&nodes[i], &nodes[j]);
			let mut dx = source.position.x - target.position.x;
			let mut dy = source.position.y - target.position.y;
			if dx == 0.0 {
				dx = jiggle(rng);
			}
			if dy == 0.0 {
				dy = jiggle(rng);
			}
			let mut l = dx * dx + dy * dy;
			if l < MIN_DISTANCE_SQ {
				l = (MIN_DISTANCE_SQ * l).sqrt();
			}
			let w = ctx.params.charge.strength(target, source) * ctx.alpha / l;
			dv[i].0 += dx * w;
			dv[i].1 += dy * w;
		}
	}
	for (node, (dvx, dvy)) in nodes.iter_mut().zip(dv) {
		node.velocity.x += dvx;
		node.velocity.y += dvy;
	}
}

/// Shifts the whole system so its centroid moves towards the canvas center.
fn center(nodes: &mut [Bubble], ctx: &ForceContext<'_>) {
	if nodes.is_empty() || ctx.params.center_strength == 0.0 {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes.iter().fold((0.0, 0.0), |(sx, sy), b| {
		(sx + b.position.x, sy + b.position.y)
	});
	let shift_x = (sx / n - ctx.width / 2.0) * ctx.params.center_strength;
	let shift_y = (sy / n - ctx.height / 2.0) * ctx.params.center_strength;
	for node in nodes.iter_mut() {
		node.position.x -= shift_x;
		node.position.y -= shift_y;
	}
}

/// Pushes overlapping bubbles apart, using positions predicted one step ahead.
/// Zero-radius bubbles never collide.
fn collide<R: Rng>(nodes: &mut [Bubble], ctx: &ForceContext<'_>, rng: &mut R) {
	let strength = ctx.params.collide_strength;
	if strength == 0.0 {
		return;
	}
	for i in 0..nodes.len() {
		let ri = nodes[i].radius;
		if ri <= 0.0 {
			continue;
		}
		for j in (i + 1)..nodes.len() {
			let rj = nodes[j].radius;
			if rj <= 0.0 {
				continue;
			}
			let (a, b) = (&nodes[i], &nodes[j]);
			let mut dx = (a.position.x + a.velocity.x) - (b.position.x + b.velocity.x);
			let mut dy = (a.position.y + a.velocity.y) - (b.position.y + b.velocity.y);
			let target = ri + rj + ctx.params.collide_margin;
			let mut l = dx * dx + dy * dy;
			if l >= target * target {
				continue;
			}
			if dx == 0.0 {
				dx = jiggle(rng);
				l += dx * dx;
			}
			if dy == 0.0 {
				dy = jiggle(rng);
				l += dy * dy;
			}
			let dist = l.sqrt();
			let k = (target - dist) / dist * strength;
			dx *= k;
			dy *= k;
			// Smaller bubbles give way more.
			let share = (rj * rj) / (ri * ri + rj * rj);
			nodes[i].velocity.x += dx * share;
			nodes[i].velocity.y += dy * share;
			nodes[j].velocity.x -= dx * (1.0 - share);
			nodes[j].velocity.y -= dy * (1.0 - share);
		}
	}
}

fn anchor_x(nodes: &mut [Bubble], ctx: &ForceContext<'_>) {
	let k = ctx.params.anchor_strength * ctx.alpha;
	for node in nodes.iter_mut() {
		let target = ctx
			.params
			.anchor
			.anchor_x(&node.category, ctx.categories, ctx.width);
		node.velocity.x += (target - node.position.x) * k;
	}
}

fn anchor_y(nodes: &mut [Bubble], ctx: &ForceContext<'_>) {
	let k = ctx.params.vertical_strength * ctx.alpha;
	let target = ctx.height / 2.0;
	for node in nodes.iter_mut() {
		node.velocity.y += (target - node.position.y) * k;
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::layout::anchors::distinct_categories;
	use crate::layout::types::Point;

	fn bubble(category: &str, x: f64, y: f64, radius: f64) -> Bubble {
		Bubble {
			label: String::new(),
			category: category.into(),
			value: 0.0,
			radius,
			position: Point::new(x, y),
			velocity: Point::default(),
			fixed: None,
		}
	}

	fn run(nodes: &mut [Bubble], params: &ForceParams, alpha: f64, f: &str) {
		let cats: Vec<&str> = nodes.iter().map(|n| n.category.as_str()).collect();
		let categories = distinct_categories(&cats);
		let ctx = ForceContext {
			alpha,
			width: 400.0,
			height: 400.0,
			categories: &categories,
			params,
		};
		let mut rng = StdRng::seed_from_u64(7);
		match f {
			"many_body" => many_body(nodes, &ctx, &mut rng),
			"center" => center(nodes, &ctx),
			"collide" => collide(nodes, &ctx, &mut rng),
			"anchor_x" => anchor_x(nodes, &ctx),
			"anchor_y" => anchor_y(nodes, &ctx),
			_ => unreachable!(),
		}
	}

	#[test]
	fn same_category_repels_harder() {
		let params = ForceParams::clustered();
		let mut same = [bubble("X", 100.0, 200.0, 5.0), bubble("X", 110.0, 200.0, 5.0)];
		let mut cross = [bubble("X", 100.0, 200.0, 5.0), bubble("Y", 110.0, 200.0, 5.0)];
		run(&mut same, &params, 1.0, "many_body");
		run(&mut cross, &params, 1.0, "many_body");
		assert!(same[0].velocity.x < 0.0 && same[1].velocity.x > 0.0);
		assert!((same[0].velocity.x / cross[0].velocity.x - 3.0).abs() < 1e-9);
	}

	#[test]
	fn series_label_rule_looks_only_at_source() {
		let params = ForceParams {
			charge: ChargeRule::SeriesLabel {
				label: "X".into(),
				same: -30.0,
				cross: -10.0,
			},
			..ForceParams::clustered()
		};
		let mut nodes = [bubble("X", 100.0, 200.0, 5.0), bubble("Y", 110.0, 200.0, 5.0)];
		run(&mut nodes, &params, 1.0, "many_body");
		// Node 1 is pushed by an "X" source, node 0 by a "Y" source.
		assert!((nodes[1].velocity.x / -nodes[0].velocity.x - 3.0).abs() < 1e-9);
	}

	#[test]
	fn center_moves_centroid_to_middle() {
		let params = ForceParams::clustered();
		let mut nodes = [bubble("X", 10.0, 10.0, 1.0), bubble("X", 30.0, 50.0, 1.0)];
		run(&mut nodes, &params, 1.0, "center");
		let cx = (nodes[0].position.x + nodes[1].position.x) / 2.0;
		let cy = (nodes[0].position.y + nodes[1].position.y) / 2.0;
		assert!((cx - 200.0).abs() < 1e-9 && (cy - 200.0).abs() < 1e-9);
	}

	#[test]
	fn collide_separates_overlap_and_skips_zero_radius() {
		let params = ForceParams::clustered();
		let mut nodes = [bubble("X", 100.0, 100.0, 10.0), bubble("X", 105.0, 100.0, 10.0)];
		run(&mut nodes, &params, 1.0, "collide");
		assert!(nodes[0].velocity.x < 0.0 && nodes[1].velocity.x > 0.0);

		let mut nodes = [bubble("X", 100.0, 100.0, 0.0), bubble("X", 100.5, 100.0, 10.0)];
		run(&mut nodes, &params, 1.0, "collide");
		assert_eq!(nodes[0].velocity, Point::default());
		assert_eq!(nodes[1].velocity, Point::default());
	}

	#[test]
	fn collide_ignores_separated_bubbles() {
		let params = ForceParams::clustered();
		let mut nodes = [bubble("X", 100.0, 100.0, 10.0), bubble("X", 121.5, 100.0, 10.0)];
		run(&mut nodes, &params, 1.0, "collide");
		assert_eq!(nodes[0].velocity, Point::default());
	}

	#[test]
	fn anchors_pull_towards_targets() {
		let params = ForceParams::clustered();
		let mut nodes = [bubble("X", 0.0, 0.0, 1.0), bubble("Y", 400.0, 400.0, 1.0)];
		run(&mut nodes, &params, 0.5, "anchor_x");
		assert!((nodes[0].velocity.x - 400.0 / 3.0 * 0.1).abs() < 1e-9);
		assert!(nodes[1].velocity.x < 0.0);
		run(&mut nodes, &params, 0.5, "anchor_y");
		assert!((nodes[0].velocity.y - 20.0).abs() < 1e-9);
		assert!((nodes[1].velocity.y + 20.0).abs() < 1e-9);
	}
}
