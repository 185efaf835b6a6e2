use std::cell::RefCell;
use std::rc::Rc;

use bubble_clusters::layout::{
	AnchorStrategy, BubbleChart, ChartData, ChartOptions, ControllerOptions, LayoutEngine,
	LayoutError, Margin, Point, ReleaseEffect, RunState, SimulationConfig, Viewport,
	distinct_categories,
};

fn seeded(seed: u64) -> SimulationConfig {
	SimulationConfig {
		seed: Some(seed),
		..SimulationConfig::default()
	}
}

fn data(labels: &[&str], values: &[f64], categories: &[&str]) -> ChartData {
	ChartData {
		labels: labels.iter().map(|s| s.to_string()).collect(),
		values: values.to_vec(),
		categories: categories.iter().map(|s| s.to_string()).collect(),
	}
}

fn options(data: ChartData, width: f64, height: f64) -> ChartOptions {
	ChartOptions {
		data,
		display_name: "Total".into(),
		width,
		height,
		margin: Margin::ZERO,
	}
}

fn assert_inside(engine: &LayoutEngine) {
	for b in engine.nodes() {
		let Point { x, y } = b.position;
		assert!(b.radius <= x && x <= engine.width() - b.radius, "{b:?}");
		assert!(b.radius <= y && y <= engine.height() - b.radius, "{b:?}");
	}
}

#[test]
fn two_category_scenario() {
	let mut chart = BubbleChart::new(seeded(1), ControllerOptions::default());
	chart
		.configure(options(
			data(&["a", "b"], &[10.0, 20.0], &["X", "Y"]),
			400.0,
			400.0,
		))
		.unwrap();

	let engine = chart.engine().unwrap();
	assert_eq!(engine.len(), 2);
	let (a, b) = (&engine.nodes()[0], &engine.nodes()[1]);
	assert!(b.radius > a.radius);

	let cats = engine.categories();
	let x = AnchorStrategy::EvenSpread.anchor_x("X", cats, 400.0);
	let y = AnchorStrategy::EvenSpread.anchor_x("Y", cats, 400.0);
	assert!((x - 133.333).abs() < 0.01);
	assert!((y - 266.667).abs() < 0.01);

	let ticks = chart.run_until_settled(1_000);
	assert!(ticks <= 135);
	assert!(!chart.is_running());
	assert_inside(chart.engine().unwrap());
}

#[test]
fn boundary_holds_on_every_tick_of_a_crowded_layout() {
	let n = 30;
	let labels: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
	let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
	let values: Vec<f64> = (0..n).map(|i| ((i * 37) % 100) as f64).collect();
	let cats: Vec<&str> = (0..n).map(|i| ["A", "B", "C", "D"][i % 4]).collect();
	let vp = Viewport::new(300.0, 200.0, Margin::default());
	let mut engine =
		LayoutEngine::from_data(&data(&labels, &values, &cats), &vp, &seeded(5)).unwrap();

	let violations = Rc::new(RefCell::new(0usize));
	let (w, h) = (engine.width(), engine.height());
	let seen = violations.clone();
	engine.on_tick(move |nodes| {
		for b in nodes {
			let Point { x, y } = b.position;
			let fits = 2.0 * b.radius <= w.min(h);
			if fits
				&& !(b.radius <= x && x <= w - b.radius && b.radius <= y && y <= h - b.radius)
			{
				*seen.borrow_mut() += 1;
			}
		}
	});
	while engine.tick() {}
	assert_eq!(*violations.borrow(), 0);
}

#[test]
fn drag_session_pins_then_regroups() {
	let mut chart = BubbleChart::new(seeded(9), ControllerOptions::default());
	chart
		.configure(options(
			data(
				&["a", "b", "c", "d"],
				&[4.0, 9.0, 16.0, 25.0],
				&["A", "B", "C", "A"],
			),
			400.0,
			300.0,
		))
		.unwrap();
	chart.run_until_settled(1_000);
	assert_eq!(chart.engine().unwrap().state(), RunState::Settled);

	let id = chart.engine().unwrap().id(2).unwrap();
	let path = [
		Point::new(150.0, 150.0),
		Point::new(170.0, 140.0),
		Point::new(190.0, 130.0),
	];
	assert!(chart.drag_start(id, path[0]));
	for p in &path[1..] {
		assert!(chart.drag_move(id, *p));
		chart.tick();
		chart.tick();
		assert_eq!(chart.engine().unwrap().position(id), Some(*p));
	}
	assert!(chart.drag_end(id));
	assert!(!chart.nodes()[2].is_pinned());
	assert_eq!(
		chart.engine().unwrap().forces().anchor,
		AnchorStrategy::FixedThreeBucket
	);

	let before = chart.engine().unwrap().position(id);
	chart.tick();
	assert_ne!(chart.engine().unwrap().position(id), before);
	chart.run_until_settled(1_000);
	assert_inside(chart.engine().unwrap());
}

#[test]
fn rebuild_discards_previous_nodes() {
	let mut chart = BubbleChart::new(
		seeded(2),
		ControllerOptions {
			sticky_pins: true,
			release: ReleaseEffect::Settle,
			..ControllerOptions::default()
		},
	);
	chart
		.configure(options(
			data(&["a", "b", "c"], &[1.0, 2.0, 3.0], &["X", "X", "Y"]),
			400.0,
			400.0,
		))
		.unwrap();
	let id = chart.engine().unwrap().id(0).unwrap();
	chart.drag_start(id, Point::new(200.0, 200.0));
	chart.drag_end(id);
	assert!(chart.nodes()[0].is_pinned());

	chart
		.configure(options(
			data(&["p", "q"], &[5.0, 6.0], &["Z", "Z"]),
			400.0,
			400.0,
		))
		.unwrap();
	assert_eq!(chart.nodes().len(), 2);
	assert!(chart.nodes().iter().all(|b| !b.is_pinned()));
	assert!(chart.nodes().iter().all(|b| b.category == "Z"));
	assert!(!chart.controller().is_dragging());
	assert!(!chart.click(id));
}

#[test]
fn configure_rejects_malformed_input() {
	let mut chart = BubbleChart::default();
	let err = chart
		.configure(options(data(&["a"], &[1.0, 2.0], &["X"]), 400.0, 400.0))
		.unwrap_err();
	assert_eq!(
		err,
		LayoutError::LengthMismatch {
			labels: 1,
			values: 2,
			categories: 1
		}
	);
	assert!(chart.engine().is_none());

	let err = chart
		.configure(options(data(&["a"], &[1.0], &["X"]), -10.0, 400.0))
		.unwrap_err();
	assert!(matches!(err, LayoutError::InvalidDimensions { .. }));
}

#[test]
fn equal_zero_values_give_zero_radius_bubbles_that_still_move() {
	let vp = Viewport::new(200.0, 200.0, Margin::ZERO);
	let mut engine = LayoutEngine::from_data(
		&data(&["a", "b", "c"], &[0.0, 0.0, 0.0], &["X", "Y", "X"]),
		&vp,
		&seeded(4),
	)
	.unwrap();
	assert!(engine.nodes().iter().all(|b| b.radius == 0.0));
	let start: Vec<Point> = engine.nodes().iter().map(|b| b.position).collect();
	engine.tick();
	let moved = engine
		.nodes()
		.iter()
		.zip(&start)
		.any(|(b, p)| b.position != *p);
	assert!(moved);
	while engine.tick() {}
	assert_inside(&engine);
}

#[test]
fn build_from_prepared_nodes() {
	let vp = Viewport::new(400.0, 400.0, Margin::ZERO);
	let source = LayoutEngine::from_data(
		&data(&["a", "b"], &[1.0, 4.0], &["X", "Y"]),
		&vp,
		&seeded(8),
	)
	.unwrap();
	let nodes = source.nodes().to_vec();
	let cats = distinct_categories(&["X", "Y"]);
	let mut engine = LayoutEngine::build(nodes, 400.0, 400.0, cats, &seeded(8)).unwrap();
	assert_ne!(engine.epoch(), source.epoch());
	engine.stop();
	assert!(!engine.tick());
	engine.restart();
	assert_eq!(engine.alpha(), 1.0);
	assert!(engine.tick());
}
