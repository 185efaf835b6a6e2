use leptos::prelude::*;

use crate::components::bubble_chart::BubbleChartCanvas;
use crate::layout::ChartData;

const CATEGORIES: &[&str] = &["A", "B", "C"];

/// Sample dataset of `n` rows spread over three categories.
fn generate_sample_data(n: usize, seed: usize) -> ChartData {
	let rows = 0..n;
	ChartData {
		labels: rows.clone().map(|i| format!("Item {}", i + 1)).collect(),
		values: rows
			.clone()
			.map(|i| (rand_simple(i + seed * n) * 100.0).round() + 1.0)
			.collect(),
		categories: rows
			.map(|i| CATEGORIES[(rand_simple(i * 7 + seed) * 3.0) as usize % 3].to_string())
			.collect(),
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (seed, set_seed) = signal(0usize);
	let chart_data = Signal::derive(move || generate_sample_data(40, seed.get()));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-chart">
				<BubbleChartCanvas data=chart_data display_name="Sales" fullscreen=true />
				<div class="chart-overlay">
					<h1>"Bubbles by Category"</h1>
					<p class="subtitle">
						"Drag a bubble to pin it; release to regroup. Click a pinned bubble to free it."
					</p>
					<button on:click=move |_| set_seed.update(|s| *s += 1)>"New data"</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
