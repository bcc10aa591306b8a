use std::rc::Rc;

use leptos::prelude::*;

use crate::components::question_graph::{
	GraphViewConfig, InteractionMode, MemoryDataSource, QuestionGraphCanvas,
};

const SAMPLE_SPACE: &str = include_str!("../../data/sample_space.json");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (mode, set_mode) = signal(InteractionMode::default());
	let config = Signal::derive(move || GraphViewConfig {
		interaction_mode: mode.get(),
		..GraphViewConfig::default()
	});

	let source = match MemoryDataSource::from_json(SAMPLE_SPACE) {
		Ok(source) => source,
		Err(err) => {
			log::error!("sample data is invalid: {}", err);
			MemoryDataSource::default()
		}
	};

	view! {
		<div class="question-graph-page">
			<nav class="mode-picker">
				{InteractionMode::ALL
					.into_iter()
					.map(|m| {
						view! {
							<label>
								<input
									type="radio"
									name="interaction-mode"
									prop:checked=move || mode.get() == m
									on:change=move |_| set_mode.set(m)
								/>
								{m.label()}
							</label>
						}
					})
					.collect_view()}
			</nav>
			<QuestionGraphCanvas source=Rc::new(source) config=config seed=1 />
		</div>
	}
}
