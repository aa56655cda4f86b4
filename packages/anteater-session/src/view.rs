//! Render-ready projection of a [`SessionState`].
//!
//! The rendering layer reads a [`SessionView`] after every transition instead of poking at the
//! state itself. Numbers are preformatted to four decimals.

use crate::{ErrorKind, SessionState, SummaryStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Nothing submitted yet.
	Idle,
	Searching { query: String },
	NoResults { query: String },
	Results,
	Failed { query: String, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryView {
	NotRequested,
	Loading,
	Ready(String),
	Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryDetails {
	/// `(term, weight)` by descending weight.
	pub term_weights: Vec<(String, String)>,
	pub summary: SummaryView,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryView {
	pub index: usize,
	pub url: String,
	pub score: String,
	/// Present only while the entry is expanded.
	pub details: Option<EntryDetails>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
	pub phase: Phase,
	pub result_summary: Option<String>,
	pub entries: Vec<EntryView>,
	pub has_more: bool,
	pub is_paginating: bool,
	/// Non-fatal failure to show alongside existing results.
	pub notice: Option<String>,
}
impl SessionView {
	pub fn from_state(state: &SessionState) -> Self {
		let phase = phase(state);
		let notice = state
			.last_error()
			.filter(|err| err.kind == ErrorKind::Pagination)
			.map(ToString::to_string);

		if phase != Phase::Results {
			return Self {
				phase,
				result_summary: None,
				entries: Vec::new(),
				has_more: false,
				is_paginating: false,
				notice,
			};
		}

		let store = state.store();
		let entries = store
			.entries()
			.iter()
			.enumerate()
			.map(|(index, record)| {
				let details = store.is_expanded(index).then(|| EntryDetails {
					term_weights: sorted_term_weights(record.term_weights.as_ref()),
					summary: match state.summaries().get(&record.document_id) {
						None => SummaryView::NotRequested,
						Some(SummaryStatus::Pending) => SummaryView::Loading,
						Some(SummaryStatus::Loaded(text)) => SummaryView::Ready(text.clone()),
						Some(SummaryStatus::Failed(message)) =>
							SummaryView::Failed(message.clone()),
					},
				});

				EntryView {
					index,
					url: record.url.clone(),
					score: format!("{:.4}", record.score),
					details,
				}
			})
			.collect();

		Self {
			phase,
			result_summary: Some(result_summary(store.total_matching(), store.elapsed_seconds())),
			entries,
			has_more: state.has_more(),
			is_paginating: state.is_paginating(),
			notice,
		}
	}
}

pub fn result_summary(total_matching: usize, elapsed_seconds: f64) -> String {
	let elapsed = if elapsed_seconds > 0.0 {
		format!("{elapsed_seconds:.4}")
	} else {
		"0".to_string()
	};

	format!("Found {total_matching} documents in {elapsed} seconds")
}

fn phase(state: &SessionState) -> Phase {
	let Some(query) = state.submitted_query() else {
		return Phase::Idle;
	};

	if state.is_searching() {
		return Phase::Searching { query: query.to_string() };
	}
	if let Some(err) = state.last_error()
		&& err.kind == ErrorKind::Search
	{
		return Phase::Failed { query: query.to_string(), message: err.message.clone() };
	}
	if state.entries().is_empty() {
		return Phase::NoResults { query: query.to_string() };
	}

	Phase::Results
}

fn sorted_term_weights(
	weights: Option<&std::collections::BTreeMap<String, f64>>,
) -> Vec<(String, String)> {
	let Some(weights) = weights else {
		return Vec::new();
	};
	let mut pairs: Vec<(&String, f64)> =
		weights.iter().map(|(term, weight)| (term, *weight)).collect();

	pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

	pairs.into_iter().map(|(term, weight)| (term.clone(), format!("{weight:.4}"))).collect()
}
