use std::io::{self, Write};

use anteater_session::{EntryView, Phase, SessionView, SummaryView};

pub fn write_view(out: &mut impl Write, view: &SessionView) -> io::Result<()> {
	match &view.phase {
		Phase::Idle => writeln!(out, "Type `search <text>` to begin.")?,
		Phase::Searching { query } => writeln!(out, "Searching for \"{query}\"...")?,
		Phase::NoResults { query } => writeln!(out, "No results found for \"{query}\".")?,
		Phase::Failed { query, message } =>
			writeln!(out, "Search for \"{query}\" failed: {message}")?,
		Phase::Results => {
			if let Some(summary) = &view.result_summary {
				writeln!(out, "{summary}")?;
			}

			for entry in &view.entries {
				write_entry(out, entry)?;
			}

			if view.is_paginating {
				writeln!(out, "Loading more results...")?;
			} else if view.has_more {
				writeln!(out, "More results available. Type `more` to load them.")?;
			}
		},
	}

	if let Some(notice) = &view.notice {
		writeln!(out, "{notice}")?;
	}

	out.flush()
}

fn write_entry(out: &mut impl Write, entry: &EntryView) -> io::Result<()> {
	let position = entry.index + 1;

	writeln!(out, "{position:>3}. {}  (score {})", entry.url, entry.score)?;

	let Some(details) = &entry.details else {
		return Ok(());
	};

	if details.term_weights.is_empty() {
		writeln!(out, "     tf-idf: none")?;
	} else {
		let weights: Vec<String> = details
			.term_weights
			.iter()
			.map(|(term, weight)| format!("{term} {weight}"))
			.collect();

		writeln!(out, "     tf-idf: {}", weights.join(", "))?;
	}

	match &details.summary {
		SummaryView::NotRequested => Ok(()),
		SummaryView::Loading => writeln!(out, "     summary: loading..."),
		SummaryView::Ready(text) => writeln!(out, "     summary: {text}"),
		SummaryView::Failed(message) => writeln!(
			out,
			"     summary failed: {message} (type `summary {position}` to retry)"
		),
	}
}
