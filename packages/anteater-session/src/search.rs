use crate::{
	Outcome, SearchRequest, SearchSession, SessionError,
	pending::{InFlight, PendingGuard},
};

impl SearchSession {
	/// Starts a fresh search for `query`, superseding any search or pagination in flight.
	///
	/// Whitespace-only input is ignored. The state is reset before the request is issued, and the
	/// response is applied only if no newer search has been submitted in the meantime.
	pub async fn submit_search(&self, query: &str) -> Outcome {
		let query = query.trim();

		if query.is_empty() {
			tracing::debug!("Ignoring empty search submission.");

			return Outcome::Ignored;
		}

		let (tag, req) = {
			let mut state = self.lock();

			state.generation += 1;
			state.submitted_query = Some(query.to_string());
			state.is_searching = true;
			state.is_paginating = false;
			state.store.clear();
			state.summaries.clear();
			state.last_error = None;

			let Some(tag) = state.tag() else {
				return Outcome::Ignored;
			};

			(tag, SearchRequest { query: query.to_string(), offset: 0, limit: self.page_size })
		};

		tracing::debug!(
			query = %req.query,
			generation = tag.generation,
			limit = req.limit,
			"Issuing search."
		);

		let mut pending = PendingGuard::new(self, InFlight::Search(tag.clone()));
		let result = self.api.search(&req).await;

		pending.disarm();

		let mut state = self.lock();

		if !state.is_current(&tag) {
			tracing::debug!(
				query = %tag.query,
				generation = tag.generation,
				"Discarding stale search response."
			);

			return Outcome::Discarded;
		}

		state.is_searching = false;

		match result {
			Ok(response) => {
				tracing::debug!(
					query = %tag.query,
					returned = response.results.len(),
					total = response.total_matching,
					"Applied search response."
				);

				state.store.replace(response);

				Outcome::Applied
			},
			Err(err) => {
				tracing::warn!(error = %err, query = %tag.query, "Search request failed.");

				state.last_error = Some(SessionError::search(&err));

				Outcome::Failed
			},
		}
	}

	/// Fetches the next page for the submitted query and appends it.
	///
	/// Ignored before the first search, while a search or another page is in flight, and once
	/// every match has been fetched. Callers re-issue after the in-flight request settles.
	pub async fn load_more(&self) -> Outcome {
		let (tag, req) = {
			let mut state = self.lock();

			if state.is_searching || state.is_paginating || !state.store.has_more() {
				return Outcome::Ignored;
			}

			let Some(tag) = state.tag() else {
				return Outcome::Ignored;
			};

			state.is_paginating = true;

			let req = SearchRequest {
				query: tag.query.clone(),
				offset: state.store.len(),
				limit: self.page_size,
			};

			(tag, req)
		};

		tracing::debug!(
			query = %req.query,
			offset = req.offset,
			limit = req.limit,
			"Issuing page request."
		);

		let mut pending = PendingGuard::new(self, InFlight::Page(tag.clone()));
		let result = self.api.search(&req).await;

		pending.disarm();

		let mut state = self.lock();

		if !state.is_current(&tag) {
			tracing::debug!(
				query = %tag.query,
				offset = req.offset,
				"Discarding stale page response."
			);

			return Outcome::Discarded;
		}

		state.is_paginating = false;

		if state.store.len() != req.offset {
			tracing::warn!(
				held = state.store.len(),
				offset = req.offset,
				"Result count moved while a page was in flight. Discarding page."
			);

			return Outcome::Discarded;
		}

		match result {
			Ok(response) => {
				let kept = state.store.append(response.results);

				tracing::debug!(
					query = %tag.query,
					offset = req.offset,
					kept,
					"Applied page response."
				);

				state.last_error = None;

				Outcome::Applied
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					query = %tag.query,
					offset = req.offset,
					"Page request failed."
				);

				state.last_error = Some(SessionError::pagination(&err));

				Outcome::Failed
			},
		}
	}
}
