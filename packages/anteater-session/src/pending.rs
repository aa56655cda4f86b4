use crate::{DocumentId, ErrorKind, RequestTag, SearchSession, SessionError, SummaryStatus};

const CANCELLED: &str = "Request cancelled before it completed.";

/// Marker set while a request is in flight.
pub(crate) enum InFlight {
	Search(RequestTag),
	Page(RequestTag),
	Summary { generation: u64, document_id: DocumentId },
}

/// Clears the in-flight marker of an operation whose future is dropped before its response is
/// applied, so the operation can be issued again.
///
/// Created right after the marker is set and disarmed as soon as the request returns.
pub(crate) struct PendingGuard<'a> {
	session: &'a SearchSession,
	in_flight: Option<InFlight>,
}
impl<'a> PendingGuard<'a> {
	pub(crate) fn new(session: &'a SearchSession, in_flight: InFlight) -> Self {
		Self { session, in_flight: Some(in_flight) }
	}

	pub(crate) fn disarm(&mut self) {
		self.in_flight = None;
	}
}
impl Drop for PendingGuard<'_> {
	fn drop(&mut self) {
		let Some(in_flight) = self.in_flight.take() else {
			return;
		};
		let mut state = self.session.lock();

		match in_flight {
			InFlight::Search(tag) if state.is_current(&tag) && state.is_searching => {
				tracing::warn!(query = %tag.query, "Search dropped while in flight.");

				state.is_searching = false;
				state.last_error =
					Some(SessionError { kind: ErrorKind::Search, message: CANCELLED.to_string() });
			},
			InFlight::Page(tag) if state.is_current(&tag) && state.is_paginating => {
				tracing::warn!(query = %tag.query, "Page request dropped while in flight.");

				state.is_paginating = false;
				state.last_error = Some(SessionError {
					kind: ErrorKind::Pagination,
					message: CANCELLED.to_string(),
				});
			},
			InFlight::Summary { generation, document_id }
				if state.generation == generation
					&& state.summaries.get(&document_id) == Some(&SummaryStatus::Pending) =>
			{
				tracing::warn!(
					document_id = %document_id,
					"Summary request dropped while in flight."
				);

				state
					.summaries
					.finish(&document_id, SummaryStatus::Failed(CANCELLED.to_string()));
			},
			_ => {},
		}
	}
}
