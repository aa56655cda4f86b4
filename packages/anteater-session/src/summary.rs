use std::collections::HashMap;

use crate::{
	DocumentId, Outcome, SearchSession,
	pending::{InFlight, PendingGuard},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryStatus {
	Pending,
	Loaded(String),
	Failed(String),
}
impl SummaryStatus {
	/// Whether a fetch may be started from this status.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Failed(_))
	}
}

/// Summary state keyed by document identifier, never by entry position, so a document that
/// shows up again after pagination shares one fetch.
#[derive(Clone, Debug, Default)]
pub struct SummaryCache {
	by_document: HashMap<DocumentId, SummaryStatus>,
}
impl SummaryCache {
	pub fn get(&self, document_id: &DocumentId) -> Option<&SummaryStatus> {
		self.by_document.get(document_id)
	}

	pub fn len(&self) -> usize {
		self.by_document.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_document.is_empty()
	}

	/// Marks `document_id` pending and returns `true` if a fetch should be issued.
	pub(crate) fn begin(&mut self, document_id: &DocumentId) -> bool {
		match self.by_document.get(document_id) {
			Some(SummaryStatus::Pending | SummaryStatus::Loaded(_)) => false,
			Some(SummaryStatus::Failed(_)) | None => {
				self.by_document.insert(document_id.clone(), SummaryStatus::Pending);

				true
			},
		}
	}

	pub(crate) fn finish(&mut self, document_id: &DocumentId, status: SummaryStatus) {
		self.by_document.insert(document_id.clone(), status);
	}

	pub(crate) fn clear(&mut self) {
		self.by_document.clear();
	}
}

impl SearchSession {
	/// Fetches the summary for `document_id` unless one is already pending or loaded.
	///
	/// A failure is recorded for that document only and is never retried implicitly; calling
	/// again after a failure issues a new request.
	pub async fn ensure_summary(&self, document_id: &DocumentId) -> Outcome {
		let generation = {
			let mut state = self.lock();

			if !state.summaries.begin(document_id) {
				return Outcome::Ignored;
			}

			state.generation
		};

		tracing::debug!(document_id = %document_id, "Issuing summary request.");

		let mut pending = PendingGuard::new(
			self,
			InFlight::Summary { generation, document_id: document_id.clone() },
		);
		let result = self.api.summary(document_id).await;

		pending.disarm();

		let mut state = self.lock();

		if state.generation != generation {
			tracing::debug!(
				document_id = %document_id,
				"Discarding summary from a superseded search."
			);

			return Outcome::Discarded;
		}

		match result {
			Ok(text) => {
				state.summaries.finish(document_id, SummaryStatus::Loaded(text));

				Outcome::Applied
			},
			Err(err) => {
				tracing::warn!(error = %err, document_id = %document_id, "Summary request failed.");

				state.summaries.finish(document_id, SummaryStatus::Failed(err.to_string()));

				Outcome::Failed
			},
		}
	}

	/// [`ensure_summary`](Self::ensure_summary) for the entry at `index`.
	pub async fn ensure_summary_at(&self, index: usize) -> Outcome {
		let document_id = {
			let state = self.lock();

			match state.store.get(index) {
				Some(entry) => entry.document_id.clone(),
				None => return Outcome::Ignored,
			}
		};

		self.ensure_summary(&document_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn begin_is_idempotent_until_failure() {
		let mut cache = SummaryCache::default();
		let id = DocumentId::from(42_u64);

		assert!(cache.begin(&id));
		assert!(!cache.begin(&id));

		cache.finish(&id, SummaryStatus::Failed("timeout".to_string()));

		assert!(cache.get(&id).is_some_and(SummaryStatus::is_retryable));
		assert!(cache.begin(&id));
		assert_eq!(cache.get(&id), Some(&SummaryStatus::Pending));

		cache.finish(&id, SummaryStatus::Loaded("Ants.".to_string()));

		assert!(!cache.begin(&id));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn documents_are_independent() {
		let mut cache = SummaryCache::default();

		assert!(cache.begin(&DocumentId::from(1_u64)));

		cache.finish(&DocumentId::from(1_u64), SummaryStatus::Failed("boom".to_string()));

		assert!(cache.begin(&DocumentId::from(2_u64)));
		assert_eq!(cache.get(&DocumentId::from(2_u64)), Some(&SummaryStatus::Pending));
	}
}
