use std::collections::BTreeSet;

use anteater_client::{ResultRecord, SearchResponse};

/// Results accumulated for the active query plus per-entry expansion state.
///
/// A fresh search replaces everything; pagination only appends. Entries are never reordered or
/// deduplicated.
#[derive(Clone, Debug, Default)]
pub struct ResultStore {
	entries: Vec<ResultRecord>,
	expanded: BTreeSet<usize>,
	total_matching: usize,
	elapsed_seconds: f64,
	exhausted: bool,
}
impl ResultStore {
	pub fn entries(&self) -> &[ResultRecord] {
		&self.entries
	}

	pub fn get(&self, index: usize) -> Option<&ResultRecord> {
		self.entries.get(index)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn total_matching(&self) -> usize {
		self.total_matching
	}

	pub fn elapsed_seconds(&self) -> f64 {
		self.elapsed_seconds
	}

	pub fn expanded_indices(&self) -> &BTreeSet<usize> {
		&self.expanded
	}

	pub fn is_expanded(&self, index: usize) -> bool {
		self.expanded.contains(&index)
	}

	/// Whether the server reported more matches than have been fetched.
	pub fn has_more(&self) -> bool {
		!self.exhausted && self.entries.len() < self.total_matching
	}

	pub(crate) fn clear(&mut self) {
		*self = Self::default();
	}

	pub(crate) fn replace(&mut self, response: SearchResponse) {
		let SearchResponse { results, total_matching, elapsed_seconds } = response;

		if results.len() > total_matching {
			tracing::warn!(
				returned = results.len(),
				total = total_matching,
				"Search returned more results than its total. Raising total."
			);
		}

		self.total_matching = total_matching.max(results.len());
		self.entries = results;
		self.elapsed_seconds = elapsed_seconds;
		self.expanded.clear();
		self.exhausted = false;
	}

	/// Appends a page and returns how many records were kept.
	pub(crate) fn append(&mut self, mut page: Vec<ResultRecord>) -> usize {
		if page.is_empty() {
			if self.has_more() {
				tracing::warn!(
					held = self.entries.len(),
					total = self.total_matching,
					"Empty page before reaching total. Marking results exhausted."
				);

				self.exhausted = true;
			}

			return 0;
		}

		let room = self.total_matching.saturating_sub(self.entries.len());

		if page.len() > room {
			tracing::warn!(
				returned = page.len(),
				room,
				"Page overflows the reported total. Truncating."
			);

			page.truncate(room);
		}

		let kept = page.len();

		self.entries.extend(page);

		kept
	}

	/// Flips expansion for `index` and returns the new state, or `None` if `index` is out of
	/// range.
	pub(crate) fn toggle_expand(&mut self, index: usize) -> Option<bool> {
		if index >= self.entries.len() {
			return None;
		}
		if self.expanded.remove(&index) {
			return Some(false);
		}

		self.expanded.insert(index);

		Some(true)
	}
}
