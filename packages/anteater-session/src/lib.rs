//! Client-side search session.
//!
//! [`SearchSession`] owns one [`SessionState`] and moves it through three asynchronous
//! operations: fresh search, load-more pagination and per-document summary fetch. Each request is
//! tagged with the search generation and query it was issued for, and its response is applied
//! only if that tag still matches when it arrives. Superseded responses are dropped at apply
//! time; nothing is aborted in flight.

pub mod error;
mod pending;
pub mod search;
pub mod store;
pub mod summary;
pub mod view;

pub use error::{ErrorKind, SessionError};
pub use store::ResultStore;
pub use summary::{SummaryCache, SummaryStatus};
pub use view::{EntryDetails, EntryView, Phase, SessionView, SummaryView};

pub use anteater_client::{DocumentId, ResultRecord, SearchRequest, SearchResponse};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex, MutexGuard},
};

use anteater_client::SearchClient;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The remote search service as seen by a session.
pub trait SearchApi
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		req: &'a SearchRequest,
	) -> BoxFuture<'a, anteater_client::Result<SearchResponse>>;

	fn summary<'a>(
		&'a self,
		document_id: &'a DocumentId,
	) -> BoxFuture<'a, anteater_client::Result<String>>;
}

impl SearchApi for SearchClient {
	fn search<'a>(
		&'a self,
		req: &'a SearchRequest,
	) -> BoxFuture<'a, anteater_client::Result<SearchResponse>> {
		Box::pin(SearchClient::search(self, req))
	}

	fn summary<'a>(
		&'a self,
		document_id: &'a DocumentId,
	) -> BoxFuture<'a, anteater_client::Result<String>> {
		Box::pin(SearchClient::summary(self, document_id))
	}
}

/// What a session operation did to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// Preconditions not met. No request was issued and nothing changed.
	Ignored,
	/// The response was applied.
	Applied,
	/// The response arrived after a newer search superseded it and was dropped.
	Discarded,
	/// The request failed and the failure was recorded in state.
	Failed,
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
	submitted_query: Option<String>,
	store: ResultStore,
	summaries: SummaryCache,
	is_searching: bool,
	is_paginating: bool,
	last_error: Option<SessionError>,
	generation: u64,
}
impl SessionState {
	/// The last submitted query, trimmed. `None` until the first search.
	pub fn submitted_query(&self) -> Option<&str> {
		self.submitted_query.as_deref()
	}

	pub fn store(&self) -> &ResultStore {
		&self.store
	}

	pub fn entries(&self) -> &[ResultRecord] {
		self.store.entries()
	}

	pub fn summaries(&self) -> &SummaryCache {
		&self.summaries
	}

	pub fn is_searching(&self) -> bool {
		self.is_searching
	}

	pub fn is_paginating(&self) -> bool {
		self.is_paginating
	}

	pub fn has_more(&self) -> bool {
		self.store.has_more()
	}

	pub fn last_error(&self) -> Option<&SessionError> {
		self.last_error.as_ref()
	}

	/// Incremented by every fresh search.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	fn tag(&self) -> Option<RequestTag> {
		let query = self.submitted_query.clone()?;

		Some(RequestTag { generation: self.generation, query })
	}

	fn is_current(&self, tag: &RequestTag) -> bool {
		self.generation == tag.generation && self.submitted_query.as_deref() == Some(&tag.query)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RequestTag {
	generation: u64,
	query: String,
}

/// A search session shared by every surface that renders it. Clones share state.
#[derive(Clone)]
pub struct SearchSession {
	api: Arc<dyn SearchApi>,
	page_size: usize,
	state: Arc<Mutex<SessionState>>,
}
impl SearchSession {
	pub fn new(api: Arc<dyn SearchApi>, cfg: &anteater_config::Session) -> Self {
		Self::with_page_size(api, cfg.page_size as usize)
	}

	pub fn with_page_size(api: Arc<dyn SearchApi>, page_size: usize) -> Self {
		Self {
			api,
			page_size: page_size.max(1),
			state: Arc::new(Mutex::new(SessionState::default())),
		}
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// A consistent copy of the current state.
	pub fn snapshot(&self) -> SessionState {
		self.lock().clone()
	}

	pub fn view(&self) -> SessionView {
		SessionView::from_state(&self.lock())
	}

	/// Flips expansion of the entry at `index`. Returns the new state, or `None` if there is no
	/// such entry. Never touches the network.
	pub fn toggle_expand(&self, index: usize) -> Option<bool> {
		self.lock().store.toggle_expand(index)
	}

	fn lock(&self) -> MutexGuard<'_, SessionState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
