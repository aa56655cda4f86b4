#![allow(dead_code)]

use std::{
	collections::{HashMap, VecDeque},
	future::Future,
	sync::{Arc, Mutex},
	time::Duration,
};

use tokio::{sync::oneshot, task::JoinHandle};

use anteater_client::Error;
use anteater_session::{
	BoxFuture, DocumentId, Outcome, ResultRecord, SearchApi, SearchRequest, SearchResponse,
	SearchSession,
};

type SearchReply = anteater_client::Result<SearchResponse>;
type SummaryReply = anteater_client::Result<String>;

/// A `SearchApi` whose replies are released by the test, one gate per expected request.
#[derive(Default)]
pub struct ScriptedApi {
	searches: Mutex<HashMap<(String, usize), VecDeque<oneshot::Receiver<SearchReply>>>>,
	summaries: Mutex<HashMap<DocumentId, VecDeque<oneshot::Receiver<SummaryReply>>>>,
	search_calls: Mutex<Vec<SearchRequest>>,
	summary_calls: Mutex<Vec<DocumentId>>,
}
impl ScriptedApi {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn expect_search(&self, query: &str, offset: usize) -> oneshot::Sender<SearchReply> {
		let (tx, rx) = oneshot::channel();
		let mut searches = self.searches.lock().unwrap_or_else(|err| err.into_inner());

		searches.entry((query.to_string(), offset)).or_default().push_back(rx);

		tx
	}

	pub fn expect_summary(&self, document_id: u64) -> oneshot::Sender<SummaryReply> {
		let (tx, rx) = oneshot::channel();
		let mut summaries = self.summaries.lock().unwrap_or_else(|err| err.into_inner());

		summaries.entry(DocumentId::from(document_id)).or_default().push_back(rx);

		tx
	}

	pub fn search_calls(&self) -> Vec<SearchRequest> {
		self.search_calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn summary_calls(&self) -> Vec<DocumentId> {
		self.summary_calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl SearchApi for ScriptedApi {
	fn search<'a>(&'a self, req: &'a SearchRequest) -> BoxFuture<'a, SearchReply> {
		self.search_calls.lock().unwrap_or_else(|err| err.into_inner()).push(req.clone());

		let gate = {
			let mut searches = self.searches.lock().unwrap_or_else(|err| err.into_inner());

			searches.get_mut(&(req.query.clone(), req.offset)).and_then(VecDeque::pop_front)
		};

		Box::pin(async move {
			match gate {
				Some(rx) => rx.await.unwrap_or_else(|_| Err(invalid("Search gate dropped."))),
				None => Err(invalid("Unexpected search request.")),
			}
		})
	}

	fn summary<'a>(&'a self, document_id: &'a DocumentId) -> BoxFuture<'a, SummaryReply> {
		self.summary_calls.lock().unwrap_or_else(|err| err.into_inner()).push(document_id.clone());

		let gate = {
			let mut summaries = self.summaries.lock().unwrap_or_else(|err| err.into_inner());

			summaries.get_mut(document_id).and_then(VecDeque::pop_front)
		};

		Box::pin(async move {
			match gate {
				Some(rx) => rx.await.unwrap_or_else(|_| Err(invalid("Summary gate dropped."))),
				None => Err(invalid("Unexpected summary request.")),
			}
		})
	}
}

pub fn invalid(message: &str) -> Error {
	Error::InvalidResponse { message: message.to_string() }
}

pub fn record(id: u64) -> ResultRecord {
	ResultRecord {
		document_id: DocumentId::from(id),
		url: format!("https://{id}.example.com"),
		score: 1.0 / (id as f64 + 1.0),
		term_weights: None,
	}
}

pub fn page(ids: &[u64], total: usize) -> SearchReply {
	Ok(SearchResponse {
		results: ids.iter().copied().map(record).collect(),
		total_matching: total,
		elapsed_seconds: 0.02,
	})
}

pub fn session(api: &Arc<ScriptedApi>, page_size: usize) -> SearchSession {
	SearchSession::with_page_size(api.clone(), page_size)
}

pub fn spawn<F>(future: F) -> JoinHandle<Outcome>
where
	F: Future<Output = Outcome> + Send + 'static,
{
	tokio::spawn(future)
}

/// Yields to spawned tasks until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
	for _ in 0..1_000 {
		if condition() {
			return;
		}

		tokio::time::sleep(Duration::from_millis(1)).await;
	}

	panic!("Condition was not reached in time.");
}

pub fn ids(session: &SearchSession) -> Vec<String> {
	session
		.snapshot()
		.entries()
		.iter()
		.map(|entry| entry.document_id.as_str().to_string())
		.collect()
}
