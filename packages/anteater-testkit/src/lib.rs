//! In-process stand-in for the search service, used by integration tests.
//!
//! Serves `GET /search` and `GET /summary` with the same wire shapes as the real service,
//! from a canned corpus keyed by query text. Every request is counted so tests can assert how
//! much network traffic a client produced.

mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, HashSet},
	future::IntoFuture,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};

pub const DEFAULT_LIMIT: usize = 5;
pub const QUERY_TIME_SECONDS: f64 = 0.0125;

#[derive(Clone, Debug)]
pub struct FakeDocument {
	doc_id: Value,
	url: String,
	score: f64,
	term_weights: Option<Value>,
}
impl FakeDocument {
	pub fn new(doc_id: impl Into<Value>, url: impl Into<String>, score: f64) -> Self {
		Self { doc_id: doc_id.into(), url: url.into(), score, term_weights: None }
	}

	pub fn with_term_weights(mut self, weights: Value) -> Self {
		self.term_weights = Some(weights);

		self
	}

	fn to_json(&self) -> Value {
		let mut item = serde_json::json!({
			"doc_id": self.doc_id,
			"url": self.url,
			"score": self.score,
		});

		if let (Some(weights), Some(map)) = (&self.term_weights, item.as_object_mut()) {
			map.insert("tf_idf_info".to_string(), weights.clone());
		}

		item
	}
}

/// Request counters shared between a running fake and the test that owns it.
#[derive(Clone, Debug, Default)]
pub struct FakeStats {
	search_calls: Arc<AtomicUsize>,
	summary_calls: Arc<Mutex<HashMap<String, usize>>>,
	search_log: Arc<Mutex<Vec<(String, usize, usize)>>>,
}
impl FakeStats {
	pub fn search_calls(&self) -> usize {
		self.search_calls.load(Ordering::SeqCst)
	}

	/// `(query, offset, limit)` for every search request, in arrival order.
	pub fn search_log(&self) -> Vec<(String, usize, usize)> {
		self.search_log.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn summary_calls(&self, doc_id: &str) -> usize {
		let calls = self.summary_calls.lock().unwrap_or_else(|err| err.into_inner());

		calls.get(doc_id).copied().unwrap_or(0)
	}

	pub fn total_summary_calls(&self) -> usize {
		let calls = self.summary_calls.lock().unwrap_or_else(|err| err.into_inner());

		calls.values().sum()
	}
}

#[derive(Debug, Default)]
pub struct FakeSearchService {
	corpus: HashMap<String, Vec<FakeDocument>>,
	totals: HashMap<String, usize>,
	summaries: HashMap<String, String>,
	failing_summaries: HashSet<String>,
	malformed_queries: HashSet<String>,
}
impl FakeSearchService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_results(mut self, query: &str, documents: Vec<FakeDocument>) -> Self {
		self.corpus.insert(query_key(query), documents);

		self
	}

	/// Reports `total` for `query` regardless of how many documents are canned for it.
	pub fn with_total(mut self, query: &str, total: usize) -> Self {
		self.totals.insert(query_key(query), total);

		self
	}

	/// Answers `query` with a 200 whose body lacks the `results` array.
	pub fn with_malformed_results(mut self, query: &str) -> Self {
		self.malformed_queries.insert(query_key(query));

		self
	}

	pub fn with_summary(mut self, doc_id: &str, summary: impl Into<String>) -> Self {
		self.summaries.insert(doc_id.to_string(), summary.into());

		self
	}

	pub fn with_failing_summary(mut self, doc_id: &str) -> Self {
		self.failing_summaries.insert(doc_id.to_string());

		self
	}

	pub fn router(self) -> (Router, FakeStats) {
		let stats = FakeStats::default();
		let state = Arc::new(FakeState { service: self, stats: stats.clone() });
		let router = Router::new()
			.route("/search", routing::get(search_handler))
			.route("/summary", routing::get(summary_handler))
			.with_state(state);

		(router, stats)
	}

	pub async fn spawn(self) -> Result<RunningFake> {
		let (router, stats) = self.router();
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, router).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(RunningFake { base_url: format!("http://{addr}"), stats, shutdown: Some(tx) })
	}
}

/// A fake bound to a loopback port. Dropping it shuts the server down.
pub struct RunningFake {
	base_url: String,
	stats: FakeStats,
	shutdown: Option<oneshot::Sender<()>>,
}
impl RunningFake {
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn stats(&self) -> &FakeStats {
		&self.stats
	}
}
impl Drop for RunningFake {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

struct FakeState {
	service: FakeSearchService,
	stats: FakeStats,
}

async fn search_handler(
	State(state): State<Arc<FakeState>>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	state.stats.search_calls.fetch_add(1, Ordering::SeqCst);

	let query = params.get("q").map(|q| q.trim()).unwrap_or("");

	if query.is_empty() {
		return error_response(StatusCode::BAD_REQUEST, "No query provided");
	}

	let Some(offset) = parse_param(&params, "offset", 0) else {
		return error_response(StatusCode::BAD_REQUEST, "offset must be a non-negative integer");
	};
	let Some(limit) = parse_param(&params, "limit", DEFAULT_LIMIT) else {
		return error_response(StatusCode::BAD_REQUEST, "limit must be a non-negative integer");
	};

	state
		.stats
		.search_log
		.lock()
		.unwrap_or_else(|err| err.into_inner())
		.push((query.to_string(), offset, limit));

	let key = query_key(query);

	if state.service.malformed_queries.contains(&key) {
		return (StatusCode::OK, Json(serde_json::json!({ "total": 1 }))).into_response();
	}

	let documents = state.service.corpus.get(&key).map(Vec::as_slice).unwrap_or(&[]);
	let total = state.service.totals.get(&key).copied().unwrap_or(documents.len());
	let start = offset.min(documents.len());
	let end = offset.saturating_add(limit).min(documents.len());
	let results: Vec<Value> = documents[start..end].iter().map(FakeDocument::to_json).collect();

	(
		StatusCode::OK,
		Json(serde_json::json!({
			"results": results,
			"total": total,
			"query_time": QUERY_TIME_SECONDS,
		})),
	)
		.into_response()
}

async fn summary_handler(
	State(state): State<Arc<FakeState>>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	let doc_id = params.get("id").map(|id| id.trim()).unwrap_or("");

	{
		let mut calls = state.stats.summary_calls.lock().unwrap_or_else(|err| err.into_inner());

		*calls.entry(doc_id.to_string()).or_insert(0) += 1;
	}

	if doc_id.is_empty() {
		return error_response(StatusCode::BAD_REQUEST, "No URL provided");
	}
	if state.service.failing_summaries.contains(doc_id) {
		return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Summarizer unavailable");
	}

	match state.service.summaries.get(doc_id) {
		Some(summary) =>
			(StatusCode::OK, Json(serde_json::json!({ "summary": summary }))).into_response(),
		None => error_response(StatusCode::NOT_FOUND, "Unknown document"),
	}
}

fn parse_param(params: &HashMap<String, String>, name: &str, default: usize) -> Option<usize> {
	match params.get(name) {
		Some(raw) => raw.trim().parse().ok(),
		None => Some(default),
	}
}

fn error_response(status: StatusCode, message: &str) -> Response {
	(status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn query_key(query: &str) -> String {
	query.trim().to_lowercase()
}
