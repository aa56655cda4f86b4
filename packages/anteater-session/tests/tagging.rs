//! Random schedules of searches, pages and summaries with out-of-order completions.

use std::sync::{Arc, Mutex};

use proptest::{prelude::*, sample::Index};
use tokio::{
	runtime::Builder,
	sync::oneshot,
	task::{self, JoinHandle},
};

use anteater_client::Error;
use anteater_session::{
	BoxFuture, DocumentId, ErrorKind, Outcome, ResultRecord, SearchApi, SearchRequest,
	SearchResponse, SearchSession, SessionState,
};

const SUBMISSIONS: [&str; 4] = ["ant", "bee", "cat", "  ant "];
const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug)]
enum Step {
	Submit(usize),
	LoadMore,
	Summary(usize),
	Release { slot: Index, fail: bool },
}

enum Call {
	Search(SearchRequest, oneshot::Sender<anteater_client::Result<SearchResponse>>),
	Summary(DocumentId, oneshot::Sender<anteater_client::Result<String>>),
}

struct Pending {
	call: Call,
	task: JoinHandle<Outcome>,
}

/// Queues every call so the schedule decides when and how it completes.
#[derive(Default)]
struct QueuedApi {
	calls: Mutex<Vec<Call>>,
}
impl QueuedApi {
	fn take(&self) -> Vec<Call> {
		std::mem::take(&mut *self.calls.lock().unwrap_or_else(|err| err.into_inner()))
	}

	fn has_calls(&self) -> bool {
		!self.calls.lock().unwrap_or_else(|err| err.into_inner()).is_empty()
	}
}
impl SearchApi for QueuedApi {
	fn search<'a>(
		&'a self,
		req: &'a SearchRequest,
	) -> BoxFuture<'a, anteater_client::Result<SearchResponse>> {
		let (tx, rx) = oneshot::channel();

		self.calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(Call::Search(req.clone(), tx));

		Box::pin(async move { rx.await.unwrap_or_else(|_| Err(failure())) })
	}

	fn summary<'a>(
		&'a self,
		document_id: &'a DocumentId,
	) -> BoxFuture<'a, anteater_client::Result<String>> {
		let (tx, rx) = oneshot::channel();

		self.calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(Call::Summary(document_id.clone(), tx));

		Box::pin(async move { rx.await.unwrap_or_else(|_| Err(failure())) })
	}
}

fn failure() -> Error {
	Error::InvalidResponse { message: "Scheduled failure.".to_string() }
}

fn total(query: &str) -> usize {
	match query {
		"ant" => 7,
		"bee" => 3,
		_ => 0,
	}
}

/// Document ids for `query` in rank order. Queries share no documents.
fn ranked_ids(query: &str) -> Vec<u64> {
	let base = match query {
		"ant" => 100,
		"bee" => 200,
		_ => 300,
	};

	(0..total(query) as u64).map(|rank| base + rank).collect()
}

fn reply_page(req: &SearchRequest) -> SearchResponse {
	let ids = ranked_ids(&req.query);
	let start = req.offset.min(ids.len());
	let end = req.offset.saturating_add(req.limit).min(ids.len());
	let results = ids[start..end]
		.iter()
		.map(|id| ResultRecord {
			document_id: DocumentId::from(*id),
			url: format!("https://{id}.example.com"),
			score: 1.0 / (*id as f64),
			term_weights: None,
		})
		.collect();

	SearchResponse { results, total_matching: total(&req.query), elapsed_seconds: 0.01 }
}

fn release(call: Call, fail: bool) {
	match call {
		Call::Search(req, tx) => {
			let _ = tx.send(if fail { Err(failure()) } else { Ok(reply_page(&req)) });
		},
		Call::Summary(document_id, tx) => {
			let reply = if fail { Err(failure()) } else { Ok(format!("About {document_id}.")) };
			let _ = tx.send(reply);
		},
	}
}

async fn settle_until(mut condition: impl FnMut() -> bool) {
	for _ in 0..1_000 {
		if condition() {
			return;
		}

		task::yield_now().await;
	}

	panic!("Schedule stalled.");
}

fn held_ids(state: &SessionState) -> Vec<u64> {
	state
		.entries()
		.iter()
		.map(|entry| entry.document_id.as_str().parse().expect("Ids are numeric."))
		.collect()
}

fn check_invariants(session: &SearchSession, last_submitted: Option<&str>) {
	let state = session.snapshot();

	assert!(
		!(state.is_searching() && state.is_paginating()),
		"A search and a page were in flight together."
	);
	assert_eq!(state.submitted_query(), last_submitted);

	let held = held_ids(&state);

	match state.submitted_query() {
		Some(query) => {
			let expected = ranked_ids(query);

			assert!(held.len() <= expected.len(), "Held {held:?} for {query}.");
			assert_eq!(held, expected[..held.len()], "Entries are not {query}'s pages in order.");
		},
		None => assert!(held.is_empty()),
	}
}

async fn run_schedule(steps: Vec<Step>) {
	let api = Arc::new(QueuedApi::default());
	let session = SearchSession::with_page_size(api.clone(), PAGE_SIZE);
	let mut pending: Vec<Pending> = Vec::new();
	let mut last_submitted = None;

	for step in steps {
		let issued = match step {
			Step::Submit(choice) => {
				let query = SUBMISSIONS[choice];
				let session = session.clone();

				last_submitted = Some(query.trim());

				Some(task::spawn(async move { session.submit_search(query).await }))
			},
			Step::LoadMore => {
				let session = session.clone();

				Some(task::spawn(async move { session.load_more().await }))
			},
			Step::Summary(index) => {
				let session = session.clone();

				Some(task::spawn(async move { session.ensure_summary_at(index).await }))
			},
			Step::Release { slot, fail } => {
				if !pending.is_empty() {
					let Pending { call, task } = pending.remove(slot.index(pending.len()));

					release(call, fail);
					settle_until(|| task.is_finished()).await;

					assert_ne!(task.await.expect("Task panicked."), Outcome::Ignored);
				}

				None
			},
		};

		if let Some(task) = issued {
			settle_until(|| task.is_finished() || api.has_calls()).await;

			match api.take().pop() {
				Some(call) => pending.push(Pending { call, task }),
				None => assert_eq!(task.await.expect("Task panicked."), Outcome::Ignored),
			}
		}

		check_invariants(&session, last_submitted);
	}

	for Pending { call, task } in pending {
		release(call, false);
		task.await.expect("Task panicked.");
		check_invariants(&session, last_submitted);
	}

	let state = session.snapshot();

	assert!(!state.is_searching());
	assert!(!state.is_paginating());

	if let Some(query) = last_submitted
		&& state.last_error().is_none_or(|err| err.kind != ErrorKind::Search)
	{
		assert!(state.entries().len() >= PAGE_SIZE.min(total(query)));
	}
}

fn step_strategy() -> impl Strategy<Value = Step> {
	prop_oneof![
		2 => (0..SUBMISSIONS.len()).prop_map(Step::Submit),
		2 => Just(Step::LoadMore),
		1 => (0..4_usize).prop_map(Step::Summary),
		4 => (any::<Index>(), prop::bool::weighted(0.2))
			.prop_map(|(slot, fail)| Step::Release { slot, fail }),
	]
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(128))]

	/// Only responses for the current search and its pages ever reach the entries, whatever
	/// order they complete in.
	#[test]
	fn entries_always_belong_to_the_latest_search(
		steps in prop::collection::vec(step_strategy(), 1..48),
	) {
		let runtime =
			Builder::new_current_thread().enable_all().build().expect("Failed to build runtime.");

		runtime.block_on(run_schedule(steps));
	}
}
