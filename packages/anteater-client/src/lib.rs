//! HTTP client for the search service.
//!
//! `GET /search?q=&offset=&limit=` returns a ranked page of results, and `GET /summary?id=`
//! returns a generated summary for one document. Every failure, including non-2xx replies and
//! payloads of the wrong shape, is reported as an [`Error`].

mod error;
mod search;
mod summary;
mod types;

pub use error::{Error, Result};
pub use types::{DocumentId, ResultRecord, SearchRequest, SearchResponse};

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct SearchClient {
	http: Client,
	base_url: String,
}
impl SearchClient {
	pub fn new(cfg: &anteater_config::Service) -> Result<Self> {
		let base_url = cfg.base_url.trim().trim_end_matches('/');

		if base_url.is_empty() {
			return Err(Error::InvalidConfig {
				message: "Search service base URL must be non-empty.".to_string(),
			});
		}

		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { http, base_url: base_url.to_string() })
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}
}

async fn read_json(res: Response) -> Result<Value> {
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();

		return Err(Error::Status { status: status.as_u16(), message: error_message(&body) });
	}

	let bytes = res.bytes().await?;

	Ok(serde_json::from_slice(&bytes)?)
}

fn error_message(body: &str) -> String {
	serde_json::from_str::<Value>(body)
		.ok()
		.and_then(|json| json.get("error").and_then(|v| v.as_str()).map(str::to_string))
		.unwrap_or_else(|| {
			let trimmed = body.trim();

			if trimmed.is_empty() { "empty response body".to_string() } else { trimmed.to_string() }
		})
}
