use serde_json::Value;

use crate::{DocumentId, Error, Result, SearchClient};

impl SearchClient {
	pub async fn summary(&self, document_id: &DocumentId) -> Result<String> {
		let url = format!("{}/summary", self.base_url);

		tracing::debug!(document_id = %document_id, "Sending summary request.");

		let res = self.http.get(url).query(&[("id", document_id.as_str())]).send().await?;
		let json = crate::read_json(res).await?;

		parse_summary_response(json)
	}
}

fn parse_summary_response(json: Value) -> Result<String> {
	json.get("summary")
		.and_then(|v| v.as_str())
		.map(|summary| summary.trim().to_string())
		.ok_or_else(|| Error::invalid_response("Summary response is missing summary text."))
}
