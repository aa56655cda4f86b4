use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{DocumentId, Error, ResultRecord, Result, SearchClient, SearchRequest, SearchResponse};

impl SearchClient {
	pub async fn search(&self, req: &SearchRequest) -> Result<SearchResponse> {
		if req.limit == 0 {
			return Err(Error::InvalidConfig {
				message: "Search limit must be greater than zero.".to_string(),
			});
		}

		let url = format!("{}/search", self.base_url);
		let offset = req.offset.to_string();
		let limit = req.limit.to_string();

		tracing::debug!(
			query = %req.query,
			offset = req.offset,
			limit = req.limit,
			"Sending search request."
		);

		let res = self
			.http
			.get(url)
			.query(&[
				("q", req.query.as_str()),
				("offset", offset.as_str()),
				("limit", limit.as_str()),
			])
			.send()
			.await?;
		let json = crate::read_json(res).await?;

		parse_search_response(json)
	}
}

pub(crate) fn parse_search_response(json: Value) -> Result<SearchResponse> {
	let items = json
		.get("results")
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::invalid_response("Search response is missing results array."))?;
	let total_matching = json.get("total").and_then(|v| v.as_u64()).ok_or_else(|| {
		Error::invalid_response("Search response total must be a non-negative integer.")
	})? as usize;
	let elapsed_seconds = json
		.get("query_time")
		.and_then(|v| v.as_f64())
		.ok_or_else(|| Error::invalid_response("Search response is missing query_time."))?;

	let mut results = Vec::with_capacity(items.len());

	for item in items {
		results.push(parse_result_record(item)?);
	}

	Ok(SearchResponse { results, total_matching, elapsed_seconds })
}

fn parse_result_record(item: &Value) -> Result<ResultRecord> {
	let document_id = item
		.get("doc_id")
		.and_then(DocumentId::from_json)
		.ok_or_else(|| Error::invalid_response("Search result is missing doc_id."))?;
	let url = item
		.get("url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| Error::invalid_response("Search result is missing url."))?
		.to_string();
	let score = item
		.get("score")
		.and_then(|v| v.as_f64())
		.filter(|score| score.is_finite())
		.ok_or_else(|| Error::invalid_response("Search result score must be a finite number."))?;
	let term_weights = match item.get("tf_idf_info") {
		None | Some(Value::Null) => None,
		Some(Value::Object(map)) => parse_term_weights(map)?,
		Some(_) =>
			return Err(Error::invalid_response("Search result tf_idf_info must be an object.")),
	};

	Ok(ResultRecord { document_id, url, score, term_weights })
}

fn parse_term_weights(map: &Map<String, Value>) -> Result<Option<BTreeMap<String, f64>>> {
	if map.is_empty() {
		return Ok(None);
	}

	let mut weights = BTreeMap::new();

	for (term, value) in map {
		let weight = value
			.as_f64()
			.ok_or_else(|| Error::invalid_response("Term weight values must be numeric."))?;

		weights.insert(term.clone(), weight);
	}

	Ok(Some(weights))
}
