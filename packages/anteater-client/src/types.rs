use std::{collections::BTreeMap, fmt};

use serde_json::Value;

/// Opaque document identifier assigned by the search service.
///
/// The service may send `doc_id` as a JSON number or string. Both forms normalize to the same
/// textual identifier, so `42` and `"42"` refer to one document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);
impl DocumentId {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub(crate) fn from_json(value: &Value) -> Option<Self> {
		match value {
			Value::String(raw) if !raw.trim().is_empty() => Some(Self(raw.trim().to_string())),
			Value::Number(number) if number.is_u64() || number.is_i64() =>
				Some(Self(number.to_string())),
			_ => None,
		}
	}
}
impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl From<u64> for DocumentId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}
impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
	pub query: String,
	/// Zero for a fresh search, otherwise the number of results already held.
	pub offset: usize,
	pub limit: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
	pub document_id: DocumentId,
	pub url: String,
	/// Higher is more relevant.
	pub score: f64,
	pub term_weights: Option<BTreeMap<String, f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResponse {
	pub results: Vec<ResultRecord>,
	pub total_matching: usize,
	pub elapsed_seconds: f64,
}
