use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub session: Session,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	/// Base URL of the search service, e.g. "https://api.anteaterfind.com".
	pub base_url: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// `tracing` filter directive.
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Session {
	/// Number of results requested per page.
	pub page_size: u32,
}
impl Default for Session {
	fn default() -> Self {
		Self { page_size: DEFAULT_PAGE_SIZE }
	}
}

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_log_level() -> String {
	"info".to_string()
}
