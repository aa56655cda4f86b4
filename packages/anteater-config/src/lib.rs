mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Service, Session};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let base_url = cfg.service.base_url.trim();

	if base_url.is_empty() {
		return Err(Error::Validation {
			message: "service.base_url must be non-empty.".to_string(),
		});
	}
	if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
		return Err(Error::Validation {
			message: "service.base_url must start with http:// or https://.".to_string(),
		});
	}
	if cfg.service.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "service.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.session.page_size == 0 {
		return Err(Error::Validation {
			message: "session.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.session.page_size > MAX_PAGE_SIZE {
		return Err(Error::Validation {
			message: format!("session.page_size must be {MAX_PAGE_SIZE} or less."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let base_url = cfg.service.base_url.trim().trim_end_matches('/');

	cfg.service.base_url = base_url.to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
