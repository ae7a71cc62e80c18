mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Postgres, Providers, Search, Service, Storage, Worker,
};

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
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.similarity_threshold.is_finite()
		|| !(0.0..=1.0).contains(&cfg.search.similarity_threshold)
	{
		return Err(Error::Validation {
			message: "search.similarity_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.result_cap == 0 {
		return Err(Error::Validation {
			message: "search.result_cap must be greater than zero.".to_string(),
		});
	}
	if cfg.search.fetch_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.fetch_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.worker.batch_limit == 0 {
		return Err(Error::Validation {
			message: "worker.batch_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	// The embedding URL is built as api_base + path; tolerate a trailing slash.
	while cfg.providers.embedding.api_base.ends_with('/') {
		cfg.providers.embedding.api_base.pop();
	}
	if !cfg.providers.embedding.path.starts_with('/') {
		cfg.providers.embedding.path.insert(0, '/');
	}
}
