use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	pub worker: Worker,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Minimum cosine similarity for semantic matches. Kept deliberately low;
	/// higher cutoffs were observed to silently return empty result sets.
	#[serde(default = "default_similarity_threshold")]
	pub similarity_threshold: f32,
	#[serde(default = "default_result_cap")]
	pub result_cap: u32,
	/// Per-branch timeout for scoreboard fetches, in milliseconds.
	#[serde(default = "default_fetch_timeout_ms")]
	pub fetch_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Worker {
	#[serde(default = "default_batch_limit")]
	pub batch_limit: u32,
	/// Pause between embedding-provider calls, in milliseconds.
	#[serde(default = "default_delay_ms")]
	pub delay_ms: u64,
}

fn default_similarity_threshold() -> f32 {
	0.1
}

fn default_result_cap() -> u32 {
	20
}

fn default_fetch_timeout_ms() -> u64 {
	5_000
}

fn default_batch_limit() -> u32 {
	20
}

fn default_delay_ms() -> u64 {
	500
}
