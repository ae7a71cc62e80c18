pub mod exclusions;
pub mod favorites;
pub mod hide;
pub mod scoreboard;
pub mod search;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use error::{Error, Result};
pub use exclusions::ExclusionSets;
pub use favorites::{ToggleFavoriteRequest, ToggleFavoriteResponse};
pub use hide::{HideVehicleRequest, HideVehicleResponse};
pub use scoreboard::{ScoreboardEntry, ScoreboardRequest, ScoreboardResponse};
pub use search::{SearchPath, SearchRequest, SearchResponse, VehicleHit};

use lotscout_config::{Config, EmbeddingProviderConfig};
use lotscout_providers::embedding;
use lotscout_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, lotscout_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct LotService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, lotscout_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

impl LotService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
