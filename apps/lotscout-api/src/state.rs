use std::sync::Arc;

use lotscout_service::LotService;
use lotscout_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LotService>,
}
impl AppState {
	pub async fn new(config: lotscout_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.providers.embedding.dimensions).await?;

		let service = LotService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
