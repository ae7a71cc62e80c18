use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotscout_storage::queries;

use crate::{LotService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToggleFavoriteRequest {
	pub user_id: Uuid,
	pub vehicle_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
	/// The new state: true when the vehicle is now favorited.
	pub favorited: bool,
}

impl LotService {
	pub async fn toggle_favorite(
		&self,
		req: ToggleFavoriteRequest,
	) -> Result<ToggleFavoriteResponse> {
		let removed = queries::delete_favorite(&self.db.pool, req.user_id, req.vehicle_id).await?;

		if removed {
			return Ok(ToggleFavoriteResponse { favorited: false });
		}

		queries::insert_favorite(&self.db.pool, req.user_id, req.vehicle_id).await?;

		Ok(ToggleFavoriteResponse { favorited: true })
	}
}
