use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotscout_storage::queries;

use crate::{LotService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HideVehicleRequest {
	pub user_id: Uuid,
	pub vehicle_id: Uuid,
	#[serde(default)]
	pub reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HideVehicleResponse {
	pub hidden: bool,
}

impl LotService {
	/// Hides a vehicle for a user. Hiding an already-hidden vehicle is a
	/// no-op acknowledgement.
	pub async fn hide_vehicle(&self, req: HideVehicleRequest) -> Result<HideVehicleResponse> {
		queries::insert_hidden_vehicle(
			&self.db.pool,
			req.user_id,
			req.vehicle_id,
			req.reason.as_deref(),
		)
		.await?;

		Ok(HideVehicleResponse { hidden: true })
	}
}
