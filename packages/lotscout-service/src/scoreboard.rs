use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotscout_domain::criteria;
use lotscout_storage::queries;

use crate::{Error, LotService, Result, VehicleHit, exclusions};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreboardRequest {
	pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreboardEntry {
	pub vehicle: VehicleHit,
	pub is_favorite: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreboardResponse {
	pub scoreboard: HashMap<String, Vec<ScoreboardEntry>>,
}

impl LotService {
	/// Builds the per-profile scoreboard for one user.
	///
	/// A failed or timed-out profile degrades to an empty list under its
	/// name; it never aborts the rest of the aggregation. Profiles sharing a
	/// name collapse to one map entry, later-created profile winning.
	pub async fn scoreboard(&self, req: ScoreboardRequest) -> Result<ScoreboardResponse> {
		let pool = &self.db.pool;
		// Both loads complete before any per-interest retrieval begins.
		let (interests, exclusions) = tokio::try_join!(
			async { queries::active_interests(pool, req.user_id).await.map_err(Error::from) },
			exclusions::load(pool, Some(req.user_id)),
		)?;
		let fetch_timeout = Duration::from_millis(self.cfg.search.fetch_timeout_ms);
		let limit = i64::from(self.cfg.search.result_cap);
		let mut scoreboard = HashMap::new();

		for interest in interests {
			// Saved profiles are pure filters; they always drive the
			// structured path.
			let filters = criteria::normalize(&interest.criteria);
			let outcome = tokio::time::timeout(
				fetch_timeout,
				self.structured_search(None, &filters, &exclusions.hidden, limit),
			)
			.await;
			let entries = match outcome {
				Ok(Ok(hits)) => hits
					.into_iter()
					.map(|hit| ScoreboardEntry {
						is_favorite: exclusions.favorites.contains(&hit.vehicle_id),
						vehicle: hit,
					})
					.collect(),
				Ok(Err(err)) => {
					tracing::error!(
						error = %err,
						interest = %interest.name,
						"Interest retrieval failed. Showing no matches for it."
					);

					Vec::new()
				},
				Err(_) => {
					tracing::warn!(
						interest = %interest.name,
						"Interest retrieval timed out. Showing no matches for it."
					);

					Vec::new()
				},
			};

			// Later profiles with a duplicate name overwrite earlier ones.
			scoreboard.insert(interest.name, entries);
		}

		Ok(ScoreboardResponse { scoreboard })
	}
}
