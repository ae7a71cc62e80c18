use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use lotscout_storage::queries;

use crate::{Error, Result};

#[derive(Clone, Debug, Default)]
pub struct ExclusionSets {
	/// Vehicle identifiers this user must never see again.
	pub hidden: HashSet<Uuid>,
	pub favorites: HashSet<Uuid>,
}

/// Loads a user's hidden and favorited identifiers, fetched concurrently.
/// An anonymous caller gets two empty sets, never an error.
pub async fn load(pool: &PgPool, user_id: Option<Uuid>) -> Result<ExclusionSets> {
	let Some(user_id) = user_id else {
		return Ok(ExclusionSets::default());
	};
	let (hidden, favorites) = tokio::try_join!(
		queries::hidden_vehicle_ids(pool, user_id),
		queries::favorite_vehicle_ids(pool, user_id),
	)
	.map_err(Error::from)?;

	Ok(ExclusionSets { hidden, favorites })
}
