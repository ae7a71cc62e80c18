use std::time::Duration;

use tokio::time as tokio_time;
use tracing::{error, info};

use lotscout_config::EmbeddingProviderConfig;
use lotscout_domain::listing_text::{self, ListingFacts};
use lotscout_providers::embedding;
use lotscout_storage::{db::Db, models::Vehicle, queries};

pub struct BatchState {
	pub db: Db,
	pub embedding: EmbeddingProviderConfig,
	pub delay_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchReport {
	pub embedded: u32,
	pub failed: u32,
}

/// Embeds up to `limit` listings that have no vector yet, one provider call
/// at a time with a pause between calls.
///
/// Schedule exactly one instance at a time: a concurrent run selects the
/// same candidate rows and burns duplicate provider calls. The attach-once
/// write keeps even that case non-destructive.
pub async fn run_batch(state: &BatchState, limit: u32) -> color_eyre::Result<BatchReport> {
	let candidates = queries::embedding_candidates(&state.db.pool, i64::from(limit)).await?;

	if candidates.is_empty() {
		info!("No listings are waiting for embeddings.");

		return Ok(BatchReport::default());
	}

	info!(count = candidates.len(), "Embedding listings without vectors.");

	let mut report = BatchReport::default();

	for (idx, vehicle) in candidates.iter().enumerate() {
		if idx > 0 && state.delay_ms > 0 {
			tokio_time::sleep(Duration::from_millis(state.delay_ms)).await;
		}

		match embed_vehicle(state, vehicle).await {
			Ok(()) => report.embedded += 1,
			Err(err) => {
				report.failed += 1;

				error!(error = %err, vehicle_id = %vehicle.vehicle_id, "Failed to embed listing.");
			},
		}
	}

	Ok(report)
}

async fn embed_vehicle(state: &BatchState, vehicle: &Vehicle) -> color_eyre::Result<()> {
	let text = listing_text::describe(&ListingFacts {
		year: vehicle.year,
		make: &vehicle.make,
		model: &vehicle.model,
		title: &vehicle.title,
		price: vehicle.price,
		mileage: &vehicle.mileage,
	});
	let vectors = embedding::embed(&state.embedding, std::slice::from_ref(&text)).await?;
	let Some(vector) = vectors.into_iter().next() else {
		return Err(color_eyre::eyre::eyre!("Embedding provider returned no vectors."));
	};

	validate_vector_dim(&vector, state.embedding.dimensions)?;

	let written = queries::attach_embedding(&state.db.pool, vehicle.vehicle_id, &vector).await?;

	if !written {
		info!(vehicle_id = %vehicle.vehicle_id, "Listing already embedded. Skipping write.");
	}

	Ok(())
}

fn validate_vector_dim(vec: &[f32], expected_dim: u32) -> color_eyre::Result<()> {
	if vec.len() != expected_dim as usize {
		return Err(color_eyre::eyre::eyre!(
			"Embedding dimension {} does not match configured dimensions {}.",
			vec.len(),
			expected_dim
		));
	}

	Ok(())
}
