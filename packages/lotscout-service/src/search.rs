use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use lotscout_domain::criteria::{self, FilterSet};
use lotscout_storage::{
	models::Vehicle,
	queries::{self, SimilarityQuery, VehicleFilter},
};

use crate::{Error, LotService, Result, exclusions};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: Option<String>,
	/// Raw criteria object; both legacy naming conventions are accepted.
	#[serde(default)]
	pub filters: Option<serde_json::Value>,
	#[serde(default)]
	pub user_id: Option<Uuid>,
	#[serde(default)]
	pub limit: Option<u32>,
}

/// Which retrieval path actually produced the results.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
	Semantic,
	Structured,
	StructuredFallback,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleHit {
	pub vehicle_id: Uuid,
	pub title: String,
	pub price: f64,
	pub mileage: String,
	pub location: String,
	pub image_url: Option<String>,
	pub listing_url: String,
	pub source: String,
	pub make: String,
	pub model: String,
	pub year: Option<i32>,
	pub body_type: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub posted_at: time::OffsetDateTime,
	/// Cosine similarity of this hit; present on the semantic path only.
	pub similarity: Option<f32>,
}

impl VehicleHit {
	pub(crate) fn from_vehicle(vehicle: Vehicle, similarity: Option<f32>) -> Self {
		Self {
			vehicle_id: vehicle.vehicle_id,
			title: vehicle.title,
			price: vehicle.price,
			mileage: vehicle.mileage,
			location: vehicle.location,
			image_url: vehicle.image_url,
			listing_url: vehicle.listing_url,
			source: vehicle.source,
			make: vehicle.make,
			model: vehicle.model,
			year: vehicle.year,
			body_type: vehicle.body_type,
			posted_at: vehicle.posted_at,
			similarity,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub path: SearchPath,
	pub count: usize,
	pub items: Vec<VehicleHit>,
}

#[derive(Debug, thiserror::Error)]
enum SemanticFailure {
	#[error("Embedding provider unavailable: {0}")]
	EmbeddingUnavailable(lotscout_providers::Error),
	#[error("Similarity matcher unavailable: {0}")]
	MatcherUnavailable(lotscout_storage::Error),
}

impl LotService {
	/// Resolves a search request through one of two paths.
	///
	/// A non-blank query takes the semantic path: embed, then rank by vector
	/// similarity. Semantic hits are returned as-is; structured criteria only
	/// shape the structured path. If either semantic step fails, the request
	/// falls back exactly once to the structured path with the query text as
	/// a substring filter. A structured-path failure is fatal.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.as_deref().map(str::trim).filter(|text| !text.is_empty());
		let filters = req.filters.as_ref().map(criteria::normalize).unwrap_or_default();
		let limit = i64::from(req.limit.unwrap_or(self.cfg.search.result_cap).max(1));
		let exclusions = exclusions::load(&self.db.pool, req.user_id).await?;
		let hidden = exclusions.hidden;

		if let Some(text) = query {
			match self.semantic_search(text, &hidden, limit).await {
				Ok(items) => {
					return Ok(SearchResponse {
						path: SearchPath::Semantic,
						count: items.len(),
						items,
					});
				},
				Err(err) => {
					warn!(error = %err, "Semantic path failed. Falling back to structured search.");
				},
			}
		}

		let path = if query.is_some() {
			SearchPath::StructuredFallback
		} else {
			SearchPath::Structured
		};
		let items =
			self.structured_search(query, &filters, &hidden, limit).await.map_err(|err| {
				tracing::error!(error = %err, "Structured retrieval failed.");

				Error::RetrievalFailed
			})?;

		Ok(SearchResponse { path, count: items.len(), items })
	}

	async fn semantic_search(
		&self,
		text: &str,
		hidden: &HashSet<Uuid>,
		limit: i64,
	) -> Result<Vec<VehicleHit>, SemanticFailure> {
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&text.to_string()))
			.await
			.map_err(SemanticFailure::EmbeddingUnavailable)?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(SemanticFailure::EmbeddingUnavailable(
				lotscout_providers::Error::InvalidResponse {
					message: "Embedding provider returned no vectors.".to_string(),
				},
			));
		};

		if vector.len() != self.cfg.providers.embedding.dimensions as usize {
			return Err(SemanticFailure::EmbeddingUnavailable(
				lotscout_providers::Error::InvalidResponse {
					message: "Embedding vector dimension mismatch.".to_string(),
				},
			));
		}

		let matches = queries::match_vehicles(
			&self.db.pool,
			&SimilarityQuery {
				vector: &vector,
				threshold: self.cfg.search.similarity_threshold,
				limit,
				excluded: hidden,
			},
		)
		.await
		.map_err(SemanticFailure::MatcherUnavailable)?;

		Ok(matches
			.into_iter()
			.map(|(vehicle, similarity)| VehicleHit::from_vehicle(vehicle, Some(similarity)))
			.collect())
	}

	pub(crate) async fn structured_search(
		&self,
		text_query: Option<&str>,
		filters: &FilterSet,
		hidden: &HashSet<Uuid>,
		limit: i64,
	) -> lotscout_storage::Result<Vec<VehicleHit>> {
		let vehicles = queries::filter_vehicles(
			&self.db.pool,
			&VehicleFilter { filters, text_query, excluded: hidden, limit },
		)
		.await?;

		Ok(vehicles.into_iter().map(|vehicle| VehicleHit::from_vehicle(vehicle, None)).collect())
	}
}
