use std::collections::HashSet;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use lotscout_domain::criteria::{FilterClause, FilterSet};

use crate::{
	Result,
	models::{Interest, Vehicle},
};

const VEHICLE_COLUMNS: &str = "vehicle_id, title, price, mileage, location, image_url, \
	listing_url, source, make, model, year, body_type, posted_at, created_at";

/// Inputs to the structured filter query.
pub struct VehicleFilter<'a> {
	pub filters: &'a FilterSet,
	/// Case-insensitive substring match across title, make, and model.
	pub text_query: Option<&'a str>,
	pub excluded: &'a HashSet<Uuid>,
	pub limit: i64,
}

/// Inputs to the similarity query.
pub struct SimilarityQuery<'a> {
	pub vector: &'a [f32],
	/// Minimum cosine similarity, in [0, 1].
	pub threshold: f32,
	pub limit: i64,
	pub excluded: &'a HashSet<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct ScoredVehicleRow {
	#[sqlx(flatten)]
	vehicle: Vehicle,
	similarity: f32,
}

/// Runs the structured filter path: a single conjunctive query, newest
/// listings first, capped at `limit`.
pub async fn filter_vehicles(pool: &PgPool, filter: &VehicleFilter<'_>) -> Result<Vec<Vehicle>> {
	let mut builder = build_filter_query(filter);
	let vehicles = builder.build_query_as::<Vehicle>().fetch_all(pool).await?;

	Ok(vehicles)
}

fn build_filter_query<'a>(filter: &'a VehicleFilter<'a>) -> QueryBuilder<'a, Postgres> {
	let mut builder =
		QueryBuilder::new(format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE TRUE"));

	if let Some(text) = filter.text_query {
		let pattern = format!("%{}%", escape_like(text));

		builder.push(" AND (title ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR make ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR model ILIKE ");
		builder.push_bind(pattern);
		builder.push(")");
	}

	for clause in &filter.filters.clauses {
		match clause {
			FilterClause::MakeMatches(make) => {
				builder.push(" AND make ILIKE ");
				builder.push_bind(escape_like(make));
			},
			FilterClause::ModelMatches(model) => {
				builder.push(" AND model ILIKE ");
				builder.push_bind(escape_like(model));
			},
			FilterClause::PriceAtMost(price) => {
				builder.push(" AND price <= ");
				builder.push_bind(*price);
			},
			FilterClause::YearAtLeast(year) => {
				builder.push(" AND year >= ");
				builder.push_bind(*year);
			},
			FilterClause::BodyTypeIn(body_types) => {
				builder.push(" AND body_type IN (");
				{
					let mut separated = builder.separated(", ");

					for body_type in body_types {
						separated.push_bind(body_type.clone());
					}
				}
				builder.push(")");
			},
			FilterClause::BodyTypeMatches(body_type) => {
				builder.push(" AND body_type ILIKE ");
				builder.push_bind(escape_like(body_type));
			},
		}
	}

	if !filter.excluded.is_empty() {
		let excluded: Vec<Uuid> = filter.excluded.iter().copied().collect();

		builder.push(" AND vehicle_id != ALL(");
		builder.push_bind(excluded);
		builder.push(")");
	}

	builder.push(" ORDER BY posted_at DESC LIMIT ");
	builder.push_bind(filter.limit);

	builder
}

/// Runs the similarity path over embedded listings only. Results are ordered
/// by descending similarity, recency breaking ties; excluded identifiers
/// never appear regardless of score.
pub async fn match_vehicles(
	pool: &PgPool,
	query: &SimilarityQuery<'_>,
) -> Result<Vec<(Vehicle, f32)>> {
	let vec_text = vector_literal(query.vector);
	let excluded: Vec<Uuid> = query.excluded.iter().copied().collect();
	let rows: Vec<ScoredVehicleRow> = sqlx::query_as(&format!(
		"\
SELECT {VEHICLE_COLUMNS}, (1 - (embedding <=> $1::text::vector))::real AS similarity
FROM vehicles
WHERE embedding IS NOT NULL
	AND (1 - (embedding <=> $1::text::vector)) >= $2
	AND vehicle_id != ALL($3)
ORDER BY similarity DESC, posted_at DESC
LIMIT $4",
	))
	.bind(vec_text.as_str())
	.bind(query.threshold)
	.bind(&excluded)
	.bind(query.limit)
	.fetch_all(pool)
	.await?;

	Ok(rows.into_iter().map(|row| (row.vehicle, row.similarity)).collect())
}

pub async fn active_interests(pool: &PgPool, user_id: Uuid) -> Result<Vec<Interest>> {
	// Oldest first, so that a later-created profile with a duplicate name
	// wins when callers collapse results into a name-keyed map.
	let interests: Vec<Interest> = sqlx::query_as(
		"\
SELECT interest_id, user_id, name, is_active, criteria, created_at
FROM user_interests
WHERE user_id = $1 AND is_active
ORDER BY created_at ASC",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(interests)
}

pub async fn hidden_vehicle_ids(pool: &PgPool, user_id: Uuid) -> Result<HashSet<Uuid>> {
	let rows: Vec<(Uuid,)> =
		sqlx::query_as("SELECT vehicle_id FROM user_hidden_vehicles WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(pool)
			.await?;

	Ok(rows.into_iter().map(|(vehicle_id,)| vehicle_id).collect())
}

pub async fn favorite_vehicle_ids(pool: &PgPool, user_id: Uuid) -> Result<HashSet<Uuid>> {
	let rows: Vec<(Uuid,)> =
		sqlx::query_as("SELECT vehicle_id FROM favorites WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(pool)
			.await?;

	Ok(rows.into_iter().map(|(vehicle_id,)| vehicle_id).collect())
}

pub async fn insert_favorite(pool: &PgPool, user_id: Uuid, vehicle_id: Uuid) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO favorites (user_id, vehicle_id)
VALUES ($1, $2)
ON CONFLICT (user_id, vehicle_id) DO NOTHING",
	)
	.bind(user_id)
	.bind(vehicle_id)
	.execute(pool)
	.await?;

	Ok(())
}

/// Returns whether a favorite row was actually removed.
pub async fn delete_favorite(pool: &PgPool, user_id: Uuid, vehicle_id: Uuid) -> Result<bool> {
	let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND vehicle_id = $2")
		.bind(user_id)
		.bind(vehicle_id)
		.execute(pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_hidden_vehicle(
	pool: &PgPool,
	user_id: Uuid,
	vehicle_id: Uuid,
	reason: Option<&str>,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO user_hidden_vehicles (user_id, vehicle_id, reason)
VALUES ($1, $2, $3)
ON CONFLICT (user_id, vehicle_id) DO NOTHING",
	)
	.bind(user_id)
	.bind(vehicle_id)
	.bind(reason)
	.execute(pool)
	.await?;

	Ok(())
}

/// Listings still waiting for a vector, oldest first.
pub async fn embedding_candidates(pool: &PgPool, limit: i64) -> Result<Vec<Vehicle>> {
	let vehicles: Vec<Vehicle> = sqlx::query_as(&format!(
		"\
SELECT {VEHICLE_COLUMNS}
FROM vehicles
WHERE embedding IS NULL
ORDER BY created_at ASC
LIMIT $1",
	))
	.bind(limit)
	.fetch_all(pool)
	.await?;

	Ok(vehicles)
}

/// Attaches a vector to a listing that does not have one yet. Embeddings are
/// immutable once set, so the update is a no-op for already-embedded rows;
/// returns whether a row was written.
pub async fn attach_embedding(pool: &PgPool, vehicle_id: Uuid, vector: &[f32]) -> Result<bool> {
	let vec_text = vector_literal(vector);
	let result = sqlx::query(
		"\
UPDATE vehicles
SET embedding = $1::text::vector
WHERE vehicle_id = $2 AND embedding IS NULL",
	)
	.bind(vec_text.as_str())
	.bind(vehicle_id)
	.execute(pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Renders a vector as the pgvector text literal, e.g. `[0.1,0.2]`.
pub fn vector_literal(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (idx, value) in vec.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

// Escape LIKE metacharacters so user-supplied text matches literally.
fn escape_like(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}
		out.push(ch);
	}

	out
}
