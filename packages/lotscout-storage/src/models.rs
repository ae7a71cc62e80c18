use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// One catalog listing. The embedding column is deliberately not part of the
/// row model; it is only ever written through
/// [`crate::queries::attach_embedding`] and read inside similarity SQL.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Vehicle {
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
	pub posted_at: OffsetDateTime,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Interest {
	pub interest_id: Uuid,
	pub user_id: Uuid,
	pub name: String,
	pub is_active: bool,
	pub criteria: Value,
	pub created_at: OffsetDateTime,
}
