use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use lotscout_service::{
	Error as ServiceError, HideVehicleRequest, HideVehicleResponse, ScoreboardRequest,
	ScoreboardResponse, SearchRequest, SearchResponse, ToggleFavoriteRequest,
	ToggleFavoriteResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/scoreboard", post(scoreboard))
		.route("/v1/favorites/toggle", post(toggle_favorite))
		.route("/v1/vehicles/hide", post(hide_vehicle))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;
	Ok(Json(response))
}

async fn scoreboard(
	State(state): State<AppState>,
	Json(payload): Json<ScoreboardRequest>,
) -> Result<Json<ScoreboardResponse>, ApiError> {
	let response = state.service.scoreboard(payload).await?;
	Ok(Json(response))
}

async fn toggle_favorite(
	State(state): State<AppState>,
	Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
	let response = state.service.toggle_favorite(payload).await?;
	Ok(Json(response))
}

async fn hide_vehicle(
	State(state): State<AppState>,
	Json(payload): Json<HideVehicleRequest>,
) -> Result<Json<HideVehicleResponse>, ApiError> {
	let response = state.service.hide_vehicle(payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::RetrievalFailed => Self::new(
				StatusCode::BAD_GATEWAY,
				"retrieval_failed",
				ServiceError::RetrievalFailed.to_string(),
			),
			ServiceError::Storage { .. } => Self::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				"storage_error",
				"A storage error occurred.",
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
