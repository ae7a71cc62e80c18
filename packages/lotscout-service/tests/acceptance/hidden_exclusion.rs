use std::sync::Arc;

use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use lotscout_service::{HideVehicleRequest, Providers, ScoreboardRequest, SearchRequest};

use super::{FailingEmbedding, SeedVehicle};

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn hidden_vehicle_never_surfaces_in_search() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let user_id = Uuid::new_v4();
	let visible = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Visible listing", ..Default::default() },
	)
	.await;
	let hidden = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Hidden listing", ..Default::default() },
	)
	.await;

	service
		.hide_vehicle(HideVehicleRequest { user_id, vehicle_id: hidden, reason: None })
		.await
		.expect("Failed to hide vehicle.");

	let response = service
		.search(SearchRequest {
			query: None,
			filters: None,
			user_id: Some(user_id),
			limit: None,
		})
		.await
		.expect("Search failed.");
	let ids: Vec<_> = response.items.iter().map(|item| item.vehicle_id).collect();

	assert_eq!(ids, vec![visible]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn hidden_vehicle_never_surfaces_in_scoreboard() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let user_id = Uuid::new_v4();
	let visible = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Visible listing", ..Default::default() },
	)
	.await;
	let hidden = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Hidden listing", ..Default::default() },
	)
	.await;

	service
		.hide_vehicle(HideVehicleRequest {
			user_id,
			vehicle_id: hidden,
			reason: Some("seen it".to_string()),
		})
		.await
		.expect("Failed to hide vehicle.");

	// Empty criteria match everything, so only the exclusion narrows this.
	super::insert_interest(
		&service.db.pool,
		user_id,
		"Anything",
		json!({}),
		OffsetDateTime::now_utc(),
	)
	.await;

	let response =
		service.scoreboard(ScoreboardRequest { user_id }).await.expect("Scoreboard failed.");
	let entries = response.scoreboard.get("Anything").expect("Missing interest entry.");
	let ids: Vec<_> = entries.iter().map(|entry| entry.vehicle.vehicle_id).collect();

	assert_eq!(ids, vec![visible]);
	assert!(!ids.contains(&hidden));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn varying_hidden_subsets_never_leak() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let mut vehicle_ids = Vec::new();

	for idx in 0..4 {
		let title: &'static str = ["One", "Two", "Three", "Four"][idx];

		vehicle_ids.push(
			super::insert_vehicle(&service.db.pool, SeedVehicle { title, ..Default::default() })
				.await,
		);
	}

	for hidden_subset in [vec![0], vec![1, 2], vec![0, 1, 2, 3], Vec::new()] {
		let user_id = Uuid::new_v4();

		for idx in &hidden_subset {
			service
				.hide_vehicle(HideVehicleRequest {
					user_id,
					vehicle_id: vehicle_ids[*idx],
					reason: None,
				})
				.await
				.expect("Failed to hide vehicle.");
		}

		super::insert_interest(
			&service.db.pool,
			user_id,
			"Watchlist",
			json!({}),
			OffsetDateTime::now_utc(),
		)
		.await;

		let search = service
			.search(SearchRequest {
				query: None,
				filters: None,
				user_id: Some(user_id),
				limit: None,
			})
			.await
			.expect("Search failed.");
		let scoreboard = service
			.scoreboard(ScoreboardRequest { user_id })
			.await
			.expect("Scoreboard failed.");
		let hidden_ids: Vec<Uuid> =
			hidden_subset.iter().map(|idx| vehicle_ids[*idx]).collect();

		for item in &search.items {
			assert!(!hidden_ids.contains(&item.vehicle_id), "Hidden id leaked into search.");
		}
		for entries in scoreboard.scoreboard.values() {
			for entry in entries {
				assert!(
					!hidden_ids.contains(&entry.vehicle.vehicle_id),
					"Hidden id leaked into scoreboard."
				);
			}
		}
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
