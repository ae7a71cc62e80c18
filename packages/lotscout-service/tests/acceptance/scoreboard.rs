use std::sync::Arc;

use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use lotscout_service::{Providers, ScoreboardRequest, ToggleFavoriteRequest};

use super::{FailingEmbedding, SeedVehicle};

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn duplicate_interest_names_collapse_to_the_later_created_profile() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let user_id = Uuid::new_v4();
	let _honda = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Honda pick", make: "Honda", ..Default::default() },
	)
	.await;
	let toyota = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Toyota pick", make: "Toyota", ..Default::default() },
	)
	.await;
	let now = OffsetDateTime::now_utc();

	super::insert_interest(
		&service.db.pool,
		user_id,
		"Daily Driver",
		json!({ "make": "Honda" }),
		now - Duration::hours(2),
	)
	.await;
	super::insert_interest(
		&service.db.pool,
		user_id,
		"Daily Driver",
		json!({ "make": "Toyota" }),
		now,
	)
	.await;

	let response =
		service.scoreboard(ScoreboardRequest { user_id }).await.expect("Scoreboard failed.");

	assert_eq!(response.scoreboard.len(), 1);

	let entries = response.scoreboard.get("Daily Driver").expect("Missing interest entry.");
	let ids: Vec<_> = entries.iter().map(|entry| entry.vehicle.vehicle_id).collect();

	assert_eq!(ids, vec![toyota], "The later-created profile must win the name.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn favorited_vehicles_are_flagged_in_scoreboard_entries() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let user_id = Uuid::new_v4();
	let starred = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Starred listing", ..Default::default() },
	)
	.await;
	let plain = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Plain listing", ..Default::default() },
	)
	.await;
	let toggled = service
		.toggle_favorite(ToggleFavoriteRequest { user_id, vehicle_id: starred })
		.await
		.expect("Toggle failed.");

	assert!(toggled.favorited);

	super::insert_interest(
		&service.db.pool,
		user_id,
		"Everything",
		json!({}),
		OffsetDateTime::now_utc(),
	)
	.await;

	let response =
		service.scoreboard(ScoreboardRequest { user_id }).await.expect("Scoreboard failed.");
	let entries = response.scoreboard.get("Everything").expect("Missing interest entry.");

	for entry in entries {
		if entry.vehicle.vehicle_id == starred {
			assert!(entry.is_favorite);
		} else {
			assert_eq!(entry.vehicle.vehicle_id, plain);
			assert!(!entry.is_favorite);
		}
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn toggle_favorite_flips_state_on_each_call() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let user_id = Uuid::new_v4();
	let vehicle_id = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Toggle target", ..Default::default() },
	)
	.await;
	let first = service
		.toggle_favorite(ToggleFavoriteRequest { user_id, vehicle_id })
		.await
		.expect("First toggle failed.");
	let second = service
		.toggle_favorite(ToggleFavoriteRequest { user_id, vehicle_id })
		.await
		.expect("Second toggle failed.");
	let third = service
		.toggle_favorite(ToggleFavoriteRequest { user_id, vehicle_id })
		.await
		.expect("Third toggle failed.");

	assert!(first.favorited);
	assert!(!second.favorited);
	assert!(third.favorited);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
