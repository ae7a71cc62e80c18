use std::sync::Arc;

use serde_json::json;
use time::{Duration, OffsetDateTime};

use lotscout_service::{Providers, SearchPath, SearchRequest};

use super::{FailingEmbedding, SeedVehicle};

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn make_filter_returns_exactly_the_matching_vehicle() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let honda = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Honda hatch", make: "Honda", price: 12_000.0, ..Default::default() },
	)
	.await;
	let _toyota = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle {
			title: "Toyota wagon",
			make: "Toyota",
			price: 18_000.0,
			..Default::default()
		},
	)
	.await;
	let response = service
		.search(SearchRequest {
			query: None,
			filters: Some(json!({ "make": "Honda" })),
			user_id: None,
			limit: None,
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.path, SearchPath::Structured);
	assert_eq!(response.count, 1);
	assert_eq!(response.items[0].vehicle_id, honda);
	assert!(response.items[0].similarity.is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn both_price_aliases_apply_as_independent_caps() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let cheap = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Budget pick", price: 10_000.0, ..Default::default() },
	)
	.await;
	let _mid = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Middle pick", price: 13_000.0, ..Default::default() },
	)
	.await;
	let _dear = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Pricey pick", price: 16_000.0, ..Default::default() },
	)
	.await;
	// Both legacy spellings bind; the tighter cap ends up deciding.
	let response = service
		.search(SearchRequest {
			query: None,
			filters: Some(json!({ "max_price": 15000, "maxPrice": 12000 })),
			user_id: None,
			limit: None,
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.items[0].vehicle_id, cheap);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set LOTSCOUT_PG_DSN to run."]
async fn results_are_newest_first_and_capped() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set LOTSCOUT_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, Providers::new(Arc::new(FailingEmbedding))).await;
	let now = OffsetDateTime::now_utc();
	let oldest = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle {
			title: "Oldest listing",
			posted_at: Some(now - Duration::days(3)),
			..Default::default()
		},
	)
	.await;
	let newest = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle { title: "Newest listing", posted_at: Some(now), ..Default::default() },
	)
	.await;
	let middle = super::insert_vehicle(
		&service.db.pool,
		SeedVehicle {
			title: "Middle listing",
			posted_at: Some(now - Duration::days(1)),
			..Default::default()
		},
	)
	.await;
	let response = service
		.search(SearchRequest { query: None, filters: None, user_id: None, limit: Some(2) })
		.await
		.expect("Search failed.");
	let ids: Vec<_> = response.items.iter().map(|item| item.vehicle_id).collect();

	assert_eq!(ids, vec![newest, middle]);
	assert!(!ids.contains(&oldest));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
