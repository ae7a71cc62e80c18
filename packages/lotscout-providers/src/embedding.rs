use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Embeds the given texts through the configured provider.
///
/// Every failure (connect, timeout, rejected request, malformed body) is a
/// typed error. A zero vector is never fabricated; callers that can degrade
/// must do so on their side.
pub async fn embed(
	cfg: &lotscout_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if texts.is_empty() || texts.iter().any(|text| text.trim().is_empty()) {
		return Err(Error::InvalidInput {
			message: "Embedding input texts must be non-empty.".to_string(),
		});
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json.get("data").and_then(|value| value.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|value| value.as_u64())
			.map(|value| value as usize)
			.unwrap_or(fallback_index);
		let embedding =
			item.get("embedding").and_then(|value| value.as_array()).ok_or_else(|| {
				Error::InvalidResponse {
					message: "Embedding item missing embedding array.".to_string(),
				}
			})?;
		let mut vec = Vec::with_capacity(embedding.len());
		for value in embedding {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: "Embedding value must be numeric.".to_string(),
			})?;
			vec.push(number as f32);
		}
		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
