use serde_json::Value;

/// One canonical constraint compiled from a saved criteria object.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterClause {
	/// Case-insensitive equality on the make column.
	MakeMatches(String),
	/// Case-insensitive equality on the model column.
	ModelMatches(String),
	PriceAtMost(f64),
	YearAtLeast(i32),
	/// Exact membership over the body_type column (array criteria form).
	BodyTypeIn(Vec<String>),
	/// Case-insensitive equality on the body_type column (singular legacy form).
	BodyTypeMatches(String),
}

/// Ordered conjunction of [`FilterClause`]s. Every clause must hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
	pub clauses: Vec<FilterClause>,
}

impl FilterSet {
	pub fn is_empty(&self) -> bool {
		self.clauses.is_empty()
	}
}

#[derive(Clone, Copy, Debug)]
enum CanonicalField {
	Make,
	Model,
	MaxPrice,
	MinYear,
	BodyTypes,
	BodyType,
}

/// Every accepted criteria key and the canonical field it maps to.
///
/// Saved profiles exist under two naming conventions, and a single criteria
/// object can carry both variants of the same field. When it does, BOTH are
/// compiled, as independent ANDed clauses. Older profiles depend on that
/// exact behavior, so the variants are never merged or deduplicated here.
const KEY_ALIASES: &[(&str, CanonicalField)] = &[
	("make", CanonicalField::Make),
	("model", CanonicalField::Model),
	("max_price", CanonicalField::MaxPrice),
	("maxPrice", CanonicalField::MaxPrice),
	("min_year", CanonicalField::MinYear),
	("minYear", CanonicalField::MinYear),
	("body_types", CanonicalField::BodyTypes),
	("bodyType", CanonicalField::BodyType),
];

/// Picker placeholders that mean "no constraint".
const ANY_SENTINELS: &[&str] = &["Any Make", "Any Model"];

/// Compiles a heterogeneous criteria object into a canonical [`FilterSet`].
///
/// Absent, blank, sentinel, and malformed values all normalize to absence of
/// the clause; nothing here is an error. Unknown keys are ignored.
pub fn normalize(criteria: &Value) -> FilterSet {
	let Some(object) = criteria.as_object() else {
		return FilterSet::default();
	};
	let mut clauses = Vec::new();

	for (key, field) in KEY_ALIASES {
		let Some(value) = object.get(*key) else {
			continue;
		};

		match field {
			CanonicalField::Make =>
				if let Some(text) = constrained_text(value) {
					clauses.push(FilterClause::MakeMatches(text));
				},
			CanonicalField::Model =>
				if let Some(text) = constrained_text(value) {
					clauses.push(FilterClause::ModelMatches(text));
				},
			CanonicalField::MaxPrice =>
				if let Some(price) = numeric_f64(value) {
					clauses.push(FilterClause::PriceAtMost(price));
				},
			CanonicalField::MinYear =>
				if let Some(year) = numeric_i32(value) {
					clauses.push(FilterClause::YearAtLeast(year));
				},
			CanonicalField::BodyTypes => {
				let body_types = text_array(value);

				if !body_types.is_empty() {
					clauses.push(FilterClause::BodyTypeIn(body_types));
				}
			},
			CanonicalField::BodyType =>
				if let Some(text) = constrained_text(value) {
					clauses.push(FilterClause::BodyTypeMatches(text));
				},
		}
	}

	FilterSet { clauses }
}

fn constrained_text(value: &Value) -> Option<String> {
	let text = value.as_str()?.trim();

	if text.is_empty() || ANY_SENTINELS.contains(&text) {
		return None;
	}

	Some(text.to_string())
}

fn text_array(value: &Value) -> Vec<String> {
	let Some(items) = value.as_array() else {
		return Vec::new();
	};

	items.iter().filter_map(constrained_text).collect()
}

fn numeric_f64(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64().filter(|parsed| parsed.is_finite()),
		Value::String(text) => text.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite()),
		_ => None,
	}
}

fn numeric_i32(value: &Value) -> Option<i32> {
	match value {
		Value::Number(number) => number
			.as_i64()
			.or_else(|| number.as_f64().filter(|parsed| parsed.fract() == 0.0).map(|parsed| parsed as i64))
			.and_then(|parsed| i32::try_from(parsed).ok()),
		Value::String(text) => text.trim().parse::<i32>().ok(),
		_ => None,
	}
}
