/// Fields of a listing that feed its embedding text.
#[derive(Clone, Copy, Debug)]
pub struct ListingFacts<'a> {
	pub year: Option<i32>,
	pub make: &'a str,
	pub model: &'a str,
	pub title: &'a str,
	pub price: f64,
	pub mileage: &'a str,
}

/// Renders the canonical description string a listing is embedded under.
///
/// The format is stable: changing it invalidates every stored vector, since
/// query vectors and listing vectors must come from the same text shape.
pub fn describe(facts: &ListingFacts<'_>) -> String {
	let year = facts.year.map(|year| year.to_string()).unwrap_or_default();

	format!(
		"For Sale: {year} {make} {model} {title}. Price: ${price}. Mileage: {mileage}.",
		make = facts.make,
		model = facts.model,
		title = facts.title,
		price = facts.price,
		mileage = facts.mileage,
	)
}
