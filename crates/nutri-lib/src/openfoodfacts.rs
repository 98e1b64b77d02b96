//! OpenFoodFacts search client.
//!
//! Alternate search source backed by the public OpenFoodFacts API instead of
//! the local store. Nutrient fields in the API response are loosely typed
//! (number, numeric string, or absent); [`NutrientValue`] narrows them to a
//! definite `f64` with a defaulting rule.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::Food;

const OFF_BASE_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";
const OFF_SOURCE_TAG: &str = "OpenFoodFacts";
const OFF_PAGE_SIZE: &str = "10";
const OFF_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of food records matching a search term.
///
/// Implemented by the store-backed repository and by
/// [`OpenFoodFactsClient`]; the service picks one at startup.
pub trait FoodSource: Send + Sync {
    fn search(&self, term: &str) -> Result<Vec<Food>>;

    /// Label identifying this source in logs and metrics.
    fn label(&self) -> &str;
}

/// A nutrient value as delivered by the OpenFoodFacts API.
///
/// The API serves these as numbers, numeric strings, or not at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for NutrientValue {
    fn default() -> Self {
        NutrientValue::Other(serde_json::Value::Null)
    }
}

impl NutrientValue {
    /// Collapse to a definite per-100g quantity.
    ///
    /// Absent, null, and unparseable values become 0, as do negatives: the
    /// domain model promises non-negative quantities.
    pub fn as_grams(&self) -> f64 {
        let value = match self {
            NutrientValue::Number(v) => *v,
            NutrientValue::Text(s) => s.trim().parse().unwrap_or(0.0),
            NutrientValue::Other(_) => 0.0,
        };

        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(rename = "_id", default)]
    id: String,
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default)]
    energy_kcal_100g: NutrientValue,
    #[serde(rename = "proteins_100g", default)]
    proteins_100g: NutrientValue,
    #[serde(rename = "carbohydrates_100g", default)]
    carbohydrates_100g: NutrientValue,
    #[serde(rename = "fat_100g", default)]
    fat_100g: NutrientValue,
    #[serde(rename = "fiber_100g", default)]
    fiber_100g: NutrientValue,
}

/// Client for the OpenFoodFacts search endpoint.
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    /// Build a client against the public OpenFoodFacts endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(OFF_BASE_URL)
    }

    /// Build a client against a custom endpoint, used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(OFF_TIMEOUT)
            .user_agent(concat!("nutri-service-foods/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl FoodSource for OpenFoodFactsClient {
    fn search(&self, term: &str) -> Result<Vec<Food>> {
        debug!(term, "searching OpenFoodFacts");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_terms", term),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", OFF_PAGE_SIZE),
                ("fields", "product_name,nutriments"),
            ])
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "OpenFoodFacts returned an error status");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().map_err(|e| Error::Decode {
            message: e.to_string(),
        })?;

        Ok(parse_products(body))
    }

    fn label(&self) -> &str {
        OFF_SOURCE_TAG
    }
}

fn parse_products(body: SearchResponse) -> Vec<Food> {
    let mut foods = Vec::with_capacity(body.products.len());
    for product in body.products {
        // Unnamed products are unusable in every consumer of this API.
        if product.product_name.trim().is_empty() {
            continue;
        }

        foods.push(Food {
            id: product.id,
            name: product.product_name,
            source: OFF_SOURCE_TAG.to_string(),
            energy_kcal: product.nutriments.energy_kcal_100g.as_grams(),
            protein_g: product.nutriments.proteins_100g.as_grams(),
            carbohydrate_g: product.nutriments.carbohydrates_100g.as_grams(),
            fat_g: product.nutriments.fat_100g.as_grams(),
            fiber_g: product.nutriments.fiber_100g.as_grams(),
            household_measures: None,
        });
    }
    foods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrient(json: &str) -> NutrientValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_nutrient_number() {
        assert_eq!(nutrient("12.5").as_grams(), 12.5);
        assert_eq!(nutrient("0").as_grams(), 0.0);
    }

    #[test]
    fn test_nutrient_numeric_string() {
        assert_eq!(nutrient("\"12.5\"").as_grams(), 12.5);
        assert_eq!(nutrient("\" 3.2 \"").as_grams(), 3.2);
    }

    #[test]
    fn test_nutrient_null_and_absent() {
        assert_eq!(nutrient("null").as_grams(), 0.0);
        assert_eq!(NutrientValue::default().as_grams(), 0.0);
    }

    #[test]
    fn test_nutrient_non_numeric_string() {
        assert_eq!(nutrient("\"n/a\"").as_grams(), 0.0);
    }

    #[test]
    fn test_nutrient_unexpected_type() {
        assert_eq!(nutrient("[1, 2]").as_grams(), 0.0);
        assert_eq!(nutrient("{\"value\": 5}").as_grams(), 0.0);
    }

    #[test]
    fn test_nutrient_negative_clamped() {
        assert_eq!(nutrient("-4.0").as_grams(), 0.0);
        assert_eq!(nutrient("\"-4.0\"").as_grams(), 0.0);
    }

    #[test]
    fn test_parse_products_mixed_nutrient_types() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "count": 2,
                "products": [
                    {
                        "_id": "123",
                        "product_name": "Granola",
                        "nutriments": {
                            "energy-kcal_100g": 471,
                            "proteins_100g": "10.2",
                            "fat_100g": null
                        }
                    },
                    {
                        "_id": "456",
                        "product_name": "",
                        "nutriments": {"energy-kcal_100g": 100}
                    }
                ]
            }"#,
        )
        .unwrap();

        let foods = parse_products(body);

        // The unnamed product is skipped.
        assert_eq!(foods.len(), 1);
        let food = &foods[0];
        assert_eq!(food.id, "123");
        assert_eq!(food.name, "Granola");
        assert_eq!(food.source, "OpenFoodFacts");
        assert_eq!(food.energy_kcal, 471.0);
        assert_eq!(food.protein_g, 10.2);
        assert_eq!(food.carbohydrate_g, 0.0);
        assert_eq!(food.fat_g, 0.0);
    }

    #[test]
    fn test_parse_products_empty_body() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parse_products(body).is_empty());
    }

    #[test]
    fn test_client_builds() {
        assert!(OpenFoodFactsClient::new().is_ok());
    }

    /// Serve one canned HTTP response on a local port and return the URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}/search.pl")
    }

    #[test]
    fn test_search_parses_success_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"products": [{"_id": "789", "product_name": "Aveia", "nutriments": {"proteins_100g": 13.9}}]}"#,
        );
        let client = OpenFoodFactsClient::with_base_url(url).unwrap();

        let foods = client.search("aveia").unwrap();

        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].name, "Aveia");
        assert_eq!(foods[0].protein_g, 13.9);
    }

    #[test]
    fn test_search_maps_error_status() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let client = OpenFoodFactsClient::with_base_url(url).unwrap();

        let err = client.search("arroz").unwrap_err();

        assert!(matches!(err, Error::UpstreamStatus { status: 500 }));
    }

    #[test]
    fn test_search_rejects_malformed_body() {
        let url = serve_once("HTTP/1.1 200 OK", "these are not the droids");
        let client = OpenFoodFactsClient::with_base_url(url).unwrap();

        let err = client.search("arroz").unwrap_err();

        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_search_surfaces_transport_failure() {
        // Take a port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenFoodFactsClient::with_base_url(format!("http://{addr}/search.pl")).unwrap();

        let err = client.search("arroz").unwrap_err();

        assert!(matches!(err, Error::Http(_)));
    }
}
