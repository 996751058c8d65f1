/// Wire model for the analysis service
///
/// The service replies with `{ "results": [...] }` where each entry names
/// a recognized food and its nutritional breakdown. Nutrient values come
/// back either as bare numbers or unit-annotated strings ("12g"), so they
/// are kept verbatim and only formatted for display.

use serde::Deserialize;
use std::fmt;

/// Top-level success payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub results: Vec<FoodResult>,
}

/// One recognized food item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FoodResult {
    pub food_item: String,
    pub nutritional_info: NutritionalInfo,
}

/// Nutritional breakdown for a single food item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NutritionalInfo {
    pub calories: Nutrient,
    pub protein: Nutrient,
    pub carbs: Nutrient,
    pub fat: Nutrient,
    /// Free-text notes (health benefits, caveats)
    #[serde(default)]
    pub details: String,
}

/// A nutrient value as reported by the service.
///
/// The service does not guarantee a numeric type here: calories may arrive
/// as `285` while protein arrives as `"12g"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Nutrient {
    Number(f64),
    Text(String),
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers without the trailing ".0"
            Nutrient::Number(value) if value.fract() == 0.0 => write!(f, "{value:.0}"),
            Nutrient::Number(value) => write!(f, "{value}"),
            Nutrient::Text(value) => f.write_str(value),
        }
    }
}

/// Error payload attached to non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "results": [{
                "food_item": "Pizza",
                "nutritional_info": {
                    "calories": 285,
                    "protein": "12g",
                    "carbs": "36g",
                    "fat": "10g",
                    "details": "High in carbohydrates."
                }
            }]
        }"#;

        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);

        let result = &response.results[0];
        assert_eq!(result.food_item, "Pizza");
        assert_eq!(result.nutritional_info.calories, Nutrient::Number(285.0));
        assert_eq!(
            result.nutritional_info.protein,
            Nutrient::Text("12g".to_string())
        );
    }

    #[test]
    fn test_absent_results_defaults_to_empty() {
        let response: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_nutrient_display() {
        assert_eq!(Nutrient::Number(285.0).to_string(), "285");
        assert_eq!(Nutrient::Number(12.5).to_string(), "12.5");
        assert_eq!(Nutrient::Text("36g".to_string()).to_string(), "36g");
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"model unavailable"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("model unavailable"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());
    }
}
