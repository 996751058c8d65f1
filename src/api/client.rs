/// HTTP client for the analysis service
///
/// One `analyze` call issues exactly one multipart POST carrying the image
/// bytes. There are no automatic retries; a retry is the user invoking
/// `analyze` again with the same image. The timeout configured on the
/// underlying client is the only bound on request duration.

use reqwest::multipart;
use reqwest::StatusCode;
use tracing::{info, warn};

use super::error::AnalyzeError;
use super::model::{AnalyzeResponse, ErrorBody, FoodResult};
use crate::config::AppConfig;
use crate::state::image::CapturedImage;

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Build a client against the configured endpoint.
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Send an image for analysis and return the recognized food items.
    pub async fn analyze(&self, image: CapturedImage) -> Result<Vec<FoodResult>, AnalyzeError> {
        info!(
            "uploading {} ({} bytes, {})",
            image.file_name,
            image.bytes.len(),
            image.mime
        );

        let part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.mime)
            .map_err(transport_error)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/analyze-food", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        parse_response(status, &body)
    }

    /// Probe the service's health endpoint. Used once at startup to tell
    /// the user whether the backend is reachable at all.
    pub async fn health(&self) -> bool {
        match self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!("health check failed: {err}");
                false
            }
        }
    }
}

/// Map a transport-level failure onto the taxonomy.
fn transport_error(err: reqwest::Error) -> AnalyzeError {
    if err.is_timeout() {
        AnalyzeError::Timeout
    } else {
        warn!("transport failure: {err}");
        AnalyzeError::Unreachable
    }
}

/// Classify a completed HTTP exchange.
///
/// A success needs a 2xx status AND a non-empty `results` array; anything
/// else is one of the failure kinds.
fn parse_response(status: StatusCode, body: &[u8]) -> Result<Vec<FoodResult>, AnalyzeError> {
    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        return Err(AnalyzeError::Server {
            status: status.as_u16(),
            detail,
        });
    }

    match serde_json::from_slice::<AnalyzeResponse>(body) {
        Ok(response) if !response.results.is_empty() => Ok(response.results),
        Ok(_) => Err(AnalyzeError::InvalidResponse),
        Err(err) => {
            warn!("malformed analysis payload: {err}");
            Err(AnalyzeError::InvalidResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::Nutrient;

    const PIZZA: &str = r#"{
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

    #[test]
    fn test_success_response() {
        let results = parse_response(StatusCode::OK, PIZZA.as_bytes()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].food_item, "Pizza");
        assert_eq!(results[0].nutritional_info.calories, Nutrient::Number(285.0));
    }

    #[test]
    fn test_empty_results_is_invalid() {
        let outcome = parse_response(StatusCode::OK, br#"{"results": []}"#);
        assert_eq!(outcome, Err(AnalyzeError::InvalidResponse));
    }

    #[test]
    fn test_malformed_body_is_invalid() {
        let outcome = parse_response(StatusCode::OK, b"not json at all");
        assert_eq!(outcome, Err(AnalyzeError::InvalidResponse));

        let outcome = parse_response(StatusCode::OK, br#"{"results": "nope"}"#);
        assert_eq!(outcome, Err(AnalyzeError::InvalidResponse));
    }

    #[test]
    fn test_server_error_with_detail() {
        let outcome = parse_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"detail": "model unavailable"}"#,
        );
        assert_eq!(
            outcome,
            Err(AnalyzeError::Server {
                status: 500,
                detail: Some("model unavailable".to_string()),
            })
        );
        assert_eq!(outcome.unwrap_err().to_string(), "model unavailable");
    }

    #[test]
    fn test_server_error_without_body() {
        let outcome = parse_response(StatusCode::NOT_FOUND, b"");
        assert_eq!(
            outcome,
            Err(AnalyzeError::Server {
                status: 404,
                detail: None,
            })
        );
    }
}
