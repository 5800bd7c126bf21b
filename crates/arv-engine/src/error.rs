use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::arv::{ArvError, ProviderError, ScrapeError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Scraper(ScrapeError),
    Provider(ProviderError),
    Input(serde_json::Error),
    Validation(ValidationError),
    Valuation(ArvError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Scraper(err) => write!(f, "scraper setup failed: {}", err),
            AppError::Provider(err) => write!(f, "valuation provider setup failed: {}", err),
            AppError::Input(err) => write!(f, "invalid request JSON: {}", err),
            AppError::Validation(err) => write!(f, "invalid ARV request: {}", err),
            AppError::Valuation(err) => write!(f, "ARV calculation failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Scraper(err) => Some(err),
            AppError::Provider(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Valuation(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Input(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Valuation(ArvError::NoValidatedComps { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Scraper(_)
            | AppError::Provider(_)
            | AppError::Valuation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ScrapeError> for AppError {
    fn from(value: ScrapeError) -> Self {
        Self::Scraper(value)
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ArvError> for AppError {
    fn from(value: ArvError) -> Self {
        Self::Valuation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_map_to_bad_request() {
        let response = AppError::from(ValidationError::MissingComps).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejected_comp_sets_map_to_unprocessable_entity() {
        let response =
            AppError::from(ArvError::NoValidatedComps { candidates: 3 }).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_secrets_map_to_internal_error() {
        let error = AppError::from(ConfigError::MissingSecret { key: "OPENAI_KEY" });
        assert_eq!(error.to_string(), "configuration error: OPENAI_KEY must be set");
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
