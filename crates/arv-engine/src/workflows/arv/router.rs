use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::domain::ArvResult;
use super::extraction::ScrapeGateway;
use super::intake;
use super::service::{ArvError, ArvService};
use super::synthesis::ValuationProvider;

const PIPELINE_FAILURE: &str = "An error occurred during ARV calculation";

/// Success envelope returned by `POST /api/arv`.
#[derive(Debug, Serialize)]
pub struct ArvResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ArvResult,
}

impl From<ArvResult> for ArvResponse {
    fn from(result: ArvResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Router builder exposing the valuation endpoint.
pub fn arv_router<S, P>(service: Arc<ArvService<S, P>>) -> Router
where
    S: ScrapeGateway + 'static,
    P: ValuationProvider + 'static,
{
    Router::new()
        .route("/api/arv", post(estimate_handler::<S, P>))
        .with_state(service)
}

pub(crate) async fn estimate_handler<S, P>(
    State(service): State<Arc<ArvService<S, P>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: ScrapeGateway + 'static,
    P: ValuationProvider + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let (main, comps) = match intake::parse_request(&payload) {
        Ok(parsed) => parsed,
        Err(error) => return bad_request(error.to_string()),
    };

    match service.find_arv(&main, comps).await {
        Ok(result) => (StatusCode::OK, Json(ArvResponse::from(result))).into_response(),
        Err(failure) => failure_response(failure),
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn failure_response(failure: ArvError) -> Response {
    error!(error = %failure, "ARV calculation failed");
    let status = match failure {
        ArvError::NoValidatedComps { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ArvError::Synthesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": PIPELINE_FAILURE,
        "message": failure.to_string(),
    });
    (status, Json(payload)).into_response()
}
