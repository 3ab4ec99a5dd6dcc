use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use dealscrape_core::ScrapeAuditRecord;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    url: String,
}

/// Body returned when the scrape task itself dies.
#[derive(Debug, Serialize)]
struct ScrapeFailed {
    message: &'static str,
    success: bool,
}

/// `POST /api/v1/scrape-product`
///
/// The scrape runs on its own task so a panic inside it is contained here
/// and answered with a 500 instead of tearing down the connection.
pub(super) async fn scrape_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return ApiError::new(
                req_id.0,
                "validation_error",
                format!("expected a JSON body with a string `url` field: {rejection}"),
            )
            .into_response();
        }
    };

    let url = body.url.trim().to_owned();
    if let Err(e) = Url::parse(&url) {
        return ApiError::new(
            req_id.0,
            "validation_error",
            format!("`url` must be an absolute URL: {e}"),
        )
        .into_response();
    }

    let scraper = Arc::clone(&state.scraper);
    let task_url = url.clone();
    let task = tokio::spawn(async move { scraper.scrape_product(&task_url).await });

    match task.await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => {
            tracing::error!(
                url = %url,
                request_id = %req_id.0,
                error = %e,
                "scrape task aborted"
            );
            state.audit.record(ScrapeAuditRecord::aborted(&url));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScrapeFailed {
                    message: "Scraping failed",
                    success: false,
                }),
            )
                .into_response()
        }
    }
}
