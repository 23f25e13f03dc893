//! HTML report pages

use crate::server::state::AppState;
use crate::storage::MetricsStorage;
use crate::utils::error::Result;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(metrics_page))
        .route("/metrics", web::get().to(metrics_page));
}

/// `GET /` and `GET /metrics`
pub async fn metrics_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.storage.get_metric_values().await?;
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(state.pages.build_metrics_page(&snapshot)))
}
