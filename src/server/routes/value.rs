//! Current value queries

use crate::core::metrics::MetricType;
use crate::core::model::WireRecord;
use crate::server::state::AppState;
use crate::storage::MetricsStorage;
use crate::utils::error::{MetricsError, Result};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/value", "/value/"]).route(web::post().to(value_json)))
        .service(
            web::resource(["/value/{metric_type}/{name}", "/value/{metric_type}/{name}/"])
                .route(web::get().to(value_from_path)),
        );
}

/// `GET /value/{type}/{name}`, plain-text value
pub async fn value_from_path(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (metric_type, name) = path.into_inner();
    let metric = state.storage.get_metric(&metric_type, &name).await?;

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(metric.string_value()))
}

/// `POST /value/` with `{id, type}`, answers the full wire record
pub async fn value_json(
    state: web::Data<AppState>,
    query: web::Json<WireRecord>,
) -> Result<HttpResponse> {
    if query.id.is_empty() {
        return Err(MetricsError::validation("metric id is empty"));
    }
    if query.mtype.is_empty() {
        return Err(MetricsError::validation("metric type is empty"));
    }
    let metric_type: MetricType = query.mtype.parse()?;

    let metric = state
        .storage
        .get_metric(metric_type.as_str(), &query.id)
        .await?;
    Ok(HttpResponse::Ok().json(state.converter.to_wire_record(&metric)?))
}
