//! Metric update endpoints

use crate::core::metrics::{MetricType, MetricValue};
use crate::core::model::WireRecord;
use crate::server::state::AppState;
use crate::storage::MetricsStorage;
use crate::utils::error::{MetricsError, Result};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use tracing::{debug, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource([
            "/update/{metric_type}/{name}/{value}",
            "/update/{metric_type}/{name}/{value}/",
        ])
        .route(web::post().to(update_from_path)),
    )
    .service(web::resource(["/update", "/update/"]).route(web::post().to(update_json)))
    .service(web::resource(["/updates", "/updates/"]).route(web::post().to(update_batch)));
}

/// `POST /update/{type}/{name}/{value}`, answers `ok`
pub async fn update_from_path(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse> {
    let (metric_type, name, raw) = path.into_inner();

    let record = path_record(&metric_type, &name, &raw).inspect_err(|e| {
        warn!("failed to update metric {}/{}: {}", metric_type, name, e);
    })?;
    let metric = state.converter.from_wire_record(&record)?;
    state.storage.add_metric_values(vec![metric.shared()]).await?;

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body("ok"))
}

/// `POST /update/` with one JSON wire record
pub async fn update_json(
    state: web::Data<AppState>,
    record: web::Json<WireRecord>,
) -> Result<HttpResponse> {
    let mut stored = store(&state, std::slice::from_ref(&record.0)).await?;
    let record = stored
        .pop()
        .ok_or_else(|| MetricsError::internal("storage returned no metric"))?;
    Ok(HttpResponse::Ok().json(record))
}

/// `POST /updates/` with a JSON array of wire records
pub async fn update_batch(
    state: web::Data<AppState>,
    records: web::Json<Vec<WireRecord>>,
) -> Result<HttpResponse> {
    let stored = store(&state, &records).await?;
    Ok(HttpResponse::Ok().json(stored))
}

fn path_record(metric_type: &str, name: &str, raw: &str) -> Result<WireRecord> {
    let metric_type: MetricType = metric_type.parse()?;
    let record = match MetricValue::parse(metric_type, raw)? {
        MetricValue::Counter(delta) => WireRecord::counter(name, delta),
        MetricValue::Gauge(value) => WireRecord::gauge(name, value),
    };
    Ok(record)
}

/// Convert every record before storing any of them
async fn store(state: &AppState, records: &[WireRecord]) -> Result<Vec<WireRecord>> {
    let metrics = records
        .iter()
        .map(|record| {
            state
                .converter
                .from_wire_record(record)
                .map(|metric| metric.shared())
        })
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| warn!("rejected update: {}", e))?;

    debug!("Storing {} metrics", metrics.len());
    let stored = state.storage.add_metric_values(metrics).await?;

    stored
        .iter()
        .map(|metric| state.converter.to_wire_record(metric))
        .collect()
}
