//! Backup reachability

use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use tracing::{debug, error};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/ping", "/ping/"]).route(web::get().to(ping)));
}

/// `GET /ping`: `ok` when the backup store answers
pub async fn ping(state: web::Data<AppState>) -> Result<HttpResponse> {
    debug!("Ping requested");

    state
        .storage
        .ping()
        .await
        .inspect_err(|e| error!("backup ping failed: {}", e))?;

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body("ok"))
}
