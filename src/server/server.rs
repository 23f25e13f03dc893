//! HTTP server core implementation

use crate::config::CollectorConfig;
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{MetricsError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use tracing::info;

const SERVER_HEADER: &str = concat!("metrics-relay/", env!("CARGO_PKG_VERSION"));

/// Largest accepted JSON body
const MAX_JSON_BODY: usize = 4 * 1024 * 1024;

/// Collector HTTP server
pub struct HttpServer {
    address: String,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: &CollectorConfig, state: AppState) -> Self {
        Self {
            address: config.address.clone(),
            state,
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .app_data(web::JsonConfig::default().limit(MAX_JSON_BODY))
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", SERVER_HEADER)))
            .configure(routes::configure_routes)
    }

    /// Serve until the process receives a shutdown signal
    pub async fn start(self) -> Result<()> {
        info!("Starting HTTP server on {}", self.address);

        let state = web::Data::new(self.state);
        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&self.address)
            .map_err(|e| Self::format_bind_error(e, &self.address))?
            .run();

        server
            .await
            .map_err(|e| MetricsError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn format_bind_error(e: std::io::Error, address: &str) -> MetricsError {
        match e.kind() {
            std::io::ErrorKind::AddrInUse => {
                MetricsError::config(format!("Address {} is already in use", address))
            }
            std::io::ErrorKind::PermissionDenied => {
                MetricsError::config(format!("Permission denied binding to {}", address))
            }
            _ => MetricsError::config(format!("Failed to bind to {}: {}", address, e)),
        }
    }
}
