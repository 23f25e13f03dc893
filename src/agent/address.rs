//! Collector address normalization

use crate::utils::error::{MetricsError, Result};
use url::Url;

/// Turn `host:port`, `localhost:8080` or a full URL into an http(s) base URL.
///
/// A missing scheme defaults to `http`. The result has no trailing slash.
pub fn normalize_url(address: &str) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(MetricsError::config("collector address is empty"));
    }

    let url = match Url::parse(address) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        // `localhost:8080` parses with `localhost` as the scheme
        _ => Url::parse(&format!("http://{}", address))
            .map_err(|e| MetricsError::config(format!("parse collector url {}: {}", address, e)))?,
    };

    if url.host_str().is_none_or(str::is_empty) {
        return Err(MetricsError::config(format!(
            "collector url has no host: {}",
            address
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
