//! CORS layer built from [`CorsConfig`].
//!
//! Origins are matched exactly. Matching requests get an `Access-Control-Allow-Origin` header
//! echoing their origin, and preflight requests are answered by the layer itself. Without any
//! configured origin no CORS headers are sent at all.

use crate::config::CorsConfig;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
	let origins = config
		.allowed_origins
		.iter()
		.map(|origin| HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin '{origin}'")))
		.collect::<Result<Vec<_>>>()?;

	let mut layer = CorsLayer::new()
		.allow_methods([Method::GET, Method::OPTIONS])
		.max_age(Duration::from_secs(config.max_age_seconds()));

	if !origins.is_empty() {
		layer = layer.allow_origin(AllowOrigin::list(origins));
	}

	Ok(layer)
}
