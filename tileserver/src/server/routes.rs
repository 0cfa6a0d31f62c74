//! Router composition. All routes live under [`PREFIX`]; `/` redirects there.

use super::handlers::{AppState, serve_index, serve_tile, serve_tilejson};
use axum::{
	Router,
	http::{StatusCode, header},
	routing::get,
};

pub const PREFIX: &str = "/v1";

pub fn build_router(state: AppState) -> Router {
	Router::new()
		.route(
			"/",
			get(|| async { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, PREFIX)]) }),
		)
		.route(PREFIX, get(serve_index))
		.route(&format!("{PREFIX}/{{id}}"), get(serve_tilejson))
		.route(&format!("{PREFIX}/{{id}}/tiles/{{z}}/{{x}}/{{y}}"), get(serve_tile))
		.with_state(state)
}
