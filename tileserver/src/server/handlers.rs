//! HTTP handlers for the index, TileJSON and tile routes.
//!
//! Handlers only translate between HTTP and the tileset API. Blocking SQLite reads run on the
//! blocking thread pool. CORS headers are left to the `CorsLayer`.

use super::http_date::{format_http_date, parse_http_date};
use anyhow::{Result, anyhow};
use axum::{
	Json,
	body::Body,
	extract::{Path, State},
	http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
	response::{IntoResponse, Response},
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tileserver_container::{Tileset, TilesetRegistry};
use tileserver_core::{Blob, TileCoord, TileError, TileJson};

const CONTENT_TYPE_JSON: &str = "application/json";

/// Shared state of all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
	pub registry: Arc<TilesetRegistry>,
	/// Public base URL, e.g. `https://tiles.example.org`. Falls back to the `Host` header.
	pub host_url: Option<Arc<str>>,
	/// `false` if loading the tileset directory failed at startup.
	pub healthy: bool,
}

#[derive(Serialize)]
struct Health<'a> {
	ok: bool,
	tilesets: Vec<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Message {
	message: &'static str,
	status_code: u16,
}

pub async fn serve_index(State(state): State<AppState>) -> Response {
	Json(Health {
		ok: state.healthy,
		tilesets: state.registry.ids(),
	})
	.into_response()
}

pub async fn serve_tilejson(
	State(state): State<AppState>,
	Path(id): Path<String>,
	uri: Uri,
	headers: HeaderMap,
) -> Response {
	log::debug!("handle TileJSON request: {uri}");

	let Ok(tileset) = state.registry.lookup(&id) else {
		let message = Message {
			message: "Tileset not found",
			status_code: StatusCode::NOT_FOUND.as_u16(),
		};
		return (StatusCode::NOT_FOUND, Json(message)).into_response();
	};

	let base_url = format!("{}{}", base_url(state.host_url.as_deref(), &headers), uri.path());
	let query = uri.query().map(|query| format!("?{query}")).unwrap_or_default();

	let metadata = match blocking(tileset, Tileset::get_metadata).await {
		Ok(metadata) => metadata,
		Err(err) => {
			log::error!("send 500 for TileJSON request: {uri}. Error:\n{}", format_error_chain(&err));
			return error_500();
		}
	};

	Json(TileJson::new(
		&metadata,
		tileset.format(),
		&base_url,
		&query,
		tileset.has_utf_grid(),
	))
	.into_response()
}

/// Serves a tile, or a UTF grid if `y` ends with `.json`.
pub async fn serve_tile(
	State(state): State<AppState>,
	Path((id, z, x, y)): Path<(String, String, String, String)>,
	headers: HeaderMap,
) -> Response {
	log::debug!("handle tile request: {id}/{z}/{x}/{y}");

	let tileset = match state.registry.lookup(&id) {
		Ok(tileset) => tileset,
		Err(err) => return error_response(&err),
	};

	let is_grid = y.ends_with(".json");
	let coord = match TileCoord::parse(&z, &x, &y) {
		Ok(coord) => coord,
		Err(err) => return error_response(&err),
	};

	let result = if is_grid {
		blocking(tileset, move |tileset| tileset.get_grid(&coord)).await
	} else {
		blocking(tileset, move |tileset| tileset.get_tile(&coord)).await
	};
	let blob = match result {
		Ok(blob) => blob,
		Err(err) => return error_response(&err),
	};

	if let Some(since) = headers.get(header::IF_MODIFIED_SINCE) {
		let since = match since.to_str().map_err(|e| anyhow!(e)).and_then(parse_http_date) {
			Ok(since) => since,
			Err(err) => return error_with(StatusCode::BAD_REQUEST, &format!("{err:#}")),
		};
		if tileset.timestamp() <= since {
			return StatusCode::NOT_MODIFIED.into_response();
		}
	}

	let etag = etag(&blob);
	if headers
		.get(header::IF_NONE_MATCH)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.trim().trim_matches('"') == etag)
	{
		return StatusCode::NOT_MODIFIED.into_response();
	}

	let (content_type, content_encoding) = if is_grid {
		(
			CONTENT_TYPE_JSON,
			tileset.grid_format().and_then(|format| format.content_encoding()),
		)
	} else {
		(
			tileset.content_type().unwrap_or("application/octet-stream"),
			tileset.format().content_encoding(),
		)
	};

	match ok_data(blob, tileset, &etag, content_type, content_encoding) {
		Ok(response) => response,
		Err(err) => {
			log::error!("failed to build tile response:\n{}", format_error_chain(&err));
			error_500()
		}
	}
}

/// Runs a blocking tileset read on the blocking thread pool.
async fn blocking<T, F>(tileset: &Arc<Tileset>, read: F) -> Result<T>
where
	T: Send + 'static,
	F: FnOnce(&Tileset) -> Result<T> + Send + 'static,
{
	let tileset = Arc::clone(tileset);
	tokio::task::spawn_blocking(move || read(&tileset))
		.await
		.map_err(|e| anyhow!("tileset read task failed: {e}"))?
}

fn base_url(host_url: Option<&str>, headers: &HeaderMap) -> String {
	if let Some(host_url) = host_url {
		return host_url.trim_end_matches('/').to_string();
	}
	let host = headers
		.get(header::HOST)
		.and_then(|value| value.to_str().ok())
		.unwrap_or("localhost");
	format!("http://{host}")
}

fn etag(blob: &Blob) -> String {
	hex::encode(Sha256::digest(blob.as_slice()))
}

fn ok_data(
	blob: Blob,
	tileset: &Tileset,
	etag: &str,
	content_type: &'static str,
	content_encoding: Option<&'static str>,
) -> Result<Response> {
	let mut headers = HeaderMap::new();
	headers.insert(
		header::LAST_MODIFIED,
		HeaderValue::from_str(&format_http_date(tileset.timestamp())?)?,
	);
	headers.insert(header::ETAG, HeaderValue::from_str(etag)?);
	headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
	if let Some(encoding) = content_encoding {
		headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static(encoding));
	}

	log::trace!("send response with headers: {headers:?}");
	Ok((StatusCode::OK, headers, Body::from(blob.into_vec())).into_response())
}

/// Maps errors of tile requests to responses.
fn error_response(err: &anyhow::Error) -> Response {
	match TileError::find(err) {
		Some(TileError::TilesetNotFound(_)) => error_with(StatusCode::NOT_FOUND, "Tileset not found"),
		Some(e) if e.is_no_content() => StatusCode::NO_CONTENT.into_response(),
		Some(e) if e.is_invalid_coord() => error_with(StatusCode::BAD_REQUEST, &e.to_string()),
		_ => {
			log::error!("send 500 for tile request. Error:\n{}", format_error_chain(err));
			error_500()
		}
	}
}

fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();

	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {cause}"));
	}

	result
}

fn error_with(status: StatusCode, message: &str) -> Response {
	(
		status,
		[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
		message.to_string(),
	)
		.into_response()
}

fn error_500() -> Response {
	error_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
