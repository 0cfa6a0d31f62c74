//! The HTTP server: routes, handlers, CORS and the server lifecycle.

mod cors;
mod handlers;
mod http_date;
mod routes;
mod tile_server;

pub use cors::build_cors_layer;
pub use handlers::AppState;
pub use http_date::{format_http_date, parse_http_date};
pub use routes::build_router;
pub use tile_server::*;
