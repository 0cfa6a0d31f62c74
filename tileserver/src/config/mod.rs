//! Tileserver configuration.
//!
//! - [`Config`](crate::config::Config): top-level configuration loader and YAML parser
//! - [`ServerConfig`](crate::config::ServerConfig): network settings and the public host URL
//! - [`CorsConfig`](crate::config::CorsConfig): allowed origins for cross-origin requests
//! - [`TilesetsConfig`](crate::config::TilesetsConfig): where and how tilesets are loaded
//!
//! Values are taken from the YAML file first. Unset values fall back to the environment
//! variables `TILE_DIR`, `HOST_URL` and `CORS_ALLOWED_ORIGINS`, then to built-in defaults.
//! Command line arguments override everything.

mod cors;
mod main;
mod server;
mod tilesets;
mod url;

pub use cors::CorsConfig;
pub use main::Config;
pub use server::ServerConfig;
pub use tilesets::TilesetsConfig;
pub use url::check_http_url;
