//! Cross-Origin Resource Sharing (CORS) configuration.
//!
//! Origins are matched exactly against the `Origin` request header. Every origin must be an
//! absolute `http` or `https` URL. Without any allowed origin no CORS headers are sent.
//!
//! # Example YAML
//! ```yaml
//! cors:
//!   allowed_origins:
//!     - "https://tarkov-database.com"
//!     - "http://localhost:3000"
//!   max_age_seconds: 86400
//! ```

use super::check_http_url;
use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_MAX_AGE_SECONDS: u64 = 86400;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
	/// Origins allowed to make cross-origin requests.
	#[serde(default)]
	pub allowed_origins: Vec<String>,

	/// How long browsers may cache preflight responses. Default: 86400 (1 day)
	#[serde(default)]
	pub max_age_seconds: Option<u64>,
}

impl CorsConfig {
	/// Parses a comma separated origin list as used by `CORS_ALLOWED_ORIGINS`.
	///
	/// Whitespace around origins is trimmed and empty entries are skipped.
	pub fn parse_origin_list(list: &str) -> Result<Vec<String>> {
		list
			.split(',')
			.map(str::trim)
			.filter(|origin| !origin.is_empty())
			.map(|origin| {
				check_http_url(origin).with_context(|| format!("invalid CORS origin '{origin}'"))?;
				Ok(origin.to_string())
			})
			.collect()
	}

	pub fn override_allowed_origins(&mut self, origins: &[String]) {
		if !origins.is_empty() {
			self.allowed_origins = origins.to_vec();
		}
	}

	pub fn max_age_seconds(&self) -> u64 {
		self.max_age_seconds.unwrap_or(DEFAULT_MAX_AGE_SECONDS)
	}

	pub fn validate(&self) -> Result<()> {
		for origin in &self.allowed_origins {
			check_http_url(origin).with_context(|| format!("invalid CORS origin '{origin}'"))?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parse_origin_list() {
		assert_eq!(
			CorsConfig::parse_origin_list(" https://a.example.org ,, http://localhost:3000,").unwrap(),
			vec!["https://a.example.org".to_string(), "http://localhost:3000".to_string()]
		);
		assert_eq!(CorsConfig::parse_origin_list("").unwrap(), Vec::<String>::new());
		assert_eq!(CorsConfig::parse_origin_list(" , ").unwrap(), Vec::<String>::new());
	}

	#[test]
	fn parse_origin_list_rejects_bad_origins() {
		let err = CorsConfig::parse_origin_list("https://ok.example.org,ftp://files.example.org").unwrap_err();
		assert_eq!(err.to_string(), "invalid CORS origin 'ftp://files.example.org'");
		assert!(CorsConfig::parse_origin_list("*").is_err());
	}

	#[test]
	fn defaults_and_validation() {
		let mut config = CorsConfig::default();
		assert!(config.allowed_origins.is_empty());
		assert_eq!(config.max_age_seconds(), 86400);
		assert!(config.validate().is_ok());

		config.override_allowed_origins(&[]);
		assert!(config.allowed_origins.is_empty());
		config.override_allowed_origins(&["example.org".to_string()]);
		assert!(config.validate().is_err());
	}
}
