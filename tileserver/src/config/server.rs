use super::check_http_url;
use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to. Default: 0.0.0.0
	pub ip: Option<String>,

	/// TCP port to bind to. Default: 8080
	pub port: Option<u16>,

	/// Public base URL used in TileJSON tile templates, e.g. `https://tiles.example.org`.
	/// Without it, the `Host` header of each request is used.
	pub host_url: Option<String>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip = ip.clone();
		}
	}

	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}

	pub fn override_optional_host_url(&mut self, host_url: &Option<String>) {
		if host_url.is_some() {
			self.host_url = host_url.clone();
		}
	}

	pub fn ip(&self) -> &str {
		self.ip.as_deref().unwrap_or(DEFAULT_IP)
	}

	pub fn port(&self) -> u16 {
		self.port.unwrap_or(DEFAULT_PORT)
	}

	pub fn validate(&self) -> Result<()> {
		if let Some(host_url) = &self.host_url {
			check_http_url(host_url).context("invalid host URL")?;
		}
		Ok(())
	}
}
