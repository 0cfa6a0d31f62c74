use anyhow::{Result, bail};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref RE_ABSOLUTE_URL: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://(.*)$").unwrap();
	static ref RE_HOST_AND_PATH: Regex = Regex::new(r"^[^\s/?#]+([/?#]\S*)?$").unwrap();
}

/// Checks that `value` is an absolute `http` or `https` URL with a host.
///
/// Used for the public host URL and for CORS origins.
pub fn check_http_url(value: &str) -> Result<()> {
	let Some(captures) = RE_ABSOLUTE_URL.captures(value) else {
		bail!("'{value}' is not an absolute URL");
	};

	let scheme = captures[1].to_ascii_lowercase();
	if scheme != "http" && scheme != "https" {
		bail!("invalid URL scheme '{scheme}' in '{value}'");
	}

	if !RE_HOST_AND_PATH.is_match(&captures[2]) {
		bail!("'{value}' has no valid host");
	}

	Ok(())
}
