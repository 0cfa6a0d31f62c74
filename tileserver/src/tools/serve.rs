use anyhow::{Context, Result};
use std::path::PathBuf;
use tileserver::{config::Config, container::TilesetRegistry, server::TileServer};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Directory containing the *.mbtiles archives to serve.
	/// Each archive is served at "/v1/$id", where $id is the file name without ".mbtiles":
	///    e.g. ".../customs.mbtiles" will be served at url "/v1/customs"
	/// Default: $TILE_DIR or ./tilesets
	#[arg(verbatim_doc_comment)]
	pub directory: Option<PathBuf>,

	/// Path to a configuration file (YAML format) to configure the server, CORS and tilesets.
	/// Command line arguments will override configuration file settings,
	/// environment variables only fill in what is still unset.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Public base URL used in TileJSON manifests, e.g. "https://tiles.example.org".
	/// Default: $HOST_URL or the Host header of each request
	#[arg(long, value_name = "URL", display_order = 1)]
	pub host_url: Option<String>,

	/// Origins allowed to make cross-origin requests, comma separated.
	/// Default: $CORS_ALLOWED_ORIGINS
	#[arg(long = "cors", value_name = "ORIGINS", value_delimiter = ',', display_order = 1)]
	pub cors_origins: Vec<String>,

	/// Number of archives opened at the same time during startup. Default: number of CPUs
	#[arg(long, display_order = 2)]
	pub concurrency: Option<usize>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

/// Merges configuration file, arguments and environment, in this order of precedence:
/// arguments, file, environment.
pub fn build_config<F>(arguments: &Subcommand, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let mut config = match &arguments.config {
		Some(path) => Config::from_path(path)?,
		None => Config::default(),
	};

	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);
	config.server.override_optional_host_url(&arguments.host_url);
	config.cors.override_allowed_origins(&arguments.cors_origins);
	config.tilesets.override_optional_directory(&arguments.directory);
	config.tilesets.override_optional_concurrency(&arguments.concurrency);

	config.apply_env(lookup)?;
	config.validate()?;
	Ok(config)
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = build_config(arguments, |key| std::env::var(key).ok())?;
	log::info!("starting up tileserver");

	let directory = config.tilesets.directory();
	let (registry, healthy) = match TilesetRegistry::load_dir(directory, config.tilesets.concurrency()).await {
		Ok(registry) => (registry, true),
		Err(err) => {
			log::error!("Tileset loading error: {err:#}");
			(TilesetRegistry::default(), false)
		}
	};

	let mut server = TileServer::from_config(&config, registry, healthy)?;
	server.start().await?;

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
	}

	server.stop().await;
	Ok(())
}
