//! Server lifecycle: bind, serve in the background, shut down gracefully.

use super::{cors::build_cors_layer, handlers::AppState, routes::build_router};
use crate::config::Config;
use anyhow::{Context, Result};
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tileserver_container::TilesetRegistry;
use tokio::{sync::oneshot::Sender, task::JoinHandle};

pub struct TileServer {
	ip: String,
	port: u16,
	router: Router,
	exit_signal: Option<Sender<()>>,
	join: Option<JoinHandle<()>>,
	local_addr: Option<SocketAddr>,
}

impl TileServer {
	/// Builds the server for `registry`. `healthy` is reported by the index route.
	pub fn from_config(config: &Config, registry: TilesetRegistry, healthy: bool) -> Result<TileServer> {
		let state = AppState {
			registry: Arc::new(registry),
			host_url: config.server.host_url.as_deref().map(Arc::from),
			healthy,
		};
		let router = build_router(state).layer(build_cors_layer(&config.cors)?);

		Ok(TileServer {
			ip: config.server.ip().to_string(),
			port: config.server.port(),
			router,
			exit_signal: None,
			join: None,
			local_addr: None,
		})
	}

	/// Binds the listener and serves in a background task. Port 0 picks a free port.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() {
			self.stop().await;
		}

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = tokio::net::TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding to {addr}"))?;
		let local_addr = listener.local_addr()?;
		log::info!("server starts listening on {local_addr}");

		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		let router = self.router.clone();
		let join = tokio::spawn(async move {
			let result = axum::serve(listener, router)
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await;
			if let Err(e) = result {
				log::error!("server error: {e}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(join);
		self.local_addr = Some(local_addr);
		Ok(())
	}

	/// Signals shutdown and waits for open connections to finish.
	pub async fn stop(&mut self) {
		let Some(tx) = self.exit_signal.take() else {
			return;
		};

		log::info!("stopping server");
		let _ = tx.send(());
		if let Some(join) = self.join.take() {
			join.await.unwrap_or_else(|e| log::error!("server task failed: {e}"));
		}
		self.local_addr = None;
	}

	/// The bound address while the server is running.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}
}
