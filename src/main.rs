// Hiveway - A Mastodon client
// Copyright (C) 2025 Hiveway Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Hiveway Core - presentation core for the Hiveway Mastodon client
//!
//! This binary runs as a background process. The UI talks to it over a
//! Unix socket (or named pipe on Windows) using a JSON-line IPC protocol
//! and gets back rendered rows, action menus and screens to open.

mod actions;
mod api;
mod cache;
mod config;
mod error;
mod ipc;
mod logger;
mod media;
mod models;
mod navigation;
mod session;
mod timeline;
mod view;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use cache::AccountStore;
use config::CoreConfig;
use ipc::IpcServer;
use logger::{Logger, LoggerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging system
    Logger::init_with_config(LoggerConfig::default())?;

    info!("Hiveway Core starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = CoreConfig::load().context("Failed to load configuration")?;

    let store = match AccountStore::open(&config.database_path).await {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Account store unavailable, sessions will not persist: {}", e);
            None
        }
    };

    let server = Arc::new(IpcServer::new(config, store));

    if let Err(e) = server.handler().load_settings().await {
        warn!("Could not load stored settings: {}", e);
    }

    if let Err(e) = server.handler().restore_session().await {
        warn!("Could not restore the previous session: {}", e);
    }

    {
        let server = server.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                server.shutdown();
            }
        });
    }

    match server.run().await {
        Ok(_) => {
            info!("Hiveway Core shutting down gracefully");
        }
        Err(e) => {
            error!("Fatal error in IPC server: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
