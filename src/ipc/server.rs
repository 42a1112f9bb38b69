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

//! IPC Server implementation using named pipes

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::cache::AccountStore;
use crate::config::CoreConfig;
use crate::log_ipc;
use crate::models::{error_codes, IpcError, IpcMessage};

use super::handler::MessageHandler;

/// IPC Server that listens for connections from the UI
pub struct IpcServer {
    handler: Arc<MessageHandler>,
    socket_path: String,
    shutdown_tx: broadcast::Sender<()>,
}

impl IpcServer {
    /// Create a new IPC server
    pub fn new(config: CoreConfig, store: Option<AccountStore>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let socket_path = config.socket_path.clone();
        Self {
            handler: Arc::new(MessageHandler::new(config, store, shutdown_tx.clone())),
            socket_path,
            shutdown_tx,
        }
    }

    pub fn handler(&self) -> &Arc<MessageHandler> {
        &self.handler
    }

    /// Get a shutdown signal receiver
    pub fn shutdown_signal(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Accept clients until shutdown is signalled
    pub async fn run(&self) -> Result<()> {
        info!("Starting IPC server on {}", self.socket_path);

        #[cfg(windows)]
        {
            self.run_windows_pipe_server().await
        }

        #[cfg(not(windows))]
        {
            self.run_unix_socket_server().await
        }
    }

    #[cfg(windows)]
    async fn run_windows_pipe_server(&self) -> Result<()> {
        use tokio::net::windows::named_pipe::{PipeMode, ServerOptions};

        let mut shutdown = self.shutdown_signal();

        loop {
            // Create a new pipe instance
            let pipe = ServerOptions::new()
                .first_pipe_instance(false)
                .pipe_mode(PipeMode::Byte)
                .create(&self.socket_path)
                .context("Failed to create named pipe")?;

            info!("Waiting for client connection...");

            tokio::select! {
                result = pipe.connect() => {
                    match result {
                        Ok(()) => {
                            info!("Client connected");
                            self.spawn_client(pipe);
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    #[cfg(not(windows))]
    async fn run_unix_socket_server(&self) -> Result<()> {
        use tokio::net::UnixListener;

        let mut shutdown = self.shutdown_signal();

        // Remove existing socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)
            .with_context(|| format!("Failed to bind Unix socket {}", self.socket_path))?;

        info!("Listening on {}", self.socket_path);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            info!("Client connected");
                            self.spawn_client(stream);
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        // Cleanup
        let _ = std::fs::remove_file(&self.socket_path);

        Ok(())
    }

    fn spawn_client<S>(&self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let handler = self.handler.clone();
        let shutdown = self.shutdown_signal();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, handler, shutdown).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}

/// Serve one client: answer its requests in order and forward timeline
/// events as they are published.
async fn handle_client<S>(
    stream: S,
    handler: Arc<MessageHandler>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let mut events = handler.subscribe_events();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("Client disconnected");
                        break;
                    }
                    Err(e) => {
                        error!("Read error: {}", e);
                        break;
                    }
                };

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                debug!("Received message: {}", trimmed);

                let response = match serde_json::from_str::<IpcMessage>(trimmed) {
                    Ok(msg) => handler.handle_message(msg).await,
                    Err(e) => {
                        warn!("Failed to parse message: {}", e);
                        IpcMessage::response_err(
                            "unknown",
                            IpcError::new(
                                error_codes::PARSE_ERROR,
                                format!("Failed to parse message: {}", e),
                            ),
                        )
                    }
                };

                write_message(&mut writer, &response).await?;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let message = event.to_ipc();
                        log_ipc!(event, message.method.as_deref().unwrap_or("unknown"));
                        write_message(&mut writer, &message).await?;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Client missed {} timeline events", missed);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            _ = shutdown.recv() => {
                debug!("Closing client connection for shutdown");
                break;
            }
        }
    }

    Ok(())
}

async fn write_message<W>(writer: &mut W, message: &IpcMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(message)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    debug!("Sent message: {}", json);
    Ok(())
}
