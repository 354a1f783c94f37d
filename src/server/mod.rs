//! TCP server lifecycle.
//!
//! [`Server::start`] binds the listener and spawns an accept task; every
//! accepted connection gets its own task running a [`ConnectionHandler`].
//! [`Server::stop`] stops the accept task and waits for the listening socket
//! to close.
//!
//! Connections that are already open are not cancelled by `stop()`: they
//! keep being served until the peer disconnects, a fatal error occurs, or
//! the runtime itself shuts down.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::server::ServerConfig;
use crate::error::transport::TransportError;
use crate::protocol::jsonrpc::{
    Arguments, HandlerResult, MethodHandler, MethodRegistry, RequestProcessor,
};

pub mod connection;

pub use connection::{ConnectionHandler, Termination};

/// Pause after a failed `accept()` so persistent errors (e.g. out of file
/// descriptors) do not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Handles for a started server.
#[derive(Debug)]
struct RunningServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// A line-delimited JSON-RPC 2.0 server.
///
/// Methods are registered before [`Server::start`]; while the server is
/// running the registry is shared read-only by all connections and further
/// registration is refused.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    registry: Arc<MethodRegistry>,
    running: Option<RunningServer>,
}

impl Server {
    /// Creates a server with an empty registry.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(config, MethodRegistry::new())
    }

    /// Creates a server that will dispatch against `registry`.
    pub fn with_registry(config: ServerConfig, registry: MethodRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            running: None,
        }
    }

    /// The server's configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The methods this server dispatches to.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Returns true between a successful `start()` and the matching `stop()`.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Address the listener is bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    /// Registers a method handler. Fails once the server is running.
    pub fn register<H, I, S>(
        &mut self,
        name: impl Into<String>,
        handler: H,
        param_names: I,
    ) -> Result<(), TransportError>
    where
        H: MethodHandler + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry_mut()?.register(name, handler, param_names);
        Ok(())
    }

    /// Registers a synchronous closure. Fails once the server is running.
    pub fn register_fn<F, I, S>(
        &mut self,
        name: impl Into<String>,
        param_names: I,
        func: F,
    ) -> Result<(), TransportError>
    where
        F: Fn(Arguments) -> HandlerResult + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry_mut()?.register_fn(name, param_names, func);
        Ok(())
    }

    /// Registers a closure returning a future. Fails once the server is running.
    pub fn register_async<F, Fut, I, S>(
        &mut self,
        name: impl Into<String>,
        param_names: I,
        func: F,
    ) -> Result<(), TransportError>
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry_mut()?.register_async(name, param_names, func);
        Ok(())
    }

    fn registry_mut(&mut self) -> Result<&mut MethodRegistry, TransportError> {
        if self.running.is_some() {
            return Err(TransportError::AlreadyRunning);
        }
        // Connections left over from an earlier run keep their own snapshot.
        Ok(Arc::make_mut(&mut self.registry))
    }

    /// Binds the listener and starts accepting connections.
    ///
    /// Returns the bound address. Calling this on a running server logs a
    /// warning and returns the existing address without binding again.
    pub async fn start(&mut self) -> Result<SocketAddr, TransportError> {
        if let Some(running) = &self.running {
            warn!(address = %running.local_addr, "Called start() on server already started");
            return Ok(running.local_addr);
        }

        let addr = self.config.address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TransportError::Bind { addr, source })?;

        let handler = Arc::new(ConnectionHandler::new(
            RequestProcessor::new(Arc::clone(&self.registry)),
            self.config.max_message_size,
        ));
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(
            accept_loop(listener, handler, shutdown_rx)
                .instrument(info_span!("server", name = %self.config.name)),
        );

        info!(
            name = %self.config.name,
            address = %local_addr,
            methods = self.registry.len(),
            "Started server; listening"
        );
        self.running = Some(RunningServer {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Stops accepting connections and waits for the listener to close.
    ///
    /// Calling this on a stopped server logs a warning and returns.
    pub async fn stop(&mut self) -> Result<(), TransportError> {
        let Some(running) = self.running.take() else {
            warn!("Called stop() on server that is not running");
            return Ok(());
        };

        info!(address = %running.local_addr, "Stopping the server");
        // The accept task may already be gone; the join below still reports how it ended.
        let _ = running.shutdown.send(());
        running
            .task
            .await
            .map_err(|e| TransportError::ListenerTask(e.to_string()))?;
        info!("Server stopped");
        Ok(())
    }
}

/// Accepts connections until `shutdown` fires or its sender is dropped.
async fn accept_loop(
    listener: TcpListener,
    handler: Arc<ConnectionHandler>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                debug!("Accept loop shutting down");
                break;
            }

            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };

                info!(peer = %peer, "Accepted client connection");
                let handler = Arc::clone(&handler);
                tokio::spawn(
                    async move {
                        // Outcome is logged by the handler itself.
                        let _ = handler.run(stream).await;
                    }
                    .instrument(info_span!("connection", peer = %peer)),
                );
            }
        }
    }
}
