//! HTTP server exposing a [`LoggingController`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServiceConfig;
use crate::controller::LoggingController;
use crate::error::{ServiceError, ServiceResult};
use crate::routes::create_router;

/// HTTP front end of the logging service.
///
/// Decodes requests, calls the shared controller and encodes its answers.
/// The controller is shared, so a [`crate::LoggingController`] held by a
/// direct client in the same process sees the same data.
#[derive(Debug, Clone)]
pub struct LoggingHttpService {
    controller: Arc<LoggingController>,
    config: ServiceConfig,
}

impl LoggingHttpService {
    /// Create a new service over the given controller.
    #[must_use]
    pub fn new(config: ServiceConfig, controller: Arc<LoggingController>) -> Self {
        Self { controller, config }
    }

    /// Get the shared controller.
    #[must_use]
    pub fn controller(&self) -> Arc<LoggingController> {
        self.controller.clone()
    }

    /// Get the service configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Bind the configured address and serve until a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server stops abnormally.
    pub async fn serve(&self) -> ServiceResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Bind the configured address and serve until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server stops abnormally.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> ServiceResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::BindFailed(addr, e))?;

        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server stops abnormally.
    pub async fn serve_listener<F>(&self, listener: TcpListener, shutdown: F) -> ServiceResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr().map_err(ServiceError::Serve)?;
        info!(addr = %local, "logging service listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServiceError::Serve)?;

        info!("logging service shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.controller.clone())
    }
}

/// Bind `addr` and return the listener together with its resolved address.
///
/// Binding port 0 picks a free port; the returned address carries it.
///
/// # Errors
///
/// Returns [`ServiceError::BindFailed`] if the address cannot be bound.
pub async fn bind(addr: SocketAddr) -> ServiceResult<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::BindFailed(addr, e))?;
    let local = listener
        .local_addr()
        .map_err(|e| ServiceError::BindFailed(addr, e))?;
    Ok((listener, local))
}
