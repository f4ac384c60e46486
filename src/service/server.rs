//! Generation service server lifecycle

use super::handler::GenerationState;
use super::provider::{ChatCompletionsProvider, CompletionProvider};
use crate::api::build_app;
use crate::config::LearnConfig;
use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Server lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not started
    Stopped,
    /// Accepting requests
    Running,
    /// Draining connections
    ShuttingDown,
}

struct Running {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

/// HTTP server hosting the generation endpoint
pub struct ServiceServer {
    config: LearnConfig,
    provider: Arc<dyn CompletionProvider>,
    state: Arc<RwLock<ServerState>>,
    running: Arc<RwLock<Option<Running>>>,
}

impl ServiceServer {
    /// Create a server with an explicit provider
    pub fn new(config: LearnConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config,
            provider,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            running: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LearnConfig {
        &self.config
    }

    /// Get current state
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// Address the server is bound to, while running
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.read().await.as_ref().map(|r| r.addr)
    }

    /// Bind the listener and start serving
    pub async fn start(&self) -> Result<SocketAddr> {
        let mut state = self.state.write().await;
        if *state != ServerState::Stopped {
            return Err(Error::Config("Server already running".to_string()));
        }

        let bind = format!("{}:{}", self.config.service.host, self.config.service.port);
        let listener = tokio::net::TcpListener::bind(&bind).await?;
        let addr = listener.local_addr()?;

        let app = build_app(
            GenerationState::new(self.provider.clone()),
            &self.config.service.cors_origins,
        );
        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        *self.running.write().await = Some(Running {
            addr,
            shutdown,
            task,
        });
        *state = ServerState::Running;

        tracing::info!(%addr, provider = self.provider.name(), "Generation service listening");
        Ok(addr)
    }

    /// Stop serving and wait for in-flight requests to finish
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state != ServerState::Running {
            return Ok(());
        }
        *state = ServerState::ShuttingDown;

        if let Some(running) = self.running.write().await.take() {
            running.shutdown.cancel();
            match running.task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "Server exited with error"),
                Err(e) => tracing::error!(error = %e, "Server task panicked"),
            }
        }

        *state = ServerState::Stopped;
        tracing::info!("Generation service stopped");
        Ok(())
    }
}

/// Builder for [`ServiceServer`]
pub struct ServerBuilder {
    config: LearnConfig,
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl ServerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LearnConfig::default(),
            provider: None,
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: LearnConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.service.host = host.into();
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.config.service.port = port;
        self
    }

    /// Use a specific completion provider
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the server, defaulting to the configured chat-completions provider
    pub fn build(self) -> Result<ServiceServer> {
        let provider = match self.provider {
            Some(p) => p,
            None => Arc::new(ChatCompletionsProvider::new(&self.config.provider)?),
        };
        Ok(ServiceServer::new(self.config, provider))
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::generation::{ArtifactKind, GenerationClient};
    use crate::service::handler::tests::StaticProvider;
    use crate::service::GENERATE_PATH;

    fn build_server() -> ServiceServer {
        ServerBuilder::new()
            .host("127.0.0.1")
            .port(0)
            .provider(StaticProvider::new(|| {
                Ok(r#"Here you go: {"concepts":["A","B"]}"#.to_string())
            }))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = build_server();
        assert_eq!(server.state().await, ServerState::Stopped);
        assert_eq!(server.config().service.port, 0);
        assert!(server.local_addr().await.is_none());
    }

    #[tokio::test]
    async fn test_server_lifecycle() {
        let server = build_server();

        let addr = server.start().await.unwrap();
        assert_eq!(server.state().await, ServerState::Running);
        assert_eq!(server.local_addr().await, Some(addr));
        assert!(server.start().await.is_err());

        server.stop().await.unwrap();
        assert_eq!(server.state().await, ServerState::Stopped);
        assert!(server.local_addr().await.is_none());
    }

    #[tokio::test]
    async fn test_client_against_running_server() {
        let server = build_server();
        let addr = server.start().await.unwrap();

        let client = GenerationClient::new(&ClientConfig {
            endpoint: format!("http://{}{}", addr, GENERATE_PATH),
            timeout_secs: 5,
            default_count: 5,
        })
        .unwrap();

        let result = client
            .generate(&"a".repeat(60), ArtifactKind::Memory)
            .await
            .unwrap();
        assert_eq!(result.concepts(), ["A", "B"]);
        assert!(result.questions.is_none());

        server.stop().await.unwrap();
    }
}
