//! Server state and serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use parkiq_core::{FusionConfig, FusionEngine};
use parkiq_models::ModelRegistry;

use crate::runtime::HttpRuntimeConfig;
use crate::runtime::orchestrator::AnalysisOrchestrator;

/// HTTP server state shared by every handler.
///
/// All fields are read-only after construction: the registry and fusion
/// engine are loaded once and shared immutably across concurrent requests.
#[derive(Clone)]
pub struct AnalysisRuntime {
    /// Loaded modality models.
    pub registry: Arc<ModelRegistry>,
    /// The per-request analysis pipeline.
    pub orchestrator: Arc<AnalysisOrchestrator>,
    /// Runtime configuration the router was built from.
    pub config: HttpRuntimeConfig,
}

impl AnalysisRuntime {
    /// Create a runtime with default fusion and HTTP configuration.
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_config(
            registry,
            FusionConfig::default(),
            HttpRuntimeConfig::default(),
        )
    }

    /// Create a runtime with explicit configuration.
    pub fn with_config(
        registry: ModelRegistry,
        fusion_config: FusionConfig,
        config: HttpRuntimeConfig,
    ) -> Self {
        let registry = Arc::new(registry);
        let fusion = Arc::new(FusionEngine::new(fusion_config));
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::clone(&registry),
            Arc::clone(&fusion),
            config.modality_timeout(),
        ));
        Self {
            registry,
            orchestrator,
            config,
        }
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self, addr: SocketAddr) -> std::io::Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "parkiq analysis service listening");
        axum::serve(listener, router).await
    }
}
