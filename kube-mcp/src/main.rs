//! Kube MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio) against ~/.kube/config
//! kube-mcp
//!
//! # With an explicit kubeconfig
//! KUBE_MCP_KUBECONFIG=./admin.conf kube-mcp
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use kube_mcp::{McpServer, ServerConfig, ToolBridge};
use kube_ops::KubeClusterOps;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kube-mcp: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing (to stderr so it doesn't interfere with stdio MCP)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("kube-mcp: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting Kube MCP Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using kubeconfig {}", config.kubeconfig.display());

    let ops = KubeClusterOps::connect(&config.kubeconfig)
        .await
        .map_err(|e| format!("failed to create Kubernetes client: {}", e))?;
    let bridge = ToolBridge::new(Arc::new(ops), config.kubeconfig.clone());
    let server = McpServer::new(bridge);

    tracing::info!("MCP server ready, listening on stdio");
    server.run_stdio().await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}
