//! Configuration for Kube MCP Server

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Environment variable naming the kubeconfig to use
pub const KUBECONFIG_ENV: &str = "KUBE_MCP_KUBECONFIG";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "kube_mcp=info,kube_ops=info";

/// Command line of the `kube-mcp` binary
#[derive(Debug, Clone, Parser)]
#[command(name = "kube-mcp", version, about = "Kubernetes tools over the Model Context Protocol (stdio)")]
pub struct Cli {
    /// Path to the kubeconfig (defaults to ~/.kube/config)
    #[arg(long, env = KUBECONFIG_ENV)]
    pub kubeconfig: Option<PathBuf>,

    /// Log filter directives, e.g. "kube_mcp=debug"
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Kubeconfig used both to build the client and to look up the cluster name
    pub kubeconfig: PathBuf,

    /// tracing-subscriber filter directives
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl ServerConfig {
    /// Resolve flags and environment, falling back to `home/.kube/config`
    pub fn resolve(cli: Cli, home: Option<PathBuf>) -> Result<Self, String> {
        let kubeconfig = match cli.kubeconfig {
            Some(path) => path,
            None => home
                .map(|home| home.join(".kube").join("config"))
                .ok_or_else(|| "could not determine home directory; pass --kubeconfig".to_string())?,
        };

        Ok(Self {
            kubeconfig,
            log_filter: cli.log_filter.unwrap_or_else(default_log_filter),
        })
    }

    /// Resolve from the process's arguments, environment and home directory
    pub fn from_env() -> Result<Self, String> {
        Self::resolve(Cli::parse(), dirs::home_dir())
    }
}
