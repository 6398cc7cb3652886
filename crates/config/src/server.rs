//! HTTP server settings

use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origins; empty means same-origin only
    pub cors_origins: Vec<String>,
    /// Path to the knowledge base file (YAML or JSON)
    pub knowledge_path: Option<String>,
    /// Path for trained index artifacts
    pub index_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            knowledge_path: None,
            index_path: None,
        }
    }
}
