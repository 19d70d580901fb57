//! Configuration management for Switchboard
//!
//! Supports environment variables, config files, and runtime overrides.
//! Models are interchangeable via settings.
//!
//! Config file location: ~/.config/switchboard/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{EngineError, Result};

/// Main configuration for Switchboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model gateway configuration
    pub gateway: GatewayConfig,
    /// Model configuration
    pub models: ModelConfig,
    /// Orchestration engine configuration
    pub engine: EngineConfig,
}

/// Model gateway (Ollama server) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Request timeout in seconds (completions can take minutes)
    pub timeout_secs: u64,
}

/// Model configuration - interchangeable models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used for supervisor routing (structured classification)
    pub router: String,
    /// Model used by worker agents for tool calling and replies
    pub worker: String,
}

/// Orchestration engine behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum supervisor -> worker hops per user turn
    /// Default: 6
    pub max_route_hops: usize,
    /// Maximum tool-loop iterations inside one worker run
    /// Default: 8
    pub max_tool_iterations: usize,
    /// Maximum conversation history length per thread (storage limit)
    /// Default: 1000
    pub max_history: usize,
    /// Whether to show debug output
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_route_hops: 6,
            max_tool_iterations: 8,
            max_history: 1000,
            debug: env::var("SWITCHBOARD_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            models: ModelConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            connect_timeout_secs: 10,
            timeout_secs: 180,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            router: env::var("SWITCHBOARD_ROUTER_MODEL")
                .unwrap_or_else(|_| "qwen3:8b".to_string()),
            worker: env::var("SWITCHBOARD_WORKER_MODEL")
                .unwrap_or_else(|_| "qwen3:8b".to_string()),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switchboard")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(EngineError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| EngineError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| EngineError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| EngineError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| EngineError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full gateway API URL
    pub fn gateway_url(&self) -> String {
        format!("http://{}:{}", self.gateway.host, self.gateway.port)
    }

    /// Update the router model
    pub fn set_router(&mut self, model: impl Into<String>) {
        self.models.router = model.into();
    }

    /// Update the worker model
    pub fn set_worker(&mut self, model: impl Into<String>) {
        self.models.worker = model.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gateway.port, 11434);
        assert_eq!(config.engine.max_route_hops, 6);
        assert_eq!(config.engine.max_tool_iterations, 8);
        assert_eq!(config.engine.max_history, 1000);
    }

    #[test]
    fn test_gateway_url() {
        let config = Config::default();
        assert_eq!(config.gateway_url(), "http://localhost:11434");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("router"));
        assert!(toml_str.contains("max_route_hops"));
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("switchboard"));
    }
}
