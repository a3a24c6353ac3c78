// src/infra/errors.rs — Error types for auditpop

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditPopError {
    // Config
    #[error("Config file '{path}' is not valid TOML: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Unknown platform '{0}' (expected youtube, spotify, or general)")]
    UnknownPlatform(String),

    // Terminal
    #[error("Terminal setup failed: {0}")]
    Terminal(String),

    // Report output
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
