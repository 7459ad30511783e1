// Error taxonomy for the client. Configuration problems are fatal at
// startup; everything in `DeskError` is recoverable by the flow layer,
// which renders it and falls back to an empty/failed result.

use thiserror::Error;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("credenciais ausentes: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Failures of a single request against the helpdesk API.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("erro de rede: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    /// The API answered with an `erro` field.
    #[error("{0}")]
    Api(String),

    #[error("resposta inválida: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("sessão não autenticada")]
    NotAuthenticated,

    #[error("sessão já autenticada")]
    AlreadyAuthenticated,

    #[error("registro sem o campo {column}")]
    MissingField { column: &'static str },
}

impl DeskError {
    /// Server-provided detail, when the failure carries a response body.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DeskError::Status { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }
}
