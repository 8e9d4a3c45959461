use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("tool provider '{provider}' is not registered")]
    NotRegistered { provider: String },
    #[error("tool provider '{provider}' transport error: {message}")]
    Transport { provider: String, message: String },
    #[error("tool provider '{provider}' returned invalid payload: {source}")]
    InvalidPayload {
        provider: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tool provider '{provider}' reported error {code}: {message}")]
    Remote {
        provider: String,
        code: i64,
        message: String,
    },
    #[error("tool '{tool}' rejected its arguments: {message}")]
    InvalidArguments { tool: String, message: String },
}
