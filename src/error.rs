use thiserror::Error;

/// A JSON-valued command line option that could not be used.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid JSON was used for option {option}.  Received: {raw}")]
    InvalidJson {
        option: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Option {option} expects a JSON object.  Received: {raw}")]
    NotAnObject { option: &'static str, raw: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DsnError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("missing public key")]
    MissingPublicKey,

    #[error("missing host")]
    MissingHost,

    #[error("missing project id")]
    MissingProjectId,
}

/// Reasons the wrapper refuses to start.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("invalid Sentry DSN: {0}")]
    Dsn(#[from] DsnError),

    #[error("Neither --dsn option or SENTRY_DSN env variable defined")]
    MissingDsn,

    #[error("Command to execute is not defined")]
    MissingCommand,

    #[error("chunk_max_chars must be a positive integer")]
    ZeroChunkSize,
}
