use thiserror::Error;

/// Anything that can abort the intake pipeline. The wire contract collapses
/// all of these into one `{"result": "error", "message": ...}` payload, so
/// the variants only exist for logging and tests.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("mail dispatch error: {0}")]
    Mail(String),
}
