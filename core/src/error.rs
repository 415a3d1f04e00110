// passage/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassageError {
  #[error("Nothing to pass through: no payload was sent into the pipeline")]
  NoPayload,

  #[error("Cannot resolve stage '{stage}': no resolver configured")]
  NoResolver { stage: String },

  #[error("Stage not found: {name}")]
  NotFound { name: String },

  #[error("Failed to resolve stage '{name}'. Source: {source}")]
  Resolution {
    name: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Stage '{stage}' does not respond to method '{method}'")]
  MethodNotSupported { stage: String, method: String },

  #[error("Error in stage or endpoint. Source: {source}")]
  StageError {
    #[source]
    source: AnyhowError,
  },
}

// Lets anyhow-based stages use `?` when the pipeline error type is PassageError.
impl From<AnyhowError> for PassageError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a PassageError that was previously boxed into anyhow instead of nesting it.
    match err.downcast::<PassageError>() {
      Ok(passage_err) => passage_err,
      Err(other) => PassageError::StageError { source: other },
    }
  }
}

pub type PassageResult<T, E = PassageError> = std::result::Result<T, E>;
