//! Error types shared by every module of the crate.
//!
//! Contract violations (asking an empty [`Optional`] for its value, running a
//! [`Promise`] twice, reading past the end of a cursor) are reported
//! immediately through [`Result`]. Failures raised by user supplied closures
//! while a promise settles are never returned from `run`; they are wrapped
//! into [`Error::Rejected`] or [`Error::Panicked`] and handed to the rejected
//! consumers instead.
//!
//! [`Optional`]: crate::optional::Optional
//! [`Promise`]: crate::promise::Promise

use thiserror::Error;

/// A type-erased error produced by a user supplied closure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input to a constructor or factory.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// The requested value does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// The operation is not allowed in the current state.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// A supplier returned an error.
  #[error("rejected: {0}")]
  Rejected(#[source] BoxError),

  /// A user supplied closure panicked.
  #[error("panicked: {0}")]
  Panicked(String),

  /// At least one chunk of a parallel batch failed. Only the first failure
  /// is carried.
  #[error("{failed} of {total} batches failed: {source}")]
  Batch {
    failed: usize,
    total: usize,
    #[source]
    source: Box<Error>,
  },

  /// The worker pool could not be created.
  #[cfg(feature = "parallel")]
  #[error("failed to create worker pool: {0}")]
  WorkerPool(#[from] std::io::Error),

  /// A task could not be handed to the worker pool.
  #[cfg(feature = "parallel")]
  #[error("failed to spawn batch: {0}")]
  Spawn(#[from] futures::task::SpawnError),
}

impl Error {
  pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
    Error::InvalidArgument(msg.into())
  }

  pub(crate) fn not_found(msg: impl Into<String>) -> Self { Error::NotFound(msg.into()) }

  pub(crate) fn invalid_state(msg: impl Into<String>) -> Self { Error::InvalidState(msg.into()) }

  /// Wrap any error returned by a supplier.
  pub fn rejected(err: impl Into<BoxError>) -> Self { Error::Rejected(err.into()) }

  pub fn is_invalid_argument(&self) -> bool { matches!(self, Error::InvalidArgument(_)) }

  pub fn is_not_found(&self) -> bool { matches!(self, Error::NotFound(_)) }

  pub fn is_invalid_state(&self) -> bool { matches!(self, Error::InvalidState(_)) }

  pub fn is_rejected(&self) -> bool { matches!(self, Error::Rejected(_)) }

  pub fn is_panicked(&self) -> bool { matches!(self, Error::Panicked(_)) }
}
