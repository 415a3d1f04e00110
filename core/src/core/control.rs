// passage/src/core/control.rs

//! Defines the result type stages return and the `Next` handle they use to
//! continue the chain.

use crate::pipeline::compile::Continuation;
use std::sync::Arc;

/// Outcome of a stage, an endpoint-terminated chain, or a whole pipeline run.
///
/// `Ok(Some(value))` carries a payload, `Ok(None)` is the absent result produced
/// when a stage forwards (or not) but hands nothing back. Both are successful runs.
pub type StageResult<T, Err> = Result<Option<T>, Err>;

/// Terminal callable invoked with the payload that reaches the end of the chain.
pub type Endpoint<T, Err> = Arc<dyn Fn(T) -> Result<T, Err> + Send + Sync>;

/// Handle to "the rest of the chain" given to each stage.
///
/// Running it invokes the next stage (or the endpoint, if this stage is the last one)
/// and returns whatever the remainder of the chain produced. It can be run any number
/// of times, including not at all.
pub struct Next<'a, T, Err> {
  continuation: &'a Continuation<T, Err>,
}

impl<'a, T, Err> Next<'a, T, Err> {
  pub(crate) fn new(continuation: &'a Continuation<T, Err>) -> Self {
    Self { continuation }
  }

  /// Forwards `payload` to the remainder of the chain.
  pub fn run(&self, payload: T) -> StageResult<T, Err> {
    self.continuation.call(payload)
  }

  /// Returns `true` if the remainder of the chain is only the terminal endpoint
  /// (or the identity passthrough).
  pub fn is_terminal(&self) -> bool {
    self.continuation.is_terminal()
  }
}

impl<T, Err> Clone for Next<'_, T, Err> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T, Err> Copy for Next<'_, T, Err> {}

impl<T, Err> std::fmt::Debug for Next<'_, T, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Next")
      .field("is_terminal", &self.continuation.is_terminal())
      .finish()
  }
}
