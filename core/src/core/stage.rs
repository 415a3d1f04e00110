// passage/src/core/stage.rs

//! Defines the `Stage<T, Err>` capability every pipe in a pipeline implements,
//! plus `FnStage`, an adapter turning a closure into a stage.

use crate::core::control::{Next, StageResult};

/// Method name invoked on every stage unless the pipeline is configured with `via`.
pub const DEFAULT_METHOD: &str = "handle";

/// A processing unit in a pipeline.
///
/// A stage receives the current payload, a `Next` handle representing the rest of
/// the chain (remaining stages plus the endpoint), and the static arguments bound to
/// it in the pipeline definition. It may:
///  - call `next.run(payload)` and return (possibly wrapping) what comes back,
///  - return without calling `next`, which short-circuits everything after it,
///  - call `next` and return `Ok(None)`, which makes the chain result absent.
///
/// Returning `Ok(None)` is never an error; it is the "no value" outcome.
pub trait Stage<T, Err>: Send + Sync {
  /// The default entry point, used when the pipeline runs with `DEFAULT_METHOD`.
  fn handle(&self, payload: T, next: Next<'_, T, Err>, args: &[String]) -> StageResult<T, Err>;

  /// Whether this stage can be invoked through `method`.
  ///
  /// Checked while the pipeline compiles, before any stage executes. Stages that
  /// expose additional entry points override this together with `dispatch`.
  fn responds_to(&self, method: &str) -> bool {
    method == DEFAULT_METHOD
  }

  /// Invokes the entry point named `method`.
  ///
  /// Only called with a `method` for which `responds_to` returned `true`.
  fn dispatch(&self, _method: &str, payload: T, next: Next<'_, T, Err>, args: &[String]) -> StageResult<T, Err> {
    self.handle(payload, next, args)
  }

  /// Human readable name used in tracing spans and error messages.
  fn name(&self) -> &str {
    std::any::type_name::<Self>()
  }
}

type StageFn<T, Err> = Box<dyn Fn(T, Next<'_, T, Err>, &[String]) -> StageResult<T, Err> + Send + Sync>;

/// A stage backed by a closure. Responds to every method name.
pub struct FnStage<T, Err> {
  label: String,
  f: StageFn<T, Err>,
}

impl<T, Err> FnStage<T, Err> {
  pub fn new<F>(label: impl Into<String>, f: F) -> Self
  where
    F: Fn(T, Next<'_, T, Err>, &[String]) -> StageResult<T, Err> + Send + Sync + 'static,
  {
    Self {
      label: label.into(),
      f: Box::new(f),
    }
  }
}

impl<T, Err> Stage<T, Err> for FnStage<T, Err> {
  fn handle(&self, payload: T, next: Next<'_, T, Err>, args: &[String]) -> StageResult<T, Err> {
    (self.f)(payload, next, args)
  }

  fn responds_to(&self, _method: &str) -> bool {
    true
  }

  fn name(&self) -> &str {
    &self.label
  }
}

impl<T, Err> std::fmt::Debug for FnStage<T, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FnStage").field("label", &self.label).finish()
  }
}
