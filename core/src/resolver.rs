// passage/src/resolver.rs

//! Defines the `Resolver` capability a pipeline uses to turn symbolic stage
//! names into live stage instances, and `FnResolver`, a closure-backed resolver.

use crate::core::stage::Stage;
use std::marker::PhantomData;
use std::sync::Arc;

/// Maps a stage name to an invocable instance.
///
/// Called once per named stage on every `Pipeline::run`; instances are never cached
/// by the pipeline. Errors are returned to the `run` caller as-is.
pub trait Resolver<T, Err>: Send + Sync {
  fn resolve(&self, name: &str) -> Result<Arc<dyn Stage<T, Err>>, Err>;
}

impl<T, Err, R> Resolver<T, Err> for Arc<R>
where
  R: Resolver<T, Err> + ?Sized,
{
  fn resolve(&self, name: &str) -> Result<Arc<dyn Stage<T, Err>>, Err> {
    (**self).resolve(name)
  }
}

/// Resolves names by invoking a user-supplied function.
pub struct FnResolver<T, Err, F>
where
  F: Fn(&str) -> Result<Arc<dyn Stage<T, Err>>, Err> + Send + Sync,
{
  resolve_fn: F,
  _phantom: PhantomData<fn() -> (T, Err)>,
}

impl<T, Err, F> FnResolver<T, Err, F>
where
  F: Fn(&str) -> Result<Arc<dyn Stage<T, Err>>, Err> + Send + Sync,
{
  pub fn new(resolve_fn: F) -> Self {
    Self {
      resolve_fn,
      _phantom: PhantomData,
    }
  }
}

impl<T, Err, F> Resolver<T, Err> for FnResolver<T, Err, F>
where
  F: Fn(&str) -> Result<Arc<dyn Stage<T, Err>>, Err> + Send + Sync,
{
  fn resolve(&self, name: &str) -> Result<Arc<dyn Stage<T, Err>>, Err> {
    (self.resolve_fn)(name)
  }
}
