// passage/src/pipeline/definition.rs

//! Contains the `Pipeline<T, Err>` struct definition and its builder methods.
//! Builders only record configuration; nothing executes until `run`.

use crate::core::control::Endpoint;
use crate::core::stage::DEFAULT_METHOD;
use crate::core::step::StageDef;
use crate::error::PassageError;
use crate::resolver::Resolver;
use std::sync::Arc;

/// The core Pipeline type, generic over the payload type `T` and the error type
/// `Err` its stages, endpoint and resolver return.
///
/// `Err` must be `From<PassageError>` so framework failures (no payload, no
/// resolver, unsupported method) can be reported through the same error type
/// as the user's own failures.
pub struct Pipeline<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  /// The value sent through the stages. `None` until `send` is called.
  pub(crate) payload: Option<T>,

  /// Ordered stage list; index 0 runs first and wraps everything after it.
  pub(crate) stages: Vec<StageDef<T, Err>>,

  /// Method invoked on every stage.
  pub(crate) method: String,

  pub(crate) endpoint: Option<Endpoint<T, Err>>,

  /// Only consulted for named stages.
  pub(crate) resolver: Option<Arc<dyn Resolver<T, Err>>>,
}

impl<T, Err> Pipeline<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  /// Creates a pipeline without a resolver. Only direct stage instances can run.
  pub fn new() -> Self {
    Self {
      payload: None,
      stages: Vec::new(),
      method: DEFAULT_METHOD.to_string(),
      endpoint: None,
      resolver: None,
    }
  }

  /// Creates a pipeline that resolves named stages through `resolver`.
  pub fn with_resolver(resolver: impl Resolver<T, Err> + 'static) -> Self {
    let mut pipeline = Self::new();
    pipeline.resolver(resolver);
    pipeline
  }

  /// Sets the resolver used for named stages.
  pub fn resolver(&mut self, resolver: impl Resolver<T, Err> + 'static) -> &mut Self {
    self.resolver = Some(Arc::new(resolver));
    self
  }

  /// Sets the payload sent through the pipeline.
  pub fn send(&mut self, payload: T) -> &mut Self {
    self.payload = Some(payload);
    self
  }

  /// Replaces the stage list.
  ///
  /// Entries can be names (`"auth"`), `(name, args)` pairs where `args` is a
  /// comma-delimited string or a sequence, shared instances, or explicit `StageDef`s.
  pub fn through<I, D>(&mut self, stages: I) -> &mut Self
  where
    I: IntoIterator<Item = D>,
    D: Into<StageDef<T, Err>>,
  {
    self.stages = stages.into_iter().map(Into::into).collect();
    self
  }

  /// Appends a single stage after the ones already configured.
  pub fn pipe(&mut self, stage: impl Into<StageDef<T, Err>>) -> &mut Self {
    self.stages.push(stage.into());
    self
  }

  /// Sets the method name invoked on each stage.
  pub fn via(&mut self, method: impl Into<String>) -> &mut Self {
    self.method = method.into();
    self
  }

  /// Sets the terminal callable, invoked with the payload that reaches the end of the chain.
  pub fn then<F>(&mut self, endpoint: F) -> &mut Self
  where
    F: Fn(T) -> Result<T, Err> + Send + Sync + 'static,
  {
    self.endpoint = Some(Arc::new(endpoint));
    self
  }

  pub fn stages(&self) -> &[StageDef<T, Err>] {
    &self.stages
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  pub fn has_payload(&self) -> bool {
    self.payload.is_some()
  }
}

impl<T, Err> Default for Pipeline<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
