// passage/src/registry.rs

//! Defines `StageRegistry<T, Err>`, a name-keyed container that resolves
//! symbolic stage names for pipelines.
//! Registrations are either factories (invoked on every resolution, so each
//! pipeline run gets a fresh instance) or shared instances.

use crate::core::stage::Stage;
use crate::error::PassageError;
use crate::resolver::Resolver;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Factory producing a fresh stage instance. Failures are reported as
/// `PassageError::Resolution` for the name being resolved.
pub type StageFactory<T, Err> = Arc<dyn Fn() -> anyhow::Result<Arc<dyn Stage<T, Err>>> + Send + Sync>;

enum Registration<T, Err> {
  Shared(Arc<dyn Stage<T, Err>>),
  Factory(StageFactory<T, Err>),
}

impl<T, Err> Clone for Registration<T, Err> {
  fn clone(&self) -> Self {
    match self {
      Registration::Shared(stage) => Registration::Shared(Arc::clone(stage)),
      Registration::Factory(factory) => Registration::Factory(Arc::clone(factory)),
    }
  }
}

/// The stage registry.
/// `Err` is the error type of the pipelines it serves; registry failures
/// (`NotFound`, `Resolution`) are converted into it through `From<PassageError>`.
pub struct StageRegistry<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  entries: RwLock<HashMap<String, Registration<T, Err>>>,
}

impl<T, Err> StageRegistry<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
    }
  }

  /// Registers a factory under `name`. The factory runs on every resolution.
  pub fn register<S, F>(&self, name: impl Into<String>, factory: F)
  where
    S: Stage<T, Err> + 'static,
    F: Fn() -> anyhow::Result<S> + Send + Sync + 'static,
  {
    let factory: StageFactory<T, Err> = Arc::new(move || -> anyhow::Result<Arc<dyn Stage<T, Err>>> {
      let stage = factory()?;
      Ok(Arc::new(stage))
    });
    self.insert(name.into(), Registration::Factory(factory));
  }

  /// Registers a single instance under `name`; every resolution returns it.
  pub fn register_instance<S>(&self, name: impl Into<String>, stage: S)
  where
    S: Stage<T, Err> + 'static,
  {
    self.register_shared(name, Arc::new(stage));
  }

  /// Registers an instance that may also be held elsewhere.
  pub fn register_shared(&self, name: impl Into<String>, stage: Arc<dyn Stage<T, Err>>) {
    self.insert(name.into(), Registration::Shared(stage));
  }

  /// Removes the registration for `name`. Returns whether one existed.
  pub fn unregister(&self, name: &str) -> bool {
    let removed = self.entries.write().remove(name).is_some();
    event!(Level::DEBUG, %name, removed, "Unregistering stage.");
    removed
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.read().contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.read().is_empty()
  }

  fn insert(&self, name: String, registration: Registration<T, Err>) {
    let kind = match registration {
      Registration::Shared(_) => "shared",
      Registration::Factory(_) => "factory",
    };
    let replaced = self.entries.write().insert(name.clone(), registration).is_some();
    if replaced {
      event!(Level::WARN, %name, kind, "Replacing existing stage registration.");
    } else {
      event!(Level::DEBUG, %name, kind, "Registering stage.");
    }
  }
}

impl<T, Err> Default for StageRegistry<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T, Err> Resolver<T, Err> for StageRegistry<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  #[instrument(name = "StageRegistry::resolve", skip(self), err(Display))]
  fn resolve(&self, name: &str) -> Result<Arc<dyn Stage<T, Err>>, Err> {
    // Clone out of the table so no lock is held while a factory runs.
    let registration = self.entries.read().get(name).cloned().ok_or_else(|| {
      event!(Level::ERROR, "No stage registered under this name.");
      Err::from(PassageError::NotFound { name: name.to_string() })
    })?;

    match registration {
      Registration::Shared(stage) => Ok(stage),
      Registration::Factory(factory) => factory().map_err(|source| {
        event!(Level::ERROR, error = %source, "Stage factory failed.");
        Err::from(PassageError::Resolution {
          name: name.to_string(),
          source,
        })
      }),
    }
  }
}
