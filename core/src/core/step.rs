// passage/src/core/step.rs

//! Defines the structure of a single entry in a pipeline's stage list.

use crate::core::control::{Next, StageResult};
use crate::core::stage::{FnStage, Stage};
use std::sync::Arc;

/// Identifies the stage an entry runs: either a live instance or a name the
/// pipeline's resolver turns into one at compile time.
pub enum StageRef<T, Err> {
  Direct(Arc<dyn Stage<T, Err>>),
  Named(String),
}

impl<T, Err> StageRef<T, Err> {
  pub fn direct<S>(stage: S) -> Self
  where
    S: Stage<T, Err> + 'static,
  {
    StageRef::Direct(Arc::new(stage))
  }

  pub fn named(name: impl Into<String>) -> Self {
    StageRef::Named(name.into())
  }

  /// Name used for logging: the symbolic name, or the instance's `Stage::name`.
  pub fn label(&self) -> &str {
    match self {
      StageRef::Direct(stage) => stage.name(),
      StageRef::Named(name) => name,
    }
  }

  pub fn is_named(&self) -> bool {
    matches!(self, StageRef::Named(_))
  }
}

impl<T, Err> Clone for StageRef<T, Err> {
  fn clone(&self) -> Self {
    match self {
      StageRef::Direct(stage) => StageRef::Direct(Arc::clone(stage)),
      StageRef::Named(name) => StageRef::Named(name.clone()),
    }
  }
}

impl<T, Err> std::fmt::Debug for StageRef<T, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      StageRef::Direct(stage) => f.debug_tuple("Direct").field(&stage.name()).finish(),
      StageRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
    }
  }
}

impl<T, Err> From<&str> for StageRef<T, Err> {
  fn from(name: &str) -> Self {
    StageRef::Named(name.to_string())
  }
}

impl<T, Err> From<String> for StageRef<T, Err> {
  fn from(name: String) -> Self {
    StageRef::Named(name)
  }
}

impl<T, Err> From<Arc<dyn Stage<T, Err>>> for StageRef<T, Err> {
  fn from(stage: Arc<dyn Stage<T, Err>>) -> Self {
    StageRef::Direct(stage)
  }
}

/// Conversion into the ordered argument list bound to a stage.
///
/// Strings are split on `,` with no trimming, so `"a,b"` and `["a", "b"]` yield the
/// same arguments. An empty string yields a single empty argument.
pub trait IntoStageArgs {
  fn into_stage_args(self) -> Vec<String>;
}

impl IntoStageArgs for &str {
  fn into_stage_args(self) -> Vec<String> {
    self.split(',').map(str::to_string).collect()
  }
}

impl IntoStageArgs for String {
  fn into_stage_args(self) -> Vec<String> {
    self.as_str().into_stage_args()
  }
}

impl IntoStageArgs for Vec<String> {
  fn into_stage_args(self) -> Vec<String> {
    self
  }
}

impl IntoStageArgs for Vec<&str> {
  fn into_stage_args(self) -> Vec<String> {
    self.into_iter().map(str::to_string).collect()
  }
}

impl IntoStageArgs for &[&str] {
  fn into_stage_args(self) -> Vec<String> {
    self.iter().map(|arg| (*arg).to_string()).collect()
  }
}

impl<const N: usize> IntoStageArgs for [&str; N] {
  fn into_stage_args(self) -> Vec<String> {
    self.iter().map(|arg| (*arg).to_string()).collect()
  }
}

impl IntoStageArgs for () {
  fn into_stage_args(self) -> Vec<String> {
    Vec::new()
  }
}

/// One entry of a pipeline's stage list: which stage to run and the static
/// arguments passed to it after the payload and `next`.
pub struct StageDef<T, Err> {
  pub stage_ref: StageRef<T, Err>,
  pub args: Vec<String>,
}

impl<T, Err> StageDef<T, Err> {
  pub fn new(stage_ref: StageRef<T, Err>) -> Self {
    Self {
      stage_ref,
      args: Vec::new(),
    }
  }

  /// An entry resolved by name through the pipeline's resolver.
  pub fn named(name: impl Into<String>) -> Self {
    Self::new(StageRef::named(name))
  }

  /// An entry running the given instance; no resolver needed.
  pub fn direct<S>(stage: S) -> Self
  where
    S: Stage<T, Err> + 'static,
  {
    Self::new(StageRef::direct(stage))
  }

  /// An entry running an instance shared with other pipelines.
  pub fn shared(stage: Arc<dyn Stage<T, Err>>) -> Self {
    Self::new(StageRef::Direct(stage))
  }

  /// An entry running a closure.
  pub fn from_fn<F>(label: impl Into<String>, f: F) -> Self
  where
    F: Fn(T, Next<'_, T, Err>, &[String]) -> StageResult<T, Err> + Send + Sync + 'static,
    T: 'static,
    Err: 'static,
  {
    Self::direct(FnStage::new(label, f))
  }

  pub fn with_args(mut self, args: impl IntoStageArgs) -> Self {
    self.args = args.into_stage_args();
    self
  }
}

impl<T, Err> Clone for StageDef<T, Err> {
  fn clone(&self) -> Self {
    Self {
      stage_ref: self.stage_ref.clone(),
      args: self.args.clone(),
    }
  }
}

impl<T, Err> std::fmt::Debug for StageDef<T, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StageDef")
      .field("stage_ref", &self.stage_ref)
      .field("args", &self.args)
      .finish()
  }
}

impl<T, Err> From<StageRef<T, Err>> for StageDef<T, Err> {
  fn from(stage_ref: StageRef<T, Err>) -> Self {
    Self::new(stage_ref)
  }
}

impl<T, Err> From<&str> for StageDef<T, Err> {
  fn from(name: &str) -> Self {
    Self::named(name)
  }
}

impl<T, Err> From<String> for StageDef<T, Err> {
  fn from(name: String) -> Self {
    Self::named(name)
  }
}

impl<T, Err> From<Arc<dyn Stage<T, Err>>> for StageDef<T, Err> {
  fn from(stage: Arc<dyn Stage<T, Err>>) -> Self {
    Self::shared(stage)
  }
}

impl<T, Err, R, A> From<(R, A)> for StageDef<T, Err>
where
  R: Into<StageRef<T, Err>>,
  A: IntoStageArgs,
{
  fn from((stage_ref, args): (R, A)) -> Self {
    Self::new(stage_ref.into()).with_args(args)
  }
}
