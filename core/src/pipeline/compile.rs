// passage/src/pipeline/compile.rs

//! Turns a pipeline's stage list into a `Chain`: a linked list of continuations
//! built tail-first, so the node for stage 0 is the head and owns everything
//! after it, down to the terminal endpoint.

use crate::core::control::{Endpoint, Next, StageResult};
use crate::core::stage::Stage;
use crate::core::step::StageRef;
use crate::error::PassageError;
use crate::pipeline::definition::Pipeline;
use std::sync::Arc;
use tracing::{event, instrument, span, Level};

/// One node of a compiled chain.
pub(crate) enum Continuation<T, Err> {
  /// Calls the endpoint, or hands the payload back untouched when there is none.
  Terminal { endpoint: Option<Endpoint<T, Err>> },
  Stage(StageLink<T, Err>),
}

pub(crate) struct StageLink<T, Err> {
  stage: Arc<dyn Stage<T, Err>>,
  label: String,
  index: usize,
  method: Arc<str>,
  args: Vec<String>,
  next: Box<Continuation<T, Err>>,
}

impl<T, Err> Continuation<T, Err> {
  pub(crate) fn call(&self, payload: T) -> StageResult<T, Err> {
    match self {
      Continuation::Terminal { endpoint: Some(endpoint) } => {
        event!(Level::TRACE, "Invoking endpoint.");
        endpoint(payload).map(Some)
      }
      Continuation::Terminal { endpoint: None } => Ok(Some(payload)),
      Continuation::Stage(link) => {
        let stage_span = span!(
          Level::DEBUG,
          "pipeline_stage",
          stage = link.label.as_str(),
          stage_index = link.index,
          num_args = link.args.len()
        );
        let _stage_span_guard = stage_span.enter();
        event!(Level::TRACE, "Entering stage.");
        link
          .stage
          .dispatch(&link.method, payload, Next::new(&link.next), &link.args)
      }
    }
  }

  pub(crate) fn is_terminal(&self) -> bool {
    matches!(self, Continuation::Terminal { .. })
  }
}

/// A compiled pipeline: the composed continuation for one stage list, method
/// and endpoint.
pub struct Chain<T, Err> {
  head: Continuation<T, Err>,
  len: usize,
}

impl<T, Err> Chain<T, Err> {
  /// Sends `payload` into the first stage (or straight to the endpoint when the
  /// chain has no stages).
  pub fn call(&self, payload: T) -> StageResult<T, Err> {
    self.head.call(payload)
  }

  /// Number of stages in the chain, not counting the endpoint.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

impl<T, Err> Pipeline<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  /// Resolves every stage and composes them into a `Chain`.
  ///
  /// Stages are folded in reverse declared order, each new node wrapping the
  /// previous one, so the first declared stage ends up outermost. Resolution
  /// happens here, so a missing resolver, a resolver failure, or a stage that does
  /// not respond to the configured method aborts before anything executes.
  #[instrument(
    name = "Pipeline::compile",
    skip_all,
    fields(num_stages = self.stages.len(), method = %self.method),
    err(Display)
  )]
  pub fn compile(&self) -> Result<Chain<T, Err>, Err> {
    let method: Arc<str> = Arc::from(self.method.as_str());
    let mut continuation = Continuation::Terminal {
      endpoint: self.endpoint.clone(),
    };

    for (index, stage_def) in self.stages.iter().enumerate().rev() {
      let stage = self.resolve_stage(&stage_def.stage_ref)?;
      let label = stage_def.stage_ref.label().to_string();

      if !stage.responds_to(&method) {
        event!(Level::ERROR, stage = %label, stage_index = index, "Stage does not respond to the configured method.");
        return Err(Err::from(PassageError::MethodNotSupported {
          stage: label,
          method: method.to_string(),
        }));
      }

      event!(Level::TRACE, stage = %label, stage_index = index, args = ?stage_def.args, "Stage linked.");
      continuation = Continuation::Stage(StageLink {
        stage,
        label,
        index,
        method: Arc::clone(&method),
        args: stage_def.args.clone(),
        next: Box::new(continuation),
      });
    }

    event!(Level::DEBUG, "Pipeline compiled.");
    Ok(Chain {
      head: continuation,
      len: self.stages.len(),
    })
  }

  /// Direct instances are used as-is; names go through the resolver, whose errors
  /// are returned unchanged.
  pub(crate) fn resolve_stage(&self, stage_ref: &StageRef<T, Err>) -> Result<Arc<dyn Stage<T, Err>>, Err> {
    match stage_ref {
      StageRef::Direct(stage) => Ok(Arc::clone(stage)),
      StageRef::Named(name) => {
        let resolver = self.resolver.as_ref().ok_or_else(|| {
          event!(Level::ERROR, stage = %name, "Named stage requires a resolver but none is configured.");
          Err::from(PassageError::NoResolver { stage: name.clone() })
        })?;
        event!(Level::DEBUG, stage = %name, "Resolving named stage.");
        resolver.resolve(name)
      }
    }
  }
}
