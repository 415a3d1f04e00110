// passage/src/pipeline/execution.rs

//! Contains the `Pipeline::run()` method, which compiles the configured stages
//! and sends the payload through them.
//! The pipeline is `Pipeline<T, Err>`, and `run` returns `Result<Option<T>, Err>`.

use crate::error::PassageError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Level};

impl<T, Err> Pipeline<T, Err>
where
  T: 'static,
  Err: std::error::Error + From<PassageError> + Send + Sync + 'static,
{
  /// Executes the pipeline once and returns what the first stage returned.
  ///
  /// Every call compiles afresh: named stages are resolved again and nothing is
  /// cached between runs. The payload is cloned into the chain, so the pipeline can
  /// be run repeatedly with the same configuration.
  ///
  /// `Ok(None)` means a stage produced no value; it is not an error. Framework
  /// failures (`NoPayload`, `NoResolver`, `MethodNotSupported`) are converted into
  /// `Err` with `Err::from`. Errors from stages, the endpoint or the resolver are
  /// returned untouched.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      payload_type = %std::any::type_name::<T>(),
      pipeline_error_type = %std::any::type_name::<Err>(),
      num_stages = self.stages.len(),
      has_endpoint = self.endpoint.is_some(),
    ),
    err(Display)
  )]
  pub fn run(&self) -> Result<Option<T>, Err>
  where
    T: Clone,
  {
    let payload = match &self.payload {
      Some(payload) => payload.clone(),
      None => {
        event!(Level::ERROR, "Pipeline run without a payload.");
        return Err(Err::from(PassageError::NoPayload));
      }
    };

    let chain = self.compile()?;
    event!(Level::DEBUG, "Pipeline execution starting.");

    let result = chain.call(payload)?;
    if result.is_none() {
      event!(Level::DEBUG, "Pipeline execution finished with an absent result.");
    } else {
      event!(Level::DEBUG, "Pipeline execution completed.");
    }
    Ok(result)
  }
}
