// passage/examples/pipeline_stop.rs

use passage::{PassageError, Pipeline, StageDef};
use tracing::info;

fn main() -> Result<(), PassageError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Pipeline Short-Circuit Example ---");

  let mut pipeline = Pipeline::<i32, PassageError>::new();
  pipeline.through([
    StageDef::<i32, PassageError>::from_fn("log", |amount: i32, next, _args| {
      info!("Amount in: {}", amount);
      let result = next.run(amount)?;
      info!("Result out: {:?}", result);
      Ok(result)
    }),
    // Rejects negative amounts by returning without calling `next`.
    StageDef::<i32, PassageError>::from_fn("guard", |amount: i32, next, _args| {
      if amount < 0 {
        info!("Negative amount, short-circuiting.");
        return Ok(Some(0));
      }
      next.run(amount)
    }),
    StageDef::<i32, PassageError>::from_fn("double", |amount: i32, next, _args| next.run(amount * 2)),
  ]);
  pipeline.then(|amount| {
    info!("Endpoint reached with {}", amount);
    Ok(amount + 1)
  });

  let accepted = pipeline.send(20).run()?;
  assert_eq!(accepted, Some(41));

  // The guard stops the chain: "double" and the endpoint never run.
  let rejected = pipeline.send(-5).run()?;
  assert_eq!(rejected, Some(0));

  info!("Accepted: {:?}, rejected: {:?}", accepted, rejected);
  Ok(())
}
