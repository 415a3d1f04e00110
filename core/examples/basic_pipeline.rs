// passage/examples/basic_pipeline.rs

use passage::{Next, PassageError, Pipeline, Stage, StageDef, StageResult};
use tracing::info;

// 1. Define the payload sent through the pipeline
#[derive(Clone, Debug, Default)]
struct Request {
  path: String,
  headers: Vec<(String, String)>,
  log: Vec<String>,
}

// 2. Define stages. Code before `next.run` executes on the way in,
//    code after it on the way out.
struct Timing;

impl Stage<Request, PassageError> for Timing {
  fn handle(&self, mut request: Request, next: Next<'_, Request, PassageError>, _args: &[String]) -> StageResult<Request, PassageError> {
    request.log.push("timing: start".to_string());
    let response = next.run(request)?;
    Ok(response.map(|mut r| {
      r.log.push("timing: stop".to_string());
      r
    }))
  }
}

struct AddHeader;

impl Stage<Request, PassageError> for AddHeader {
  fn handle(&self, mut request: Request, next: Next<'_, Request, PassageError>, args: &[String]) -> StageResult<Request, PassageError> {
    // Args arrive in declaration order: name, value
    if let [name, value] = args {
      request.log.push(format!("header: {}={}", name, value));
      request.headers.push((name.clone(), value.clone()));
    }
    next.run(request)
  }
}

fn main() -> Result<(), PassageError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 3. Configure the pipeline: payload, stages with their arguments, endpoint
  let request = Request {
    path: "/orders".to_string(),
    ..Default::default()
  };

  let response = Pipeline::<Request, PassageError>::new()
    .send(request)
    .through([
      StageDef::direct(Timing),
      StageDef::direct(AddHeader).with_args("x-request-id,42"),
      StageDef::direct(AddHeader).with_args(["x-tenant", "acme"]),
    ])
    .then(|mut request| {
      request.log.push(format!("endpoint: handled {}", request.path));
      Ok(request)
    })
    .run()?; // Propagate PassageError if any

  // 4. Inspect the result
  let response = response.expect("every stage forwards and returns a value");
  info!("Execution log:");
  for entry in &response.log {
    info!("- {}", entry);
  }

  assert_eq!(response.headers.len(), 2);
  assert_eq!(response.log.first().map(String::as_str), Some("timing: start"));
  assert_eq!(response.log.last().map(String::as_str), Some("timing: stop"));

  Ok(())
}
