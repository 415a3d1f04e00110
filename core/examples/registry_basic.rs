// passage/examples/registry_basic.rs

use passage::{Next, PassageError, Pipeline, Stage, StageRegistry, StageResult};
use std::sync::Arc;
use tracing::{error, info};

// --- Custom Error Type for this example ---
#[derive(Debug, thiserror::Error)]
enum RegistryExampleError {
  #[error("Rejected: {0}")]
  Rejected(String),
  #[error("Passage Framework Error in Registry Example: {0}")]
  Passage(#[from] PassageError), // To allow framework errors to be converted
}

// --- Stages, resolved by name ---
struct Trim;

impl Stage<String, RegistryExampleError> for Trim {
  fn handle(&self, input: String, next: Next<'_, String, RegistryExampleError>, _args: &[String]) -> StageResult<String, RegistryExampleError> {
    next.run(input.trim().to_string())
  }
}

struct Deny {
  words: Vec<String>,
}

impl Stage<String, RegistryExampleError> for Deny {
  fn handle(&self, input: String, next: Next<'_, String, RegistryExampleError>, args: &[String]) -> StageResult<String, RegistryExampleError> {
    // Static args extend the configured word list for this pipeline only.
    if let Some(word) = self.words.iter().chain(args).find(|w| input.contains(w.as_str())) {
      return Err(RegistryExampleError::Rejected(format!("contains '{}'", word)));
    }
    next.run(input)
  }
}

struct Shout;

impl Stage<String, RegistryExampleError> for Shout {
  fn handle(&self, input: String, next: Next<'_, String, RegistryExampleError>, _args: &[String]) -> StageResult<String, RegistryExampleError> {
    Ok(next.run(input)?.map(|out| format!("{}!", out.to_uppercase())))
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Passage Registry Basic Example ---");

  // 1. Create a registry and register stages by name
  let registry = Arc::new(StageRegistry::<String, RegistryExampleError>::new());
  registry.register("trim", || Ok(Trim));
  registry.register("deny", || {
    Ok(Deny {
      words: vec!["spam".to_string()],
    })
  });
  registry.register_instance("shout", Shout);

  // 2. Build a pipeline of named stages
  let mut pipeline = Pipeline::<String, RegistryExampleError>::with_resolver(Arc::clone(&registry));
  pipeline.through([("trim", ""), ("deny", "scam,phish"), ("shout", "")]);

  // 3. Run it against a clean and a rejected payload
  let clean = pipeline.send("  hello there ".to_string()).run()?;
  info!("Clean result: {:?}", clean);
  assert_eq!(clean.as_deref(), Some("HELLO THERE!"));

  match pipeline.send("totally not a scam".to_string()).run() {
    Err(RegistryExampleError::Rejected(reason)) => info!("Rejected as expected: {}", reason),
    other => {
      error!("Unexpected outcome: {:?}", other);
      return Err("expected rejection".into());
    }
  }

  // 4. Unknown names surface as framework errors
  pipeline.through(["trim", "translate"]);
  match pipeline.run() {
    Err(RegistryExampleError::Passage(PassageError::NotFound { name })) => info!("Missing stage: {}", name),
    other => {
      error!("Unexpected outcome: {:?}", other);
      return Err("expected NotFound".into());
    }
  }

  Ok(())
}
