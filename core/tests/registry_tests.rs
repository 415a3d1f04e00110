// tests/registry_tests.rs
mod common;

use common::*;
use passage::{PassageError, Pipeline, Resolver, Stage, StageRegistry};
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
#[serial]
fn test_registry_resolves_fresh_instances_on_every_run() {
  setup_tracing();
  reset_counters();
  let registry = StageRegistry::<String, PassageError>::new();
  registry.register("one", || {
    FACTORY_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    Ok(PipeOne)
  });

  let mut pipeline = Pipeline::<String, PassageError>::with_resolver(registry);
  pipeline.send("(0)".to_string()).through(["one", "one"]);

  assert_eq!(pipeline.run().unwrap(), Some("(0)(1)(1)(-1)(-1)".to_string()));
  assert_eq!(FACTORY_EXEC_COUNTER.load(Ordering::SeqCst), 2);

  assert_eq!(pipeline.run().unwrap(), Some("(0)(1)(1)(-1)(-1)".to_string()));
  assert_eq!(FACTORY_EXEC_COUNTER.load(Ordering::SeqCst), 4);
}

#[test]
fn test_factory_failure_surfaces_as_resolution_error() {
  setup_tracing();
  let registry = StageRegistry::<String, PassageError>::new();
  registry.register("flaky", || -> anyhow::Result<PipeOne> { anyhow::bail!("connection pool exhausted") });

  let result = Pipeline::<String, PassageError>::with_resolver(registry)
    .send("(0)".to_string())
    .through(["flaky"])
    .run();

  match result {
    Err(PassageError::Resolution { name, source }) => {
      assert_eq!(name, "flaky");
      assert!(source.to_string().contains("connection pool exhausted"));
    }
    other => panic!("Expected PassageError::Resolution, got {:?}", other),
  }
}

#[test]
fn test_registry_errors_convert_into_custom_error_type() {
  setup_tracing();
  let registry = StageRegistry::<String, TestError>::new();

  let result = Pipeline::<String, TestError>::with_resolver(registry)
    .send("(0)".to_string())
    .through(["ghost"])
    .run();

  match result {
    Err(TestError::Passage(s)) => {
      assert!(s.contains("NotFound"));
      assert!(s.contains("ghost"));
    }
    other => panic!("Expected TestError::Passage(NotFound), got {:?}", other),
  }
}

#[test]
fn test_shared_registry_serves_several_pipelines() {
  setup_tracing();
  let registry = Arc::new(StageRegistry::<String, PassageError>::new());
  registry.register_instance("one", PipeOne);

  let first = Pipeline::<String, PassageError>::with_resolver(Arc::clone(&registry))
    .send("a".to_string())
    .through([("one", "x")])
    .run()
    .unwrap();

  // Registration after the first pipeline was built is visible to later runs.
  registry.register("two", || Ok(PipeTwo));
  let second = Pipeline::<String, PassageError>::with_resolver(Arc::clone(&registry))
    .send("b".to_string())
    .through(["one", "two"])
    .run()
    .unwrap();

  assert_eq!(first, Some("a(1x)(-1x)".to_string()));
  assert_eq!(second, Some("b(1)(2)(-2)(-1)".to_string()));
}

#[test]
fn test_replacing_a_registration() {
  setup_tracing();
  let registry = StageRegistry::<String, PassageError>::new();
  registry.register("step", || Ok(PipeOne));
  registry.register("step", || Ok(PipeTwo));
  assert_eq!(registry.len(), 1);

  let stage: Arc<dyn Stage<String, PassageError>> = registry.resolve("step").unwrap();
  assert!(stage.name().contains("PipeTwo"));
}

#[test]
fn test_unregistered_stage_is_no_longer_resolvable() {
  setup_tracing();
  let registry = Arc::new(StageRegistry::<String, PassageError>::new());
  registry.register_shared("one", Arc::new(PipeOne));

  let mut pipeline = Pipeline::<String, PassageError>::with_resolver(Arc::clone(&registry));
  pipeline.send("(0)".to_string()).through(["one"]);
  assert!(pipeline.run().is_ok());

  assert!(registry.unregister("one"));
  assert!(matches!(pipeline.run(), Err(PassageError::NotFound { .. })));
}
