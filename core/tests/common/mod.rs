// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use passage::{Next, PassageError, Stage, StageResult};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("Passage framework error: {0}")]
  Passage(String), // Store as String for Eq comparison

  #[error("Test stage failed: {0}")]
  Stage(String),

  #[error("Test endpoint failed: {0}")]
  Endpoint(String),

  #[error("Test resolver failed: {0}")]
  Resolver(String),
}

impl From<PassageError> for TestError {
  fn from(pe: PassageError) -> Self {
    TestError::Passage(format!("{:?}", pe))
  }
}

fn first_arg(args: &[String]) -> &str {
  args.first().map(String::as_str).unwrap_or("")
}

// --- Fixture Stages ---
// Each appends "(N{arg})" on the way in and "(-N{arg})" on the way out.
// An absent inner result is treated as the empty string.

pub struct PipeOne;

impl<Err> Stage<String, Err> for PipeOne {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, args: &[String]) -> StageResult<String, Err> {
    let arg = first_arg(args);
    let inner = next.run(format!("{payload}(1{arg})"))?;
    Ok(Some(format!("{}(-1{arg})", inner.unwrap_or_default())))
  }
}

pub struct PipeTwo;

impl<Err> Stage<String, Err> for PipeTwo {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, args: &[String]) -> StageResult<String, Err> {
    let arg = first_arg(args);
    let inner = next.run(format!("{payload}(2{arg})"))?;
    Ok(Some(format!("{}(-2{arg})", inner.unwrap_or_default())))
  }
}

/// Forwards but hands nothing back.
pub struct BrokenPipe;

impl<Err> Stage<String, Err> for BrokenPipe {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, args: &[String]) -> StageResult<String, Err> {
    let arg = first_arg(args);
    let _ = next.run(format!("{payload}(3{arg})"))?;
    Ok(None)
  }
}

/// Returns the payload without calling `next`.
pub struct BypassPipe;

impl<Err> Stage<String, Err> for BypassPipe {
  fn handle(&self, payload: String, _next: Next<'_, String, Err>, _args: &[String]) -> StageResult<String, Err> {
    Ok(Some(payload))
  }
}

/// Fails with `TestError::Stage` without forwarding.
pub struct FailingPipe;

impl Stage<String, TestError> for FailingPipe {
  fn handle(&self, _payload: String, _next: Next<'_, String, TestError>, args: &[String]) -> StageResult<String, TestError> {
    Err(TestError::Stage(format!("failing pipe {}", first_arg(args))))
  }
}

/// Joins all of its arguments with `|` and appends them.
pub struct ArgsPipe;

impl<Err> Stage<String, Err> for ArgsPipe {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, args: &[String]) -> StageResult<String, Err> {
    next.run(format!("{payload}[{}]", args.join("|")))
  }
}

/// Responds to `handle` and to `audit`; the latter tags the payload differently.
pub struct AuditPipe;

impl<Err> Stage<String, Err> for AuditPipe {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, _args: &[String]) -> StageResult<String, Err> {
    next.run(format!("{payload}(handled)"))
  }

  fn responds_to(&self, method: &str) -> bool {
    matches!(method, "handle" | "audit")
  }

  fn dispatch(&self, method: &str, payload: String, next: Next<'_, String, Err>, args: &[String]) -> StageResult<String, Err> {
    match method {
      "audit" => next.run(format!("{payload}(audited)")),
      _ => self.handle(payload, next, args),
    }
  }
}

/// Records "before:<label>" / "after:<label>" around its call to `next`.
#[derive(Clone)]
pub struct TracePipe {
  pub label: &'static str,
  pub log: Arc<Mutex<Vec<String>>>,
}

impl TracePipe {
  pub fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
    Self {
      label,
      log: Arc::clone(log),
    }
  }
}

impl<T, Err> Stage<T, Err> for TracePipe {
  fn handle(&self, payload: T, next: Next<'_, T, Err>, _args: &[String]) -> StageResult<T, Err> {
    self.log.lock().push(format!("before:{}", self.label));
    let result = next.run(payload);
    self.log.lock().push(format!("after:{}", self.label));
    result
  }

  fn name(&self) -> &str {
    self.label
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static ENDPOINT_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static FACTORY_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static STAGE_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  ENDPOINT_EXEC_COUNTER.store(0, Ordering::SeqCst);
  FACTORY_EXEC_COUNTER.store(0, Ordering::SeqCst);
  STAGE_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

/// Counts its executions in `STAGE_EXEC_COUNTER`, then forwards.
pub struct CountingPipe;

impl<Err> Stage<String, Err> for CountingPipe {
  fn handle(&self, payload: String, next: Next<'_, String, Err>, _args: &[String]) -> StageResult<String, Err> {
    STAGE_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
    next.run(payload)
  }
}

/// Endpoint appending "(e)" and counting its executions.
pub fn counting_endpoint<Err>(payload: String) -> Result<String, Err> {
  ENDPOINT_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
  Ok(payload + "(e)")
}
