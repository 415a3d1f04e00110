// src/lib.rs

//! Passage: a synchronous, onion-style stage pipeline for Rust.
//!
//! A payload is sent through an ordered list of stages. Each stage receives the
//! payload, a `Next` handle to the rest of the chain, and its own static arguments,
//! and may:
//!  - forward a (possibly transformed) payload and wrap what comes back,
//!  - return early, short-circuiting every later stage and the endpoint,
//!  - return no value at all, which is a valid (absent) result.
//!
//! Stages are given either as live instances or as names resolved on every run
//! through a `Resolver`, such as the bundled `StageRegistry`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod resolver;

// --- Re-exports for the Public API ---

// Stage-side types that users implement against
pub use crate::core::control::{Endpoint, Next, StageResult};
pub use crate::core::stage::{FnStage, Stage, DEFAULT_METHOD};
pub use crate::core::step::{IntoStageArgs, StageDef, StageRef};

// The main Pipeline struct and its compiled form
pub use crate::pipeline::{Chain, Pipeline};

pub use crate::resolver::{FnResolver, Resolver};

pub use crate::error::{PassageError, PassageResult};

// The name-keyed registry for resolving named stages
pub use crate::registry::{StageFactory, StageRegistry};

/*
    Core Workflow:
    1. Implement `Stage<T, Err>` for each pipe (or use `StageDef::from_fn` with a closure).
       `handle(payload, next, args)` calls `next.run(..)` to continue, or returns early.
    2. Optionally register stages by name in a `StageRegistry` and hand it to the
       pipeline with `Pipeline::with_resolver`.
    3. Configure: `.send(payload)`, `.through([...])`, optionally `.via("method")`
       and `.then(|payload| ...)`.
    4. Call `.run()`. The first declared stage is the outermost wrapper: its code
       before `next` runs first and its code after `next` runs last.
*/
