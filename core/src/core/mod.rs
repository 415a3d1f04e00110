pub mod control;
pub mod stage;
pub mod step;

// Re-export key types for easier access from other passage modules (and lib.rs)
pub use control::{Endpoint, Next, StageResult};
pub use stage::{FnStage, Stage, DEFAULT_METHOD};
pub use step::{IntoStageArgs, StageDef, StageRef};
