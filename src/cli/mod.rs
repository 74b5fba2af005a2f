//! Command workflows that sit between the CLI and the engine

pub mod orchestration;

pub use orchestration::{run_bump, BumpOutcome, BumpWorkflowArgs, WorkflowResult};
