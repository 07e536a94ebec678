//! Workflow entry points shared by the binary and integration tests

pub mod orchestration;

pub use orchestration::{Workflow, WorkflowArgs};
