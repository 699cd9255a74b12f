//! Command-line workflow: context collection and publish orchestration.
//!
//! - `collect` - Builds the release context from flags, environment and version control
//! - `orchestration` - Runs the publish state machine against a registry

pub mod collect;
pub mod orchestration;

pub use collect::{collect_context, process_env, ContextOverrides};
pub use orchestration::{
    run_publish_workflow, DistTagStatus, PublishOrchestrator, PublishState, PublishWorkflowArgs,
    WorkflowResult,
};
