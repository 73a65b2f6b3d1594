//! The multi-agent side of the pipeline: completion-service client, fixed
//! prompt templates, the four-role roster, and the stage orchestrator.

pub mod client;
pub mod pipeline;
pub mod prompts;
pub mod roster;

pub use client::{ChatClient, CompletionError, HttpChatClient, MockChatClient};
pub use pipeline::{CompliancePipeline, PipelineError};
pub use roster::{AgentRole, AgentRoster};
