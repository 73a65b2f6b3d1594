//! The fixed four-role agent roster.

use crate::config::CompletionConfig;

use super::client::{ChatClient, CompletionError, HttpChatClient};
use super::prompts;

/// One named role: a fixed system instruction bound to the roster's shared
/// completion client. Stateless between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRole {
    pub name: &'static str,
    pub system_instruction: &'static str,
}

/// The four roles, created fresh per processing call and discarded after.
///
/// `extractor` is deliberately never invoked by the pipeline — text comes
/// from `extraction::DocumentExtractor` instead. The role stays in the
/// roster as an explicit capability so the wiring choice is visible and
/// testable rather than dead configuration.
pub struct AgentRoster<C: ChatClient> {
    client: C,
    model: String,
    pub extractor: AgentRole,
    pub evaluator: AgentRole,
    pub reporter: AgentRole,
    pub rewriter: AgentRole,
}

impl AgentRoster<HttpChatClient> {
    /// Build the roster against the configured completion service.
    /// Fails fast when the credential is absent.
    pub fn initialize(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = HttpChatClient::from_config(config)?;
        Ok(Self::with_client(client, &config.model))
    }
}

impl<C: ChatClient> AgentRoster<C> {
    /// Roster over an arbitrary client; tests inject mocks here.
    pub fn with_client(client: C, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            extractor: AgentRole {
                name: "TextExtractor",
                system_instruction: prompts::EXTRACTOR_SYSTEM,
            },
            evaluator: AgentRole {
                name: "ComplianceEvaluator",
                system_instruction: prompts::EVALUATOR_SYSTEM,
            },
            reporter: AgentRole {
                name: "ComplianceReporter",
                system_instruction: prompts::REPORTER_SYSTEM,
            },
            rewriter: AgentRole {
                name: "ContentRewriter",
                system_instruction: prompts::REWRITER_SYSTEM,
            },
        }
    }

    /// Single-turn invocation: one user message carrying the interpolated
    /// query, no conversation memory.
    pub fn invoke(&self, role: &AgentRole, content: &str) -> Result<String, CompletionError> {
        tracing::debug!(agent = role.name, chars = content.len(), "invoking agent");
        self.client
            .complete(&self.model, role.system_instruction, content)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Test-only access to the underlying client (call-log inspection).
    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }
}
