//! Linear stage orchestrator: evaluator → reporter → optional rewriter.

use thiserror::Error;

use super::client::{ChatClient, CompletionError};
use super::prompts::{build_compliance_query, build_report_query, build_rewrite_query};
use super::roster::{AgentRole, AgentRoster};

#[derive(Error, Debug)]
pub enum PipelineError {
    /// An invocation failure, decorated with the failing stage so callers
    /// can tell which agent broke.
    #[error("{agent} stage failed: {source}")]
    Stage {
        agent: &'static str,
        #[source]
        source: CompletionError,
    },
}

/// Runs already-extracted text through the agent stages. No branching
/// back, no retries, no partial results.
pub struct CompliancePipeline<'a, C: ChatClient> {
    roster: &'a AgentRoster<C>,
}

impl<'a, C: ChatClient> CompliancePipeline<'a, C> {
    pub fn new(roster: &'a AgentRoster<C>) -> Self {
        Self { roster }
    }

    /// Produce a compliance report for the text, or a rewritten document
    /// when `rewrite_requested` is set.
    ///
    /// Empty input is allowed; the stages still run and callers tolerate
    /// the degenerate output.
    pub fn run(&self, document_text: &str, rewrite_requested: bool) -> Result<String, PipelineError> {
        let findings =
            self.invoke_stage(&self.roster.evaluator, &build_compliance_query(document_text))?;

        let report = self.invoke_stage(&self.roster.reporter, &build_report_query(&findings))?;

        if !rewrite_requested {
            tracing::info!(chars = report.len(), "compliance report generated");
            return Ok(report);
        }

        // The rewrite works from the original document text, not the
        // report; the report is computed and then discarded on this path.
        let rewritten =
            self.invoke_stage(&self.roster.rewriter, &build_rewrite_query(document_text))?;
        tracing::info!(chars = rewritten.len(), "document rewritten");
        Ok(rewritten)
    }

    fn invoke_stage(&self, role: &AgentRole, query: &str) -> Result<String, PipelineError> {
        self.roster.invoke(role, query).map_err(|source| PipelineError::Stage {
            agent: role.name,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Client scripted with one response per expected call; records every
    /// (system, user) pair it sees.
    struct ScriptedClient {
        responses: Mutex<Vec<String>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn new(responses: &[&str]) -> Self {
            // Stored reversed so pop() yields them in order.
            let mut scripted: Vec<String> = responses.iter().map(|s| s.to_string()).collect();
            scripted.reverse();
            Self {
                responses: Mutex::new(scripted),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatClient for ScriptedClient {
        fn complete(
            &self,
            _model: &str,
            system: &str,
            user: &str,
        ) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or(CompletionError::EmptyResponse)
        }
    }

    struct FailingClient;

    impl ChatClient for FailingClient {
        fn complete(
            &self,
            _model: &str,
            _system: &str,
            _user: &str,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::Connection("http://localhost".into()))
        }
    }

    #[test]
    fn report_path_runs_evaluator_then_reporter() {
        let client = ScriptedClient::new(&["the findings", "the report"]);
        let roster = AgentRoster::with_client(client, "m");
        let pipeline = CompliancePipeline::new(&roster);

        let result = pipeline.run("Their going to the store.", false).unwrap();
        assert_eq!(result, "the report");

        let calls = roster.client().calls();
        assert_eq!(calls.len(), 2);
        // Evaluator sees the document, reporter sees the findings.
        assert!(calls[0].1.contains("Their going to the store."));
        assert!(calls[0].0.contains("grammatical"));
        assert!(calls[1].1.contains("the findings"));
        assert!(calls[1].0.contains("structured compliance report"));
    }

    #[test]
    fn rewrite_path_returns_rewriter_output() {
        let client = ScriptedClient::new(&["findings", "report", "the rewritten document"]);
        let roster = AgentRoster::with_client(client, "m");
        let pipeline = CompliancePipeline::new(&roster);

        let result = pipeline.run("original document text", true).unwrap();
        assert_eq!(result, "the rewritten document");

        let calls = roster.client().calls();
        assert_eq!(calls.len(), 3);
        // The rewrite query embeds the original text, not the report.
        assert!(calls[2].1.contains("original document text"));
        assert!(!calls[2].1.contains("report"));
    }

    #[test]
    fn empty_input_still_runs_the_stages() {
        let client = ScriptedClient::new(&["no findings", "empty-document report"]);
        let roster = AgentRoster::with_client(client, "m");
        let pipeline = CompliancePipeline::new(&roster);

        let result = pipeline.run("", false).unwrap();
        assert_eq!(result, "empty-document report");
        assert_eq!(roster.client().calls().len(), 2);
    }

    #[test]
    fn failure_names_the_stage() {
        let roster = AgentRoster::with_client(FailingClient, "m");
        let pipeline = CompliancePipeline::new(&roster);

        let err = pipeline.run("text", false).unwrap_err();
        assert!(err.to_string().contains("ComplianceEvaluator"));
    }
}
