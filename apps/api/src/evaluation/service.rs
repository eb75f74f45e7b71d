//! Evaluator — validates a request, asks the completion backend once, and
//! parses the answer.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::evaluation::parser::parse_reply;
use crate::evaluation::prompts::build_prompt;
use crate::llm_client::CompletionBackend;

/// Stateless between calls. `backend` is `None` when the service was started
/// without a completion credential.
#[derive(Clone)]
pub struct Evaluator {
    backend: Option<Arc<dyn CompletionBackend>>,
}

impl Evaluator {
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self { backend }
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.model())
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, AppError> {
        request.validate()?;

        let backend = self.backend.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable(
                "The evaluation service has no language model backend configured.".to_string(),
            )
        })?;

        let evaluation_id = Uuid::new_v4();
        let span = info_span!(
            "evaluate",
            %evaluation_id,
            rules = request.rules.len(),
            profile_chars = request.profile_text.chars().count()
        );

        async move {
            let prompt = build_prompt(&request.profile_text, &request.rules, request.title())?;

            let reply = backend.complete(&prompt).await?;

            let result = parse_reply(&reply).map_err(|e| AppError::MalformedResponse {
                reason: e.to_string(),
                raw: reply.clone(),
            })?;

            info!(decision = %result.decision, "Evaluation complete");
            Ok::<_, AppError>(result)
        }
        .instrument(span)
        .await
    }
}
