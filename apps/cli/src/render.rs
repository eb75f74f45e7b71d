use crate::client::{EvaluationOutcome, HealthReport, RequesterError};

pub fn render_outcome(outcome: &EvaluationOutcome) -> String {
    format!(
        "Decision: {}\nReasoning: {}",
        outcome.decision, outcome.reasoning
    )
}

pub fn render_outcome_json(outcome: &EvaluationOutcome) -> String {
    serde_json::to_string_pretty(outcome).unwrap_or_else(|_| render_outcome(outcome))
}

pub fn render_health(report: &HealthReport) -> String {
    let backend = match (&report.model, report.completion_backend_configured) {
        (Some(model), true) => format!("configured ({model})"),
        (None, true) => "configured".to_string(),
        (_, false) => "NOT configured (set OPENAI_API_KEY on the service)".to_string(),
    };
    format!(
        "{} v{}: {}\ncompletion backend: {}",
        report.service, report.version, report.status, backend
    )
}

/// Error text for stderr. Includes the model's raw reply when the service sent one.
pub fn render_error(err: &RequesterError) -> String {
    let mut out = format!("Error: {err}");
    if let RequesterError::Service {
        raw_response: Some(raw),
        ..
    } = err
    {
        out.push_str("\nRaw model response:\n");
        out.push_str(raw);
    }
    if err.is_retryable() {
        out.push_str("\nThis error is transient; try again or pass --retries.");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Decision;

    #[test]
    fn test_render_fit() {
        let outcome = EvaluationOutcome {
            decision: Decision::Fit,
            reasoning: "Mentions 10 years of experience.".to_string(),
        };
        assert_eq!(
            render_outcome(&outcome),
            "Decision: Fit\nReasoning: Mentions 10 years of experience."
        );
    }

    #[test]
    fn test_render_not_fit_json() {
        let outcome = EvaluationOutcome {
            decision: Decision::NotFit,
            reasoning: "No SaaS.".to_string(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_outcome_json(&outcome)).unwrap();
        assert_eq!(value["decision"], "Not Fit");
        assert_eq!(value["reasoning"], "No SaaS.");
    }

    #[test]
    fn test_render_error_includes_raw_response() {
        let err = RequesterError::Service {
            status: 502,
            kind: "MALFORMED_RESPONSE".to_string(),
            message: "Could not parse the model's reply".to_string(),
            retryable: false,
            raw_response: Some("I think so?".to_string()),
        };
        let text = render_error(&err);
        assert!(text.contains("MALFORMED_RESPONSE"));
        assert!(text.contains("I think so?"));
        assert!(!text.contains("--retries"));
    }

    #[test]
    fn test_render_timeout_suggests_retry() {
        assert!(render_error(&RequesterError::Timeout).contains("--retries"));
    }

    #[test]
    fn test_render_degraded_health() {
        let report = HealthReport {
            status: "degraded".to_string(),
            version: "0.1.0".to_string(),
            service: "icp-api".to_string(),
            completion_backend_configured: false,
            model: None,
        };
        let text = render_health(&report);
        assert!(text.contains("degraded"));
        assert!(text.contains("NOT configured"));
    }
}
