use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary outcome of judging a profile against a criteria set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Fit")]
    Fit,
    #[serde(rename = "Not Fit")]
    NotFit,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Fit => "Fit",
            Decision::NotFit => "Not Fit",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed verdict returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub decision: Decision,
    pub reasoning: String,
}

/// One evaluation call: a profile and the ICP rules to hold it against.
///
/// `icp_title` is optional context for the prompt; the original front end
/// called it `icp_focus`, and both spellings are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub profile_text: String,
    pub rules: Vec<String>,
    #[serde(default, alias = "icp_focus", skip_serializing_if = "Option::is_none")]
    pub icp_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("profile_text cannot be empty")]
    EmptyProfile,

    #[error("rules cannot be empty")]
    EmptyRules,

    #[error("rules[{index}] cannot be blank")]
    BlankRule { index: usize },
}

/// Rejects input that would make a completion call pointless.
pub fn validate_inputs(profile_text: &str, rules: &[String]) -> Result<(), ValidationError> {
    if profile_text.trim().is_empty() {
        return Err(ValidationError::EmptyProfile);
    }
    if rules.is_empty() {
        return Err(ValidationError::EmptyRules);
    }
    if let Some(index) = rules.iter().position(|r| r.trim().is_empty()) {
        return Err(ValidationError::BlankRule { index });
    }
    Ok(())
}

impl EvaluationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_inputs(&self.profile_text, &self.rules)
    }

    /// The title with surrounding whitespace removed, or `None` if blank.
    pub fn title(&self) -> Option<&str> {
        self.icp_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
