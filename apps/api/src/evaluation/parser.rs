//! Reply parser — turns the model's two-line answer into an `EvaluationResult`.
//!
//! Grammar (labels and tokens case-insensitive, blank lines ignored):
//!
//! ```text
//! reply           := decision_line [reasoning_block]
//! decision_line   := "Decision" ws? ":" ws? ("Fit" | "Not Fit") "."?
//! reasoning_block := "Reasoning" ws? ":" text (newline text)*
//! ```
//!
//! Anything else fails. The parser never guesses a decision.

use thiserror::Error;

use crate::evaluation::models::{Decision, EvaluationResult};
use crate::llm_client::prompts::{DECISION_LABEL, REASONING_LABEL};

/// Substituted when the model gives a decision but no reasoning.
pub const NO_REASONING_PLACEHOLDER: &str = "No reasoning provided.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("reply has no 'Decision:' line")]
    MissingDecision,

    #[error("unrecognised decision '{0}', expected 'Fit' or 'Not Fit'")]
    UnknownDecision(String),

    #[error("reply contains more than one 'Decision:' line")]
    DuplicateDecision,

    #[error("unexpected text outside the labelled lines: '{0}'")]
    UnexpectedLine(String),
}

pub fn parse_reply(raw: &str) -> Result<EvaluationResult, ParseError> {
    let has_decision_line = raw
        .lines()
        .any(|line| labeled_value(line, DECISION_LABEL).is_some());
    if !has_decision_line {
        return Err(ParseError::MissingDecision);
    }

    let mut lines = raw.lines();
    let mut decision: Option<Decision> = None;
    let mut reasoning: Option<String> = None;

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(value) = labeled_value(line, DECISION_LABEL) {
            if decision.is_some() {
                return Err(ParseError::DuplicateDecision);
            }
            decision = Some(parse_decision(value)?);
            continue;
        }

        match (decision, labeled_value(line, REASONING_LABEL)) {
            (Some(_), Some(first)) => {
                let mut block = vec![first];
                for rest in lines.by_ref() {
                    if labeled_value(rest, DECISION_LABEL).is_some() {
                        return Err(ParseError::DuplicateDecision);
                    }
                    block.push(rest);
                }
                reasoning = Some(block.join("\n").trim().to_string());
            }
            _ => return Err(ParseError::UnexpectedLine(line.trim().to_string())),
        }
    }

    let decision = decision.ok_or(ParseError::MissingDecision)?;
    let reasoning = reasoning
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| NO_REASONING_PLACEHOLDER.to_string());

    Ok(EvaluationResult {
        decision,
        reasoning,
    })
}

/// Returns the text after `label:` if `line` starts with that label.
fn labeled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    trimmed[label.len()..].trim_start().strip_prefix(':')
}

fn parse_decision(value: &str) -> Result<Decision, ParseError> {
    let token = value.trim().trim_end_matches('.');
    let normalized = token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match normalized.as_str() {
        "fit" => Ok(Decision::Fit),
        "not fit" => Ok(Decision::NotFit),
        _ => Err(ParseError::UnknownDecision(value.trim().to_string())),
    }
}
