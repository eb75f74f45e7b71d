// Prompt construction for ICP evaluation.
// Reuses the reply-format fragments from llm_client::prompts.

use crate::evaluation::models::{validate_inputs, ValidationError};
use crate::llm_client::prompts::{DECISION_LABEL, REASONING_LABEL, TWO_LINE_FORMAT_INSTRUCTION};

/// Builds the evaluation prompt.
///
/// Every rule appears as its own `- ` line in the given order, and the profile
/// is embedded verbatim. Empty input is rejected before anything is rendered.
///
/// Rendered with a single `format!`, so caller text that looks like a
/// placeholder is never expanded.
pub fn build_prompt(
    profile_text: &str,
    rules: &[String],
    icp_title: Option<&str>,
) -> Result<String, ValidationError> {
    validate_inputs(profile_text, rules)?;

    let focus_section = match icp_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("\nICP FOCUS: {title}\n"),
        None => String::new(),
    };

    let rules_text = rules
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    let format_instruction = TWO_LINE_FORMAT_INSTRUCTION;
    let decision_label = DECISION_LABEL;
    let reasoning_label = REASONING_LABEL;

    Ok(format!(
        r#"You are an expert ICP (Ideal Customer Profile) evaluator. Your task is to determine whether a professional profile matches the specified ICP criteria.
{focus_section}
ICP RULES:
{rules_text}

PROFILE TEXT TO EVALUATE:
{profile_text}

INSTRUCTIONS:
1. Carefully analyze the profile text against each ICP rule
2. Decide "Fit" only if the profile satisfies ALL rules; otherwise decide "Not Fit"
3. Justify your decision in 2-3 sentences that cite the profile

REQUIRED OUTPUT FORMAT:
{format_instruction}
{decision_label}: Fit OR Not Fit
{reasoning_label}: <2-3 sentence justification>

Example responses:
{decision_label}: Fit
{reasoning_label}: The candidate is a VP of Sales with 8+ years of SaaS experience and explicitly mentions managing global sales teams and exceeding quotas.

{decision_label}: Not Fit
{reasoning_label}: The candidate has sales experience but only at Manager level, and their background is in physical products rather than SaaS.

Now evaluate the profile and respond in the required format:"#
    ))
}
