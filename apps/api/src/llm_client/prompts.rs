// Shared prompt fragments.
// Each feature that calls the completion backend keeps its own prompts.rs
// alongside it; this file holds pieces that are about the reply contract.

/// Label of the first line in every evaluation reply.
pub const DECISION_LABEL: &str = "Decision";

/// Label of the second line in every evaluation reply.
pub const REASONING_LABEL: &str = "Reasoning";

/// Instruction that pins the reply to the two-line format the parser accepts.
pub const TWO_LINE_FORMAT_INSTRUCTION: &str = "\
    You MUST respond with exactly two lines and nothing else. \
    Do NOT use markdown, bullet points, quotes, or code fences. \
    Do NOT add any text before the first line.";
