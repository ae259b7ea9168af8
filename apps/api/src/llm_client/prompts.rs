// Shared prompt constants.
// Analysis-specific prompt text lives in analysis/prompts.rs.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
