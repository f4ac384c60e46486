//! Grounded prompt construction for the generation model

use crate::generation::{ArtifactKind, GenerationRequest};

/// Marker opening the embedded user content
pub const CONTENT_BEGIN: &str = "===BEGIN USER CONTENT===";

/// Marker closing the embedded user content
pub const CONTENT_END: &str = "===END USER CONTENT===";

/// System instruction restricting the model to the supplied material
pub const SYSTEM_PROMPT: &str = "You generate study materials from ONLY the provided user content. \
Output concise, accurate results. Do not invent facts.";

/// A system/user prompt pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt for a generation request
pub fn build_prompt(request: &GenerationRequest) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(request),
    }
}

fn build_user_prompt(request: &GenerationRequest) -> String {
    let mut rules = Vec::new();
    if request.kind.wants_questions() {
        rules.push(format!(
            "- Create at least {} multiple-choice questions with exactly 4 plausible options each.",
            request.count
        ));
        rules.push("- correctIndex is the 0-based index of the correct option.".to_string());
        rules.push("- Explanations must cite phrases from the content where possible.".to_string());
    }
    if request.kind.wants_concepts() {
        rules.push(
            "- concepts: 8-12 single words or very short phrases taken from the content, most central first."
                .to_string(),
        );
    }

    let fields = match request.kind {
        ArtifactKind::Quiz => "Only the \"questions\" field is requested.",
        ArtifactKind::Memory => "Only the \"concepts\" field is requested.",
        ArtifactKind::All => "Both \"questions\" and \"concepts\" are requested.",
    };

    format!(
        "You MUST use ONLY the user content between the markers. Do NOT add external facts.\n\
Return STRICT JSON with this structure (omit fields that are not requested):\n\
{{\n  \"questions\": [\n    {{\"question\": string, \"options\": string[], \"correctIndex\": number, \"explanation\": string}}\n  ],\n  \"concepts\": string[]\n}}\n\
{}\n\n\
Rules:\n{}\n\n\
{}\n{}\n{}",
        fields,
        rules.join("\n"),
        CONTENT_BEGIN,
        request.content,
        CONTENT_END
    )
}
