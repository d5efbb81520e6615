//! Wire types for `generateContent`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GenerateContentRequest<'a> {
    pub(super) contents: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ContentDto<'a> {
    pub(super) role: &'static str,
    pub(super) parts: [TextPartDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct TextPartDto<'a> {
    pub(super) text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub(super) fn user_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [ContentDto {
                role: "user",
                parts: [TextPartDto { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub(super) candidates: Vec<CandidateDto>,
    pub(super) prompt_feedback: Option<PromptFeedbackDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CandidateDto {
    pub(super) content: Option<CandidateContentDto>,
    pub(super) finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CandidateContentDto {
    #[serde(default)]
    pub(super) parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PartDto {
    pub(super) text: Option<String>,
    #[serde(default)]
    pub(super) thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PromptFeedbackDto {
    pub(super) block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joined, trimmed text of the first candidate, skipping thought parts.
    pub(super) fn into_story(self) -> Result<String, String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_owned());
            return Err(format!("no story candidate: {reason}"));
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "empty".to_owned());
            return Err(format!("candidate contained no text (finish reason: {reason})"));
        }
        Ok(text.to_owned())
    }
}
