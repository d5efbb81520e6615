//! Story request validation and prompt construction.

use std::fmt;

use super::chat::ChatId;

/// Maximum accepted input length, in characters.
pub const STORY_INPUT_MAX: usize = 4000;

/// Validation failures for [`StoryInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryValidationError {
    /// Nothing left after trimming.
    Empty,
    /// Longer than [`STORY_INPUT_MAX`].
    TooLong {
        /// Maximum permitted characters.
        max: usize,
    },
}

impl fmt::Display for StoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No input provided"),
            Self::TooLong { .. } => write!(f, "Input is too long"),
        }
    }
}

impl std::error::Error for StoryValidationError {}

/// The feeling or story choice submitted by the user, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryInput(String);

impl StoryInput {
    /// Trim and validate raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, StoryValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StoryValidationError::Empty);
        }
        if trimmed.chars().count() > STORY_INPUT_MAX {
            return Err(StoryValidationError::TooLong {
                max: STORY_INPUT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for StoryInput {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Result of a successful story generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryOutcome {
    /// Generated narrative.
    pub story: String,
    /// Chat the exchange was recorded under.
    pub chat_id: ChatId,
}

/// Build the therapeutic fantasy prompt for `input`.
///
/// # Examples
/// ```
/// use mindweaver::domain::{StoryInput, story_prompt};
///
/// let input = StoryInput::new("I miss my friends").expect("valid input");
/// assert!(story_prompt(&input).contains("\"I miss my friends\""));
/// ```
pub fn story_prompt(input: &StoryInput) -> String {
    format!(
        "You are a therapeutic AI that creates personalized fantasy narratives to help \
users process their emotions.
The user has shared: \"{input}\"

Create a therapeutic fantasy story that:
1. Acknowledges their emotion/input
2. Transforms it into a metaphorical fantasy adventure
3. Provides gentle guidance and hope
4. Includes a real-world actionable step if appropriate
5. Uses rich, immersive fantasy language
6. Is 2-4 paragraphs long but meaningful
7. Where user can be main character or part of story but not narrator
8. Give user some options to choose from to continue the story

Make it feel personal, magical, and therapeutic. Use fantasy elements like magical \
creatures, enchanted places, or quests that metaphorically represent their emotional \
journey.",
        input = input.as_ref()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   \n\t")]
    fn blank_input_is_rejected(#[case] raw: &str) {
        let err = StoryInput::new(raw).expect_err("blank input");
        assert_eq!(err, StoryValidationError::Empty);
        assert_eq!(err.to_string(), "No input provided");
    }

    #[rstest]
    fn input_is_trimmed() {
        let input = StoryInput::new("  I feel brave today \n").expect("valid input");
        assert_eq!(input.as_ref(), "I feel brave today");
    }

    #[rstest]
    fn overlong_input_is_rejected() {
        let err = StoryInput::new("a".repeat(STORY_INPUT_MAX + 1)).expect_err("too long");
        assert_eq!(err.to_string(), "Input is too long");
        assert!(StoryInput::new("a".repeat(STORY_INPUT_MAX)).is_ok());
    }

    #[rstest]
    fn prompt_quotes_input_and_lists_requirements() {
        let input = StoryInput::new("I am nervous about my exam").expect("valid input");
        let prompt = story_prompt(&input);

        assert!(prompt.contains("The user has shared: \"I am nervous about my exam\""));
        assert!(prompt.contains("6. Is 2-4 paragraphs long but meaningful"));
        assert!(prompt.contains("8. Give user some options"));
    }
}
