//! Chat bubble templates.
//!
//! Text is spliced into the templates and escaped by maud, story text
//! included. [`escape_html`] is exported for shells that build markup
//! outside these templates.

use maud::{Markup, html};

use crate::model::Bubble;

const WELCOME_TEXT: &str =
    "Share how you feel or where the story should go, and MindWeaver will weave you a saga.";
const ERROR_HEADING: &str = "Oops! Something went wrong";
const ERROR_HINT: &str = "Please try again or check if the backend is running.";
const LOADING_TEXT: &str = "Weaving your saga";
const LOADING_HINT: &str = "Creating your personalized therapeutic fantasy...";
const WARNING_ICON_PATH: &str = "M18 10a8 8 0 11-16 0 8 8 0 0116 0zm-7 4a1 1 0 11-2 0 1 1 0 012 0zm-1-9a1 1 0 00-1 1v4a1 1 0 102 0V6a1 1 0 00-1-1z";

/// Escape `& < > " '` for safe inclusion in HTML text and attributes.
///
/// # Examples
/// ```
/// use mindweaver_chat::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn avatar() -> Markup {
    html! {
        div class="w-10 h-10 bg-gradient-to-r from-yellow-400 to-yellow-600 rounded-full flex items-center justify-center flex-shrink-0" {
            span class="text-black font-bold text-sm" { "MW" }
        }
    }
}

fn story_paragraphs(story: &str) -> Markup {
    html! {
        @for line in story.lines().filter(|line| !line.trim().is_empty()) {
            p class="mb-4 last:mb-0" { (line) }
        }
    }
}

/// Render one transcript entry as a `div.message-slide-in` fragment.
#[must_use]
pub fn render_bubble(bubble: &Bubble) -> Markup {
    html! {
        div class="message-slide-in" {
            @match bubble {
                Bubble::Welcome => {
                    div class="text-center text-gray-600 italic" { (WELCOME_TEXT) }
                }
                Bubble::User(message) => {
                    div class="flex items-start gap-4 mb-6 justify-end" {
                        div class="flex-1 max-w-xs" {
                            div class="bg-gradient-to-r from-blue-500 to-blue-600 text-white rounded-2xl p-4 shadow-lg" {
                                p class="text-sm" { (message) }
                            }
                        }
                        div class="w-8 h-8 bg-gradient-to-r from-blue-500 to-blue-600 rounded-full flex items-center justify-center flex-shrink-0" {
                            span class="text-white font-bold text-xs" { "You" }
                        }
                    }
                }
                Bubble::Loading => {
                    div class="flex items-start gap-4 mb-6" {
                        (avatar())
                        div class="flex-1" {
                            div class="bg-gradient-to-r from-yellow-50 to-yellow-100 rounded-2xl p-6 shadow-lg" {
                                div class="typing-indicator" {
                                    span { (LOADING_TEXT) }
                                    div class="flex gap-1" {
                                        div class="typing-dot" {}
                                        div class="typing-dot" {}
                                        div class="typing-dot" {}
                                    }
                                }
                                p class="text-sm text-gray-600 mt-2" { (LOADING_HINT) }
                            }
                        }
                    }
                }
                Bubble::Story(story) => {
                    div class="flex items-start gap-4 mb-6" {
                        (avatar())
                        div class="flex-1" {
                            div class="bg-gradient-to-r from-yellow-50 to-yellow-100 rounded-2xl p-6 shadow-lg" {
                                div class="story-text text-gray-800 leading-relaxed" {
                                    (story_paragraphs(story))
                                }
                            }
                        }
                    }
                }
                Bubble::Error(message) => {
                    div class="flex items-start gap-4 mb-6" {
                        div class="w-10 h-10 bg-gradient-to-r from-red-400 to-red-600 rounded-full flex items-center justify-center flex-shrink-0" {
                            svg class="w-5 h-5 text-white" fill="currentColor" viewBox="0 0 20 20" {
                                path fill-rule="evenodd" d=(WARNING_ICON_PATH) clip-rule="evenodd" {}
                            }
                        }
                        div class="flex-1" {
                            div class="bg-red-50 border border-red-200 rounded-2xl p-6 shadow-lg" {
                                h3 class="font-semibold text-red-800 mb-2" { (ERROR_HEADING) }
                                p class="text-sm text-red-700 mb-2" { (message) }
                                p class="text-xs text-red-600" { (ERROR_HINT) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render a whole transcript, oldest bubble first.
#[must_use]
pub fn render_transcript(bubbles: &[Bubble]) -> String {
    html! {
        @for bubble in bubbles {
            (render_bubble(bubble))
        }
    }
    .into_string()
}
