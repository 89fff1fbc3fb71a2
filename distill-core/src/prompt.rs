//! Prompt construction for summaries.
//!
//! Style and length tiers map to fixed natural-language instructions; the
//! builder is a pure function of its inputs.

use crate::model::{SummaryLength, SummaryStyle};

impl SummaryStyle {
    /// Instruction sent to the model for this style
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Academic => {
                "Provide a formal, well-structured academic summary suitable for a research paper or scholarly article."
            }
            SummaryStyle::Simple => {
                "Provide a simple, easy-to-understand summary using basic vocabulary and short sentences."
            }
            SummaryStyle::Bullet => {
                "Provide a summary in bullet point format, highlighting only the key points."
            }
            SummaryStyle::Narrative => {
                "Provide a narrative summary that flows like a short story, maintaining the essence of the original text."
            }
        }
    }
}

impl SummaryLength {
    /// Instruction sent to the model for this length tier
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::VeryShort => "Extremely concise (1-2 sentences maximum)",
            SummaryLength::Short => "Brief (about 25% of original length)",
            SummaryLength::Medium => "Moderate (about 50% of original length)",
            SummaryLength::Long => "Detailed (about 75% of original length)",
            SummaryLength::Detailed => "Comprehensive (retains all key points with some detail)",
        }
    }
}

/// Build the summarization prompt for `text`.
///
/// The text is embedded verbatim between the instructions and the closing
/// request for a bare summary.
pub fn build_prompt(text: &str, style: SummaryStyle, length: SummaryLength) -> String {
    format!(
        r#"Please summarize the following text according to these specific instructions:

- Style: {}
- Length: {}

Here is the text to summarize:

{}

Please provide only the summary with no additional commentary or headers."#,
        style.instruction(),
        length.instruction(),
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_total_over_tiers() {
        let text = "The quick brown fox jumps over the lazy dog.\nIt was not amused.";
        for style in SummaryStyle::ALL {
            for length in SummaryLength::ALL {
                let prompt = build_prompt(text, style, length);
                assert!(!prompt.is_empty());
                assert!(prompt.contains(text));
                assert!(prompt.contains(style.instruction()));
                assert!(prompt.contains(length.instruction()));
                assert!(prompt.ends_with(
                    "Please provide only the summary with no additional commentary or headers."
                ));
            }
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("Hello. World.", SummaryStyle::Bullet, SummaryLength::Short);
        let b = build_prompt("Hello. World.", SummaryStyle::Bullet, SummaryLength::Short);
        assert_eq!(a, b);
    }

    #[test]
    fn test_instruction_order() {
        let prompt = build_prompt("BODY", SummaryStyle::Academic, SummaryLength::VeryShort);
        let style_at = prompt.find("- Style: Provide a formal").unwrap();
        let length_at = prompt.find("- Length: Extremely concise").unwrap();
        let body_at = prompt.find("BODY").unwrap();
        assert!(style_at < length_at && length_at < body_at);
    }

    #[test]
    fn test_instructions_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for length in SummaryLength::ALL {
            assert!(seen.insert(length.instruction()));
        }
        for style in SummaryStyle::ALL {
            assert!(seen.insert(style.instruction()));
        }
    }
}
