// Caption prompt constants for the Generation module.
// The template is the single source of truth for what the model is asked to
// produce; build_caption_prompt fills the placeholders.

use crate::generation::tone::Tone;

/// Caption prompt template.
/// Replace: `{tone}`, `{topic}`, `{max_words}` before sending.
pub const CAPTION_PROMPT_TEMPLATE: &str = "\
Create a {tone} social media caption about \"{topic}\" for the palm industry.
The caption should be engaging, informative, and suitable for platforms like Instagram or LinkedIn.
Maximum length: {max_words} words.
Include relevant hashtags at the end.
Focus on the palm industry context.";

/// Fills the caption template for one generation request.
pub fn build_caption_prompt(topic: &str, tone: Tone, max_words: u32) -> String {
    CAPTION_PROMPT_TEMPLATE
        .replace("{tone}", tone.prompt_word())
        .replace("{topic}", topic)
        .replace("{max_words}", &max_words.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_topic_and_tone() {
        let prompt = build_caption_prompt("Harvesting Dates", Tone::Educational, 50);
        assert!(prompt.contains("educational social media caption"));
        assert!(prompt.contains("\"Harvesting Dates\""));
    }

    #[test]
    fn test_prompt_carries_word_bound() {
        let prompt = build_caption_prompt("Palm Oil Benefits", Tone::Professional, 80);
        assert!(prompt.contains("Maximum length: 80 words."));
    }

    #[test]
    fn test_prompt_requests_hashtags_and_domain() {
        let prompt = build_caption_prompt("Sustainable Farming", Tone::Casual, 20);
        assert!(prompt.contains("relevant hashtags"));
        assert!(prompt.contains("palm industry context"));
    }

    #[test]
    fn test_no_unfilled_placeholders() {
        let prompt = build_caption_prompt("Dates", Tone::Inspiring, 35);
        assert!(!prompt.contains('{'), "all placeholders must be filled");
    }
}
