//! Caption tone — the fixed stylistic parameter fed into the caption prompt.
//!
//! The set is closed: requests carrying anything outside it are rejected at
//! deserialization, so downstream code never sees a free-text tone.

use serde::{Deserialize, Serialize};

/// The five supported caption tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Casual,
    Educational,
    Inspiring,
    Informative,
}

impl Tone {
    /// CSV / table cell representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Educational => "Educational",
            Tone::Inspiring => "Inspiring",
            Tone::Informative => "Informative",
        }
    }

    /// Lowercase form used inside the caption prompt ("a casual social media
    /// caption about ...").
    pub fn prompt_word(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Educational => "educational",
            Tone::Inspiring => "inspiring",
            Tone::Informative => "informative",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_word_is_lowercase() {
        for tone in [
            Tone::Professional,
            Tone::Casual,
            Tone::Educational,
            Tone::Inspiring,
            Tone::Informative,
        ] {
            assert_eq!(tone.prompt_word(), tone.as_str().to_lowercase());
        }
    }

    #[test]
    fn test_deserialize_known_tone() {
        let tone: Tone = serde_json::from_str("\"Educational\"").unwrap();
        assert_eq!(tone, Tone::Educational);
    }

    #[test]
    fn test_deserialize_unknown_tone_rejected() {
        let result = serde_json::from_str::<Tone>("\"Sarcastic\"");
        assert!(result.is_err(), "tones outside the fixed set must not parse");
    }

    #[test]
    fn test_serialize_round_trip() {
        let json = serde_json::to_string(&Tone::Inspiring).unwrap();
        assert_eq!(json, "\"Inspiring\"");
    }
}
