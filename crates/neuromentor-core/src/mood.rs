use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Sad,
    Anxious,
    Stressed,
    Neutral,
}

impl Mood {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Stressed => "stressed",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// checked in order; the first rule with a match wins
const RULES: [(Mood, &[&str]); 4] = [
    (Mood::Happy, &["happy", "joy", "excited", "grateful"]),
    (Mood::Sad, &["sad", "down", "depressed"]),
    (Mood::Anxious, &["anxious", "nervous", "worried"]),
    (Mood::Stressed, &["stressed", "overwhelmed", "tense"]),
];

/// Keyword mood guess; substrings of the lower-cased text are matched.
#[must_use]
pub fn analyze_mood(text: &str) -> Mood {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map_or(Mood::Neutral, |(mood, _)| *mood)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_mood() {
        assert_eq!(analyze_mood("I'm so grateful today"), Mood::Happy);
        assert_eq!(analyze_mood("Feeling DOWN lately"), Mood::Sad);
        assert_eq!(analyze_mood("nervous about tomorrow"), Mood::Anxious);
        assert_eq!(analyze_mood("completely overwhelmed at work"), Mood::Stressed);
        assert_eq!(analyze_mood("went for a walk"), Mood::Neutral);
        assert_eq!(analyze_mood(""), Mood::Neutral);
    }

    #[test]
    fn earlier_rule_wins() {
        assert_eq!(analyze_mood("happy but stressed"), Mood::Happy);
        assert_eq!(analyze_mood("worried and sad"), Mood::Sad);
    }

    #[test]
    fn substrings_match() {
        // "enjoyed" contains "joy"
        assert_eq!(analyze_mood("I enjoyed it"), Mood::Happy);
    }

    #[test]
    fn display_names() {
        assert_eq!(Mood::Anxious.to_string(), "anxious");
        assert_eq!(Mood::Neutral.as_str(), "neutral");
    }
}
