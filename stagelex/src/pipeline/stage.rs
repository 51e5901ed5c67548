use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline state; each state after `Raw` is produced by one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Raw,
    CommentsStripped,
    WhitespaceNormalized,
    ConstantsTagged,
    KeywordsTagged,
    IdentifiersTagged,
    SymbolsTagged,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Raw,
        Stage::CommentsStripped,
        Stage::WhitespaceNormalized,
        Stage::ConstantsTagged,
        Stage::KeywordsTagged,
        Stage::IdentifiersTagged,
        Stage::SymbolsTagged,
    ];

    /// The only state this one may transition to
    pub fn next(&self) -> Option<Stage> {
        Self::ALL.get(self.ordinal() + 1).copied()
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::CommentsStripped => "comments-stripped",
            Stage::WhitespaceNormalized => "whitespace-normalized",
            Stage::ConstantsTagged => "constants-tagged",
            Stage::KeywordsTagged => "keywords-tagged",
            Stage::IdentifiersTagged => "identifiers-tagged",
            Stage::SymbolsTagged => "symbols-tagged",
        }
    }

    /// Heading used when displaying the stage that produced this state
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Raw => "Source",
            Stage::CommentsStripped => "Comment removal",
            Stage::WhitespaceNormalized => "Whitespace normalization",
            Stage::ConstantsTagged => "Constants",
            Stage::KeywordsTagged => "Keywords",
            Stage::IdentifiersTagged => "Identifiers",
            Stage::SymbolsTagged => "Operators and punctuators",
        }
    }

    /// Parse a full name or a short alias (`comments`, `constants`, ...)
    pub fn from_name(name: &str) -> Option<Stage> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|stage| {
            stage.name() == name
                || stage.name().split('-').next() == Some(name.as_str())
                || stage.ordinal().to_string() == name
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_strictly_forward() {
        let mut stage = Stage::Raw;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert_eq!(next.ordinal(), stage.ordinal() + 1);
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen, Stage::ALL.to_vec());
        assert!(Stage::SymbolsTagged.is_final());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Stage::from_name("constants"), Some(Stage::ConstantsTagged));
        assert_eq!(Stage::from_name("Symbols-Tagged"), Some(Stage::SymbolsTagged));
        assert_eq!(Stage::from_name("whitespace"), Some(Stage::WhitespaceNormalized));
        assert_eq!(Stage::from_name("4"), Some(Stage::KeywordsTagged));
        assert_eq!(Stage::from_name("parse"), None);
    }
}
