//! Classification outcome handed back to the turn-taking controller

use serde::{Deserialize, Serialize};

/// What kind of utterance was heard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// The agent was silent, there is nothing to interrupt
    AgentIdle,
    /// The utterance contains a command phrase
    Command,
    /// Filler or backchannel while the agent talks
    Acknowledgement,
    /// Anything else: a real contribution from the user
    MeaningfulInput,
}

impl IntentCategory {
    /// Whether the agent should stop speaking for this category
    pub fn allows_interrupt(self) -> bool {
        match self {
            IntentCategory::AgentIdle => true,
            IntentCategory::Command => true,
            IntentCategory::Acknowledgement => false,
            IntentCategory::MeaningfulInput => true,
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentCategory::AgentIdle => write!(f, "agent_idle"),
            IntentCategory::Command => write!(f, "command"),
            IntentCategory::Acknowledgement => write!(f, "acknowledgement"),
            IntentCategory::MeaningfulInput => write!(f, "meaningful_input"),
        }
    }
}

/// Immutable decision for one utterance.
///
/// `allow_interrupt` is derived from the category at construction and
/// `text` is the caller's input exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentDecision {
    allow_interrupt: bool,
    category: IntentCategory,
    text: String,
}

impl IntentDecision {
    pub fn new(category: IntentCategory, text: impl Into<String>) -> Self {
        Self {
            allow_interrupt: category.allows_interrupt(),
            category,
            text: text.into(),
        }
    }

    pub fn allow_interrupt(&self) -> bool {
        self.allow_interrupt
    }

    pub fn category(&self) -> IntentCategory {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_fixes_allow_interrupt() {
        assert!(IntentDecision::new(IntentCategory::AgentIdle, "").allow_interrupt());
        assert!(IntentDecision::new(IntentCategory::Command, "stop").allow_interrupt());
        assert!(!IntentDecision::new(IntentCategory::Acknowledgement, "yeah").allow_interrupt());
        assert!(IntentDecision::new(IntentCategory::MeaningfulInput, "why").allow_interrupt());
    }

    #[test]
    fn test_decision_serialization() {
        let decision = IntentDecision::new(IntentCategory::Acknowledgement, "Yeah!");
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains(r#""allow_interrupt":false"#));
        assert!(json.contains(r#""category":"acknowledgement""#));
        assert!(json.contains(r#""text":"Yeah!""#));
    }

    #[test]
    fn test_category_deserialization() {
        let category: IntentCategory = serde_json::from_str(r#""meaningful_input""#).unwrap();
        assert_eq!(category, IntentCategory::MeaningfulInput);
        assert_eq!(category.to_string(), "meaningful_input");
    }
}
