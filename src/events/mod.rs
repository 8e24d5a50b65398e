//! Events module for classification outcomes
//!
//! Tells subscribers what the turn-taking controller should do with an
//! utterance: halt agent speech, or keep talking.

use serde::{Deserialize, Serialize};

use crate::intent::{IntentCategory, IntentDecision};

/// Events emitted after each evaluated utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionEvent {
    /// Agent speech should halt (or there was none to halt)
    Interrupt {
        /// Why the utterance is allowed through
        category: IntentCategory,
        /// Original utterance text
        text: String,
    },

    /// Utterance was a backchannel, agent keeps speaking
    Ignored {
        /// Original utterance text
        text: String,
    },
}

impl From<&IntentDecision> for DecisionEvent {
    fn from(decision: &IntentDecision) -> Self {
        if decision.allow_interrupt() {
            DecisionEvent::Interrupt {
                category: decision.category(),
                text: decision.text().to_string(),
            }
        } else {
            DecisionEvent::Ignored {
                text: decision.text().to_string(),
            }
        }
    }
}

impl std::fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionEvent::Interrupt { category, .. } => write!(f, "INTERRUPT ({})", category),
            DecisionEvent::Ignored { .. } => write!(f, "IGNORED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_decision() {
        let ignored = DecisionEvent::from(&IntentDecision::new(IntentCategory::Acknowledgement, "ok"));
        assert_eq!(ignored, DecisionEvent::Ignored { text: "ok".into() });
        assert_eq!(ignored.to_string(), "IGNORED");

        let interrupt = DecisionEvent::from(&IntentDecision::new(IntentCategory::Command, "stop"));
        assert_eq!(interrupt.to_string(), "INTERRUPT (command)");
    }

    #[test]
    fn test_event_serialization() {
        let event = DecisionEvent::Interrupt {
            category: IntentCategory::MeaningfulInput,
            text: "why".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"interrupt""#));
        assert!(json.contains("meaningful_input"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"ignored","text":"uh huh"}"#;
        let event: DecisionEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, DecisionEvent::Ignored { text } if text == "uh huh"));
    }
}
