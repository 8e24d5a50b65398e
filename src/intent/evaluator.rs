//! Interrupt-or-ignore decision for utterances heard over agent speech
//!
//! Checks run in a fixed order and the first match wins:
//! agent idle, then command phrases, then acknowledgements, then the
//! meaningful-input default.

use tracing::{debug, trace};

use super::decision::{IntentCategory, IntentDecision};
use super::lexicon::{Lexicon, PhraseSet};
use super::normalize::{normalize, tokens};

/// Classifies utterances against an owned, immutable lexicon.
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct IntentEvaluator {
    lexicon: Lexicon,
}

impl IntentEvaluator {
    /// Create an evaluator, replacing either default phrase set when given
    pub fn new(acknowledgements: Option<PhraseSet>, commands: Option<PhraseSet>) -> Self {
        Self::with_lexicon(Lexicon::new(acknowledgements, commands))
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify `text` given whether the agent is currently speaking
    pub fn evaluate(&self, text: &str, agent_speaking: bool) -> IntentDecision {
        let category = self.classify(text, agent_speaking);
        let decision = IntentDecision::new(category, text);

        debug!(
            category = %category,
            allow_interrupt = decision.allow_interrupt(),
            agent_speaking,
            "utterance classified"
        );
        trace!(text, "classified utterance text");

        decision
    }

    fn classify(&self, text: &str, agent_speaking: bool) -> IntentCategory {
        if !agent_speaking {
            IntentCategory::AgentIdle
        } else if self.contains_command(text) {
            IntentCategory::Command
        } else if self.is_acknowledgement(text) {
            IntentCategory::Acknowledgement
        } else {
            IntentCategory::MeaningfulInput
        }
    }

    /// True for silence, a whole acknowledgement phrase, or an utterance
    /// made only of acknowledgement tokens ("yeah ok sure")
    pub fn is_acknowledgement(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return true;
        }

        let acks = self.lexicon.acknowledgements();
        let normalized = normalize(text);
        if acks.contains(&normalized) {
            return true;
        }

        tokens(&normalized).all(|token| acks.contains(token))
    }

    /// Substring containment of any command phrase, so "don't stop now"
    /// counts even though "stop" sits mid-utterance
    pub fn contains_command(&self, text: &str) -> bool {
        self.lexicon.commands().any_within(&normalize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaking(text: &str) -> IntentDecision {
        IntentEvaluator::default().evaluate(text, true)
    }

    #[test]
    fn test_idle_agent_always_allows() {
        let evaluator = IntentEvaluator::default();
        for text in ["", "yeah", "stop", "I think you are wrong", "..."] {
            let decision = evaluator.evaluate(text, false);
            assert_eq!(decision.category(), IntentCategory::AgentIdle);
            assert!(decision.allow_interrupt());
        }
    }

    #[test]
    fn test_empty_is_acknowledgement() {
        let decision = speaking("");
        assert_eq!(decision.category(), IntentCategory::Acknowledgement);
        assert!(!decision.allow_interrupt());
        assert_eq!(speaking("   \t").category(), IntentCategory::Acknowledgement);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let decision = speaking("Yeah!");
        assert_eq!(decision.category(), IntentCategory::Acknowledgement);
        assert!(!decision.allow_interrupt());
    }

    #[test]
    fn test_command_by_substring() {
        let decision = speaking("please stop talking");
        assert_eq!(decision.category(), IntentCategory::Command);
        assert!(decision.allow_interrupt());
        assert_eq!(speaking("Don't stop now").category(), IntentCategory::Command);
        assert_eq!(speaking("Hold on, hold on.").category(), IntentCategory::Command);
    }

    #[test]
    fn test_meaningful_input() {
        let decision = speaking("I think you are wrong");
        assert_eq!(decision.category(), IntentCategory::MeaningfulInput);
        assert!(decision.allow_interrupt());
    }

    #[test]
    fn test_command_beats_acknowledgement() {
        assert_eq!(speaking("ok wait").category(), IntentCategory::Command);
        assert_eq!(speaking("Ok, wait!").category(), IntentCategory::Command);
    }

    #[test]
    fn test_multi_word_acknowledgements() {
        assert_eq!(speaking("uh huh").category(), IntentCategory::Acknowledgement);
        assert_eq!(speaking("Uh, huh.").category(), IntentCategory::Acknowledgement);
        assert_eq!(speaking("Got it!").category(), IntentCategory::Acknowledgement);
    }

    #[test]
    fn test_compound_acknowledgement_tokens() {
        assert_eq!(speaking("yeah ok sure").category(), IntentCategory::Acknowledgement);
        // "got" alone is not a member; only the whole phrase "got it" is
        assert_eq!(speaking("yeah got").category(), IntentCategory::MeaningfulInput);
        assert_eq!(speaking("yeah tell me more").category(), IntentCategory::MeaningfulInput);
    }

    #[test]
    fn test_punctuation_only_is_acknowledgement() {
        assert_eq!(speaking("...").category(), IntentCategory::Acknowledgement);
    }

    #[test]
    fn test_text_passed_through_unchanged() {
        let raw = "  Uh, HUH!! ";
        assert_eq!(speaking(raw).text(), raw);
    }

    #[test]
    fn test_custom_acknowledgements_replace_defaults() {
        let evaluator = IntentEvaluator::new(Some(PhraseSet::new(["mhm", "mm hmm"])), None);
        assert_eq!(
            evaluator.evaluate("yeah", true).category(),
            IntentCategory::MeaningfulInput
        );
        assert_eq!(
            evaluator.evaluate("Mm, hmm.", true).category(),
            IntentCategory::Acknowledgement
        );
        assert_eq!(evaluator.evaluate("stop", true).category(), IntentCategory::Command);
    }

    #[test]
    fn test_explicitly_empty_commands() {
        let evaluator = IntentEvaluator::new(None, Some(PhraseSet::default()));
        assert_eq!(
            evaluator.evaluate("please stop", true).category(),
            IntentCategory::MeaningfulInput
        );
        assert_eq!(evaluator.evaluate("ok", true).category(), IntentCategory::Acknowledgement);
    }

    #[test]
    fn test_explicitly_empty_acknowledgements() {
        let evaluator = IntentEvaluator::new(Some(PhraseSet::default()), None);
        assert_eq!(
            evaluator.evaluate("yeah", true).category(),
            IntentCategory::MeaningfulInput
        );
        assert_eq!(evaluator.evaluate("", true).category(), IntentCategory::Acknowledgement);
    }

    #[test]
    fn test_shared_across_threads() {
        let evaluator = std::sync::Arc::new(IntentEvaluator::default());
        let handles: Vec<_> = ["stop", "yeah", "why though"]
            .into_iter()
            .map(|text| {
                let evaluator = std::sync::Arc::clone(&evaluator);
                std::thread::spawn(move || evaluator.evaluate(text, true).category())
            })
            .collect();
        let categories: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            categories,
            vec![
                IntentCategory::Command,
                IntentCategory::Acknowledgement,
                IntentCategory::MeaningfulInput,
            ]
        );
    }
}
