//! Utterance intent classification
//!
//! Decides whether something the user said while the agent was talking
//! should interrupt the agent:
//! - Command: contains a command phrase ("stop", "hold on"), interrupts
//! - Acknowledgement: filler or backchannel ("yeah", "uh huh"), ignored
//! - MeaningfulInput: any other contribution, interrupts
//! - AgentIdle: the agent was silent, nothing to suppress

mod decision;
mod evaluator;
mod lexicon;
mod normalize;

pub use decision::{IntentCategory, IntentDecision};
pub use evaluator::IntentEvaluator;
pub use lexicon::{Lexicon, PhraseSet, DEFAULT_ACKNOWLEDGEMENTS, DEFAULT_COMMANDS};
pub use normalize::{normalize, tokens};
