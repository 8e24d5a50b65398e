//! Acknowledgement and command phrase sets
//!
//! Phrases are normalized when a set is built, so caller-supplied phrases
//! match the same way utterances do. A `Lexicon` never changes after it is
//! constructed.

use std::collections::BTreeSet;

use super::normalize::normalize;

/// Phrases that signal passive listening
pub const DEFAULT_ACKNOWLEDGEMENTS: &[&str] = &[
    "yeah", "yes", "yep", "uh huh", "ok", "okay", "hmm", "right", "sure", "got it", "i see", "ah",
    "oh", "alright",
];

/// Phrases that signal the speaker wants the agent to yield
pub const DEFAULT_COMMANDS: &[&str] = &[
    "stop",
    "wait",
    "pause",
    "hold on",
    "excuse me",
    "sorry",
    "question",
];

/// An immutable set of normalized phrases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: BTreeSet<String>,
}

impl PhraseSet {
    /// Build a set from raw phrases, normalizing each one.
    ///
    /// Phrases that normalize to nothing are dropped.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// Exact membership of an already-normalized phrase or token
    pub fn contains(&self, normalized: &str) -> bool {
        self.phrases.contains(normalized)
    }

    /// True if any phrase occurs as a substring of `normalized`
    pub fn any_within(&self, normalized: &str) -> bool {
        self.phrases.iter().any(|p| normalized.contains(p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// The two phrase sets an evaluator classifies against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    acknowledgements: PhraseSet,
    commands: PhraseSet,
}

impl Lexicon {
    /// Build a lexicon from optional overrides.
    ///
    /// `None` keeps the default set for that category. `Some` replaces it
    /// entirely, including when the supplied set is empty.
    pub fn new(acknowledgements: Option<PhraseSet>, commands: Option<PhraseSet>) -> Self {
        Self {
            acknowledgements: acknowledgements
                .unwrap_or_else(|| PhraseSet::new(DEFAULT_ACKNOWLEDGEMENTS)),
            commands: commands.unwrap_or_else(|| PhraseSet::new(DEFAULT_COMMANDS)),
        }
    }

    pub fn acknowledgements(&self) -> &PhraseSet {
        &self.acknowledgements
    }

    pub fn commands(&self) -> &PhraseSet {
        &self.commands
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(None, None)
    }
}
