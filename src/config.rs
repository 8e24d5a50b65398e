//! Configuration loading and management

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::intent::{Lexicon, PhraseSet};

/// Socket path override
pub const SOCKET_VAR: &str = "SPEECH_INTENT_SOCKET";
/// Path to a JSON lexicon file
pub const LEXICON_FILE_VAR: &str = "SPEECH_INTENT_LEXICON";
/// Comma-separated acknowledgement phrases
pub const ACKNOWLEDGEMENTS_VAR: &str = "SPEECH_INTENT_ACKNOWLEDGEMENTS";
/// Comma-separated command phrases
pub const COMMANDS_VAR: &str = "SPEECH_INTENT_COMMANDS";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME is not set and SPEECH_INTENT_SOCKET was not given")]
    NoHome,

    #[error("failed to read lexicon file {path}: {source}")]
    LexiconRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lexicon file {path}: {source}")]
    LexiconParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Lexicon overrides as written in a lexicon file.
///
/// A missing key keeps the default set; a present key replaces it, even `[]`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    acknowledgements: Option<Vec<String>>,
    commands: Option<Vec<String>>,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Acknowledgement override, `None` for the defaults
    pub acknowledgements: Option<PhraseSet>,

    /// Command override, `None` for the defaults
    pub commands: Option<PhraseSet>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let socket_path = match lookup(SOCKET_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => {
                let home = lookup("HOME").ok_or(ConfigError::NoHome)?;
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("speech-intent")
                    .join("intent.sock")
            }
        };

        let file = match lookup(LEXICON_FILE_VAR) {
            Some(path) if !path.is_empty() => read_lexicon_file(Path::new(&path))?,
            _ => LexiconFile::default(),
        };

        // Variables win over the file; a set but empty variable is an empty set
        let acknowledgements = lookup(ACKNOWLEDGEMENTS_VAR)
            .map(|list| split_phrases(&list))
            .or(file.acknowledgements.map(PhraseSet::new));
        let commands = lookup(COMMANDS_VAR)
            .map(|list| split_phrases(&list))
            .or(file.commands.map(PhraseSet::new));

        Ok(Self {
            socket_path,
            acknowledgements,
            commands,
        })
    }

    /// Build the lexicon described by this configuration
    pub fn lexicon(&self) -> Lexicon {
        Lexicon::new(self.acknowledgements.clone(), self.commands.clone())
    }
}

fn read_lexicon_file(path: &Path) -> Result<LexiconFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::LexiconRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::LexiconParse {
        path: path.to_owned(),
        source,
    })
}

fn split_phrases(list: &str) -> PhraseSet {
    list.split(',').collect()
}
