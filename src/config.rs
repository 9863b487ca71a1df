/*
    Job configuration.

    A job is a JSON file naming the phrase template and the candidate words
    for each unknown slot, plus the search tuning knobs. Every knob has a
    default so a job only needs `template` and `choices`.
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    bip39::{PhraseLength, Wordlist},
    candidates::{CandidateSet, Slot},
    ledger::{esplora::BLOCKSTREAM_URL, RetryPolicy},
    search::SearchOptions,
    error::ConfigError
};

/// Marks an unknown slot in a template.
pub const WILDCARD: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Phrase with `?` for every unknown word
    pub template: String,
    /// One list of possible words per `?`, left to right
    pub choices: Vec<Vec<String>>,
    #[serde(default = "default_max_addresses")]
    pub max_addresses: u32,
    #[serde(default)]
    pub passphrase: String,
    #[serde(default = "default_ledger_url")]
    pub ledger_url: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient lookup failure
    #[serde(default)]
    pub retries: u32
}

fn default_max_addresses() -> u32 {
    5
}

fn default_ledger_url() -> String {
    BLOCKSTREAM_URL.to_string()
}

fn default_workers() -> usize {
    8
}

fn default_max_in_flight() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    20
}

impl SearchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /**
        Builds the candidate slots from the template.

        The number of `?` must match the number of choice lists, fixed words
        must be in the wordlist and the template must have a BIP-39 length.
        Choice words outside the wordlist can never form a valid phrase, they
        are dropped with a warning. A slot left without words is an error.
    */
    pub fn candidate_set(&self, wordlist: &Wordlist) -> Result<CandidateSet, ConfigError> {
        let tokens: Vec<&str> = self.template.split_whitespace().collect();
        PhraseLength::from_word_count(tokens.len())
            .map_err(|e| ConfigError::Template(e.to_string()))?;

        let wildcards = tokens.iter().filter(|t| **t == WILDCARD).count();
        if wildcards != self.choices.len() {
            return Err(ConfigError::Template(format!(
                "{} unknown slots but {} choice lists",
                wildcards,
                self.choices.len()
            )))
        }

        let mut choices = self.choices.iter();
        let mut slots: Vec<Slot> = Vec::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            if *token != WILDCARD {
                if !wordlist.contains(token) {
                    return Err(ConfigError::Template(format!("'{}' at position {} is not in the wordlist", token, position)))
                }
                slots.push(Slot::Fixed(token.to_string()));
                continue;
            }

            let mut words: Vec<String> = vec![];
            for word in choices.next().into_iter().flatten().map(|w| w.trim()) {
                if wordlist.contains(word) {
                    words.push(word.to_string());
                } else {
                    tracing::warn!(word, position, "Dropping candidate word not in the wordlist");
                }
            }
            if words.is_empty() {
                return Err(ConfigError::Template(format!("no candidate words for position {}", position)))
            }
            slots.push(Slot::Choice(words));
        }

        Ok(CandidateSet::new(slots))
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            workers: self.workers,
            max_in_flight: self.max_in_flight,
            passphrase: self.passphrase.clone(),
            ..SearchOptions::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        match self.retries {
            0 => RetryPolicy::none(),
            n => RetryPolicy::with_retries(n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip39::Language;

    const JOB: &str = r#"{
        "template": "? ? enforce hope faith riot virtual lunch faculty cinnamon ? ?",
        "choices": [["panel", "panda"], ["machine", "magic"], ["another", "academy"], ["pattern", "panic"]]
    }"#;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = SearchConfig::from_json(JOB).unwrap();
        assert_eq!(config.max_addresses, 5);
        assert_eq!(config.ledger_url, "https://blockstream.info");
        assert_eq!(config.workers, 8);
        assert_eq!(config.max_in_flight, 4);
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.retry_policy(), RetryPolicy::none());
        assert_eq!(config.passphrase, "");
    }

    #[test]
    fn template_expands_to_slots() {
        let config = SearchConfig::from_json(JOB).unwrap();
        let set = config.candidate_set(Language::English.word_list()).unwrap();

        //"academy" is not a BIP-39 word
        assert_eq!(set.len(), Some(8));
        assert_eq!(set.slots()[2], Slot::Fixed("enforce".to_string()));
        assert_eq!(set.slots()[10], Slot::Choice(vec!["another".to_string()]));
        assert_eq!(set.slots()[11], Slot::Choice(vec!["pattern".to_string(), "panic".to_string()]));
    }

    #[test]
    fn wildcard_count_must_match() {
        let mut config = SearchConfig::from_json(JOB).unwrap();
        config.choices.pop();
        assert!(matches!(
            config.candidate_set(Language::English.word_list()),
            Err(ConfigError::Template(_))
        ));
    }

    #[test]
    fn unknown_words() {
        let mut config = SearchConfig::from_json(JOB).unwrap();
        config.choices[2] = vec!["academy".to_string(), "pancake".to_string()];
        assert!(config.candidate_set(Language::English.word_list()).is_err());

        let mut config = SearchConfig::from_json(JOB).unwrap();
        config.template = config.template.replace("enforce", "enforced");
        assert!(config.candidate_set(Language::English.word_list()).is_err());
    }

    #[test]
    fn bad_lengths_and_empty_choices() {
        let mut config = SearchConfig::from_json(JOB).unwrap();
        config.template = "? ? enforce hope ? ?".to_string();
        assert!(config.candidate_set(Language::English.word_list()).is_err());

        let mut config = SearchConfig::from_json(JOB).unwrap();
        config.choices[1].clear();
        assert!(config.candidate_set(Language::English.word_list()).is_err());
    }

    #[test]
    fn overrides_and_missing_fields() {
        let config = SearchConfig::from_json(
            r#"{"template": "a", "choices": [], "workers": 2, "retries": 3, "passphrase": "TREZOR"}"#
        ).unwrap();
        let options = config.search_options();
        assert_eq!(options.workers, 2);
        assert_eq!(options.passphrase, "TREZOR");
        assert_eq!(config.retry_policy().max_attempts, 4);

        assert!(matches!(SearchConfig::from_json(r#"{"template": "? ?"}"#), Err(ConfigError::Json(_))));
    }

    #[test]
    fn shipped_demo_job_parses() {
        let config = SearchConfig::from_json(include_str!("../demos/blockstream_job.json")).unwrap();
        let set = config.candidate_set(Language::English.word_list()).unwrap();
        assert_eq!(set.len(), Some(11 * 12 * 8 * 11));
    }
}
