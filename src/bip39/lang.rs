/*
    Wordlists for BIP-39 mnemonics.

    A wordlist is 2048 unique words where the position of a word
    is its 11 bit index. Lists are immutable once built and shared
    by reference, so they need no locking.
*/

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ConfigError;

const ENGLISH: &str = include_str!("../../wordlists/english.txt");

pub const WORDLIST_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English
}

impl Language {
    /// Returns the process-wide instance of this language's list.
    pub fn word_list(&self) -> &'static Wordlist {
        static EN: OnceLock<Wordlist> = OnceLock::new();
        match self {
            Language::English => EN.get_or_init(Wordlist::english)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wordlist {
    words: Vec<String>,
    index: HashMap<String, u16>
}

impl Wordlist {
    /**
        Builds the embedded English list.
    */
    pub fn english() -> Self {
        match Self::parse(ENGLISH) {
            Ok(w) => w,
            Err(e) => unreachable!("embedded english wordlist is invalid: {}", e)
        }
    }

    /**
        Parses a wordlist from text with one word per line. Index = line number.
        Blank lines before and after the list are ignored. A blank line inside
        it, or anything other than 2048 unique words, is rejected.
    */
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim()).collect();
        let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
        let last = lines.iter().rposition(|l| !l.is_empty()).map_or(first, |i| i + 1);

        //A gap inside the list would shift every later index
        if let Some(gap) = lines[first..last].iter().position(|l| l.is_empty()) {
            return Err(ConfigError::Wordlist(format!("blank line {} inside the list", first + gap + 1)))
        }
        let words: Vec<String> = lines[first..last].iter().map(|l| l.to_string()).collect();

        if words.len() != WORDLIST_LEN {
            return Err(ConfigError::Wordlist(
                format!("expected {} words, found {}", WORDLIST_LEN, words.len())
            ))
        }

        let mut index: HashMap<String, u16> = HashMap::with_capacity(WORDLIST_LEN);
        for (i, w) in words.iter().enumerate() {
            if index.insert(w.clone(), i as u16).is_some() {
                return Err(ConfigError::Wordlist(format!("duplicate word '{}'", w)))
            }
        }

        Ok(Self { words, index })
    }

    /**
        Reads and parses a wordlist file.
    */
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// 11 bit index of a word, None if the word is not in the list.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    pub fn word(&self, index: u16) -> Option<&str> {
        self.words.get(index as usize).map(|w| w.as_str())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_indices() {
        let list = Language::English.word_list();
        assert_eq!(list.len(), 2048);
        assert_eq!(list.index_of("abandon"), Some(0));
        assert_eq!(list.index_of("about"), Some(3));
        assert_eq!(list.index_of("zoo"), Some(2047));
        assert_eq!(list.word(2047), Some("zoo"));
        assert_eq!(list.index_of("bitcoin"), None);
    }

    #[test]
    fn rejects_short_and_duplicate_lists() {
        assert!(Wordlist::parse("one\ntwo\nthree").is_err());

        let mut words: Vec<String> = (0..2047).map(|i| format!("w{}", i)).collect();
        words.push("w0".to_string());
        assert!(Wordlist::parse(&words.join("\n")).is_err());

        words.pop();
        words.push("w2047".to_string());
        assert!(Wordlist::parse(&words.join("\n")).is_ok());
    }

    #[test]
    fn index_is_line_number() {
        let words: Vec<String> = (0..2048).map(|i| format!("w{}", i)).collect();

        //Surrounding blank lines are fine
        let padded = format!("\n\n{}\n\n", words.join("\n"));
        let list = Wordlist::parse(&padded).unwrap();
        assert_eq!(list.index_of("w1000"), Some(1000));

        //A blank line inside the list is rejected, even with 2048 words
        let mut gapped = words.clone();
        gapped.insert(500, String::new());
        assert!(matches!(Wordlist::parse(&gapped.join("\n")), Err(ConfigError::Wordlist(_))));
    }
}
