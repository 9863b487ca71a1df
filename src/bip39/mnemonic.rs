use std::fmt;

use unicode_normalization::UnicodeNormalization;

use crate::{
    hash,
    pbkdf2_hmac,
    Sha512,
    error::MnemonicError
};
use super::lang::Wordlist;

pub const PBKDF2_ROUNDS: u32 = 2048;
pub const SEED_LEN: usize = 64;

/// A word sequence whose BIP-39 checksum has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>
}

/// 64 byte root of a key tree. Never printed.
pub struct Seed([u8; SEED_LEN]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseLength {
    Twelve,
    Fifteen,
    Eighteen,
    TwentyOne,
    TwentyFour
}

impl PhraseLength {
    pub fn from_word_count(count: usize) -> Result<Self, MnemonicError> {
        Ok(match count {
            12 => PhraseLength::Twelve,
            15 => PhraseLength::Fifteen,
            18 => PhraseLength::Eighteen,
            21 => PhraseLength::TwentyOne,
            24 => PhraseLength::TwentyFour,
            x => return Err(MnemonicError::BadWordCount(x))
        })
    }

    pub fn word_count(&self) -> usize {
        match self {
            PhraseLength::Twelve => 12,
            PhraseLength::Fifteen => 15,
            PhraseLength::Eighteen => 18,
            PhraseLength::TwentyOne => 21,
            PhraseLength::TwentyFour => 24
        }
    }

    /// Entropy length in bits. 32 bits per 3 words.
    pub fn entropy_bits(&self) -> usize {
        self.word_count() / 3 * 32
    }

    /// Checksum length in bits. 1 bit per 3 words.
    pub fn checksum_bits(&self) -> usize {
        self.word_count() / 3
    }
}

impl Mnemonic {
    /**
        Validates a word sequence against the wordlist and the embedded checksum.

        Returns false for unknown words, bad lengths and checksum mismatches.
    */
    pub fn validate<S: AsRef<str>>(words: &[S], list: &Wordlist) -> bool {
        Self::check(words, list).is_ok()
    }

    /**
        Builds a mnemonic from words. This is the only way to obtain a Mnemonic
        so seeds are never derived from an unchecked phrase.
    */
    pub fn from_words<S: AsRef<str>>(words: &[S], list: &Wordlist) -> Result<Self, MnemonicError> {
        Self::check(words, list)?;
        Ok(Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect()
        })
    }

    /**
        Splits a phrase on whitespace and validates it.
    */
    pub fn from_phrase(phrase: &str, list: &Wordlist) -> Result<Self, MnemonicError> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        Self::from_words(&words, list)
    }

    /**
        Stretches the mnemonic into a seed.
        PBKDF2-HMAC-SHA512(NFKD(phrase), "mnemonic" || NFKD(passphrase), 2048 rounds)
    */
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let password: String = self.phrase().nfkd().collect();
        let salt: String = format!("mnemonic{}", passphrase).nfkd().collect();

        let mut seed = [0u8; SEED_LEN];
        pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
        Seed(seed)
    }

    /**
        Recovers the entropy bytes from the word indices, dropping the checksum bits.
    */
    pub fn entropy(&self, list: &Wordlist) -> Result<Vec<u8>, MnemonicError> {
        let indices = Self::indices(&self.words, list)?;
        let length = PhraseLength::from_word_count(self.words.len())?;
        let mut bytes = pack_indices(&indices);
        bytes.truncate(length.entropy_bits() / 8);
        Ok(bytes)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn check<S: AsRef<str>>(words: &[S], list: &Wordlist) -> Result<(), MnemonicError> {
        let length = PhraseLength::from_word_count(words.len())?;
        let indices = Self::indices(words, list)?;

        //Concatenate the 11 bit indices. Entropy bits always end on a byte boundary
        //and the checksum (at most 8 bits) sits at the top of the following byte.
        let bytes = pack_indices(&indices);
        let entropy_len = length.entropy_bits() / 8;
        let shift = 8 - length.checksum_bits();

        let embedded = bytes[entropy_len] >> shift;
        let derived = hash::sha256(&bytes[..entropy_len])[0] >> shift;

        if embedded != derived {
            return Err(MnemonicError::ChecksumMismatch)
        }
        Ok(())
    }

    fn indices<S: AsRef<str>>(words: &[S], list: &Wordlist) -> Result<Vec<u16>, MnemonicError> {
        words
            .iter()
            .enumerate()
            .map(|(position, w)| {
                list.index_of(w.as_ref()).ok_or_else(|| MnemonicError::UnknownWord {
                    word: w.as_ref().to_string(),
                    position
                })
            })
            .collect()
    }
}

/**
    Packs 11 bit word indices big-endian into a byte vector. The final byte
    is zero padded on the right.
*/
fn pack_indices(indices: &[u16]) -> Vec<u8> {
    let mut bytes: Vec<u8> = vec![0; (indices.len() * 11 + 7) / 8];
    for (i, index) in indices.iter().enumerate() {
        for bit in 0..11 {
            if (index >> (10 - bit)) & 1 == 1 {
                let pos = i * 11 + bit;
                bytes[pos / 8] |= 1 << (7 - pos % 8);
            }
        }
    }
    bytes
}

impl Seed {
    /// Wraps raw seed bytes, e.g. from a published test vector.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.phrase())
    }
}
