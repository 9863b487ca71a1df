//! Error taxonomy for the recovery pipeline.
//!
//! Mnemonic and derivation failures are skip-and-continue conditions, lookup
//! failures are reported per address, and only [`SearchError`] halts a batch.

use thiserror::Error;

/// A word sequence that is not a valid BIP-39 mnemonic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("unknown word '{word}' at position {position}")]
    UnknownWord { word: String, position: usize },

    #[error("expected 12, 15, 18, 21 or 24 words, found {0}")]
    BadWordCount(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Failure while walking a BIP-32 derivation path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// IL was not below the curve order or the child key was zero.
    #[error("derived key at child {0} is invalid")]
    InvalidChild(u32),

    #[error("child index {0} must be less than 2^31")]
    IndexOutOfRange(u32),

    #[error("bad derivation path: {0}")]
    BadPath(String),
}

/// Failure while turning key material into an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("base58 error: {0}")]
    Base58(String),
}

/// Failure to learn the funded total of an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("ledger returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed ledger response: {0}")]
    Malformed(String),

    #[error("lookup cancelled")]
    Cancelled,
}

impl LookupError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) | Self::Cancelled => false,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Conditions that halt the whole search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("address encoding failed for '{phrase}' at index {index}: {source}")]
    Encoding {
        phrase: String,
        index: u32,
        #[source]
        source: EncodingError,
    },

    #[error("worker failed: {0}")]
    Worker(String),
}

/// Invalid job configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid template: {0}")]
    Template(String),

    #[error("invalid wordlist: {0}")]
    Wordlist(String),
}
