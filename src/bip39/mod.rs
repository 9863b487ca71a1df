/*
    This module implements the BIP-0039 standard for mnemonic phrases:
    checksum validation over a wordlist, entropy recovery and seed stretching.

    Based on chapter 5 of the bitcoin book. (https://github.com/bitcoin/bitcoinbook/)
*/

pub mod lang;
pub mod mnemonic;

pub use mnemonic::Mnemonic as Mnemonic;
pub use mnemonic::PhraseLength as PhraseLength;
pub use mnemonic::Seed as Seed;
pub use lang::Language as Language;
pub use lang::Wordlist as Wordlist;
pub use crate::error::MnemonicError as MnemonicErr;
