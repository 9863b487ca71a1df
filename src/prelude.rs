/*
    This module contains the default imports for the library.

    Import the library using:
        use btc_seedscan::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    key::{
        PubKey,
        PrivKey
    },

    address::Address,

    bip39::{
        MnemonicErr,
        Language,
        Mnemonic,
        PhraseLength,
        Seed,
        Wordlist
    },

    candidates::{
        CandidateSet,
        Slot
    },

    hdwallet::{
        AccountChain,
        ChildIndex,
        DerivationPath,
        Xprv,
        HDWError
    },

    encoding::VersionPrefix,

    ledger::{
        BalanceLookup,
        EsploraClient,
        Funding,
        RetryPolicy,
        Retrying
    },

    search::{
        CancelHandle,
        SearchOptions,
        SearchReport,
        SearchResult,
        Searcher
    },

    config::SearchConfig,

    error::{
        LookupError,
        SearchError,
        ConfigError
    }

};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_covers_a_single_phrase_walk() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let mnemonic = Mnemonic::from_phrase(phrase, Language::English.word_list()).unwrap();
        let chain = AccountChain::from_seed(&mnemonic.to_seed(""), 0).unwrap();

        let address: Address = chain.address_at(0).unwrap();
        assert_eq!(address.as_str(), "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
        assert_eq!(chain.path_to(0), DerivationPath::bip44_external(0).child(ChildIndex::Normal(0)));
    }
}
