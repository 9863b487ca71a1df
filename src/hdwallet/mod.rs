/*
    This module implements hierarchical deterministic key derivation
    under the BIP 32 standard, along the BIP 44 legacy bitcoin path.

    Based on chapter 5 of the bitcoin book. (https://github.com/bitcoin/bitcoinbook/)
*/

pub mod ckd;
pub mod path;
pub mod extended_keys;
pub mod hdwallet;

pub use path::{
    ChildIndex,
    DerivationPath,
    HARDENED_OFFSET
};
pub use extended_keys::Xprv;
pub use hdwallet::{
    derive,
    AccountChain
};
pub use crate::error::DerivationError as HDWError;
