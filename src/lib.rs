/*
    Library to recover and verify BIP-39 seed phrases from partial knowledge.

    Candidate phrases are enumerated from fixed and variable word slots,
    filtered by the BIP-39 checksum, expanded into BIP-32 keys along
    m/44'/0'/0'/0/i, encoded as legacy P2PKH addresses and checked
    against an Esplora compatible ledger service for funding.

    References:
        - BIP-39 (https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki)
        - BIP-32 (https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki)
        - BIP-44 (https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki)
        - Esplora HTTP API (https://github.com/Blockstream/esplora/blob/master/API.md)
*/

//Outward facing modules
pub mod key;
pub mod address;
pub mod bip39;
pub mod candidates;
pub mod hdwallet;
pub mod encoding;
pub mod ledger;
pub mod search;
pub mod config;
pub mod error;
pub mod prelude;

//Modules for internal use
mod hash;

//Dependencies
use secp256k1::{PublicKey, Secp256k1, SecretKey, Scalar};
use hmac::{Mac, Hmac};
use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512, Digest};
use ripemd::Ripemd160;
