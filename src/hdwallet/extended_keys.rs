/*
    This module implements extended private keys that are
    used in BIP32 hierarchal deterministic wallets.

    An extended key is a 32 byte key plus a 32 byte chaincode, together with
    the metadata (depth, parent fingerprint, child number) needed to serialise it.
*/

use std::fmt;

use crate::{
    key::{
        PrivKey,
        PubKey
    },
    encoding::{
        bs58check,
        VersionPrefix
    },
    hdwallet::{
        ckd::derive_xprv,
        ChildIndex,
        DerivationPath
    },
    bip39::Seed,
    hash,
    error::DerivationError
};

/// HMAC key for the master node.
const MASTER_KEY: &[u8] = b"Bitcoin seed";

/// One node of a key tree. Exclusively owned by the walk that derived it.
#[derive(Clone, Copy)]
pub struct Xprv {
    key: PrivKey,
    chaincode: [u8; 32],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub index: u32
}

impl Xprv {
    /**
        Constructs the Extended Key.
    */
    pub fn construct(key: PrivKey, chaincode: [u8; 32], depth: u8, pf: [u8; 4], index: u32) -> Self {
        Self {
            key,
            chaincode,
            depth,
            parent_fingerprint: pf,
            index
        }
    }

    /**
        Convert a mnemonic seed to the master private key.
    */
    pub fn from_seed(seed: &Seed) -> Result<Self, DerivationError> {
        Self::from_seed_bytes(seed.as_bytes())
    }

    /**
        Master key from raw seed bytes (BIP-32 allows 16 to 64 bytes).
    */
    pub fn from_seed_bytes(seed: &[u8]) -> Result<Self, DerivationError> {
        let mprivkey_bytes: [u8; 64] = hash::hmac_sha512(seed, MASTER_KEY);
        let key = PrivKey::from_slice(&mprivkey_bytes[0..32])
            .map_err(|_| DerivationError::InvalidChild(0))?;

        let mut chaincode = [0u8; 32];
        chaincode.copy_from_slice(&mprivkey_bytes[32..64]);

        Ok(Self::construct(key, chaincode, 0, [0x00; 4], 0))
    }

    pub fn key(&self) -> &PrivKey {
        &self.key
    }

    pub fn chaincode(&self) -> &[u8; 32] {
        &self.chaincode
    }

    /**
        Return the non extended public key of self.
    */
    pub fn get_pub(&self) -> PubKey {
        PubKey::from_priv_key(&self.key)
    }

    /**
        First 4 bytes of hash160 of the public key. Children record this as their parent fingerprint.
    */
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut fp = [0u8; 4];
        fp.copy_from_slice(&hash::hash160(self.get_pub().as_bytes())[0..4]);
        fp
    }

    /**
        Derives the child key of self
    */
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self, DerivationError> {
        derive_xprv(self, index)
    }

    /**
        Walks the path from self and returns the node at every depth.
        The last element is the node at the end of the path.
    */
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Vec<Self>, DerivationError> {
        let mut nodes: Vec<Self> = Vec::with_capacity(path.len());
        let mut current: Self = *self;
        for child in &path.children {
            current = current.derive_child(*child)?;
            nodes.push(current);
        }
        Ok(nodes)
    }

    /**
        Serialize the extended key with the selected prefix
    */
    pub fn serialize(&self, v_prefix: VersionPrefix) -> String {
        let mut payload: Vec<u8> = Vec::with_capacity(74);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.index.to_be_bytes());
        payload.extend_from_slice(&self.chaincode);
        payload.push(0x00); //private key append 0x00
        payload.extend_from_slice(&self.key.as_bytes());

        bs58check::check_encode(v_prefix, &payload)
    }
}

impl fmt::Debug for Xprv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xprv")
         .field("depth", &self.depth)
         .field("parent_fingerprint", &self.parent_fingerprint)
         .field("index", &self.index)
         .finish_non_exhaustive()
    }
}
