use crate::{
    address::Address,
    bip39::Seed,
    hdwallet::{
        ChildIndex,
        DerivationPath,
        Xprv
    },
    error::DerivationError
};

/**
    Walks the path from the seed's master key and returns the node at each depth.
*/
pub fn derive(seed: &Seed, path: &DerivationPath) -> Result<Vec<Xprv>, DerivationError> {
    Xprv::from_seed(seed)?.derive_path(path)
}

/**
    External chain m/44'/0'/account'/0 of a BIP-44 bitcoin account.

    The hardened prefix is derived once per seed, then only the
    trailing address index is derived for each address.
*/
pub struct AccountChain {
    account: u32,
    external: Xprv
}

impl AccountChain {
    pub fn from_seed(seed: &Seed, account: u32) -> Result<Self, DerivationError> {
        let path = DerivationPath::bip44_external(account);
        let external = match Xprv::from_seed(seed)?.derive_path(&path)?.pop() {
            Some(x) => x,
            None => return Err(DerivationError::BadPath(path.to_string()))
        };

        Ok(Self {
            account,
            external
        })
    }

    /// Full path of the address at index.
    pub fn path_to(&self, index: u32) -> DerivationPath {
        DerivationPath::bip44_external(self.account).child(ChildIndex::Normal(index))
    }

    pub fn address_key(&self, index: u32) -> Result<Xprv, DerivationError> {
        self.external.derive_child(ChildIndex::Normal(index))
    }

    /**
        Legacy P2PKH address at m/44'/0'/account'/0/index
    */
    pub fn address_at(&self, index: u32) -> Result<Address, DerivationError> {
        Ok(Address::p2pkh(&self.address_key(index)?.get_pub()))
    }
}
