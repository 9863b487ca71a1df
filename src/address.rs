use std::fmt;

use serde::{Deserialize, Serialize};

use crate:: {
    key::PubKey,
    hash,
    encoding::{
        bs58check,
        VersionPrefix
    },
    error::EncodingError
};

/// Legacy pay-to-public-key-hash mainnet address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /**
        Creates a wallet address from a compressed public key.
        * Base58Check( 0x00 || Ripemd160( Sha256( Public Key ) ) )
    */
    pub fn p2pkh(pk: &PubKey) -> Self {
        let hash = hash::hash160(pk.as_bytes());
        Self(bs58check::check_encode(VersionPrefix::BTCAddress, &hash))
    }

    /**
        Creates a wallet address from raw SEC public key bytes.
        Uncompressed keys are re-encoded in compressed form first.
    */
    pub fn from_pubkey_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        Ok(Self::p2pkh(&PubKey::from_slice(bytes)?))
    }

    /**
        Verifies that an address is a mainnet P2PKH address by checking the
        payload length, version byte and checksum
    */
    pub fn is_valid(address: &str) -> bool {
        match bs58check::check_decode(address) {
            Ok(payload) => payload.len() == 21 && payload[0] == 0x00,
            Err(_) => false
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Address;
    use crate::key::{PrivKey, PubKey};
    use rand::RngCore;

    const TEST_PUB_KEY_HEX: &str = "0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe";

    //m/44'/0'/0'/0/0 and m/44'/0'/0'/0/1 of "abandon ... about"
    const BIP44_PUB_KEYS: [(&str, &str); 2] = [
        ("03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e", "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"),
        ("02dfcaec532010d704860e20ad6aff8cf3477164ffb02f93d45c552dadc70ed24f", "1Ak8PffB2meyfYnbXZR9EGfLfFZVpzJvQP")
    ];

    #[test]
    fn bitcoin_address_tests() {
        let derived = Address::from_pubkey_bytes(&hex::decode(TEST_PUB_KEY_HEX).unwrap()).unwrap();
        assert_eq!(derived.as_str(), "124ERAK4SqHMNWXycHPautn5zDYRKr3b2E");
        assert!(Address::is_valid(derived.as_str()));

        //Same key, same address
        let again = Address::from_pubkey_bytes(&hex::decode(TEST_PUB_KEY_HEX).unwrap()).unwrap();
        assert_eq!(derived, again);
    }

    #[test]
    fn distinct_keys_distinct_addresses() {
        let addresses: Vec<Address> = BIP44_PUB_KEYS
            .iter()
            .map(|(pk, _)| Address::from_pubkey_bytes(&hex::decode(pk).unwrap()).unwrap())
            .collect();

        for (derived, (_, expected)) in addresses.iter().zip(BIP44_PUB_KEYS.iter()) {
            assert_eq!(derived.as_str(), *expected);
        }
        assert_ne!(addresses[0], addresses[1]);
    }

    #[test]
    fn random_bitcoin_address_tests() {
        let mut rng = rand::thread_rng();
        for _i in 0..5 {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            let k = match PrivKey::from_slice(&bytes) {
                Ok(k) => k,
                Err(_) => continue
            };
            let address = Address::p2pkh(&PubKey::from_priv_key(&k));

            //Test if the leading prefix of the address is '1'
            assert!(address.as_str().starts_with('1'));
            assert!(Address::is_valid(address.as_str()));
        }
    }

    #[test]
    fn invalid_addresses() {
        assert!(!Address::is_valid(""));
        assert!(!Address::is_valid("124ERAK4SqHMNWXycHPautn5zDYRKr3b2F"));
        //P2SH mainnet address has the wrong version byte
        assert!(!Address::is_valid("33SjjXog5Tqm3kCYNGCQBH46gc48a4SUXn"));
        assert!(Address::from_pubkey_bytes(&[0x02; 10]).is_err());
    }
}
