use crate::{
    Secp256k1,
    PublicKey,
    SecretKey,
    Scalar,
    error::{DerivationError, EncodingError}
};
use std::fmt;
use std::sync::OnceLock;

/// Context shared by every key operation in the process.
fn secp() -> &'static Secp256k1<secp256k1::All> {
    static CTX: OnceLock<Secp256k1<secp256k1::All>> = OnceLock::new();
    CTX.get_or_init(Secp256k1::new)
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivKey(SecretKey);

impl PrivKey {
    /**
        Use a predefined byte array as a secret key.
        Fails when the bytes are zero or not below the curve order.
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self, secp256k1::Error> {
        Ok(Self(SecretKey::from_slice(byte_array)?))
    }

    /**
        Serializes the private key into a array of bytes.
    */
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.secret_bytes()
    }

    /**
        Adds a 32 byte tweak modulo the curve order. BIP-32 child private keys are
        parse256(IL) + parent key (mod n).

        The index is only used to report which child was invalid.
    */
    pub fn add_tweak(&self, tweak: &[u8; 32], index: u32) -> Result<Self, DerivationError> {
        let scalar = Scalar::from_be_bytes(*tweak)
            .map_err(|_| DerivationError::InvalidChild(index))?;
        let key = self.0
            .add_tweak(&scalar)
            .map_err(|_| DerivationError::InvalidChild(index))?;
        Ok(Self(key))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PubKey(PublicKey);

impl PubKey {
    /**
        Finds the compressed public key from a secret key.

        Is the result of static point G on the secp256k1 curve multipled k times, where k is the private key.
    */
    pub fn from_priv_key(k: &PrivKey) -> Self {
        Self(PublicKey::from_secret_key(secp(), &k.0))
    }

    /**
        Parses SEC encoded (compressed or uncompressed) public key bytes.
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self, EncodingError> {
        PublicKey::from_slice(byte_array)
            .map(Self)
            .map_err(|e| EncodingError::InvalidPublicKey(e.to_string()))
    }

    /**
        Returns the compressed public key as a byte array.
    */
    pub fn as_bytes(&self) -> [u8; 33] {
        //Len should be 33 (32bytes + sign identifier)
        self.0.serialize()
    }

    /**
       Return the compressed public key as a hex string.
    */
    pub fn hex(&self) -> String {
        self.as_bytes().iter().map(|x| format!("{:02x}", x)).collect()
    }
}

impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PrivKey(<redacted>)")
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PubKey({})", self.hex())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}
