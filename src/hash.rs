/*
    Hash module include hash functions necessary to stretch a mnemonic,
    derive child keys and hash a public key into an address.
*/

use crate::{
    Digest, Hmac, Mac, Ripemd160, Sha256, Sha512
};

type HmacSha512 = Hmac<Sha512>;

/*
    Takes in an byte array and returns the ripemd160 hash of it
*/
pub fn ripemd160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    let mut r = Ripemd160::new();
    r.update(input);
    r.finalize().into()
}

/*
    Takes in a byte array and returns the sha256 hash of it
*/
pub fn sha256<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    let mut r = Sha256::new();
    r.update(input);
    r.finalize().into()
}

/*
    Sha256(Sha256(input)). Used for base58check checksums.
*/
pub fn sha256d<T>(input: T) -> [u8; 32]
where T: AsRef<[u8]>
{
    sha256(sha256(input))
}

/*
    Ripemd160(Sha256(input)). Public key hash and key fingerprints.
*/
pub fn hash160<T>(input: T) -> [u8; 20]
where T: AsRef<[u8]>
{
    ripemd160(sha256(input))
}

/*
    HMAC-SHA512 of data keyed with key. BIP-32 master and child key derivation.
*/
pub fn hmac_sha512(data: &[u8], key: &[u8]) -> [u8; 64] {
    //HMAC accepts keys of any length so new_from_slice cannot fail here
    let mut mac = match HmacSha512::new_from_slice(key) {
        Ok(m) => m,
        Err(_) => unreachable!("hmac accepts keys of any length")
    };
    mac.update(data);

    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}
