/*
    This module implements child key derivation
    from parent extended private keys
    under the BIP32 standard.

    Reference:
        https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki
*/

use crate::{
    hash::hmac_sha512,
    hdwallet::{
        ChildIndex,
        Xprv
    },
    error::DerivationError
};

/**
    Function to derive new child xprv keys from parent xprv keys.
    Hardened children commit to the parent private key, normal children to the parent public key.
*/
pub fn derive_xprv(parent: &Xprv, options: ChildIndex) -> Result<Xprv, DerivationError> {
    let index: u32 = options.to_u32()?;

    let mut data: Vec<u8> = Vec::with_capacity(37);
    if options.is_hardened() {
        //Hardened private key child is [0x00 || parent priv bytes || index bytes]
        data.push(0x00);
        data.extend_from_slice(&parent.key().as_bytes());
    } else {
        //Normal private key child is [parent pub bytes || index bytes]
        data.extend_from_slice(&parent.get_pub().as_bytes());
    }
    data.extend_from_slice(&index.to_be_bytes());

    //Hash the data with the parent chaincode as the key
    let hash: [u8; 64] = hmac_sha512(&data, parent.chaincode());

    //Split the hash into two halves. The right half is the child chaincode.
    let mut left_bytes = [0u8; 32];
    let mut child_chaincode = [0u8; 32];
    left_bytes.copy_from_slice(&hash[0..32]);
    child_chaincode.copy_from_slice(&hash[32..64]);

    //Child key = IL + parent key (mod n). Invalid when IL >= n or the sum is zero.
    let child_key = parent.key().add_tweak(&left_bytes, index)?;

    Ok(
        Xprv::construct(
            child_key,
            child_chaincode,
            parent.depth + 1,
            parent.fingerprint(),
            index
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::VersionPrefix;

    //BIP-32 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn bip32_vector_one() {
        let master = Xprv::from_seed_bytes(&hex::decode(SEED).unwrap()).unwrap();
        assert_eq!(
            master.serialize(VersionPrefix::Xprv),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );

        let hardened = derive_xprv(&master, ChildIndex::Hardened(0)).unwrap();
        assert_eq!(
            hardened.serialize(VersionPrefix::Xprv),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );

        let normal = derive_xprv(&hardened, ChildIndex::Normal(1)).unwrap();
        assert_eq!(
            normal.serialize(VersionPrefix::Xprv),
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
        );
        assert_eq!(normal.depth, 2);
        assert_eq!(normal.index, 1);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let master = Xprv::from_seed_bytes(&hex::decode(SEED).unwrap()).unwrap();
        assert_eq!(
            derive_xprv(&master, ChildIndex::Normal(1 << 31)).unwrap_err(),
            DerivationError::IndexOutOfRange(1 << 31)
        );
    }
}
