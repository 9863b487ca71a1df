use crate::{
    hash,
    encoding::VersionPrefix,
    error::EncodingError
};

/**
    Returns the Base58Check encoded value of the input data.
    * Prefix is based on use case as defined in the VersionPrefix enum
*/
pub fn check_encode(prefix: VersionPrefix, data: &[u8]) -> String {
    //Prefix | payload
    let mut bytes: Vec<u8> = prefix.to_bytes();
    bytes.extend_from_slice(data);

    //Append the first 4 bytes of the double sha256 of the prefixed payload
    let checksum = hash::sha256d(&bytes);
    bytes.extend_from_slice(&checksum[0..4]);

    bs58::encode(bytes).into_string()
}

/**
    Decodes a given Base58 string into a Byte vector
*/
pub fn decode(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| EncodingError::Base58(e.to_string()))
}

/**
    Decodes a Base58Check string and returns the payload (version included)
    after verifying the trailing checksum.
*/
pub fn check_decode(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    let mut bytes = decode(encoded)?;
    if bytes.len() < 4 {
        return Err(EncodingError::Base58("payload shorter than checksum".to_string()))
    }

    let payload_len = bytes.len() - 4;
    let derived = hash::sha256d(&bytes[..payload_len]);
    if bytes[payload_len..] != derived[0..4] {
        return Err(EncodingError::Base58("bad checksum".to_string()))
    }

    bytes.truncate(payload_len);
    Ok(bytes)
}
