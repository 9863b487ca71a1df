#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPrefix {
    //One byte version prefix
        BTCAddress = 0x00,

    //Four byte version prefix
        //BIP-32
        Xprv = 0x0488ADE4
}

impl VersionPrefix {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            VersionPrefix::BTCAddress => vec![0x00],
            VersionPrefix::Xprv => (*self as u32).to_be_bytes().to_vec()
        }
    }
}
