/*
    This module helps with parsing derivation paths passed in as strings
    as vectors of ChildIndex that can be used to derive a child key.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::DerivationError;

pub const HARDENED_OFFSET: u32 = 1 << 31;

/**
    Enum to pattern match child key derivation options.
    The contained index is always below 2^31, hardening adds the offset.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildIndex {
    Normal(u32),
    Hardened(u32)
}

impl ChildIndex {
    /// Child number as serialised in BIP-32 (hardened indices include 2^31).
    pub fn to_u32(&self) -> Result<u32, DerivationError> {
        match *self {
            ChildIndex::Normal(x) | ChildIndex::Hardened(x) if x >= HARDENED_OFFSET => {
                Err(DerivationError::IndexOutOfRange(x))
            },
            ChildIndex::Normal(x) => Ok(x),
            ChildIndex::Hardened(x) => Ok(x + HARDENED_OFFSET)
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildIndex::Hardened(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    pub children: Vec<ChildIndex>
}

impl DerivationPath {
    /**
        External chain of a BIP-44 bitcoin account: m/44'/0'/account'/0
    */
    pub fn bip44_external(account: u32) -> Self {
        Self {
            children: vec![
                ChildIndex::Hardened(44),
                ChildIndex::Hardened(0),
                ChildIndex::Hardened(account),
                ChildIndex::Normal(0)
            ]
        }
    }

    /**
        Returns a copy of self extended by one child.
    */
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut children = self.children.clone();
        children.push(index);
        Self { children }
    }

    pub fn empty() -> Self {
        Self {
            children: vec![]
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(DerivationError::BadPath(path.to_string()))
        }

        let mut children: Vec<ChildIndex> = vec![];
        for part in parts {
            //Trailing ' or h marks a hardened child
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| part.strip_suffix('h')) {
                Some(x) => (x, true),
                None => (part, false)
            };

            let index: u32 = digits
                .parse()
                .map_err(|_| DerivationError::BadPath(path.to_string()))?;
            if index >= HARDENED_OFFSET {
                return Err(DerivationError::IndexOutOfRange(index))
            }

            children.push(if hardened { ChildIndex::Hardened(index) } else { ChildIndex::Normal(index) });
        }

        Ok(Self { children })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.children {
            match child {
                ChildIndex::Normal(x) => write!(f, "/{}", x)?,
                ChildIndex::Hardened(x) => write!(f, "/{}'", x)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_test() {
        let path_str = "m/44'/0'/0'/0/3";
        let path_struct = DerivationPath::bip44_external(0).child(ChildIndex::Normal(3));

        assert_eq!(path_str, path_struct.to_string());
        assert_eq!(DerivationPath::from_str(path_str).unwrap(), path_struct);
        assert_eq!(DerivationPath::from_str("m/44h/0h/0h/0/3").unwrap(), path_struct);
        assert_eq!(DerivationPath::from_str("m").unwrap(), DerivationPath::empty());
    }

    #[test]
    fn bad_paths() {
        assert!(DerivationPath::from_str("44'/0'").is_err());
        assert!(DerivationPath::from_str("m/x").is_err());
        assert!(DerivationPath::from_str("m/1//2").is_err());
        assert_eq!(
            DerivationPath::from_str("m/2147483648"),
            Err(DerivationError::IndexOutOfRange(2147483648))
        );
    }

    #[test]
    fn child_numbers() {
        assert_eq!(ChildIndex::Normal(5).to_u32(), Ok(5));
        assert_eq!(ChildIndex::Hardened(0).to_u32(), Ok(HARDENED_OFFSET));
        assert_eq!(ChildIndex::Hardened(HARDENED_OFFSET).to_u32(), Err(DerivationError::IndexOutOfRange(HARDENED_OFFSET)));
    }
}
