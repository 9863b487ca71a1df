/*
    Module that bundles together the encoding schemes used for legacy
    addresses and extended keys.
*/

pub mod version_prefix;
pub mod bs58check;
pub use version_prefix::VersionPrefix as VersionPrefix;
