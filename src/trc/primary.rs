use std::collections::BTreeMap;

#[cfg(test)]
use proptest_derive::Arbitrary;
use serde::{Deserialize, Serialize};

use super::KeyType;

/// What a primary AS is trusted to do within its ISD.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Authoritative,
    Core,
    Issuing,
    Voting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMeta {
    pub key_version: u64,
    pub algorithm: String,
    #[serde(with = "crate::util::bytes")]
    pub key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAs {
    pub attributes: Vec<Attribute>,
    pub keys: BTreeMap<KeyType, KeyMeta>,
}
