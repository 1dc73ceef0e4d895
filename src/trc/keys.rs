use std::fmt;
use std::str::FromStr;

#[cfg(test)]
use proptest_derive::Arbitrary;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The role a key plays.
///
/// The set is closed. On the wire each variant is exactly its capitalized
/// name; anything else, including a different casing, is rejected.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyType {
    Signing,
    Encryption,
    Issuing,
    Revocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidKeyType {
    #[error("invalid key type: {0:?}")]
    Name(String),
    #[error("invalid key type: {0}")]
    Value(u8),
}

impl KeyType {
    pub const ALL: [KeyType; 4] = [
        KeyType::Signing,
        KeyType::Encryption,
        KeyType::Issuing,
        KeyType::Revocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Signing => "Signing",
            KeyType::Encryption => "Encryption",
            KeyType::Issuing => "Issuing",
            KeyType::Revocation => "Revocation",
        }
    }
}

impl FromStr for KeyType {
    type Err = InvalidKeyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyType::ALL
            .into_iter()
            .find(|key_type| key_type.as_str() == s)
            .ok_or_else(|| InvalidKeyType::Name(s.to_owned()))
    }
}

impl TryFrom<u8> for KeyType {
    type Error = InvalidKeyType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        KeyType::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidKeyType::Value(value))
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KeyType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

struct KeyTypeVisitor;

impl<'de> Visitor<'de> for KeyTypeVisitor {
    type Value = KeyType;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("one of \"Signing\", \"Encryption\", \"Issuing\", \"Revocation\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

// `deserialize_str` also covers map keys: serde_json hands keys to the
// visitor as strings, so a bad key fails the whole map.
impl<'de> Deserialize<'de> for KeyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(KeyTypeVisitor)
    }
}
