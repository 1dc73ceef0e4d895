use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Structural version of the TRC format.
///
/// Only [`FormatVersion::CURRENT`] can be constructed, so holding a
/// `FormatVersion` means the check already happened.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FormatVersion(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported format version: {0}")]
pub struct UnsupportedFormatVersion(pub i128);

impl FormatVersion {
    pub const CURRENT: FormatVersion = FormatVersion(1);

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for FormatVersion {
    type Error = UnsupportedFormatVersion;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value != u64::from(Self::CURRENT.0) {
            return Err(UnsupportedFormatVersion(value.into()));
        }
        Ok(Self::CURRENT)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FormatVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

struct FormatVersionVisitor;

impl<'de> Visitor<'de> for FormatVersionVisitor {
    type Value = FormatVersion;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "the integer {}", FormatVersion::CURRENT)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        FormatVersion::try_from(v).map_err(E::custom)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::custom(UnsupportedFormatVersion(v.into()))),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::invalid_type(Unexpected::Float(v), &self))
    }
}

impl<'de> Deserialize<'de> for FormatVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_u64(FormatVersionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deserialize_current() {
        let version: FormatVersion = serde_json::from_str("1").unwrap();
        assert_eq!(version, FormatVersion::CURRENT);
        assert_eq!(version.get(), 1);
    }

    #[test]
    fn test_deserialize_unsupported() {
        for input in ["0", "2", "-1", "255", "18446744073709551615"] {
            let err = serde_json::from_str::<FormatVersion>(input).unwrap_err();
            assert!(
                err.to_string().contains("unsupported format version"),
                "{input}: {err}"
            );
        }
    }

    #[test]
    fn test_deserialize_wrong_type() {
        for input in [r#""1""#, r#""0""#, r#""Garbage""#, "1.0", "null"] {
            let err = serde_json::from_str::<FormatVersion>(input).unwrap_err();
            assert!(err.to_string().contains("invalid type"), "{input}: {err}");
            assert!(!err.to_string().contains("unsupported format version"));
        }
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&FormatVersion::CURRENT).unwrap(), "1");
    }

    proptest! {
        #[test]
        fn test_only_current_accepted(value: i64) {
            let result = serde_json::from_str::<FormatVersion>(&value.to_string());
            prop_assert_eq!(result.is_ok(), value == 1);
        }
    }
}
