#[cfg(test)]
use proptest_derive::Arbitrary;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::KeyType;

#[cfg_attr(test, derive(Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureType {
    Vote,
    ProofOfPossession,
}

/// Signed-over metadata attached to each TRC signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Protected {
    #[serde(rename = "alg")]
    pub algorithm: String,
    #[serde(rename = "type")]
    pub signature_type: SignatureType,
    pub key_type: KeyType,
    pub key_version: u64,
    #[serde(rename = "as")]
    pub as_id: String,
    #[serde(deserialize_with = "exact_crit")]
    pub crit: Vec<String>,
}

fn exact_crit<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let crit = Vec::<String>::deserialize(deserializer)?;
    if crit != Protected::CRIT {
        return Err(de::Error::custom(format_args!(
            "invalid crit: expected {:?}, got {:?}",
            Protected::CRIT,
            crit
        )));
    }
    Ok(crit)
}

impl Protected {
    pub const CRIT: [&'static str; 4] = ["type", "key_type", "key_version", "as"];

    pub fn new(
        algorithm: impl Into<String>,
        signature_type: SignatureType,
        key_type: KeyType,
        key_version: u64,
        as_id: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            signature_type,
            key_type,
            key_version,
            as_id: as_id.into(),
            crit: Self::default_crit(),
        }
    }

    fn default_crit() -> Vec<String> {
        Self::CRIT.iter().map(|s| s.to_string()).collect()
    }
}
