//! The TRC payload and the per-signature protected header.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::signature::Signed;

mod keys;
mod primary;
mod protected;
mod version;

pub use keys::{InvalidKeyType, KeyType};
pub use primary::{Attribute, KeyMeta, PrimaryAs};
pub use protected::{Protected, SignatureType};
pub use version::{FormatVersion, UnsupportedFormatVersion};

/// A signed TRC as it is stored on disk.
pub type SignedTrc = Signed<Trc, Protected>;

/// Validity period in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub not_before: u32,
    pub not_after: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub key_type: KeyType,
    pub key_version: u64,
}

/// Trust root configuration for one ISD.
///
/// AS-keyed maps are ordered so the same TRC always serializes the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trc {
    pub isd: u16,
    #[serde(rename = "trc_version")]
    pub version: u64,
    pub base_version: u64,
    pub description: String,
    pub voting_quorum: u8,
    pub format_version: FormatVersion,
    /// Seconds the previous TRC stays valid after this one is announced.
    pub grace_period: u32,
    pub trust_reset_allowed: bool,
    pub validity: Validity,
    pub primary_ases: BTreeMap<String, PrimaryAs>,
    pub votes: BTreeMap<String, Vote>,
    pub proof_of_possession: BTreeMap<String, Vec<KeyType>>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::collection::{btree_map, vec as prop_vec};
    use proptest::prelude::*;

    pub const TRC: &str = r#"{
        "isd": 1,
        "trc_version": 1,
        "base_version": 1,
        "description": "ISD 1",
        "voting_quorum": 1,
        "format_version": 1,
        "grace_period": 0,
        "trust_reset_allowed": true,
        "validity": {"not_before": 1560000000, "not_after": 1590000000},
        "primary_ases": {
            "ff00:0:110": {
                "attributes": ["Authoritative", "Core", "Issuing", "Voting"],
                "keys": {
                    "Issuing": {"key_version": 1, "algorithm": "Ed25519", "key": "AAECAw=="},
                    "Signing": {"key_version": 1, "algorithm": "Ed25519", "key": "BAUGBw=="}
                }
            }
        },
        "votes": {},
        "proof_of_possession": {"ff00:0:110": ["Issuing", "Signing"]}
    }"#;

    fn as_ids() -> impl Strategy<Value = String> {
        "[1-9a-f][0-9a-f]{0,3}:0:[1-9a-f][0-9a-f]{0,3}"
    }

    fn key_metas() -> impl Strategy<Value = KeyMeta> {
        (1u64..10, prop_vec(any::<u8>(), 32..=32)).prop_map(|(key_version, key)| KeyMeta {
            key_version,
            algorithm: "Ed25519".into(),
            key,
        })
    }

    fn primary_ases() -> impl Strategy<Value = PrimaryAs> {
        (
            prop_vec(any::<Attribute>(), 1..4),
            btree_map(any::<KeyType>(), key_metas(), 1..4),
        )
            .prop_map(|(attributes, keys)| PrimaryAs { attributes, keys })
    }

    pub fn trc_payloads() -> impl Strategy<Value = Trc> {
        (
            any::<u16>(),
            1u64..100,
            "[a-zA-Z0-9 ]{0,24}",
            btree_map(as_ids(), primary_ases(), 1..4),
            any::<bool>(),
            (0u32..1 << 30, 0u32..1 << 30),
        )
            .prop_map(
                |(isd, version, description, primary_ases, trust_reset_allowed, (start, len))| {
                    let votes = primary_ases
                        .keys()
                        .map(|as_id| {
                            let vote = Vote {
                                key_type: KeyType::Issuing,
                                key_version: 1,
                            };
                            (as_id.clone(), vote)
                        })
                        .collect();
                    let proof_of_possession = primary_ases
                        .iter()
                        .map(|(as_id, primary)| {
                            (as_id.clone(), primary.keys.keys().copied().collect())
                        })
                        .collect();
                    Trc {
                        isd,
                        version,
                        base_version: 1,
                        description,
                        voting_quorum: 1,
                        format_version: FormatVersion::CURRENT,
                        grace_period: 0,
                        trust_reset_allowed,
                        validity: Validity {
                            not_before: start,
                            not_after: start + len,
                        },
                        primary_ases,
                        votes,
                        proof_of_possession,
                    }
                },
            )
    }

    /// A protected header for the `i`th signer, cycling through the primary ASes.
    pub fn protected_for(trc: &Trc, i: usize) -> Protected {
        let as_ids: Vec<_> = trc.primary_ases.keys().collect();
        let signature_type = if i % 2 == 0 {
            SignatureType::Vote
        } else {
            SignatureType::ProofOfPossession
        };
        Protected::new(
            "Ed25519",
            signature_type,
            KeyType::ALL[i % KeyType::ALL.len()],
            1,
            as_ids[i % as_ids.len()].clone(),
        )
    }

    #[test]
    fn test_deserialize() {
        let trc: Trc = serde_json::from_str(TRC).unwrap();
        assert_eq!(trc.isd, 1);
        assert_eq!(trc.version, trc.base_version);
        assert_eq!(trc.format_version, FormatVersion::CURRENT);
        assert_eq!(
            trc.validity,
            Validity {
                not_before: 1560000000,
                not_after: 1590000000
            }
        );
        assert!(trc.primary_ases["ff00:0:110"].attributes.contains(&Attribute::Voting));
        assert_eq!(
            trc.proof_of_possession["ff00:0:110"],
            vec![KeyType::Issuing, KeyType::Signing]
        );
    }

    #[test]
    fn test_deserialize_unsupported_format_version() {
        let trc = TRC.replace(r#""format_version": 1"#, r#""format_version": 0"#);
        let err = serde_json::from_str::<Trc>(&trc).unwrap_err();
        assert!(err.to_string().contains("unsupported format version"));

        let trc = TRC.replace(r#""format_version": 1"#, r#""format_version": "1""#);
        assert!(serde_json::from_str::<Trc>(&trc).is_err());
    }

    #[test]
    fn test_deserialize_invalid_key_type() {
        let trc = TRC.replace(r#"["Issuing", "Signing"]"#, r#"["Issuing", "Voting"]"#);
        let err = serde_json::from_str::<Trc>(&trc).unwrap_err();
        assert!(err.to_string().contains("invalid key type"));
    }

    proptest! {
        #[test]
        fn test_serialize_round_trip(trc in trc_payloads()) {
            let json = serde_json::to_string(&trc)?;
            let back: Trc = serde_json::from_str(&json)?;
            prop_assert_eq!(&back, &trc);
            prop_assert_eq!(serde_json::to_string(&back)?, json);
        }
    }
}
