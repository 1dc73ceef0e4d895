use derivative::Derivative;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::{DecodeError, Encoded};

/// One detached signature: an encoded protected header plus opaque signature bytes.
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug(bound = ""), Clone(bound = ""), PartialEq(bound = ""))]
#[serde(bound = "")]
pub struct Signature<H> {
    pub protected: Encoded<H>,
    #[serde(with = "crate::util::bytes")]
    pub signature: Vec<u8>,
}

impl<H> Signature<H> {
    pub fn new(protected: Encoded<H>, signature: Vec<u8>) -> Self {
        Self {
            protected,
            signature,
        }
    }

    /// The bytes this signature covers: `protected || "." || payload`, both
    /// in their encoded form.
    pub fn signing_input<P>(&self, payload: &Encoded<P>) -> Vec<u8> {
        let mut data = Vec::from(self.protected.as_bytes());
        data.push(b'.');
        data.extend_from_slice(payload.as_bytes());
        data
    }
}

#[derive(Debug, Error)]
#[error("unable to parse protected meta (idx: {idx}): {source}")]
pub struct ProtectedError {
    pub idx: usize,
    #[source]
    pub source: DecodeError,
}

/// The outer signed document.
///
/// Parsing only reads the outer shape. The payload and each protected header
/// stay encoded until asked for.
#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Debug(bound = ""), Clone(bound = ""), PartialEq(bound = ""))]
#[serde(bound = "")]
pub struct Signed<P, H> {
    pub payload: Encoded<P>,
    #[serde(deserialize_with = "at_least_one")]
    pub signatures: Vec<Signature<H>>,
}

fn at_least_one<'de, D, H>(deserializer: D) -> Result<Vec<Signature<H>>, D::Error>
where
    D: Deserializer<'de>,
{
    let signatures = Vec::<Signature<H>>::deserialize(deserializer)?;
    if signatures.is_empty() {
        return Err(de::Error::custom("signed envelope carries no signatures"));
    }
    Ok(signatures)
}

impl<P, H> Signed<P, H> {
    pub fn new(payload: Encoded<P>, signatures: Vec<Signature<H>>) -> Self {
        Self {
            payload,
            signatures,
        }
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    /// Number of signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl<P: DeserializeOwned, H> Signed<P, H> {
    pub fn decode_payload(&self) -> Result<P, DecodeError> {
        self.payload.decode()
    }
}

impl<P, H: DeserializeOwned> Signed<P, H> {
    /// Decodes every protected header in order, stopping at the first failure.
    pub fn decode_signatures(&self) -> Result<Vec<(H, &[u8])>, ProtectedError> {
        let mut decoded = Vec::with_capacity(self.signatures.len());
        for (idx, signature) in self.signatures.iter().enumerate() {
            let protected = signature
                .protected
                .decode()
                .map_err(|source| ProtectedError { idx, source })?;
            decoded.push((protected, signature.signature.as_slice()));
        }
        Ok(decoded)
    }
}
