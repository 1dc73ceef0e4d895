use std::marker::PhantomData;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use derivative::Derivative;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64url encoding: {0}")]
    Base64(#[source] base64::DecodeError),
    #[error("invalid document: {0}")]
    Json(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("unable to encode document: {0}")]
pub struct EncodeError(#[source] serde_json::Error);

/// A nested JSON document carried as base64url text inside another document.
///
/// The text is kept exactly as received. Nothing is decoded until
/// [`Encoded::decode`] is called, and decoding never touches the stored text.
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
pub struct Encoded<T> {
    raw: String,
    #[derivative(Debug = "ignore")]
    _schema: PhantomData<fn() -> T>,
}

impl<T> Encoded<T> {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _schema: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }
}

impl<T: DeserializeOwned> Encoded<T> {
    pub fn decode(&self) -> Result<T, DecodeError> {
        let json = URL_SAFE_NO_PAD
            .decode(&self.raw)
            .map_err(DecodeError::Base64)?;
        serde_json::from_slice(&json).map_err(DecodeError::Json)
    }
}

impl<T: Serialize> Encoded<T> {
    pub fn encode(value: &T) -> Result<Self, EncodeError> {
        let json = serde_json::to_vec(value).map_err(EncodeError)?;
        Ok(Self::from_raw(URL_SAFE_NO_PAD.encode(json)))
    }
}

impl<T> Serialize for Encoded<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de, T> Deserialize<'de> for Encoded<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from_raw)
    }
}
