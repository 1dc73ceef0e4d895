//! Renders signed documents with every nested part decoded.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::signature::{DecodeError, ProtectedError, Signed};

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read file (file: {file}): {source}")]
    Read {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse signed envelope (file: {file}): {source}")]
    Envelope {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to parse payload (file: {file}): {source}")]
    Payload {
        file: String,
        #[source]
        source: DecodeError,
    },
    #[error("unable to parse signatures (file: {file}): {source}")]
    Signatures {
        file: String,
        #[source]
        source: ProtectedError,
    },
    #[error("unable to write human readable document (file: {file}): {source}")]
    Serialize {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The source the failure belongs to.
    pub fn file(&self) -> &str {
        match self {
            Error::Read { file, .. }
            | Error::Envelope { file, .. }
            | Error::Payload { file, .. }
            | Error::Signatures { file, .. }
            | Error::Serialize { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanSignature<'a, H> {
    pub protected: H,
    #[serde(with = "crate::util::bytes")]
    pub signature: &'a [u8],
}

/// A signed document with the payload and protected headers decoded.
///
/// Field order is fixed: payload first, then signatures in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Human<'a, P, H> {
    pub payload: P,
    pub signatures: Vec<HumanSignature<'a, H>>,
}

impl<'a, P, H> Human<'a, P, H>
where
    P: DeserializeOwned,
    H: DeserializeOwned,
{
    /// Decodes the payload, then every protected header in order.
    ///
    /// `file` only labels errors.
    pub fn decode(file: &str, signed: &'a Signed<P, H>) -> Result<Self, Error> {
        let payload = signed.decode_payload().map_err(|source| Error::Payload {
            file: file.to_owned(),
            source,
        })?;
        debug!(file, "decoded payload");

        let signatures = signed
            .decode_signatures()
            .map_err(|source| Error::Signatures {
                file: file.to_owned(),
                source,
            })?
            .into_iter()
            .map(|(protected, signature)| HumanSignature {
                protected,
                signature,
            })
            .collect();
        debug!(file, signatures = signed.len(), "decoded signatures");

        Ok(Self {
            payload,
            signatures,
        })
    }
}

/// Parses `raw` as a signed document and renders it as indented JSON.
pub fn render<P, H>(file: &str, raw: &[u8]) -> Result<String, Error>
where
    P: DeserializeOwned + Serialize,
    H: DeserializeOwned + Serialize,
{
    let signed = Signed::<P, H>::from_slice(raw).map_err(|source| Error::Envelope {
        file: file.to_owned(),
        source,
    })?;
    debug!(file, signatures = signed.len(), "parsed signed envelope");

    let human = Human::decode(file, &signed)?;
    serde_json::to_string_pretty(&human).map_err(|source| Error::Serialize {
        file: file.to_owned(),
        source,
    })
}

pub fn render_file<P, H>(path: &Path) -> Result<String, Error>
where
    P: DeserializeOwned + Serialize,
    H: DeserializeOwned + Serialize,
{
    let file = path.display().to_string();
    let raw = std::fs::read(path).map_err(|source| Error::Read {
        file: file.clone(),
        source,
    })?;
    render::<P, H>(&file, &raw)
}

/// Result of rendering a batch of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub rendered: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rendered, {} failed",
            self.rendered.len(),
            self.failed.len()
        )
    }
}

/// Renders every file in order.
///
/// Each rendered document is written to `out` as soon as it is ready. A
/// failure is written to `err` and does not stop the remaining files. Only a
/// failure to write to `out` or `err` aborts the batch.
pub fn run<P, H, I, W, E>(paths: I, out: &mut W, err: &mut E) -> io::Result<Outcome>
where
    P: DeserializeOwned + Serialize,
    H: DeserializeOwned + Serialize,
    I: IntoIterator,
    I::Item: AsRef<Path>,
    W: Write,
    E: Write,
{
    let mut outcome = Outcome::default();
    for path in paths {
        let path = path.as_ref();
        match render_file::<P, H>(path) {
            Ok(human) => {
                writeln!(out, "{human}")?;
                out.flush()?;
                outcome.rendered.push(path.to_owned());
            }
            Err(error) => {
                warn!(file = error.file(), %error, "unable to render");
                writeln!(err, "Error: {error}")?;
                outcome.failed.push(path.to_owned());
            }
        }
    }
    Ok(outcome)
}
