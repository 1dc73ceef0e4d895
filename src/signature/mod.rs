mod encoded;
mod envelope;

pub use encoded::{DecodeError, EncodeError, Encoded};
pub use envelope::{ProtectedError, Signature, Signed};

#[cfg(test)]
pub(crate) mod tests {
    pub use super::envelope::tests::*;
}
