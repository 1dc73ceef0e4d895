pub mod human;
mod signature;
pub mod trc;
mod util;

pub use crate::signature::{DecodeError, EncodeError, Encoded, ProtectedError, Signature, Signed};
pub use human::{render, render_file, Human, Outcome};
pub use trc::{FormatVersion, KeyType, Protected, SignedTrc, Trc};
