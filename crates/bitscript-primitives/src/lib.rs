/// Bitscript engine - hashing, byte-level serialization, and secp256k1 primitives.
///
/// This crate provides the foundational building blocks for the script engine:
/// - Hash functions (SHA-256, SHA-256d, SHA-1, RIPEMD-160, Hash160)
/// - Variable-length integer encoding and wire-format readers/writers
/// - Elliptic curve cryptography (secp256k1 keys and ECDSA signatures)

pub mod hash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
