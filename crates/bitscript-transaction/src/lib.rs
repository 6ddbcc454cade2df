/// Transaction model, signature-hash computation, signature codec, and the
/// top-level spend verifier.
///
/// Provides the Transaction type with wire serialization, both the legacy
/// and the value-committing (FORKID) signature digest algorithms, the
/// DER+sighash signature codec, and `correctly_spends`, which drives the
/// script interpreter over an input's unlocking and locking scripts.

pub mod input;
pub mod output;
pub mod sighash;
pub mod signature;
pub mod spend;
pub mod transaction;

mod error;
pub use error::TransactionError;
pub use input::TxInput;
pub use output::TxOutput;
pub use signature::TransactionSignature;
pub use spend::correctly_spends;
pub use transaction::Transaction;
