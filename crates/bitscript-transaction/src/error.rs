/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an index out of range).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// A signature could not be decoded or failed a canonicality rule.
    #[error("signature error: {0}")]
    SignatureError(String),
    /// An underlying script error (forwarded from `bitscript-script`).
    #[error("script error: {0}")]
    Script(#[from] bitscript_script::ScriptError),
    /// An underlying primitives error (forwarded from `bitscript-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bitscript_primitives::PrimitivesError),
}
