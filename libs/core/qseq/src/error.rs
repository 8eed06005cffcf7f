// -----------------------------------------------------------------------------
// Error
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}
