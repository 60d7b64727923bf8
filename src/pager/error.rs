use thiserror::Error;

/// Errors raised by the pager primitives. Both indicate a caller bug rather
/// than something a viewer can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("page index {index} out of range for {len} pages")]
    OutOfRange { index: usize, len: usize },
}

impl PagerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PagerError::InvalidArgument(msg.into())
    }
}
