//! Error type for aborted draw calls.

use thiserror::Error;

/// Why a draw call was aborted.
///
/// A draw call that returns one of these has written no pixels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FillError {
    /// The brush kind has no fill strategy.
    #[error("cannot fill with a {kind} brush")]
    UnsupportedBrush { kind: &'static str },
    /// The world or brush transform has no inverse.
    #[error("transform is not invertible")]
    SingularTransform,
    /// The source image is null.
    #[error("source image is empty")]
    EmptySource,
}

/// Result alias used by the paint engine.
pub type Result<T, E = FillError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = FillError::UnsupportedBrush { kind: "surface" };
        assert_eq!(e.to_string(), "cannot fill with a surface brush");
        assert_eq!(FillError::SingularTransform.to_string(), "transform is not invertible");
    }
}
