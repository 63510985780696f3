//! Gesture configuration errors.

use thiserror::Error;

/// Invalid gesture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    /// Click window of zero would classify every click as a lone click.
    #[error("click delay must be greater than zero")]
    ZeroClickDelay,

    /// Long-press threshold of zero would turn every tap into a long press.
    #[error("long-press delay must be greater than zero")]
    ZeroLongPress,
}
