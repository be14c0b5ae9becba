//! Error types for Scholar Capture.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use scholar_capture::{Result, NativeChannel};
//!
//! fn example(channel: &NativeChannel, record: &BibliographicRecord) -> Result<()> {
//!     channel.post_message(record)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Page context | [`Error::Delivery`] |
//! | Native channel | [`Error::HostSpawnFailed`], [`Error::ChannelClosed`], [`Error::Disconnect`] |
//! | Framing | [`Error::Frame`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging. Cycle-level errors
/// never escape [`Relay::on_user_action`](crate::Relay::on_user_action);
/// they are logged and folded into the cycle outcome.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when relay or native host configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Page Context Errors
    // ========================================================================
    /// Request to the page context could not be delivered or answered.
    ///
    /// Returned when the target context is gone before the request is sent,
    /// or drops the request without replying.
    #[error("Request delivery failed: {message}")]
    Delivery {
        /// Description of the delivery failure.
        message: String,
    },

    // ========================================================================
    // Native Channel Errors
    // ========================================================================
    /// Failed to launch the native host process.
    ///
    /// Returned when the configured host executable cannot be spawned.
    #[error("Failed to launch native host: {message}")]
    HostSpawnFailed {
        /// Description of the launch failure.
        message: String,
    },

    /// Native messaging channel is no longer usable.
    ///
    /// Returned when posting on a channel whose event loop has ended.
    #[error("Channel closed")]
    ChannelClosed,

    /// Native messaging channel closed abnormally.
    ///
    /// Carried into the disconnect handler when the channel ends on an
    /// I/O or framing failure rather than a clean end-of-stream.
    #[error("Channel disconnected: {message}")]
    Disconnect {
        /// Description of the abnormal close.
        message: String,
    },

    // ========================================================================
    // Framing Errors
    // ========================================================================
    /// Native messaging frame violation.
    ///
    /// Returned on truncated length prefixes, truncated payloads, and
    /// oversized inbound messages.
    #[error("Frame error: {message}")]
    Frame {
        /// Description of the framing violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a request delivery error.
    #[inline]
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Creates a host spawn error.
    #[inline]
    pub fn host_spawn_failed(message: impl Into<String>) -> Self {
        Self::HostSpawnFailed {
            message: message.into(),
        }
    }

    /// Creates an abnormal disconnect error.
    #[inline]
    pub fn disconnect(message: impl Into<String>) -> Self {
        Self::Disconnect {
            message: message.into(),
        }
    }

    /// Creates a framing error.
    #[inline]
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a request delivery error.
    #[inline]
    #[must_use]
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery { .. })
    }

    /// Returns `true` if this is a native channel error.
    #[inline]
    #[must_use]
    pub fn is_channel_error(&self) -> bool {
        matches!(
            self,
            Self::HostSpawnFailed { .. }
                | Self::ChannelClosed
                | Self::Disconnect { .. }
                | Self::Frame { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
