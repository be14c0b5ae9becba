//! Native messaging transport layer.
//!
//! This module handles communication between the relay and the external
//! native host process over framed stdio.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Relay (Rust)   │                              │  Native Host    │
//! │                 │    length-prefixed JSON      │  (spawned       │
//! │  NativeChannel  │◄────────────────────────────►│   process)      │
//! │                 │       stdin / stdout         │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Channel Lifecycle
//!
//! 1. `NativeChannel::connect` - Spawn the configured host executable
//! 2. `post_message` - Send the record envelope as the first frame
//! 3. Message handler - Observe zero or more host replies
//! 4. Disconnect handler - Observe the close, normal or abnormal
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Host process ownership and event loop |
//! | `codec` | Length-prefixed JSON frame codec |
//! | `host` | Native host identity and launch configuration |

// ============================================================================
// Submodules
// ============================================================================

/// Native messaging channel and event loop.
pub mod channel;

/// Native messaging frame codec.
pub mod codec;

/// Native host identity and launch configuration.
pub mod host;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{DisconnectHandler, MessageHandler, NativeChannel};
pub use host::NativeHostConfig;
