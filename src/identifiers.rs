//! Type-safe identifiers.
//!
//! Newtype wrappers prevent mixing unrelated IDs at compile time and give
//! log lines a stable, greppable shape.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// CycleId
// ============================================================================

/// Identifier for one user-action cycle.
///
/// A fresh ID is generated per invocation of
/// [`Relay::on_user_action`](crate::Relay::on_user_action) and attached to
/// every log event of that cycle, so replies arriving on concurrently open
/// channels stay attributable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(Uuid);

impl CycleId {
    /// Generates a new random cycle ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Tests
// ============================================================================
