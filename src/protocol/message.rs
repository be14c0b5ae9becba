//! Inter-context request types.
//!
//! The relay asks the page context for its record with a single named
//! action. The reply travels back over a dedicated oneshot channel that
//! stays open until the context fulfills it, so the context may answer
//! after its handler has already returned to the event loop.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::record::BibliographicRecord;

// ============================================================================
// PageDataRequest
// ============================================================================

/// A request for the current page's bibliographic record.
///
/// # Format
///
/// ```json
/// { "action": "get_page_data" }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDataRequest {
    /// The requested action.
    pub action: RequestAction,
}

// ============================================================================
// RequestAction
// ============================================================================

/// Named actions a page context understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestAction {
    /// Scrape the page and reply with its record.
    #[default]
    #[serde(rename = "get_page_data")]
    GetPageData,
}

// ============================================================================
// ContextRequest
// ============================================================================

/// A [`PageDataRequest`] paired with its reply slot.
///
/// The oneshot sender is the open response channel: dropping it without
/// sending surfaces as a delivery error on the requesting side.
#[derive(Debug)]
pub(crate) struct ContextRequest {
    /// The request as it would appear on the wire.
    pub request: PageDataRequest,

    /// Reply channel, fulfilled exactly once.
    pub reply: oneshot::Sender<BibliographicRecord>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = PageDataRequest::default();
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(json, r#"{"action":"get_page_data"}"#);
    }

    #[test]
    fn test_request_roundtrip() {
        let json = r#"{ "action": "get_page_data" }"#;
        let request: PageDataRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.action, RequestAction::GetPageData);
    }
}
