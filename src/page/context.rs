//! Page context request loop.
//!
//! A [`PageContext`] is the stand-in for a content script: it owns one
//! captured [`Page`] and answers `get_page_data` requests for as long as it
//! is alive. Extraction is synchronous, but the reply travels over a
//! response channel that stays open until fulfilled, so the requester is
//! decoupled from the handler's return.
//!
//! Dropping (or explicitly closing) the context tears the loop down;
//! requests in flight at that point surface as delivery errors on the
//! requesting side.

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::{BibliographicRecord, ContextRequest, PageDataRequest, RequestAction};

use super::Page;
use super::extractor::scrape;

// ============================================================================
// PageContext
// ============================================================================

/// Hosts a captured page behind a request loop.
///
/// The loop runs on a spawned task until the context is closed or dropped.
#[derive(Debug)]
pub struct PageContext {
    /// Request channel into the loop.
    request_tx: mpsc::UnboundedSender<ContextRequest>,

    /// Dropping this ends the loop.
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PageContext {
    /// Spawns a context serving the given page.
    #[must_use]
    pub fn spawn(page: Page) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(run_request_loop(page, request_rx, shutdown_rx));

        Self {
            request_tx,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Returns a handle for sending requests to this context.
    ///
    /// Handles stay valid as addresses after the context closes; requests
    /// sent through them then fail with a delivery error.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> PageHandle {
        PageHandle {
            request_tx: self.request_tx.clone(),
        }
    }

    /// Closes the context, ending its request loop.
    ///
    /// Equivalent to dropping the context; provided for explicitness.
    pub fn close(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// ============================================================================
// PageHandle
// ============================================================================

/// Sends requests to a [`PageContext`].
#[derive(Debug, Clone)]
pub struct PageHandle {
    /// Request channel into the context's loop.
    request_tx: mpsc::UnboundedSender<ContextRequest>,
}

impl PageHandle {
    /// Requests the page's bibliographic record.
    ///
    /// Suspends until the context replies.
    ///
    /// # Errors
    ///
    /// [`Error::Delivery`] if the context is gone before the request is
    /// sent, or goes away without replying.
    pub async fn request_page_data(&self) -> Result<BibliographicRecord> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = ContextRequest {
            request: PageDataRequest::default(),
            reply: reply_tx,
        };

        self.request_tx
            .send(request)
            .map_err(|_| Error::delivery("page context is gone"))?;

        reply_rx
            .await
            .map_err(|_| Error::delivery("page context went away without replying"))
    }
}

// ============================================================================
// Request Loop
// ============================================================================

/// Serves requests until shutdown or until every handle is dropped.
async fn run_request_loop(
    page: Page,
    mut request_rx: mpsc::UnboundedReceiver<ContextRequest>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            // Resolves on close() and on PageContext drop alike.
            _ = &mut shutdown_rx => {
                debug!("page context closed");
                break;
            }

            request = request_rx.recv() => {
                match request {
                    Some(ContextRequest { request, reply }) => match request.action {
                        RequestAction::GetPageData => {
                            let record = scrape(&page);
                            trace!(title = %record.metadata.title, "serving get_page_data");
                            let _ = reply.send(record);
                        }
                    },

                    None => {
                        debug!("all page handles dropped");
                        break;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
