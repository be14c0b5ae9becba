//! Scholar Capture - Citation metadata capture and native-host relay.
//!
//! This library implements the two-stage pipeline used to clip scholarly
//! references off a web page: an extractor that reads `citation_*` meta tags
//! out of a captured document, and a relay that forwards the resulting
//! record to an external native host over a native-messaging channel.
//!
//! # Architecture
//!
//! The pipeline follows a content-script / background-worker split:
//!
//! - **Page context**: owns the captured document, serves `get_page_data`
//!   requests by scraping the markup into a [`BibliographicRecord`]
//! - **Relay**: on a user action, requests the record, validates it, and
//!   forwards it to the native host process over framed stdio
//!
//! Key design principles:
//!
//! - One independent cycle per user action (no shared state, no retries)
//! - Each cycle exclusively owns its [`NativeChannel`]
//! - Extraction is a pure, data-driven dispatch over meta tag names
//! - Every error is consumed and logged inside the cycle that hit it
//!
//! # Quick Start
//!
//! ```no_run
//! use scholar_capture::{NativeHostConfig, Page, PageContext, Relay};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Capture a document and host it behind a page context
//!     let location = url::Url::parse("https://journal.example/article/42")?;
//!     let page = Page::new(location, r#"<html><head>
//!         <title>Fallback Title</title>
//!         <meta name="citation_title" content="Deep Learning">
//!         <meta name="citation_author" content="Jane Q Doe">
//!     </head></html>"#);
//!     let context = PageContext::spawn(page);
//!
//!     // Build the relay with the native host identity injected
//!     let relay = Relay::builder()
//!         .host(NativeHostConfig::new(
//!             "com.my_company.scholarcore",
//!             "/usr/local/bin/scholarcore-host",
//!         ))
//!         .build()?;
//!
//!     // One user action = one extraction-and-forward cycle
//!     let outcome = relay.on_user_action(&context.handle()).await;
//!     println!("cycle outcome: {outcome:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`page`] | Captured documents, meta-tag scan, the extractor, [`PageContext`] |
//! | [`relay`] | The user-action cycle orchestrator |
//! | [`protocol`] | Record envelope and inter-context message types |
//! | [`transport`] | Native-messaging framing and channel (internal plumbing) |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
///
/// Newtype wrappers keep unrelated IDs apart at compile time.
pub mod identifiers;

/// Captured page documents and the citation extractor.
///
/// This module contains the content-script side of the pipeline:
///
/// - [`Page`] - a captured document (location + markup)
/// - [`scrape`] - the meta-tag extraction operation
/// - [`PageContext`] - hosts a page behind a request/reply loop
pub mod page;

/// Message and record types shared across the pipeline.
///
/// Defines the record envelope forwarded to the native host and the
/// inter-context request shape.
pub mod protocol;

/// The extraction-and-forward cycle orchestrator.
///
/// Use [`Relay::builder()`] to create a configured relay instance.
pub mod relay;

/// Native-messaging transport layer.
///
/// Internal module handling frame codec and host channel management.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Page types
pub use page::{Page, PageContext, PageHandle, scrape};

// Relay types
pub use relay::{CycleOutcome, Relay, RelayBuilder};

// Protocol types
pub use protocol::{BibliographicRecord, Creator, CreatorType, ItemType, Metadata, PageDataRequest};

// Transport types
pub use transport::{NativeChannel, NativeHostConfig};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::CycleId;
