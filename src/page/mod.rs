//! Captured page documents and the citation extractor.
//!
//! This module is the content-script side of the pipeline:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Page`] | A captured document: location, markup, derived plain title |
//! | [`scrape`] | The extraction operation over a page's meta tags |
//! | [`PageContext`] | Hosts a page behind a `get_page_data` request loop |
//! | [`PageHandle`] | Sends requests to a context, awaits the reply |
//!
//! # Example
//!
//! ```
//! use scholar_capture::{Page, scrape};
//!
//! let location = url::Url::parse("https://journal.example/article/42").unwrap();
//! let page = Page::new(location, r#"<html><head>
//!     <meta name="citation_title" content="Deep Learning">
//! </head></html>"#);
//!
//! let record = scrape(&page);
//! assert_eq!(record.metadata.title, "Deep Learning");
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Page context request loop.
pub mod context;

/// The meta-tag extraction operation.
pub mod extractor;

/// Meta tag and title collection from raw markup.
mod meta;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{PageContext, PageHandle};
pub use extractor::scrape;

// ============================================================================
// Imports
// ============================================================================

use url::Url;

// ============================================================================
// Page
// ============================================================================

/// A captured page document.
///
/// Holds the raw markup and the page's location, plus the plain document
/// title derived from the `<title>` element at construction (empty string
/// when the element is absent) - the value a browser would expose as
/// `document.title`.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page location.
    location: Url,

    /// Raw markup.
    html: String,

    /// Plain document title (whitespace-normalized).
    title: String,
}

impl Page {
    /// Captures a document from its location and markup.
    #[must_use]
    pub fn new(location: Url, html: impl Into<String>) -> Self {
        let html = html.into();
        let title = meta::collect_title(&html).unwrap_or_default();

        Self {
            location,
            html,
            title,
        }
    }

    /// Returns the page location.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Returns the raw markup.
    #[inline]
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Returns the plain document title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

// ============================================================================
// Tests
// ============================================================================
