//! Bibliographic record envelope.
//!
//! Defines the record produced by the extractor and forwarded verbatim to
//! the native host as the first message on the channel.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "item_type": "journalArticle",
//!   "metadata": {
//!     "title": "Deep Learning",
//!     "doi": "10.1/xyz",
//!     "publicationTitle": "Nature",
//!     "date": "2024-01-02",
//!     "url": "https://journal.example/article/42"
//!   },
//!   "creators": [
//!     { "first_name": "Jane Q", "last_name": "Doe", "creator_type": "author" }
//!   ]
//! }
//! ```
//!
//! `title` and `url` are always present (`title` may be empty); the other
//! metadata fields are omitted when the page did not supply them.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// BibliographicRecord
// ============================================================================

/// One scraped bibliographic record.
///
/// Created fresh per extraction, never mutated afterwards; it lives for one
/// request/reply/forward cycle and is then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// Item classification. Always [`ItemType::JournalArticle`].
    pub item_type: ItemType,

    /// Field values scraped off the page.
    pub metadata: Metadata,

    /// Contributors, in document order of their `citation_author` tags.
    pub creators: Vec<Creator>,
}

impl BibliographicRecord {
    /// Returns `true` if the record carries a non-empty title.
    ///
    /// The relay forwards a record if and only if this holds.
    #[inline]
    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.metadata.title.is_empty()
    }
}

// ============================================================================
// ItemType
// ============================================================================

/// Item classification tag.
///
/// Fixed to a single default value; no classification logic exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    /// A journal article.
    #[default]
    #[serde(rename = "journalArticle")]
    JournalArticle,
}

// ============================================================================
// Metadata
// ============================================================================

/// Scraped field values.
///
/// JSON keys match the recognized field names of the `citation_*` tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Article title. Falls back to the document's plain title, which may
    /// itself be empty.
    pub title: String,

    /// Digital object identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Journal title.
    #[serde(
        rename = "publicationTitle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_title: Option<String>,

    /// Publication date, as printed on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Article URL. Always populated: either from a citation tag or from
    /// the page's own location.
    pub url: String,
}

// ============================================================================
// Creator
// ============================================================================

/// One contributor attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// All whitespace-separated tokens of the raw author string except the
    /// last, joined by single spaces.
    pub first_name: String,

    /// The last whitespace-separated token; empty if the raw string was.
    pub last_name: String,

    /// Contributor role. Always [`CreatorType::Author`].
    pub creator_type: CreatorType,
}

impl Creator {
    /// Splits a raw author string into a creator.
    ///
    /// # Example
    ///
    /// ```
    /// use scholar_capture::Creator;
    ///
    /// let creator = Creator::from_raw("Jane Q Doe");
    /// assert_eq!(creator.first_name, "Jane Q");
    /// assert_eq!(creator.last_name, "Doe");
    /// ```
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let mut tokens: Vec<&str> = raw.split_whitespace().collect();
        let last_name = tokens.pop().unwrap_or_default().to_string();
        let first_name = tokens.join(" ");

        Self {
            first_name,
            last_name,
            creator_type: CreatorType::Author,
        }
    }
}

// ============================================================================
// CreatorType
// ============================================================================

/// Contributor role tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorType {
    /// An author.
    #[default]
    Author,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn record_with_title(title: &str) -> BibliographicRecord {
        BibliographicRecord {
            item_type: ItemType::JournalArticle,
            metadata: Metadata {
                title: title.to_string(),
                url: "https://journal.example/article/42".to_string(),
                ..Metadata::default()
            },
            creators: Vec::new(),
        }
    }

    #[test]
    fn test_creator_from_raw_multi_token() {
        let creator = Creator::from_raw("Jane Q Doe");
        assert_eq!(creator.first_name, "Jane Q");
        assert_eq!(creator.last_name, "Doe");
        assert_eq!(creator.creator_type, CreatorType::Author);
    }

    #[test]
    fn test_creator_from_raw_single_token() {
        let creator = Creator::from_raw("Aristotle");
        assert_eq!(creator.first_name, "");
        assert_eq!(creator.last_name, "Aristotle");
    }

    #[test]
    fn test_creator_from_raw_empty() {
        let creator = Creator::from_raw("");
        assert_eq!(creator.first_name, "");
        assert_eq!(creator.last_name, "");
    }

    #[test]
    fn test_creator_from_raw_collapses_whitespace() {
        let creator = Creator::from_raw("  Jane \t Q   Doe ");
        assert_eq!(creator.first_name, "Jane Q");
        assert_eq!(creator.last_name, "Doe");
    }

    #[test]
    fn test_has_title() {
        assert!(record_with_title("Deep Learning").has_title());
        assert!(!record_with_title("").has_title());
    }

    #[test]
    fn test_record_serialization_keys() {
        let record = BibliographicRecord {
            item_type: ItemType::JournalArticle,
            metadata: Metadata {
                title: "Deep Learning".to_string(),
                doi: Some("10.1/xyz".to_string()),
                publication_title: Some("Nature".to_string()),
                date: None,
                url: "https://journal.example/article/42".to_string(),
            },
            creators: vec![Creator::from_raw("Jane Q Doe")],
        };

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["item_type"], "journalArticle");
        assert_eq!(json["metadata"]["publicationTitle"], "Nature");
        assert_eq!(json["creators"][0]["creator_type"], "author");
        assert_eq!(json["creators"][0]["first_name"], "Jane Q");

        // Unset optional fields are omitted entirely
        assert!(json["metadata"].get("date").is_none());
    }

    #[test]
    fn test_record_roundtrip() {
        let record = BibliographicRecord {
            item_type: ItemType::JournalArticle,
            metadata: Metadata {
                title: "Untitled".to_string(),
                url: "https://example.com/".to_string(),
                ..Metadata::default()
            },
            creators: Vec::new(),
        };

        let json = serde_json::to_string(&record).expect("serialize");
        let back: BibliographicRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }

    proptest! {
        // k whitespace-separated tokens: last token becomes the last name,
        // the join of the first k-1 becomes the first name.
        #[test]
        fn creator_split_property(tokens in proptest::collection::vec("[A-Za-z]{1,8}", 1..6)) {
            let raw = tokens.join(" ");
            let creator = Creator::from_raw(&raw);

            prop_assert_eq!(&creator.last_name, tokens.last().expect("non-empty"));
            prop_assert_eq!(creator.first_name, tokens[..tokens.len() - 1].join(" "));
        }
    }
}
