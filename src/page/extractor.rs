//! The meta-tag extraction operation.
//!
//! Scrapes a captured page into a [`BibliographicRecord`] by scanning its
//! `<meta>` elements against a fixed dispatch table:
//!
//! | Tag name | Effect |
//! |----------|--------|
//! | `citation_title` | overwrite `metadata.title` |
//! | `citation_author` | append a creator |
//! | `citation_doi` | set `metadata.doi` |
//! | `citation_journal_title` | set `metadata.publicationTitle` |
//! | `citation_publication_date` | set `metadata.date` |
//! | `citation_abstract_html_url` | set `metadata.url` |
//!
//! Matching is ASCII-case-insensitive. Single-valued tags overwrite, so the
//! last occurrence in document order wins; every `citation_author` appends.
//! The operation always succeeds and never touches the page.

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::{BibliographicRecord, Creator, ItemType, Metadata};

use super::Page;
use super::meta::collect_meta;

// ============================================================================
// Dispatch Table
// ============================================================================

/// Single-valued record fields a tag can overwrite.
#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Doi,
    PublicationTitle,
    Date,
    Url,
}

/// Effect of a recognized tag name.
#[derive(Debug, Clone, Copy)]
enum TagAction {
    /// Overwrite a single-valued field (last occurrence wins).
    Overwrite(Field),
    /// Append a creator (document order preserved).
    AppendCreator,
}

/// Recognized tag names, lowercase, with their effects.
const DISPATCH: &[(&str, TagAction)] = &[
    ("citation_title", TagAction::Overwrite(Field::Title)),
    ("citation_author", TagAction::AppendCreator),
    ("citation_doi", TagAction::Overwrite(Field::Doi)),
    (
        "citation_journal_title",
        TagAction::Overwrite(Field::PublicationTitle),
    ),
    (
        "citation_publication_date",
        TagAction::Overwrite(Field::Date),
    ),
    ("citation_abstract_html_url", TagAction::Overwrite(Field::Url)),
];

// ============================================================================
// scrape
// ============================================================================

/// Scrapes a page into a bibliographic record.
///
/// The title starts from the page's plain document title and the URL falls
/// back to the page location when no citation tag supplies one, so both are
/// always populated (the title possibly as an empty string).
#[must_use]
pub fn scrape(page: &Page) -> BibliographicRecord {
    let mut title = page.title().to_string();
    let mut doi = None;
    let mut publication_title = None;
    let mut date = None;
    let mut url = None;
    let mut creators = Vec::new();

    for tag in collect_meta(page.html()) {
        let name = tag.name.to_ascii_lowercase();
        let Some(action) = DISPATCH
            .iter()
            .find(|(tag_name, _)| *tag_name == name)
            .map(|(_, action)| *action)
        else {
            continue;
        };

        match action {
            TagAction::Overwrite(Field::Title) => title = tag.content,
            TagAction::Overwrite(Field::Doi) => doi = Some(tag.content),
            TagAction::Overwrite(Field::PublicationTitle) => {
                publication_title = Some(tag.content);
            }
            TagAction::Overwrite(Field::Date) => date = Some(tag.content),
            TagAction::Overwrite(Field::Url) => url = Some(tag.content),
            TagAction::AppendCreator => creators.push(Creator::from_raw(&tag.content)),
        }
    }

    BibliographicRecord {
        item_type: ItemType::JournalArticle,
        metadata: Metadata {
            title,
            doi,
            publication_title,
            date,
            url: url.unwrap_or_else(|| page.location().as_str().to_string()),
        },
        creators,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use url::Url;

    const PAGE_URL: &str = "https://journal.example/article/42";

    fn page(html: &str) -> Page {
        Page::new(Url::parse(PAGE_URL).expect("valid url"), html)
    }

    #[test]
    fn test_citation_title_overrides_document_title() {
        let record = scrape(&page(
            r#"<title>Plain Title</title>
               <meta name="citation_title" content="Deep Learning">"#,
        ));
        assert_eq!(record.metadata.title, "Deep Learning");
    }

    #[test]
    fn test_no_citation_tags_uses_document_defaults() {
        let record = scrape(&page("<title>Untitled</title><body></body>"));
        assert_eq!(record.metadata.title, "Untitled");
        assert_eq!(record.metadata.url, PAGE_URL);
        assert!(record.creators.is_empty());
        assert_eq!(record.metadata.doi, None);
    }

    #[test]
    fn test_last_occurrence_wins_for_single_valued_tags() {
        let record = scrape(&page(
            r#"<meta name="citation_title" content="First">
               <meta name="citation_title" content="Second">
               <meta name="citation_doi" content="10.1/a">
               <meta name="citation_doi" content="10.1/b">"#,
        ));
        assert_eq!(record.metadata.title, "Second");
        assert_eq!(record.metadata.doi, Some("10.1/b".to_string()));
    }

    #[test]
    fn test_authors_append_in_document_order() {
        let record = scrape(&page(
            r#"<meta name="citation_author" content="Ada Lovelace">
               <meta name="citation_author" content="Charles Babbage">
               <meta name="citation_author" content="Turing">"#,
        ));
        assert_eq!(record.creators.len(), 3);
        assert_eq!(record.creators[0].last_name, "Lovelace");
        assert_eq!(record.creators[1].last_name, "Babbage");
        assert_eq!(record.creators[2].first_name, "");
        assert_eq!(record.creators[2].last_name, "Turing");
    }

    #[test]
    fn test_url_from_abstract_tag() {
        let record = scrape(&page(
            r#"<meta name="citation_abstract_html_url" content="https://host.example/abs/1">"#,
        ));
        assert_eq!(record.metadata.url, "https://host.example/abs/1");
    }

    #[test]
    fn test_url_falls_back_to_location() {
        let record = scrape(&page(r#"<meta name="citation_title" content="T">"#));
        assert_eq!(record.metadata.url, PAGE_URL);
    }

    #[test]
    fn test_tag_names_match_case_insensitively() {
        let record = scrape(&page(
            r#"<meta name="Citation_Title" content="Mixed Case">
               <meta name="CITATION_DOI" content="10.1/xyz">"#,
        ));
        assert_eq!(record.metadata.title, "Mixed Case");
        assert_eq!(record.metadata.doi, Some("10.1/xyz".to_string()));
    }

    #[test]
    fn test_unrecognized_tags_ignored() {
        let record = scrape(&page(
            r#"<meta name="description" content="ignored">
               <meta name="citation_keywords" content="ignored">
               <meta name="citation_journal_title" content="Nature">"#,
        ));
        assert_eq!(
            record.metadata.publication_title,
            Some("Nature".to_string())
        );
        assert_eq!(record.metadata.title, "");
    }

    #[test]
    fn test_journal_and_date_fields() {
        let record = scrape(&page(
            r#"<meta name="citation_journal_title" content="Nature">
               <meta name="citation_publication_date" content="2024/01/02">"#,
        ));
        assert_eq!(
            record.metadata.publication_title,
            Some("Nature".to_string())
        );
        assert_eq!(record.metadata.date, Some("2024/01/02".to_string()));
    }

    #[test]
    fn test_scenario_full_record() {
        let record = scrape(&page(
            r#"<title>Some Site</title>
               <meta name="citation_title" content="Deep Learning">
               <meta name="citation_author" content="Jane Q Doe">
               <meta name="citation_doi" content="10.1/xyz">"#,
        ));

        assert_eq!(record.item_type, ItemType::JournalArticle);
        assert_eq!(record.metadata.title, "Deep Learning");
        assert_eq!(record.metadata.doi, Some("10.1/xyz".to_string()));
        assert_eq!(record.metadata.url, PAGE_URL);
        assert_eq!(record.creators.len(), 1);
        assert_eq!(record.creators[0].first_name, "Jane Q");
        assert_eq!(record.creators[0].last_name, "Doe");
    }

    #[test]
    fn test_empty_page_is_structurally_valid() {
        let record = scrape(&page(""));
        assert_eq!(record.metadata.title, "");
        assert_eq!(record.metadata.url, PAGE_URL);
        assert!(record.creators.is_empty());
        assert!(!record.has_title());
    }
}
