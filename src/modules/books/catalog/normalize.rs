//! Pure normalization from raw catalog responses to canonical shapes.
//!
//! Nothing here touches the network; given identical inputs the output is
//! identical, which keeps the record-fetch path idempotent.

use crate::modules::books::models::{BookMetadata, SearchResult};

use super::types::{RawEdition, RawSearchDoc, RawText};

/// Fallback when no author can be resolved
pub const UNKNOWN: &str = "Unknown";

/// Map a raw edition plus resolved author names into canonical metadata.
///
/// Title and publish date pass through verbatim; the `isbn` field is left
/// unset for the orchestrator to attach on the save path.
pub fn normalize_edition(
    raw: &RawEdition,
    author_names: &[String],
    cover_url: Option<String>,
) -> BookMetadata {
    BookMetadata {
        title: raw.title.clone().unwrap_or_default(),
        author: Some(join_authors(author_names)),
        published_date: raw.publish_date.clone(),
        description: raw
            .description
            .clone()
            .map(RawText::into_text)
            .unwrap_or_default(),
        cover_url,
        isbn: None,
    }
}

/// Join resolved author names with `", "`; an empty list yields `"Unknown"`.
pub fn join_authors(names: &[String]) -> String {
    if names.is_empty() {
        UNKNOWN.to_string()
    } else {
        names.join(", ")
    }
}

/// Large cover image for an edition looked up by ISBN
pub fn cover_url_for_isbn(covers_base: &str, isbn: &str) -> String {
    format!("{}/b/isbn/{}-L.jpg", covers_base.trim_end_matches('/'), isbn)
}

/// Large cover image addressed by an Open Library edition id
pub fn cover_url_for_olid(covers_base: &str, olid: &str) -> String {
    format!("{}/b/olid/{}-L.jpg", covers_base.trim_end_matches('/'), olid)
}

/// Map one search document into a [`SearchResult`].
///
/// The cover comes from the cover edition key, falling back to the first
/// edition key; with neither present the result has no cover.
pub fn normalize_search_doc(doc: &RawSearchDoc, covers_base: &str) -> SearchResult {
    let author = match &doc.author_name {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => UNKNOWN.to_string(),
    };

    let published_year = doc
        .first_publish_year
        .map(|year| year.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let isbn = doc.isbn.as_ref().and_then(|list| list.first()).cloned();

    let cover_key = doc
        .cover_edition_key
        .clone()
        .or_else(|| doc.edition_key.as_ref().and_then(|keys| keys.first().cloned()));

    SearchResult {
        title: doc.title.clone().unwrap_or_default(),
        author,
        published_year,
        isbn,
        cover_url: cover_key.map(|olid| cover_url_for_olid(covers_base, &olid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERS: &str = "https://covers.openlibrary.org";

    fn edition(description: Option<RawText>) -> RawEdition {
        RawEdition {
            title: Some("Dune".to_string()),
            publish_date: Some("June 1965".to_string()),
            authors: Vec::new(),
            description,
        }
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = edition(Some(RawText::Plain("A desert planet.".to_string())));
        let names = vec!["Frank Herbert".to_string()];
        let cover = Some(cover_url_for_isbn(COVERS, "0441013597"));

        let first = normalize_edition(&raw, &names, cover.clone());
        let second = normalize_edition(&raw, &names, cover);
        assert_eq!(first, second);
    }

    #[test]
    fn plain_description_passes_through() {
        let metadata = normalize_edition(
            &edition(Some(RawText::Plain("A desert planet.".to_string()))),
            &[],
            None,
        );
        assert_eq!(metadata.description, "A desert planet.");
    }

    #[test]
    fn wrapped_description_is_unwrapped() {
        let metadata = normalize_edition(
            &edition(Some(RawText::Wrapped {
                value: Some("A desert planet.".to_string()),
            })),
            &[],
            None,
        );
        assert_eq!(metadata.description, "A desert planet.");
    }

    #[test]
    fn wrapped_description_without_value_is_empty() {
        let metadata = normalize_edition(&edition(Some(RawText::Wrapped { value: None })), &[], None);
        assert_eq!(metadata.description, "");
    }

    #[test]
    fn missing_description_is_empty() {
        let metadata = normalize_edition(&edition(None), &[], None);
        assert_eq!(metadata.description, "");
    }

    #[test]
    fn authors_join_comma_separated_or_unknown() {
        assert_eq!(
            join_authors(&["Terry Pratchett".to_string(), "Neil Gaiman".to_string()]),
            "Terry Pratchett, Neil Gaiman"
        );
        assert_eq!(join_authors(&[]), "Unknown");
    }

    #[test]
    fn publish_date_passes_through_verbatim() {
        let metadata = normalize_edition(&edition(None), &[], None);
        assert_eq!(metadata.published_date.as_deref(), Some("June 1965"));
    }

    #[test]
    fn cover_urls_follow_the_large_image_convention() {
        assert_eq!(
            cover_url_for_isbn(COVERS, "0441013597"),
            "https://covers.openlibrary.org/b/isbn/0441013597-L.jpg"
        );
        assert_eq!(
            cover_url_for_olid(COVERS, "OL7353617M"),
            "https://covers.openlibrary.org/b/olid/OL7353617M-L.jpg"
        );
    }

    #[test]
    fn search_doc_prefers_cover_edition_key() {
        let doc = RawSearchDoc {
            title: Some("Dune".to_string()),
            cover_edition_key: Some("OL1M".to_string()),
            edition_key: Some(vec!["OL2M".to_string()]),
            ..Default::default()
        };
        let result = normalize_search_doc(&doc, COVERS);
        assert_eq!(
            result.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/olid/OL1M-L.jpg")
        );
    }

    #[test]
    fn search_doc_falls_back_to_first_edition_key() {
        let doc = RawSearchDoc {
            title: Some("Dune".to_string()),
            edition_key: Some(vec!["OL2M".to_string(), "OL3M".to_string()]),
            ..Default::default()
        };
        let result = normalize_search_doc(&doc, COVERS);
        assert_eq!(
            result.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/olid/OL2M-L.jpg")
        );
    }

    #[test]
    fn search_doc_without_edition_keys_has_no_cover() {
        let doc = RawSearchDoc {
            title: Some("Dune".to_string()),
            ..Default::default()
        };
        let result = normalize_search_doc(&doc, COVERS);
        assert!(result.cover_url.is_none());
    }

    #[test]
    fn search_doc_degrades_missing_fields() {
        let doc = RawSearchDoc::default();
        let result = normalize_search_doc(&doc, COVERS);
        assert_eq!(result.author, "Unknown");
        assert_eq!(result.published_year, "Unknown");
        assert!(result.isbn.is_none());
    }

    #[test]
    fn search_doc_takes_first_isbn() {
        let doc = RawSearchDoc {
            title: Some("Dune".to_string()),
            author_name: Some(vec!["Frank Herbert".to_string()]),
            first_publish_year: Some(1965),
            isbn: Some(vec!["0441013597".to_string(), "9780441013593".to_string()]),
            ..Default::default()
        };
        let result = normalize_search_doc(&doc, COVERS);
        assert_eq!(result.isbn.as_deref(), Some("0441013597"));
        assert_eq!(result.published_year, "1965");
        assert_eq!(result.author, "Frank Herbert");
    }
}
